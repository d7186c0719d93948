//! Reply e-mail to a contact form message.

use super::provider::OutgoingMail;
use crate::models::Kontak;

/// Subject prefix; the organization name follows it.
pub const REPLY_SUBJECT_PREFIX: &str = "Balasan Pesan Anda";

pub fn render_contact_reply(kontak: &Kontak, balasan: &str, organization: &str) -> OutgoingMail {
    let mut body = String::new();
    body.push_str(&format!("Yth. {},\n\n", kontak.nama));
    body.push_str(&format!(
        "Terima kasih telah menghubungi {}. Berikut balasan atas pesan Anda:\n\n",
        organization
    ));
    body.push_str(balasan.trim());
    body.push_str("\n\n");
    body.push_str("----------------------------------------\n");
    body.push_str("Pesan Anda:\n");
    body.push_str(&format!("Subjek: {}\n\n", kontak.subjek));
    body.push_str(kontak.pesan.trim());
    body.push_str("\n----------------------------------------\n\n");
    body.push_str(&format!("Hormat kami,\n{}\n", organization));

    OutgoingMail {
        to_name: kontak.nama.clone(),
        to_address: kontak.email.clone(),
        subject: format!("{} - {}", REPLY_SUBJECT_PREFIX, organization),
        body,
    }
}
