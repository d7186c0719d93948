//! WhatsApp message texts sent to citizens.
//!
//! Messages use WhatsApp markup (`*bold*`) and emoji. Timestamps are printed
//! in the office's local time as `DD <Indonesian month> YYYY, HH:MM <label>`.

use std::fmt;

use jiff::Timestamp;
use jiff::tz::{Offset, TimeZone};
use serde::Serialize;

use crate::config::NotificationSettings;
use crate::models::{RequestStatus, ServiceRequest};

const MONTHS_ID: [&str; 12] = [
    "Januari",
    "Februari",
    "Maret",
    "April",
    "Mei",
    "Juni",
    "Juli",
    "Agustus",
    "September",
    "Oktober",
    "November",
    "Desember",
];

pub const COMPLETION_HEADLINE: &str = "✅ *Permohonan Anda Telah Selesai*";

/// Status headline shown under the organization header.
pub fn headline(status: RequestStatus) -> &'static str {
    match status {
        RequestStatus::InProgress => "⏳ *Permohonan Sedang Diproses*",
        RequestStatus::Rejected => "❌ *Permohonan Ditolak*",
        RequestStatus::Done => COMPLETION_HEADLINE,
        RequestStatus::New => "📢 *Update Status Permohonan*",
    }
}

/// Rendered message text, ready for the gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct OutboundMessage(String);

impl OutboundMessage {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    /// First `max_chars` characters, for log lines.
    pub fn preview(&self, max_chars: usize) -> String {
        let mut chars = self.0.chars();
        let head: String = chars.by_ref().take(max_chars).collect();
        if chars.next().is_some() {
            format!("{}...", head)
        } else {
            head
        }
    }
}

impl fmt::Display for OutboundMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Renders status and completion messages for one organization.
#[derive(Debug, Clone)]
pub struct MessageTemplates {
    organization_name: String,
    offset: Offset,
    timezone_label: String,
}

impl MessageTemplates {
    /// Offsets outside jiff's range fall back to UTC; settings validation
    /// keeps them within -12..=14.
    pub fn new(
        organization_name: impl Into<String>,
        utc_offset_hours: i8,
        timezone_label: impl Into<String>,
    ) -> Self {
        Self {
            organization_name: organization_name.into(),
            offset: Offset::from_seconds(i32::from(utc_offset_hours) * 3600)
                .unwrap_or(Offset::UTC),
            timezone_label: timezone_label.into(),
        }
    }

    pub fn from_settings(settings: &NotificationSettings) -> Self {
        Self::new(
            settings.organization_name.clone(),
            settings.utc_offset_hours,
            settings.timezone_label.clone(),
        )
    }

    pub fn render_status_message(
        &self,
        request: &ServiceRequest,
        status: RequestStatus,
    ) -> OutboundMessage {
        self.render_status_message_at(request, status, Timestamp::now())
    }

    pub fn render_status_message_at(
        &self,
        request: &ServiceRequest,
        status: RequestStatus,
        at: Timestamp,
    ) -> OutboundMessage {
        let mut text = self.header();
        text.push_str(headline(status));
        text.push_str("\n\n");
        text.push_str(&format!("Yth. Bapak/Ibu *{}*,\n\n", request.requester_name));
        text.push_str("Status permohonan Anda:\n");
        text.push_str(&format!("📋 No. Registrasi: *{}*\n", request.registration_code));
        text.push_str(&format!("📝 Layanan: *{}*\n", request.service_name));
        text.push_str(&format!("📊 Status: *{}*\n", status.label()));
        text.push_str(&format!("🗓️ Update: *{}*\n\n", self.format_timestamp(at)));
        push_note(&mut text, request.note.as_deref());
        text.push_str(&self.footer());

        OutboundMessage(text)
    }

    pub fn render_completion_message(&self, request: &ServiceRequest) -> OutboundMessage {
        self.render_completion_message_at(request, Timestamp::now())
    }

    pub fn render_completion_message_at(
        &self,
        request: &ServiceRequest,
        at: Timestamp,
    ) -> OutboundMessage {
        let mut text = self.header();
        text.push_str(COMPLETION_HEADLINE);
        text.push_str("\n\n");
        text.push_str(&format!("Yth. Bapak/Ibu *{}*,\n\n", request.requester_name));
        text.push_str("Permohonan Anda dengan detail:\n");
        text.push_str(&format!("📋 No. Registrasi: *{}*\n", request.registration_code));
        text.push_str(&format!("📝 Layanan: *{}*\n", request.service_name));
        text.push_str(&format!(
            "🗓️ Tanggal Selesai: *{}*\n\n",
            self.format_timestamp(at)
        ));
        push_note(&mut text, request.note.as_deref());
        text.push_str(&format!(
            "Dokumen Anda sudah dapat diambil di Kantor {}.\n\n",
            self.organization_name
        ));
        text.push_str("Terima kasih telah menggunakan layanan kami.\n\n");
        text.push_str(&self.footer());

        OutboundMessage(text)
    }

    /// `15 Januari 2025, 10:05 WIB`
    pub fn format_timestamp(&self, at: Timestamp) -> String {
        let local = at.to_zoned(TimeZone::fixed(self.offset));
        let month = MONTHS_ID[usize::from(local.month().unsigned_abs()) - 1];
        format!(
            "{:02} {} {}, {:02}:{:02} {}",
            local.day(),
            month,
            local.year(),
            local.hour(),
            local.minute(),
            self.timezone_label
        )
    }

    fn header(&self) -> String {
        format!("*{}*\n\n", self.organization_name.to_uppercase())
    }

    fn footer(&self) -> String {
        format!(
            "---\n🏢 {}\n📞 Hubungi kami untuk informasi lebih lanjut",
            self.organization_name
        )
    }
}

/// Blank notes are omitted; non-blank notes are copied verbatim.
fn push_note(text: &mut String, note: Option<&str>) {
    if let Some(note) = note.filter(|n| !n.trim().is_empty()) {
        text.push_str(&format!("📌 Catatan:\n{}\n\n", note));
    }
}
