//! Contact form inbox.
//!
//! Replies go out by e-mail first; the message is only marked `dibalas`
//! once the mail server accepted the reply.

use std::sync::Arc;

use crate::error::{AppError, AppResult};
use crate::models::{ContactStatus, Kontak, NewKontak};
use crate::repositories::{KontakFilter, KontakStore};
use crate::services::mail::MailService;

/// A message as submitted through the public contact form.
#[derive(Debug, Clone)]
pub struct ContactSubmission {
    pub nama: String,
    pub email: String,
    pub subjek: String,
    pub pesan: String,
}

#[derive(Clone)]
pub struct KontakService {
    store: Arc<dyn KontakStore>,
    mail: MailService,
}

impl KontakService {
    pub fn new(store: Arc<dyn KontakStore>, mail: MailService) -> Self {
        Self { store, mail }
    }

    pub async fn submit(&self, submission: ContactSubmission) -> AppResult<Kontak> {
        let message = NewKontak {
            nama: submission.nama.trim().to_string(),
            email: submission.email.trim().to_string(),
            subjek: submission.subjek.trim().to_string(),
            pesan: submission.pesan.trim().to_string(),
            status: ContactStatus::New,
        };
        if message.pesan.is_empty() {
            return Err(AppError::validation("pesan", "Message must not be empty"));
        }

        let created = self.store.create(&message).await?;
        tracing::info!(kontak_id = created.id, "Contact message received");
        Ok(created)
    }

    /// Newest first.
    pub async fn list(
        &self,
        filter: &KontakFilter,
        offset: i64,
        limit: i64,
    ) -> AppResult<(Vec<Kontak>, i64)> {
        self.store.list_paginated(filter, offset, limit).await
    }

    /// Fetches a message for staff, marking an unread one as read.
    pub async fn open(&self, id: i32) -> AppResult<Kontak> {
        self.store
            .mark_read(id)
            .await?
            .ok_or_else(|| AppError::not_found("kontak", "id", id))
    }

    pub async fn update_status(&self, id: i32, status: ContactStatus) -> AppResult<Kontak> {
        let updated = self
            .store
            .set_status(id, status)
            .await?
            .ok_or_else(|| AppError::not_found("kontak", "id", id))?;
        tracing::info!(kontak_id = id, status = %status, "Contact message status updated");
        Ok(updated)
    }

    pub async fn delete(&self, id: i32) -> AppResult<()> {
        if !self.store.delete(id).await? {
            return Err(AppError::not_found("kontak", "id", id));
        }
        tracing::info!(kontak_id = id, "Contact message deleted");
        Ok(())
    }

    /// E-mails `balasan` to the author, then marks the message `dibalas`.
    ///
    /// A failed send leaves the status untouched.
    pub async fn reply(&self, id: i32, balasan: &str) -> AppResult<Kontak> {
        if balasan.trim().is_empty() {
            return Err(AppError::validation("balasan", "Reply must not be empty"));
        }

        let kontak = self
            .store
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("kontak", "id", id))?;

        self.mail.send_contact_reply(&kontak, balasan).await?;

        let updated = self
            .store
            .set_status(id, ContactStatus::Replied)
            .await?
            .ok_or_else(|| AppError::not_found("kontak", "id", id))?;
        tracing::info!(
            kontak_id = id,
            provider = self.mail.provider_name(),
            "Contact message replied"
        );
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::mail::{MailError, MailProvider, OutgoingMail};
    use async_trait::async_trait;
    use jiff::civil;
    use std::collections::BTreeMap;
    use std::sync::Mutex;

    #[derive(Default)]
    struct MemoryInbox {
        rows: Mutex<BTreeMap<i32, Kontak>>,
    }

    impl MemoryInbox {
        fn status_of(&self, id: i32) -> Option<ContactStatus> {
            self.rows.lock().unwrap().get(&id).map(|k| k.status)
        }
    }

    fn at() -> jiff_diesel::DateTime {
        jiff_diesel::DateTime::from(civil::date(2025, 1, 15).at(10, 0, 0, 0))
    }

    #[async_trait]
    impl KontakStore for MemoryInbox {
        async fn create(&self, message: &NewKontak) -> Result<Kontak, AppError> {
            let mut rows = self.rows.lock().unwrap();
            let id = rows.keys().next_back().copied().unwrap_or(0) + 1;
            let kontak = Kontak {
                id,
                nama: message.nama.clone(),
                email: message.email.clone(),
                subjek: message.subjek.clone(),
                pesan: message.pesan.clone(),
                status: message.status,
                created_at: at(),
                updated_at: at(),
            };
            rows.insert(id, kontak.clone());
            Ok(kontak)
        }

        async fn find_by_id(&self, id: i32) -> Result<Option<Kontak>, AppError> {
            Ok(self.rows.lock().unwrap().get(&id).cloned())
        }

        async fn list_paginated(
            &self,
            filter: &KontakFilter,
            offset: i64,
            limit: i64,
        ) -> Result<(Vec<Kontak>, i64), AppError> {
            let rows: Vec<Kontak> = self
                .rows
                .lock()
                .unwrap()
                .values()
                .rev()
                .filter(|k| filter.status.is_none_or(|s| k.status == s))
                .cloned()
                .collect();
            let total = rows.len() as i64;
            Ok((
                rows.into_iter()
                    .skip(offset as usize)
                    .take(limit as usize)
                    .collect(),
                total,
            ))
        }

        async fn set_status(
            &self,
            id: i32,
            status: ContactStatus,
        ) -> Result<Option<Kontak>, AppError> {
            let mut rows = self.rows.lock().unwrap();
            Ok(rows.get_mut(&id).map(|k| {
                k.status = status;
                k.clone()
            }))
        }

        async fn mark_read(&self, id: i32) -> Result<Option<Kontak>, AppError> {
            let mut rows = self.rows.lock().unwrap();
            Ok(rows.get_mut(&id).map(|k| {
                if k.status == ContactStatus::New {
                    k.status = ContactStatus::Read;
                }
                k.clone()
            }))
        }

        async fn delete(&self, id: i32) -> Result<bool, AppError> {
            Ok(self.rows.lock().unwrap().remove(&id).is_some())
        }
    }

    /// Captures mail and the inbox status at the moment of sending.
    struct CapturingMailer {
        inbox: Arc<MemoryInbox>,
        fail: bool,
        sent: Mutex<Vec<(OutgoingMail, Option<ContactStatus>)>>,
    }

    #[async_trait]
    impl MailProvider for CapturingMailer {
        async fn send(&self, mail: &OutgoingMail) -> Result<(), MailError> {
            if self.fail {
                return Err(MailError::Transport {
                    provider: "capturing",
                    reason: "connection refused".to_string(),
                });
            }
            let status = self.inbox.status_of(1);
            self.sent.lock().unwrap().push((mail.clone(), status));
            Ok(())
        }

        fn name(&self) -> &'static str {
            "capturing"
        }
    }

    type Harness = (KontakService, Arc<MemoryInbox>, Arc<CapturingMailer>);

    fn service(fail: bool, enabled: bool) -> Harness {
        let inbox = Arc::new(MemoryInbox::default());
        let mailer = Arc::new(CapturingMailer {
            inbox: inbox.clone(),
            fail,
            sent: Mutex::new(Vec::new()),
        });
        let mail = MailService::new(mailer.clone(), "Kelurahan Graha Indah", enabled);
        (KontakService::new(inbox.clone(), mail), inbox, mailer)
    }

    fn submission() -> ContactSubmission {
        ContactSubmission {
            nama: " Dewi ".to_string(),
            email: "dewi@example.org".to_string(),
            subjek: "Jam pelayanan".to_string(),
            pesan: "Apakah kantor buka hari Sabtu?".to_string(),
        }
    }

    #[tokio::test]
    async fn test_submit_starts_as_new() {
        let (service, _, _) = service(false, true);

        let kontak = service.submit(submission()).await.unwrap();

        assert_eq!(kontak.status, ContactStatus::New);
        assert_eq!(kontak.nama, "Dewi");
    }

    #[tokio::test]
    async fn test_blank_message_is_rejected() {
        let (service, _, _) = service(false, true);
        let mut blank = submission();
        blank.pesan = "   ".to_string();

        let result = service.submit(blank).await;

        assert!(matches!(result, Err(AppError::Validation { ref field, .. }) if field == "pesan"));
    }

    #[tokio::test]
    async fn test_open_marks_new_message_read_only_once() {
        let (service, inbox, _) = service(false, true);
        let kontak = service.submit(submission()).await.unwrap();

        assert_eq!(service.open(kontak.id).await.unwrap().status, ContactStatus::Read);

        service.update_status(kontak.id, ContactStatus::Replied).await.unwrap();
        assert_eq!(service.open(kontak.id).await.unwrap().status, ContactStatus::Replied);
        assert_eq!(inbox.status_of(kontak.id), Some(ContactStatus::Replied));
    }

    #[tokio::test]
    async fn test_missing_message_is_not_found() {
        let (service, _, _) = service(false, true);

        assert!(matches!(service.open(9).await, Err(AppError::NotFound { .. })));
        assert!(matches!(service.delete(9).await, Err(AppError::NotFound { .. })));
        assert!(matches!(
            service.update_status(9, ContactStatus::Read).await,
            Err(AppError::NotFound { .. })
        ));
        assert!(matches!(service.reply(9, "Halo").await, Err(AppError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_reply_sends_mail_before_marking_replied() {
        let (service, inbox, mailer) = service(false, true);
        let kontak = service.submit(submission()).await.unwrap();

        let replied = service.reply(kontak.id, "Buka 08.00-12.00.").await.unwrap();

        assert_eq!(replied.status, ContactStatus::Replied);
        let sent = mailer.sent.lock().unwrap().clone();
        assert_eq!(sent.len(), 1);
        let (mail, status_while_sending) = &sent[0];
        assert_eq!(mail.subject, "Balasan Pesan Anda - Kelurahan Graha Indah");
        assert_eq!(mail.to_address, "dewi@example.org");
        assert_eq!(*status_while_sending, Some(ContactStatus::New));
        assert_eq!(inbox.status_of(kontak.id), Some(ContactStatus::Replied));
    }

    #[tokio::test]
    async fn test_failed_reply_keeps_status() {
        let (service, inbox, _) = service(true, true);
        let kontak = service.submit(submission()).await.unwrap();
        service.open(kontak.id).await.unwrap();

        let result = service.reply(kontak.id, "Buka 08.00-12.00.").await;

        assert!(matches!(result, Err(AppError::Internal { .. })));
        assert_eq!(inbox.status_of(kontak.id), Some(ContactStatus::Read));
    }

    #[tokio::test]
    async fn test_reply_refused_when_mail_disabled() {
        let (service, inbox, mailer) = service(false, false);
        let kontak = service.submit(submission()).await.unwrap();

        let result = service.reply(kontak.id, "Halo").await;

        assert!(matches!(result, Err(AppError::BadRequest { .. })));
        assert!(mailer.sent.lock().unwrap().is_empty());
        assert_eq!(inbox.status_of(kontak.id), Some(ContactStatus::New));
    }

    #[tokio::test]
    async fn test_list_filters_by_status() {
        let (service, _, _) = service(false, true);
        let first = service.submit(submission()).await.unwrap();
        service.submit(submission()).await.unwrap();
        service.open(first.id).await.unwrap();

        let filter = KontakFilter {
            status: Some(ContactStatus::New),
            search: None,
        };
        let (rows, total) = service.list(&filter, 0, 15).await.unwrap();

        assert_eq!(total, 1);
        assert_eq!(rows[0].id, 2);
    }
}
