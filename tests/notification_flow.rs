//! End-to-end notification delivery against a mocked Fonnte gateway.

use httpmock::prelude::*;
use kelurahan::config::NotificationSettings;
use kelurahan::models::{RequestStatus, ServiceRequest};
use kelurahan::services::notifications::NotificationService;
use kelurahan::services::notifications::templates::{COMPLETION_HEADLINE, headline};
use serde_json::json;

fn settings(url: String) -> NotificationSettings {
    let mut settings = NotificationSettings::default();
    settings.enabled = true;
    settings.whatsapp.url = url;
    settings.whatsapp.token = "fonnte-token".to_string();
    settings.whatsapp.timeout_seconds = 2;
    settings
}

fn request(status: RequestStatus, note: Option<&str>) -> ServiceRequest {
    ServiceRequest {
        id: 1,
        requester_name: "Budi".to_string(),
        contact_address: "081234567890".to_string(),
        registration_code: "REG-001".to_string(),
        note: note.map(str::to_string),
        service_name: "KTP".to_string(),
        status,
    }
}

#[tokio::test]
async fn completed_request_sends_one_completion_message() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/send")
                .header("Authorization", "fonnte-token")
                .json_body_partial(r#"{"target":"6281234567890","countryCode":"62"}"#)
                .body_contains("Budi")
                .body_contains("REG-001")
                .body_contains("KTP")
                .body_contains(COMPLETION_HEADLINE);
            then.status(200)
                .json_body(json!({"status": true, "detail": "success! message in queue"}));
        })
        .await;

    let service = NotificationService::from_settings(&settings(server.url("/send")));
    let result = service
        .notify_status_change(&request(RequestStatus::Done, None))
        .await
        .expect("an attempt is made for an enabled service");

    assert!(result.succeeded());
    assert_eq!(result.outcome(), "delivered");
    assert_eq!(mock.hits_async().await, 1);
}

#[tokio::test]
async fn rejected_request_carries_note_and_gateway_refusal_is_reported() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/send")
                .body_contains(headline(RequestStatus::Rejected))
                .body_contains("Berkas tidak lengkap");
            then.status(200)
                .json_body(json!({"status": false, "reason": "target invalid"}));
        })
        .await;

    let service = NotificationService::from_settings(&settings(server.url("/send")));
    let result = service
        .notify_status_change(&request(RequestStatus::Rejected, Some("Berkas tidak lengkap")))
        .await
        .expect("an attempt is made for an enabled service");

    assert!(!result.succeeded());
    assert_eq!(result.outcome(), "rejected");
    assert_eq!(result.human_message(), "target invalid");
    assert_eq!(mock.hits_async().await, 1);
}

#[tokio::test]
async fn gateway_error_status_becomes_undelivered() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST).path("/send");
            then.status(502).body("bad gateway");
        })
        .await;

    let service = NotificationService::from_settings(&settings(server.url("/send")));
    let result = service
        .notify_status_change(&request(RequestStatus::InProgress, None))
        .await
        .expect("an attempt is made for an enabled service");

    assert_eq!(result.outcome(), "undelivered");
    assert!(result.human_message().starts_with("Failed to send WhatsApp message"));
    assert_eq!(mock.hits_async().await, 1);
}

#[tokio::test]
async fn disabled_service_and_blank_contact_never_call_the_gateway() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST).path("/send");
            then.status(200).json_body(json!({"status": true}));
        })
        .await;

    let mut disabled = settings(server.url("/send"));
    disabled.enabled = false;
    let service = NotificationService::from_settings(&disabled);
    assert!(service.notify_status_change(&request(RequestStatus::Done, None)).await.is_none());

    let service = NotificationService::from_settings(&settings(server.url("/send")));
    let mut blank = request(RequestStatus::Done, None);
    blank.contact_address = "   ".to_string();
    assert!(service.notify_status_change(&blank).await.is_none());

    assert_eq!(mock.hits_async().await, 0);
}
