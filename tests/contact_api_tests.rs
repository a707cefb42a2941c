mod common;

use axum::body::Body;
use axum::http::{ Request, StatusCode };
use common::*;
use portfolio_server::contact::{ INVALID_EMAIL_ERROR, RECEIVED_MESSAGE, REQUIRED_FIELDS_ERROR };
use portfolio_server::mail::Mailer;
use portfolio_server::storage::MemoryContactStore;
use std::sync::Arc;

const VALID: &str = r#"{
    "name": "Ada Lovelace",
    "email": "ada@example.com",
    "company": "Analytical Engines",
    "inquiryType": "recruitment",
    "message": "We'd love to talk about a role.",
    "technologiesOfInterest": ["Rust", "RAG"]
}"#;

#[tokio::test]
async fn test_missing_required_fields_are_rejected_before_any_io() {
    let bodies = [
        r#"{"email":"ada@example.com","message":"hi"}"#,
        r#"{"name":"Ada","message":"hi"}"#,
        r#"{"name":"Ada","email":"ada@example.com"}"#,
        r#"{"name":"","email":"ada@example.com","message":"hi"}"#,
        r#"{"name":"Ada","email":"","message":"hi"}"#,
        r#"{"name":"Ada","email":"ada@example.com","message":""}"#,
        r#"{}"#,
    ];

    for body in bodies {
        let store = CountingStore::new(false);
        let provider = RecordingProvider::new("primary", true, None);
        let app = contact_app(store.clone(), mailer(&[provider.clone()]));

        let (status, json) = post_json(&app, "/api/contact", body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "body: {}", body);
        assert_eq!(json["error"], REQUIRED_FIELDS_ERROR);
        assert_eq!(store.inserts(), 0);
        assert_eq!(provider.calls(), 0);
    }
}

#[tokio::test]
async fn test_invalid_email_is_rejected() {
    for email in ["abc", "a@b", "a b@c.com", "ada@example", "@example.com"] {
        let store = CountingStore::new(false);
        let provider = RecordingProvider::new("primary", true, None);
        let app = contact_app(store.clone(), mailer(&[provider.clone()]));
        let body = serde_json::json!({ "name": "Ada", "email": email, "message": "hi" }).to_string();

        let (status, json) = post_json(&app, "/api/contact", &body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "email: {}", email);
        assert_eq!(json["error"], INVALID_EMAIL_ERROR);
        assert_eq!(store.inserts(), 0);
        assert_eq!(provider.calls(), 0);
    }
}

#[tokio::test]
async fn test_store_failure_still_accepts_with_temporary_id() {
    let store = CountingStore::new(true);
    let provider = RecordingProvider::new("primary", true, None);
    let app = contact_app(store.clone(), mailer(&[provider.clone()]));

    let (status, json) = post_json(&app, "/api/contact", VALID).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["success"], true);
    assert_eq!(json["message"], RECEIVED_MESSAGE);
    assert!(json["id"].as_str().unwrap().starts_with("temp-"));
    assert_eq!(json["emailSent"], true);
    assert_eq!(store.inserts(), 1);
}

#[tokio::test]
async fn test_no_configured_provider_reports_email_not_sent() {
    let store = CountingStore::new(false);
    let primary = RecordingProvider::new("primary", false, None);
    let secondary = RecordingProvider::new("secondary", false, None);
    let app = contact_app(store.clone(), mailer(&[primary.clone(), secondary.clone()]));

    let (status, json) = post_json(&app, "/api/contact", VALID).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["success"], true);
    assert_eq!(json["emailSent"], false);
    assert_eq!(primary.calls() + secondary.calls(), 0);

    let app = contact_app(Arc::new(MemoryContactStore::new()), Mailer::default());
    let (_, json) = post_json(&app, "/api/contact", VALID).await;
    assert_eq!(json["emailSent"], false);
}

#[tokio::test]
async fn test_primary_provider_sends_notification_then_acknowledgment() {
    let store = CountingStore::new(false);
    let primary = RecordingProvider::new("primary", true, None);
    let secondary = RecordingProvider::new("secondary", true, None);
    let app = contact_app(store.clone(), mailer(&[primary.clone(), secondary.clone()]));

    let (status, json) = post_json(&app, "/api/contact", VALID).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["emailSent"], true);
    assert!(!json["id"].as_str().unwrap().starts_with("temp-"));

    let sent = primary.sent();
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[0].to, OPERATOR);
    assert_eq!(sent[0].reply_to.as_deref(), Some("ada@example.com"));
    assert!(sent[0].text.contains("Company: Analytical Engines"));
    assert!(sent[0].text.contains("Technologies: Rust, RAG"));
    assert_eq!(sent[1].to, "ada@example.com");
    assert!(sent[1].text.contains("opportunity"));
    assert_eq!(secondary.calls(), 0);
}

#[tokio::test]
async fn test_secondary_provider_used_when_primary_unconfigured() {
    let primary = RecordingProvider::new("primary", false, None);
    let secondary = RecordingProvider::new("secondary", true, None);
    let app = contact_app(CountingStore::new(false), mailer(&[primary.clone(), secondary.clone()]));

    let (_, json) = post_json(&app, "/api/contact", VALID).await;
    assert_eq!(json["emailSent"], true);
    assert_eq!(primary.calls(), 0);
    assert_eq!(secondary.sent().len(), 2);
}

#[tokio::test]
async fn test_failed_primary_is_not_retried_and_skips_acknowledgment() {
    let primary = RecordingProvider::new("primary", true, Some(0));
    let secondary = RecordingProvider::new("secondary", true, None);
    let app = contact_app(CountingStore::new(false), mailer(&[primary.clone(), secondary.clone()]));

    let (status, json) = post_json(&app, "/api/contact", VALID).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["success"], true);
    assert_eq!(json["emailSent"], false);
    assert_eq!(primary.calls(), 1);
    assert_eq!(secondary.calls(), 0);
}

#[tokio::test]
async fn test_acknowledgment_failure_does_not_change_response() {
    let primary = RecordingProvider::new("primary", true, Some(1));
    let app = contact_app(CountingStore::new(false), mailer(&[primary.clone()]));

    let (status, json) = post_json(&app, "/api/contact", VALID).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["emailSent"], true);
    assert_eq!(primary.calls(), 2);
    assert_eq!(primary.sent().len(), 1);
}

#[tokio::test]
async fn test_duplicate_submissions_are_stored_independently() {
    let store = CountingStore::new(false);
    let app = contact_app(store.clone(), Mailer::default());

    let (_, first) = post_json(&app, "/api/contact", VALID).await;
    let (_, second) = post_json(&app, "/api/contact", VALID).await;
    assert_eq!(first["success"], true);
    assert_eq!(second["success"], true);
    assert_ne!(first["id"], second["id"]);
    assert_eq!(store.inner.records().await.len(), 2);
}

#[tokio::test]
async fn test_request_metadata_is_persisted() {
    let store = CountingStore::new(false);
    let app = contact_app(store.clone(), Mailer::default());
    let request = Request::builder()
        .method("POST")
        .uri("/api/contact")
        .header("content-type", "application/json")
        .header("x-forwarded-for", "203.0.113.9, 10.0.0.1")
        .header("user-agent", "integration-test")
        .body(Body::from(VALID))
        .unwrap();

    let (status, _) = send(&app, request).await;
    assert_eq!(status, StatusCode::OK);

    let records = store.inner.records().await;
    let (_, record) = &records[0];
    assert_eq!(record.ip_address, "203.0.113.9");
    assert_eq!(record.user_agent, "integration-test");
    assert_eq!(record.referrer, None);
    assert_eq!(record.company.as_deref(), Some("Analytical Engines"));
}

#[tokio::test]
async fn test_malformed_body_is_a_server_error() {
    let store = CountingStore::new(false);
    let app = contact_app(store.clone(), Mailer::default());

    let (status, json) = post_json(&app, "/api/contact", "{not json").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["error"], "Failed to process contact form");
    assert_eq!(store.inserts(), 0);
}

#[tokio::test]
async fn test_loosely_typed_optional_fields_are_accepted() {
    let store = CountingStore::new(false);
    let app = contact_app(store.clone(), Mailer::default());
    let body = r#"{
        "name": "Ada",
        "email": "ada@example.com",
        "message": "hi",
        "technologiesOfInterest": "Rust",
        "projectBudget": 5000,
        "timeline": {"start": "Q3"},
        "inquiryType": 7
    }"#;

    let (status, json) = post_json(&app, "/api/contact", body).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["success"], true);

    let records = store.inner.records().await;
    let (_, record) = &records[0];
    assert_eq!(record.technologies_of_interest, vec!["Rust"]);
    assert_eq!(record.project_budget.as_deref(), Some("5000"));
    assert_eq!(record.timeline, None);
}
