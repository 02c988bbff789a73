//! Unit tests for the OTP authorization service

use std::sync::Arc;

use chrono::{Duration, Utc};
use serde_json::json;

use crate::domain::entities::otp_session::CODE_LENGTH;
use crate::errors::OtpError;
use crate::repositories::session::memory::MemoryOtpSessionRepository;
use crate::repositories::OtpSessionRepository;
use crate::services::otp::config::OtpServiceConfig;
use crate::services::otp::mask_contact;
use crate::services::otp::service::OtpAuthorizationService;

use super::mocks::MockDispatcher;

type Service = OtpAuthorizationService<MemoryOtpSessionRepository, MockDispatcher>;

fn service() -> (Service, Arc<MemoryOtpSessionRepository>, Arc<MockDispatcher>) {
    let repo = Arc::new(MemoryOtpSessionRepository::new());
    let dispatcher = Arc::new(MockDispatcher::new(false));
    let service = OtpAuthorizationService::new(
        repo.clone(),
        dispatcher.clone(),
        OtpServiceConfig::default(),
    );
    (service, repo, dispatcher)
}

fn payload() -> serde_json::Value {
    json!({"type": "transfer", "amount": 500})
}

/// A wrong code that can never collide with a generated one
const WRONG: &str = "no-code";

#[tokio::test]
async fn test_create_returns_token_and_code() {
    let (service, _, dispatcher) = service();

    let result = service
        .create("u1", "user@example.com", payload())
        .await
        .unwrap();

    assert_eq!(result.code.len(), CODE_LENGTH);
    assert!(result.code.chars().all(|c| c.is_ascii_digit()));
    assert!(!result.session_token.is_empty());
    assert!(result.expires_at > Utc::now());

    // The code went out on the delivery channel.
    assert_eq!(dispatcher.last_code("user@example.com"), Some(result.code));
}

#[tokio::test]
async fn test_create_rejects_empty_user_id() {
    let (service, _, _) = service();

    let err = service
        .create("", "user@example.com", payload())
        .await
        .unwrap_err();
    assert!(matches!(err, OtpError::Validation { .. }));

    let err = service.create("u1", "  ", payload()).await.unwrap_err();
    assert!(matches!(err, OtpError::Validation { .. }));
}

#[tokio::test]
async fn test_delivery_failure_does_not_roll_back_creation() {
    let repo = Arc::new(MemoryOtpSessionRepository::new());
    let dispatcher = Arc::new(MockDispatcher::new(true));
    let service = OtpAuthorizationService::new(
        repo.clone(),
        dispatcher,
        OtpServiceConfig::default(),
    );

    let result = service
        .create("u1", "user@example.com", payload())
        .await
        .unwrap();

    // Session exists even though dispatch failed.
    assert!(repo
        .find_active(&result.session_token)
        .await
        .unwrap()
        .is_some());
}

#[tokio::test]
async fn test_create_on_failed_storage_leaves_nothing_staged() {
    let (service, repo, _) = service();
    repo.set_failing(true);

    let err = service
        .create("u1", "user@example.com", payload())
        .await
        .unwrap_err();
    assert!(matches!(err, OtpError::Persistence { .. }));

    repo.set_failing(false);
    assert!(repo.is_empty().await);
}

#[tokio::test]
async fn test_round_trip_releases_payload_unchanged() {
    let (service, _, _) = service();
    let staged = json!({
        "type": "wire",
        "amount": 1250.50,
        "currency": "EUR",
        "recipient": {"iban": "DE89370400440532013000"}
    });

    let created = service
        .create("u1", "user@example.com", staged.clone())
        .await
        .unwrap();
    let verified = service
        .verify(&created.session_token, &created.code)
        .await
        .unwrap();

    assert_eq!(verified.user_id, "u1");
    assert_eq!(verified.staged_payload, staged);
}

#[tokio::test]
async fn test_verify_unknown_token() {
    let (service, _, _) = service();

    let err = service.verify("no-such-token", "123456").await.unwrap_err();
    assert!(matches!(err, OtpError::InvalidOrExpiredSession));
}

// Scenario A: three wrong codes exhaust the session; the correct code
// afterwards finds nothing.
#[tokio::test]
async fn test_attempt_ceiling_destroys_session() {
    let (service, _, _) = service();
    let created = service
        .create("u1", "user@example.com", payload())
        .await
        .unwrap();
    let token = &created.session_token;

    match service.verify(token, WRONG).await.unwrap_err() {
        OtpError::InvalidCode { remaining_attempts } => assert_eq!(remaining_attempts, 2),
        other => panic!("expected InvalidCode, got {other:?}"),
    }
    match service.verify(token, WRONG).await.unwrap_err() {
        OtpError::InvalidCode { remaining_attempts } => assert_eq!(remaining_attempts, 1),
        other => panic!("expected InvalidCode, got {other:?}"),
    }
    assert!(matches!(
        service.verify(token, WRONG).await.unwrap_err(),
        OtpError::AttemptsExceeded
    ));

    // Session is gone; even the correct code cannot tell it apart from
    // a token that never existed.
    assert!(matches!(
        service.verify(token, &created.code).await.unwrap_err(),
        OtpError::InvalidOrExpiredSession
    ));
}

// Scenario B: a verified session is terminal and single-use.
#[tokio::test]
async fn test_verified_session_cannot_be_reverified() {
    let (service, _, _) = service();
    let created = service
        .create("u1", "user@example.com", payload())
        .await
        .unwrap();

    service
        .verify(&created.session_token, &created.code)
        .await
        .unwrap();

    assert!(matches!(
        service
            .verify(&created.session_token, &created.code)
            .await
            .unwrap_err(),
        OtpError::InvalidOrExpiredSession
    ));
}

// Scenario C: a second create invalidates the first session's token.
#[tokio::test]
async fn test_second_create_invalidates_first_session() {
    let (service, _, _) = service();

    let first = service
        .create("u1", "user@example.com", payload())
        .await
        .unwrap();
    let second = service
        .create("u1", "user@example.com", payload())
        .await
        .unwrap();

    assert!(matches!(
        service
            .verify(&first.session_token, &first.code)
            .await
            .unwrap_err(),
        OtpError::InvalidOrExpiredSession
    ));

    // The second session verifies normally.
    assert!(service
        .verify(&second.session_token, &second.code)
        .await
        .is_ok());
}

// Scenario D: resend revives a lapsed session with a fresh code,
// deadline, and attempt budget.
#[tokio::test]
async fn test_resend_revives_expired_session() {
    let (service, repo, dispatcher) = service();
    let created = service
        .create("u1", "user@example.com", payload())
        .await
        .unwrap();
    let token = &created.session_token;

    // Burn attempts, then force the deadline into the past.
    service.verify(token, WRONG).await.unwrap_err();
    service.verify(token, WRONG).await.unwrap_err();
    repo.replace_code(token, &created.code, Utc::now() - Duration::seconds(1))
        .await
        .unwrap();
    assert!(matches!(
        service.verify(token, &created.code).await.unwrap_err(),
        OtpError::InvalidOrExpiredSession
    ));

    let resent = service.resend(token).await.unwrap();
    assert_ne!(resent.code, created.code);
    assert!(resent.expires_at > Utc::now());
    assert_eq!(dispatcher.delivery_count("user@example.com"), 2);

    // The new code verifies on the revived session.
    assert!(service.verify(token, &resent.code).await.is_ok());
}

#[tokio::test]
async fn test_resend_unknown_token() {
    let (service, _, _) = service();

    assert!(matches!(
        service.resend("no-such-token").await.unwrap_err(),
        OtpError::InvalidSession
    ));
}

#[tokio::test]
async fn test_resend_refuses_verified_session() {
    let (service, _, _) = service();
    let created = service
        .create("u1", "user@example.com", payload())
        .await
        .unwrap();
    service
        .verify(&created.session_token, &created.code)
        .await
        .unwrap();

    assert!(matches!(
        service.resend(&created.session_token).await.unwrap_err(),
        OtpError::InvalidSession
    ));
}

#[tokio::test]
async fn test_expired_session_fails_even_with_correct_code() {
    let (service, repo, _) = service();
    let created = service
        .create("u1", "user@example.com", payload())
        .await
        .unwrap();

    repo.replace_code(
        &created.session_token,
        &created.code,
        Utc::now() - Duration::seconds(1),
    )
    .await
    .unwrap();

    assert!(matches!(
        service
            .verify(&created.session_token, &created.code)
            .await
            .unwrap_err(),
        OtpError::InvalidOrExpiredSession
    ));
}

#[tokio::test]
async fn test_fetch_for_delivery_exposes_code_and_contact() {
    let (service, _, _) = service();
    let created = service
        .create("u1", "user@example.com", payload())
        .await
        .unwrap();

    let view = service
        .fetch_for_delivery(&created.session_token)
        .await
        .unwrap();
    assert_eq!(view.code, created.code);
    assert_eq!(view.user_id, "u1");
    assert_eq!(view.user_contact, "user@example.com");

    assert!(matches!(
        service.fetch_for_delivery("no-such-token").await.unwrap_err(),
        OtpError::InvalidSession
    ));
}

#[tokio::test]
async fn test_list_active_shows_only_live_sessions() {
    let (service, _, _) = service();

    service
        .create("u1", "u1@example.com", payload())
        .await
        .unwrap();
    let done = service
        .create("u2", "u2@example.com", payload())
        .await
        .unwrap();
    service.verify(&done.session_token, &done.code).await.unwrap();

    let active = service.list_active().await.unwrap();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].user_id, "u1");
}

#[tokio::test]
async fn test_admin_delete() {
    let (service, _, _) = service();
    let created = service
        .create("u1", "user@example.com", payload())
        .await
        .unwrap();

    service.delete(&created.session_token).await.unwrap();

    assert!(matches!(
        service
            .verify(&created.session_token, &created.code)
            .await
            .unwrap_err(),
        OtpError::InvalidOrExpiredSession
    ));
    assert!(matches!(
        service.delete(&created.session_token).await.unwrap_err(),
        OtpError::InvalidSession
    ));
}

#[tokio::test]
async fn test_verified_session_is_kept_until_sweep() {
    let (service, repo, _) = service();
    let created = service
        .create("u1", "user@example.com", payload())
        .await
        .unwrap();
    service
        .verify(&created.session_token, &created.code)
        .await
        .unwrap();

    // The terminal record remains as an audit trail inside the TTL window.
    let record = repo
        .find_by_token(&created.session_token)
        .await
        .unwrap()
        .expect("verified record retained");
    assert!(record.verified);
    assert_eq!(record.attempts, 1);
}

#[test]
fn test_mask_contact_keeps_last_four_chars() {
    assert_eq!(mask_contact("user@example.com"), "***.com");
    assert_eq!(mask_contact("abcd"), "****");
    assert_eq!(mask_contact(""), "****");
}

#[test]
fn test_mask_contact_handles_multibyte_contacts() {
    // Masking counts characters, not bytes, so internationalized
    // addresses must not split a code point.
    assert_eq!(mask_contact("联系@例子.中国"), "***子.中国");
    assert_eq!(mask_contact("日本"), "****");
}

#[tokio::test]
async fn test_successful_verify_consumes_an_attempt() {
    let (service, repo, _) = service();
    let created = service
        .create("u1", "user@example.com", payload())
        .await
        .unwrap();

    service.verify(&created.session_token, WRONG).await.unwrap_err();
    service
        .verify(&created.session_token, &created.code)
        .await
        .unwrap();

    // The counter reflects calls made, not just failures.
    let record = repo
        .find_by_token(&created.session_token)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(record.attempts, 2);
}
