//! DTOs for the OTP session endpoints

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use tx_core::domain::entities::otp_session::OtpSession;
use tx_core::services::otp::mask_contact;

/// Request body for staging a transaction behind a new OTP session
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateSessionRequest {
    /// Account the staged transaction executes for
    #[validate(length(min = 1, max = 64, message = "user_id must be 1-64 characters"))]
    pub user_id: String,

    /// Address the one-time code is delivered to
    #[validate(length(min = 3, max = 255, message = "user_contact must be 3-255 characters"))]
    pub user_contact: String,

    /// Opaque transaction intent, stored and returned verbatim
    pub staged_payload: serde_json::Value,
}

/// Response body after staging. The code never appears here; it travels
/// out-of-band only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSessionResponse {
    /// Token for the subsequent verify/resend calls
    pub session_token: String,

    /// Session deadline
    pub expires_at: DateTime<Utc>,
}

/// Request body for code verification
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct VerifyRequest {
    /// Token returned at staging time
    #[validate(length(min = 1, message = "session_token is required"))]
    pub session_token: String,

    /// The submitted one-time code
    #[validate(length(equal = 6, message = "code must be exactly 6 digits"))]
    pub code: String,
}

/// Released intent after a successful verification
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyResponse {
    /// Account the staged transaction executes for
    pub user_id: String,

    /// The staged payload, returned unchanged
    pub staged_payload: serde_json::Value,
}

/// Request body for a code resend
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ResendRequest {
    /// Token returned at staging time
    #[validate(length(min = 1, message = "session_token is required"))]
    pub session_token: String,
}

/// Response body after a resend. Again no code on this channel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResendResponse {
    /// The re-armed deadline
    pub expires_at: DateTime<Utc>,
}

/// One row of the administrative session listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSummary {
    pub session_token: String,
    pub user_id: String,
    /// Contact address masked down to the last 4 characters
    pub user_contact: String,
    pub attempts: i32,
    pub max_attempts: i32,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl From<&OtpSession> for SessionSummary {
    fn from(session: &OtpSession) -> Self {
        Self {
            session_token: session.session_token.clone(),
            user_id: session.user_id.clone(),
            user_contact: mask_contact(&session.user_contact),
            attempts: session.attempts,
            max_attempts: session.max_attempts,
            created_at: session.created_at,
            expires_at: session.expires_at,
        }
    }
}

/// Privileged read for the delivery subsystem and support tooling.
/// The only HTTP surface that carries the plaintext code.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliveryResponse {
    pub code: String,
    pub user_id: String,
    pub user_contact: String,
}
