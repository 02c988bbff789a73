//! Result types for the OTP authorization operations

use chrono::{DateTime, Utc};

/// Result of staging a transaction behind a new session
#[derive(Debug, Clone)]
pub struct CreateSessionResult {
    /// Bearer token for the subsequent verify/resend calls
    pub session_token: String,
    /// The generated code. Internal callers hand this to the delivery
    /// channel only; it must never travel back on the verifying channel.
    pub code: String,
    /// Session deadline
    pub expires_at: DateTime<Utc>,
}

/// Released intent after a successful verification
#[derive(Debug, Clone, PartialEq)]
pub struct VerifiedSession {
    /// Account the staged transaction executes for
    pub user_id: String,
    /// The staged payload, returned to the caller unchanged
    pub staged_payload: serde_json::Value,
}

/// Result of a resend: fresh code, fresh deadline
#[derive(Debug, Clone)]
pub struct ResendResult {
    /// The replacement code, destined for the delivery channel
    pub code: String,
    /// The re-armed deadline
    pub expires_at: DateTime<Utc>,
}

/// Privileged view for the delivery subsystem and support tooling
#[derive(Debug, Clone)]
pub struct DeliveryView {
    /// Plaintext code for manual or alternate delivery
    pub code: String,
    /// Account the session belongs to
    pub user_id: String,
    /// Registered contact address
    pub user_contact: String,
}
