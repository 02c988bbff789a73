//! OTP authorization service: creation, verification, resend, and expiry
//! of one-time-code sessions gating staged transactions.

pub mod cleanup;
pub mod config;
pub mod service;
pub mod traits;
pub mod types;

pub use cleanup::{SessionCleanupConfig, SessionCleanupService};
pub use config::OtpServiceConfig;
pub use service::OtpAuthorizationService;
pub use traits::NotificationDispatcher;
pub use types::{CreateSessionResult, DeliveryView, ResendResult, VerifiedSession};

#[cfg(test)]
mod tests;

/// Mask a contact address for logging, keeping only the last 4 characters.
pub fn mask_contact(contact: &str) -> String {
    let total = contact.chars().count();
    if total <= 4 {
        "****".to_string()
    } else {
        let tail: String = contact.chars().skip(total - 4).collect();
        format!("***{}", tail)
    }
}
