//! Trait for the out-of-band delivery channel

use async_trait::async_trait;

/// Out-of-band delivery of a one-time code to a user's registered contact.
///
/// Delivery is fire-and-forget from the service's point of view: a failed
/// dispatch is logged but never rolls back session creation. The privileged
/// read path exists partly to allow manual recovery when delivery fails.
#[async_trait]
pub trait NotificationDispatcher: Send + Sync {
    /// Deliver a code to the given contact address (email or phone).
    ///
    /// # Returns
    /// * `Ok(String)` - Provider message ID for audit logs
    /// * `Err(String)` - Provider error description
    async fn deliver_code(&self, user_contact: &str, code: &str) -> Result<String, String>;
}
