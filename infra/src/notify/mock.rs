//! Mock delivery gateway for development and testing.

use async_trait::async_trait;
use std::sync::Mutex;
use tracing::info;

use tx_core::services::otp::{mask_contact, NotificationDispatcher};

/// Dispatcher that records deliveries and logs them instead of sending.
///
/// Used in local development where no messaging gateway is reachable.
/// The code is only logged masked; use the privileged read path to
/// retrieve it.
pub struct MockNotificationGateway {
    sent: Mutex<Vec<(String, String)>>,
}

impl MockNotificationGateway {
    /// Create a new mock gateway
    pub fn new() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
        }
    }

    /// Number of deliveries recorded
    pub fn sent_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }

    /// Last (contact, code) pair recorded, if any
    pub fn last_sent(&self) -> Option<(String, String)> {
        self.sent.lock().unwrap().last().cloned()
    }
}

impl Default for MockNotificationGateway {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl NotificationDispatcher for MockNotificationGateway {
    async fn deliver_code(&self, user_contact: &str, code: &str) -> Result<String, String> {
        info!(
            contact = %mask_contact(user_contact),
            "Mock delivery of one-time code"
        );
        self.sent
            .lock()
            .unwrap()
            .push((user_contact.to_string(), code.to_string()));
        Ok(format!("mock-{}", uuid::Uuid::new_v4()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_gateway_records_deliveries() {
        let gateway = MockNotificationGateway::new();

        let message_id = gateway
            .deliver_code("user@example.com", "123456")
            .await
            .unwrap();

        assert!(message_id.starts_with("mock-"));
        assert_eq!(gateway.sent_count(), 1);
        assert_eq!(
            gateway.last_sent(),
            Some(("user@example.com".to_string(), "123456".to_string()))
        );
    }
}
