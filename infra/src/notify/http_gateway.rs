//! HTTP delivery gateway.
//!
//! Posts `{recipient, code}` to the messaging gateway that owns the
//! actual email/SMS fan-out. The gateway sits on the internal network;
//! requests authenticate with a bearer token.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use tx_core::services::otp::{mask_contact, NotificationDispatcher};

/// Configuration for the HTTP delivery gateway
#[derive(Debug, Clone)]
pub struct HttpGatewayConfig {
    /// Gateway endpoint, e.g. `https://notify.internal/v1/otp`
    pub endpoint: String,
    /// Bearer token for the gateway
    pub api_token: String,
    /// Request timeout in seconds
    pub timeout_seconds: u64,
}

impl HttpGatewayConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        Self {
            endpoint: std::env::var("NOTIFY_GATEWAY_URL")
                .unwrap_or_else(|_| "http://localhost:9090/v1/otp".to_string()),
            api_token: std::env::var("NOTIFY_GATEWAY_TOKEN").unwrap_or_default(),
            timeout_seconds: 10,
        }
    }
}

#[derive(Serialize)]
struct DeliveryRequest<'a> {
    recipient: &'a str,
    code: &'a str,
}

#[derive(Deserialize)]
struct DeliveryResponse {
    message_id: String,
}

/// Delivery dispatcher backed by the internal messaging gateway
pub struct HttpNotificationGateway {
    client: reqwest::Client,
    config: HttpGatewayConfig,
}

impl HttpNotificationGateway {
    /// Create a new gateway client
    pub fn new(config: HttpGatewayConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        Ok(Self { client, config })
    }
}

#[async_trait]
impl NotificationDispatcher for HttpNotificationGateway {
    async fn deliver_code(&self, user_contact: &str, code: &str) -> Result<String, String> {
        let response = self
            .client
            .post(&self.config.endpoint)
            .bearer_auth(&self.config.api_token)
            .json(&DeliveryRequest {
                recipient: user_contact,
                code,
            })
            .send()
            .await
            .map_err(|e| format!("gateway request failed: {}", e))?;

        if !response.status().is_success() {
            return Err(format!("gateway returned status {}", response.status()));
        }

        let body: DeliveryResponse = response
            .json()
            .await
            .map_err(|e| format!("invalid gateway response: {}", e))?;

        debug!(
            contact = %mask_contact(user_contact),
            message_id = %body.message_id,
            "Delivery gateway accepted code"
        );

        Ok(body.message_id)
    }
}
