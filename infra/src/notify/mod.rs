//! Notification dispatcher implementations for out-of-band code delivery.

mod http_gateway;
mod mock;

pub use http_gateway::{HttpGatewayConfig, HttpNotificationGateway};
pub use mock::MockNotificationGateway;
