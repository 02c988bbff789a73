//! # TxGate Infrastructure
//!
//! Concrete implementations of the core's storage and delivery traits:
//! the MySQL session repository and the notification gateways.

pub mod database;
pub mod notify;

pub use database::{create_pool, MySqlOtpSessionRepository};
pub use notify::{HttpNotificationGateway, MockNotificationGateway};
