//! # TxGate Core
//!
//! Core domain layer for the TxGate OTP-gated transaction staging service.
//! This crate contains the session entity, the authorization service,
//! repository interfaces, and error types. Everything that touches a real
//! datastore or delivery channel lives behind a trait so the state machine
//! can be exercised in isolation.

pub mod domain;
pub mod errors;
pub mod repositories;
pub mod services;

pub use domain::entities::otp_session::OtpSession;
pub use errors::{OtpError, OtpResult};
pub use repositories::OtpSessionRepository;
pub use services::otp::OtpAuthorizationService;
