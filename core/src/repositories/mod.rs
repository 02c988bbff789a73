//! Repository interfaces for session persistence.

pub mod session;

pub use session::{MemoryOtpSessionRepository, OtpSessionRepository};
