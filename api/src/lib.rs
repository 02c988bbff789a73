//! # TxGate API
//!
//! Admin-facing HTTP surface for the OTP-gated transaction staging
//! service, plus the privileged internal read path for the delivery
//! subsystem.

pub mod app;
pub mod dto;
pub mod handlers;
pub mod routes;
