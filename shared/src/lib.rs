//! # TxGate Shared
//!
//! Configuration types and common response envelopes shared by the
//! TxGate workspace crates.

pub mod config;
pub mod types;
