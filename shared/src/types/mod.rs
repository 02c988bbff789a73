//! Common types shared across crates.

pub mod response;
