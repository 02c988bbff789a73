//! Domain entities for the OTP staging subsystem.

pub mod entities;
