//! Business services.

pub mod otp;
