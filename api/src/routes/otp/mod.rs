//! OTP session endpoints

pub mod create;
pub mod delivery;
pub mod resend;
pub mod sessions;
pub mod verify;
