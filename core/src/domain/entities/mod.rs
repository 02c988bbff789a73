pub mod otp_session;

pub use otp_session::OtpSession;
