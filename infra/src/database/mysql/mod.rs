mod session_repository_impl;

pub use session_repository_impl::MySqlOtpSessionRepository;
