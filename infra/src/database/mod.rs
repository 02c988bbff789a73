//! Database layer: connection pooling and the MySQL session repository.

mod connection;
pub mod mysql;

pub use connection::create_pool;
pub use mysql::MySqlOtpSessionRepository;
