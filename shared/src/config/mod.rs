//! Configuration modules loaded from the process environment.

mod database;
mod otp;
mod server;

pub use database::DatabaseConfig;
pub use otp::OtpConfig;
pub use server::ServerConfig;

/// Aggregated application configuration.
#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub otp: OtpConfig,
}

impl AppConfig {
    /// Assemble the full configuration from environment variables.
    pub fn from_env() -> Self {
        Self {
            database: DatabaseConfig::from_env(),
            server: ServerConfig::from_env(),
            otp: OtpConfig::from_env(),
        }
    }
}
