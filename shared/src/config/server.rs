//! HTTP server configuration

use serde::{Deserialize, Serialize};

/// Bind address and internal-caller credentials for the admin API
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// Host to bind to
    pub host: String,

    /// Port to listen on
    pub port: u16,

    /// Shared secret expected on the privileged delivery read path.
    /// Only the notification/support tooling knows this value; the
    /// end-user facing path must never see it.
    pub internal_api_token: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            internal_api_token: String::new(),
        }
    }
}

impl ServerConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        let host = std::env::var("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = std::env::var("SERVER_PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse()
            .unwrap_or(8080);
        let internal_api_token = std::env::var("INTERNAL_API_TOKEN").unwrap_or_default();

        Self {
            host,
            port,
            internal_api_token,
        }
    }

    /// Full bind address, e.g. `127.0.0.1:8080`
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
