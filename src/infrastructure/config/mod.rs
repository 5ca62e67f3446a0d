use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

use crate::domain::error::{AppError, Result};

/// Runtime configuration for the HTTP layer, resolved once at startup
/// and passed down explicitly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind address for the HTTP server
    pub host: String,

    /// Bind port for the HTTP server
    pub port: u16,

    /// Upload cap in bytes for multipart request bodies
    pub max_upload_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8888,
            max_upload_bytes: 16 * 1024 * 1024,
        }
    }
}

impl ServerConfig {
    /// Load configuration: defaults, overridden by `plotserve.toml`,
    /// overridden by `PLOTSERVE_*` environment variables.
    pub fn load() -> Result<Self> {
        Figment::from(Serialized::defaults(ServerConfig::default()))
            .merge(Toml::file("plotserve.toml"))
            .merge(Env::prefixed("PLOTSERVE_"))
            .extract()
            .map_err(|e| AppError::ConfigError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 8888);
        assert_eq!(config.max_upload_bytes, 16 * 1024 * 1024);
    }

    #[test]
    fn test_env_override() {
        std::env::set_var("PLOTSERVE_TEST_PORT", "9001");
        let config: ServerConfig = Figment::from(Serialized::defaults(ServerConfig::default()))
            .merge(Env::prefixed("PLOTSERVE_TEST_"))
            .extract()
            .expect("config should extract");
        std::env::remove_var("PLOTSERVE_TEST_PORT");

        assert_eq!(config.port, 9001);
        assert_eq!(config.host, "127.0.0.1");
    }
}
