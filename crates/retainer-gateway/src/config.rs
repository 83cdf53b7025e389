//! Gateway configuration

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Environment variable prefix for configuration overrides
pub const ENV_PREFIX: &str = "RETAINER";

/// Gateway server configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on (0 picks a free port)
    pub port: u16,
    /// Require a valid access token and scopes for every resource request
    pub auth_enabled: bool,
    /// HS256 secret for access token validation
    pub jwt_secret: Option<String>,
    /// Maximum buffered request body size (bytes)
    pub max_body_size: usize,
    /// Capacity of the retained-update broadcast channel
    pub event_capacity: usize,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            auth_enabled: false,
            jwt_secret: None,
            max_body_size: 16 * 1024 * 1024, // 16 MiB
            event_capacity: retainer_store::DEFAULT_EVENT_CAPACITY,
        }
    }
}

impl GatewayConfig {
    /// Get the bind address
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Load configuration from defaults, an optional file, then `RETAINER_*`
    /// environment variables, each layer overriding the previous one.
    pub fn load(path: Option<&Path>) -> Result<Self, config::ConfigError> {
        let mut builder = config::Config::builder();

        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path).required(true));
        }

        builder
            .add_source(config::Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()?
            .try_deserialize()
    }
}
