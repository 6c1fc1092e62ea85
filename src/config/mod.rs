//! Configuration loading and management

use crate::core::error::{RestioError, RestioResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_service_url() -> String {
    format!("http://{}:{}", default_host(), default_port())
}

/// HTTP listener settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Interface to bind (e.g., "127.0.0.1", "0.0.0.0")
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Complete server configuration
///
/// `service_url` is the externally visible base URL used for resource links;
/// behind a proxy it usually differs from the bind address.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// HTTP listener settings
    #[serde(default)]
    pub server: HttpConfig,

    /// Externally visible base URL for resource links
    #[serde(default = "default_service_url")]
    pub service_url: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            server: HttpConfig::default(),
            service_url: default_service_url(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: impl AsRef<Path>) -> RestioResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> RestioResult<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        if config.service_url.is_empty() {
            return Err(RestioError::Config {
                message: "service_url must not be empty".to_string(),
            });
        }
        Ok(config)
    }

    /// The address the listener binds, as `host:port`
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
