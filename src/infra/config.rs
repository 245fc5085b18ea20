//! For reading application configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Application configuration.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Config {
    /// Server configuration.
    pub server: ServerConfig,
    /// Logging configuration.
    pub logging: LoggingConfig,
}

/// Server configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server address.
    pub http_address: String,
    /// Server http port.
    pub http_port: u16,
    /// Directory with the static assets served at the root path.
    pub static_dir: String,
    /// How long a request may take before it is answered with a timeout.
    #[serde(with = "humantime_serde")]
    pub request_timeout: Duration,
    /// Maximum number of requests handled at the same time.
    pub concurrency_limit: usize,
}

impl ServerConfig {
    /// The address to bind the http listener to.
    pub fn http_addr(&self) -> String {
        format!("{}:{}", self.http_address, self.http_port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            http_address: "127.0.0.1".to_string(),
            http_port: 3127,
            static_dir: "public".to_string(),
            request_timeout: Duration::from_secs(10),
            concurrency_limit: 500,
        }
    }
}

/// Logging configuration.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Where to write rolling JSON log files. Only stdout is used if unset.
    pub directory: Option<String>,
}

/// Retrieve [`Config`] from the defaults, the configuration file and the environment.
#[tracing::instrument]
pub fn load_config() -> color_eyre::Result<Config> {
    let config = config::Config::builder()
        .add_source(config::Config::try_from(&Config::default())?)
        .add_source(config::File::with_name("config").required(false))
        .add_source(config::Environment::with_prefix("app").separator("__"))
        .build()?
        .try_deserialize()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_bind_to_localhost() {
        let config = Config::default();
        assert_eq!("127.0.0.1:3127", config.server.http_addr());
        assert_eq!(Duration::from_secs(10), config.server.request_timeout);
        assert!(config.logging.directory.is_none());
    }

    #[test]
    fn defaults_survive_a_config_round_trip() {
        let config: Config = config::Config::builder()
            .add_source(config::Config::try_from(&Config::default()).unwrap())
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();
        assert_eq!(3127, config.server.http_port);
        assert_eq!("public", config.server.static_dir);
        assert_eq!(Duration::from_secs(10), config.server.request_timeout);
    }
}
