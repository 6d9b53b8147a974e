//! Configuration management for the MCP server.
//!
//! This module provides a centralized configuration structure that can be
//! populated from environment variables (and a `.env` file) or defaults.

use super::error::{Error, Result};
use super::transport::TransportConfig;
use crate::domains::tools::{BlockingBridge, BlockingStrategy};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{info, warn};

/// Main configuration structure for the MCP server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server identification and metadata.
    pub server: ServerConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,

    /// Transport configuration.
    pub transport: TransportConfig,

    /// Travel pipeline collaborator.
    pub pipeline: PipelineConfig,

    /// SERP search collaborator.
    pub search: SearchConfig,

    /// Blocking-call bridge.
    pub blocking: BlockingConfig,

    /// External API credentials configuration.
    pub credentials: CredentialsConfig,
}

/// Server identification configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// The name of the server as reported to clients.
    pub name: String,

    /// The version of the server.
    pub version: String,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "trace").
    pub level: String,

    /// Whether to include timestamps in log output.
    pub with_timestamps: bool,
}

/// Travel pipeline endpoint configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// URL the pipeline state is POSTed to. Without it, plan_trip calls fail.
    pub url: Option<String>,

    /// HTTP timeout for one pipeline run, in seconds.
    pub timeout_secs: u64,
}

/// Bright Data SERP configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Bright Data request API endpoint.
    pub endpoint: String,

    /// SERP zone name.
    pub zone: String,
}

/// Blocking-call bridge configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BlockingConfig {
    /// Where blocking collaborator calls run.
    pub strategy: BlockingStrategy,

    /// Give up waiting for a collaborator after this many seconds.
    pub timeout_secs: Option<u64>,
}

impl BlockingConfig {
    /// Build the bridge described by this configuration.
    pub fn bridge(&self) -> BlockingBridge {
        BlockingBridge::new(self.strategy, self.timeout_secs.map(Duration::from_secs))
    }
}

/// Configuration for external API credentials.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct CredentialsConfig {
    /// Bright Data API key for SERP searches.
    pub brightdata_api_key: Option<String>,

    /// Optional bearer token for the pipeline endpoint.
    pub pipeline_api_key: Option<String>,
}

/// Custom Debug implementation to redact secrets from logs.
impl std::fmt::Debug for CredentialsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialsConfig")
            .field(
                "brightdata_api_key",
                &self.brightdata_api_key.as_ref().map(|_| "[REDACTED]"),
            )
            .field(
                "pipeline_api_key",
                &self.pipeline_api_key.as_ref().map(|_| "[REDACTED]"),
            )
            .finish()
    }
}

impl LoggingConfig {
    /// Read `MCP_LOG_LEVEL` and `MCP_LOG_TIMESTAMPS`.
    ///
    /// Runs before the subscriber exists, so it does not log.
    pub fn from_env() -> Self {
        let mut logging = Self::default();

        if let Ok(level) = std::env::var("MCP_LOG_LEVEL") {
            logging.level = level;
        }

        if let Ok(raw) = std::env::var("MCP_LOG_TIMESTAMPS") {
            logging.with_timestamps = !matches!(raw.to_lowercase().as_str(), "false" | "0");
        }

        logging
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            with_timestamps: true,
        }
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            url: None,
            timeout_secs: 600,
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://api.brightdata.com/request".to_string(),
            zone: "serp_api1".to_string(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                name: "travel-agent".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            logging: LoggingConfig::default(),
            transport: TransportConfig::default(),
            pipeline: PipelineConfig::default(),
            search: SearchConfig::default(),
            blocking: BlockingConfig::default(),
            credentials: CredentialsConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Environment variables are expected to be prefixed with `MCP_`.
    /// For example: `MCP_SERVER_NAME`, `MCP_LOG_LEVEL`.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let mut config = Self::default();

        if let Ok(name) = std::env::var("MCP_SERVER_NAME") {
            config.server.name = name;
        }

        config.logging = LoggingConfig::from_env();

        // Load transport configuration from environment
        config.transport = TransportConfig::from_env();

        // Pipeline collaborator
        if let Ok(url) = std::env::var("MCP_PIPELINE_URL") {
            config.pipeline.url = Some(url).filter(|u| !u.trim().is_empty());
        }

        if let Ok(timeout) = std::env::var("MCP_PIPELINE_TIMEOUT_SECS") {
            match timeout.parse() {
                Ok(secs) => config.pipeline.timeout_secs = secs,
                Err(_) => warn!("Ignoring invalid MCP_PIPELINE_TIMEOUT_SECS: {}", timeout),
            }
        }

        // SERP collaborator
        if let Ok(endpoint) = std::env::var("MCP_BRIGHTDATA_ENDPOINT") {
            config.search.endpoint = endpoint;
        }

        if let Ok(zone) = std::env::var("MCP_BRIGHTDATA_ZONE") {
            config.search.zone = zone;
        }

        // Blocking bridge
        if let Ok(strategy) = std::env::var("MCP_BLOCKING_STRATEGY") {
            match BlockingStrategy::parse(&strategy) {
                Some(parsed) => config.blocking.strategy = parsed,
                None => warn!(
                    "Unknown MCP_BLOCKING_STRATEGY '{}', using {:?}",
                    strategy, config.blocking.strategy
                ),
            }
        }

        if let Ok(timeout) = std::env::var("MCP_BLOCKING_TIMEOUT_SECS") {
            match timeout.parse() {
                Ok(secs) => config.blocking.timeout_secs = Some(secs),
                Err(_) => warn!("Ignoring invalid MCP_BLOCKING_TIMEOUT_SECS: {}", timeout),
            }
        }

        // Credentials
        if let Ok(api_key) = std::env::var("MCP_BRIGHTDATA_API_KEY") {
            config.credentials.brightdata_api_key = Some(api_key);
            info!("Bright Data API key loaded from environment");
        } else {
            warn!("MCP_BRIGHTDATA_API_KEY not set - travel.search_flights calls will fail");
        }

        if let Ok(api_key) = std::env::var("MCP_PIPELINE_API_KEY") {
            config.credentials.pipeline_api_key = Some(api_key);
        }

        config
    }

    /// Reject settings that would make every collaborator call fail.
    pub fn validate(&self) -> Result<()> {
        if self.pipeline.timeout_secs == 0 {
            return Err(Error::config("pipeline timeout must be positive"));
        }

        if self.blocking.timeout_secs == Some(0) {
            return Err(Error::config("bridge timeout must be positive"));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // Mutex to ensure env var tests run serially
    static ENV_TEST_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn test_credentials_from_env() {
        let _lock = ENV_TEST_LOCK.lock().unwrap();
        unsafe {
            std::env::set_var("MCP_BRIGHTDATA_API_KEY", "test_key_12345");
        }
        let config = Config::from_env();
        assert_eq!(
            config.credentials.brightdata_api_key.as_deref(),
            Some("test_key_12345")
        );
        unsafe {
            std::env::remove_var("MCP_BRIGHTDATA_API_KEY");
        }
    }

    #[test]
    fn test_pipeline_and_blocking_from_env() {
        let _lock = ENV_TEST_LOCK.lock().unwrap();
        unsafe {
            std::env::set_var("MCP_PIPELINE_URL", "http://localhost:8123/invoke");
            std::env::set_var("MCP_BLOCKING_STRATEGY", "thread");
            std::env::set_var("MCP_BLOCKING_TIMEOUT_SECS", "90");
        }
        let config = Config::from_env();
        assert_eq!(
            config.pipeline.url.as_deref(),
            Some("http://localhost:8123/invoke")
        );
        assert_eq!(config.blocking.strategy, BlockingStrategy::Thread);
        assert_eq!(config.blocking.timeout_secs, Some(90));

        let bridge = config.blocking.bridge();
        assert_eq!(bridge.strategy(), BlockingStrategy::Thread);
        assert_eq!(bridge.timeout(), Some(Duration::from_secs(90)));
        unsafe {
            std::env::remove_var("MCP_PIPELINE_URL");
            std::env::remove_var("MCP_BLOCKING_STRATEGY");
            std::env::remove_var("MCP_BLOCKING_TIMEOUT_SECS");
        }
    }

    #[test]
    fn test_invalid_blocking_values_fall_back() {
        let _lock = ENV_TEST_LOCK.lock().unwrap();
        unsafe {
            std::env::set_var("MCP_BLOCKING_STRATEGY", "fibers");
            std::env::set_var("MCP_BLOCKING_TIMEOUT_SECS", "soon");
        }
        let config = Config::from_env();
        assert_eq!(config.blocking.strategy, BlockingStrategy::Pool);
        assert_eq!(config.blocking.timeout_secs, None);
        unsafe {
            std::env::remove_var("MCP_BLOCKING_STRATEGY");
            std::env::remove_var("MCP_BLOCKING_TIMEOUT_SECS");
        }
    }

    #[test]
    fn test_credentials_redacted_in_debug() {
        let creds = CredentialsConfig {
            brightdata_api_key: Some("super_secret_key".to_string()),
            pipeline_api_key: Some("another_secret".to_string()),
        };
        let debug_str = format!("{:?}", creds);
        assert!(debug_str.contains("REDACTED"));
        assert!(!debug_str.contains("super_secret_key"));
        assert!(!debug_str.contains("another_secret"));
    }

    #[test]
    fn test_config_defaults() {
        let config = Config::default();
        assert_eq!(config.server.name, "travel-agent");
        assert!(config.pipeline.url.is_none());
        assert_eq!(config.search.zone, "serp_api1");
        assert_eq!(config.blocking.strategy, BlockingStrategy::Pool);
        assert!(config.blocking.timeout_secs.is_none());
        assert!(config.logging.with_timestamps);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_logging_from_env() {
        let _lock = ENV_TEST_LOCK.lock().unwrap();
        unsafe {
            std::env::set_var("MCP_LOG_LEVEL", "debug");
            std::env::set_var("MCP_LOG_TIMESTAMPS", "0");
        }
        let logging = LoggingConfig::from_env();
        assert_eq!(logging.level, "debug");
        assert!(!logging.with_timestamps);
        assert_eq!(Config::from_env().logging.level, "debug");
        unsafe {
            std::env::remove_var("MCP_LOG_LEVEL");
            std::env::remove_var("MCP_LOG_TIMESTAMPS");
        }
    }

    #[test]
    fn test_validate_rejects_zero_timeouts() {
        let mut config = Config::default();
        config.pipeline.timeout_secs = 0;
        let err = config.validate().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Configuration error: pipeline timeout must be positive"
        );

        let mut config = Config::default();
        config.blocking.timeout_secs = Some(0);
        assert!(matches!(config.validate(), Err(Error::Config(_))));

        config.blocking.timeout_secs = Some(30);
        assert!(config.validate().is_ok());
    }
}
