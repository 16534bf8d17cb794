//! Structured logging bootstrap built on `tracing-subscriber`.

use std::io;
use tracing_subscriber::{fmt::Layer, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::ConfigError;

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "warn")
    pub level: String,
    /// Enable JSON structured logging (vs plain text)
    pub json_format: bool,
    /// Enable pretty printing for development
    pub pretty_print: bool,
    /// Environment filter (e.g. "rowset_orm=debug,tower=info")
    pub env_filter: Option<String>,
    /// Service name included in the initialization event
    pub service_name: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json_format: false,
            pretty_print: true,
            env_filter: None,
            service_name: None,
        }
    }
}

impl LoggingConfig {
    pub fn production() -> Self {
        Self {
            level: "info".to_string(),
            json_format: true,
            pretty_print: false,
            env_filter: Some("rowset_orm=info,rowset_http=info,tower=warn,axum=warn".to_string()),
            service_name: None,
        }
    }

    pub fn development() -> Self {
        Self {
            level: "debug".to_string(),
            json_format: false,
            pretty_print: true,
            env_filter: Some("rowset_orm=debug,rowset_http=debug,tower=debug".to_string()),
            service_name: None,
        }
    }

    /// Minimal output for test runs
    pub fn test() -> Self {
        Self {
            level: "error".to_string(),
            json_format: false,
            pretty_print: false,
            env_filter: Some("rowset_orm=error".to_string()),
            service_name: None,
        }
    }

    pub fn with_service(mut self, name: impl Into<String>) -> Self {
        self.service_name = Some(name.into());
        self
    }

    pub fn with_env_filter(mut self, filter: impl Into<String>) -> Self {
        self.env_filter = Some(filter.into());
        self
    }

    /// Filter directive used when `RUST_LOG` is not set
    pub fn directive(&self) -> &str {
        self.env_filter.as_deref().unwrap_or(&self.level)
    }
}

/// Install the global subscriber. Fails if one is already installed.
pub fn init_logging(config: LoggingConfig) -> Result<(), ConfigError> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.directive()))
        .map_err(|e| ConfigError::logging(e.to_string()))?;

    let registry = tracing_subscriber::registry().with(filter);
    let installed = if config.json_format {
        registry
            .with(Layer::new().with_writer(io::stdout).json())
            .try_init()
    } else if config.pretty_print {
        registry
            .with(Layer::new().with_writer(io::stdout).pretty())
            .try_init()
    } else {
        registry.with(Layer::new().with_writer(io::stdout)).try_init()
    };
    installed.map_err(|e| ConfigError::logging(e.to_string()))?;

    let output = if config.json_format { "json" } else { "text" };
    tracing::info!(
        target: "rowset::logging",
        service = config.service_name.as_deref().unwrap_or("rowset"),
        log_level = %config.level,
        output,
        "structured logging initialized"
    );

    Ok(())
}
