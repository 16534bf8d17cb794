//! # rowset-core
//!
//! Process-wide plumbing shared by the rowset crates: settings loaded from
//! the environment and a `settings.env` file, configuration errors, and the
//! structured logging bootstrap.

pub mod config;
pub mod logging;

pub use config::{
    ConfigError, ConfigSource, CorsSettings, DatabaseSettings, Settings, SettingsLayers,
    IDENTIFIER_ROUTE, ROOT_ROUTE, SETTINGS_FILE_PATH,
};
pub use logging::{init_logging, LoggingConfig};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
