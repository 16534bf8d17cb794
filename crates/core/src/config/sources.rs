use std::fmt;

/// Layer a settings field was resolved from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Process environment, under the upper-cased key
    EnvVar { key: String },
    /// Dotenv file at `path`, under the upper-cased key
    File { path: String, key: String },
    /// Built-in default, rendered as text
    Default { value: String },
}

impl ConfigSource {
    pub fn is_env_var(&self) -> bool {
        matches!(self, ConfigSource::EnvVar { .. })
    }

    pub fn is_file(&self) -> bool {
        matches!(self, ConfigSource::File { .. })
    }

    pub fn is_default(&self) -> bool {
        matches!(self, ConfigSource::Default { .. })
    }
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigSource::EnvVar { key } => write!(f, "environment variable {}", key),
            ConfigSource::File { path, key } => write!(f, "{} in {}", key, path),
            ConfigSource::Default { value } => write!(f, "default ({})", value),
        }
    }
}
