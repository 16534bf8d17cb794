use thiserror::Error;

/// Errors loading settings or installing the logger
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{field} is required; {hint}")]
    MissingRequired { field: String, hint: String },

    #[error("{field} has invalid value '{value}', expected {expected}")]
    InvalidValue {
        field: String,
        value: String,
        expected: String,
    },

    #[error("Cannot load settings: {message}")]
    FileSystemError { message: String },

    #[error("Cannot initialize logging: {message}")]
    Logging { message: String },
}

impl ConfigError {
    pub fn missing_required(field: impl Into<String>, hint: impl Into<String>) -> Self {
        Self::MissingRequired {
            field: field.into(),
            hint: hint.into(),
        }
    }

    pub fn invalid_value(
        field: impl Into<String>,
        value: impl Into<String>,
        expected: impl Into<String>,
    ) -> Self {
        Self::InvalidValue {
            field: field.into(),
            value: value.into(),
            expected: expected.into(),
        }
    }

    pub fn file_system(message: impl Into<String>) -> Self {
        Self::FileSystemError {
            message: message.into(),
        }
    }

    pub fn logging(message: impl Into<String>) -> Self {
        Self::Logging {
            message: message.into(),
        }
    }
}
