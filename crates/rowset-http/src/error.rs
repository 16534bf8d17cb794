//! HTTP error type and response formatting

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use rowset_orm::OrmError;
use serde_json::json;
use thiserror::Error;

/// Result type for handlers
pub type HttpResult<T> = Result<T, HttpError>;

/// Errors a handler can answer with
#[derive(Error, Debug, Clone, PartialEq)]
pub enum HttpError {
    #[error("{detail}")]
    NotFound { detail: String },

    #[error("{detail}")]
    BadRequest { detail: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Internal server error: {message}")]
    InternalError { message: String },
}

impl HttpError {
    pub fn not_found<T: Into<String>>(detail: T) -> Self {
        HttpError::NotFound {
            detail: detail.into(),
        }
    }

    pub fn bad_request<T: Into<String>>(detail: T) -> Self {
        HttpError::BadRequest {
            detail: detail.into(),
        }
    }

    pub fn config<T: Into<String>>(message: T) -> Self {
        HttpError::ConfigError {
            message: message.into(),
        }
    }

    pub fn internal<T: Into<String>>(message: T) -> Self {
        HttpError::InternalError {
            message: message.into(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            HttpError::NotFound { .. } => StatusCode::NOT_FOUND,
            HttpError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            HttpError::ConfigError { .. } | HttpError::InternalError { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Text sent to the client; server-side failures are not echoed back
    pub fn detail(&self) -> String {
        match self {
            HttpError::NotFound { detail } | HttpError::BadRequest { detail } => detail.clone(),
            HttpError::ConfigError { .. } | HttpError::InternalError { .. } => {
                "Internal server error".to_string()
            }
        }
    }
}

impl From<OrmError> for HttpError {
    fn from(err: OrmError) -> Self {
        match err {
            OrmError::NotFound { .. } => HttpError::not_found(err.to_string()),
            OrmError::InvalidArgument { .. } => HttpError::bad_request(err.to_string()),
            OrmError::Configuration(message) => HttpError::config(message),
            other => HttpError::internal(other.to_string()),
        }
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }

        (status, Json(json!({ "detail": self.detail() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_keeps_entity_and_criteria() {
        let err = HttpError::from(OrmError::not_found("User", "id = 7"));
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(err.detail(), "User not found: id = 7");
    }

    #[test]
    fn test_invalid_argument_is_bad_request() {
        let err = HttpError::from(OrmError::InvalidArgument {
            argument: "limit",
            value: -3,
        });
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            err.detail(),
            "Invalid argument: limit must be non-negative, got -3"
        );
    }

    #[test]
    fn test_backend_failures_are_opaque() {
        let err = HttpError::from(OrmError::Connection("password authentication failed".into()));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.detail(), "Internal server error");

        let err = HttpError::from(OrmError::ambiguous("User", "name = 'bob'"));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_error_response_status() {
        let response = HttpError::not_found("User not found: id = 1").into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
