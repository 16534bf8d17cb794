//! # rowset-http: axum glue for paginated list and lookup endpoints
//!
//! - [`ListQuery`] extracts `offset`/`limit` from the query string and fills
//!   in the configured defaults.
//! - [`HttpError`] turns ORM failures into `{"detail": ...}` responses.
//! - [`PageResponse`] serializes a [`rowset_orm::Page`] as the response body.
//! - [`apply_layers`] adds request tracing and, when enabled, CORS.

pub mod error;
pub mod layers;
pub mod pagination;
pub mod routes;

pub use error::{HttpError, HttpResult};
pub use layers::{apply_layers, cors_layer};
pub use pagination::{ListQuery, PageResponse};
pub use routes::axum_route;
