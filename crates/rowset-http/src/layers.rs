//! Middleware layers configured from [`Settings`]

use axum::http::{HeaderName, HeaderValue, Method};
use axum::Router;
use rowset_core::Settings;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::error::HttpError;

/// CORS layer for the configured origins, methods and headers.
///
/// `None` when CORS is disabled. A missing list, or one containing `"*"`,
/// allows anything.
pub fn cors_layer(settings: &Settings) -> Result<Option<CorsLayer>, HttpError> {
    let cors = &settings.cors;
    if !cors.enabled {
        return Ok(None);
    }

    let origins = match wildcard_or(cors.allow_origins.as_deref()) {
        None => AllowOrigin::from(Any),
        Some(origins) => AllowOrigin::list(parse_all(origins, "origin", |o| {
            HeaderValue::from_str(o).ok()
        })?),
    };

    let methods = match wildcard_or(cors.allow_methods.as_deref()) {
        None => AllowMethods::from(Any),
        Some(methods) => AllowMethods::list(parse_all(methods, "method", |m| {
            Method::from_bytes(m.to_uppercase().as_bytes()).ok()
        })?),
    };

    let headers = match wildcard_or(cors.allow_headers.as_deref()) {
        None => AllowHeaders::from(Any),
        Some(headers) => AllowHeaders::list(parse_all(headers, "header", |h| {
            HeaderName::from_bytes(h.as_bytes()).ok()
        })?),
    };

    Ok(Some(
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(methods)
            .allow_headers(headers),
    ))
}

fn wildcard_or(values: Option<&[String]>) -> Option<&[String]> {
    values.filter(|values| !values.iter().any(|v| v == "*"))
}

fn parse_all<T>(
    values: &[String],
    kind: &str,
    parse: impl Fn(&str) -> Option<T>,
) -> Result<Vec<T>, HttpError> {
    values
        .iter()
        .map(|value| {
            parse(value).ok_or_else(|| HttpError::config(format!("invalid CORS {}: {}", kind, value)))
        })
        .collect()
}

/// Request tracing plus CORS when enabled
pub fn apply_layers<S>(router: Router<S>, settings: &Settings) -> Result<Router<S>, HttpError>
where
    S: Clone + Send + Sync + 'static,
{
    let router = match cors_layer(settings)? {
        Some(cors) => router.layer(cors),
        None => router,
    };

    Ok(router.layer(TraceLayer::new_for_http()))
}
