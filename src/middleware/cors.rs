//! CORS for browser clients.
//!
//! Development answers any origin. Production only echoes origins listed in
//! `CORS_ALLOWED_ORIGINS`; an empty list means no cross-origin access at all.
//! Credentials are never allowed, so `Authorization` must be sent explicitly.

use std::time::Duration;

use axum::{
    Router,
    http::{HeaderName, HeaderValue, Method, header},
};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

use crate::config::Config;
use crate::middleware::http::REQUEST_ID_HEADER;

fn allow_origin(config: &Config) -> AllowOrigin {
    if !config.app_env.is_production() {
        return AllowOrigin::from(Any);
    }

    let allowed: Vec<HeaderValue> = config
        .cors_allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) if origin != "*" => Some(value),
            _ => {
                tracing::warn!(%origin, "ignoring unusable CORS origin");
                None
            }
        })
        .collect();

    AllowOrigin::list(allowed)
}

pub fn apply(router: Router, config: &Config) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(allow_origin(config))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            header::ACCEPT,
            HeaderName::from_static(REQUEST_ID_HEADER),
        ])
        .expose_headers([HeaderName::from_static(REQUEST_ID_HEADER)])
        .max_age(Duration::from_secs(3600));

    router.layer(cors)
}
