//! CORS policy for browser clients.
//!
//! Policy:
//! - `CORS_ALLOWED_ORIGINS` containing `*` (the default) allows any origin.
//! - Otherwise only the listed origins are allowed (exact match).
//! - Production with an empty list allows none.
//! - Credentials are never allowed; tokens travel in the Authorization header,
//!   the `jwt` cookie of the same origin or the `t` query parameter.

use std::time::Duration;

use axum::Router;
use axum::http::{HeaderValue, Method, header};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

use crate::config::Config;

pub fn apply(router: Router, config: &Config) -> Router {
    router.layer(layer(config))
}

fn layer(config: &Config) -> CorsLayer {
    let origins = &config.cors_allowed_origins;

    let allow_origin = if origins.iter().any(|o| o == "*") {
        AllowOrigin::from(Any)
    } else if origins.is_empty() {
        if config.app_env.is_production() {
            AllowOrigin::list(Vec::<HeaderValue>::new())
        } else {
            AllowOrigin::from(Any)
        }
    } else {
        AllowOrigin::list(
            origins
                .iter()
                .filter_map(|s| HeaderValue::from_str(s).ok()),
        )
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([
            header::AUTHORIZATION,
            header::ORIGIN,
            header::CONTENT_TYPE,
            header::REFERER,
            header::USER_AGENT,
        ])
        .max_age(Duration::from_secs(60 * 60))
}
