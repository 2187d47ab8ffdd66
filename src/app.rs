/*
 * Responsibility
 * - Config読み込み → tracing 初期化 → JwtParser 構築 (失敗なら起動しない)
 * - Router 組み立て + Middleware の適用 (JWT / CORS / HTTP)
 * - axum::serve() で起動
 */
use std::{panic, process, sync::Arc};

use anyhow::{Context, Result};
use axum::Router;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::{api, config::Config, middleware, services::auth::JwtParser, state::AppState};

fn init_tracing(log_level: &str) {
    // Prefer RUST_LOG if set; otherwise map LOG_LEVEL.
    // Ex:
    // RUST_LOG=info,jwt_gate=debug,tower_http=debug cargo run
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_directive(log_level)));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn default_directive(log_level: &str) -> &'static str {
    match log_level.to_ascii_lowercase().as_str() {
        "debug" => "debug",
        "warning" | "warn" => "warn",
        "error" => "error",
        _ => "info",
    }
}

fn init_panic_hook(abort_on_panic: bool) {
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |info| {
        tracing::error!(?info, "panic");

        // development: fail fast. production: default behavior, keep serving.
        if abort_on_panic {
            process::abort();
        } else {
            default_hook(info);
        }
    }))
}

pub async fn run() -> Result<()> {
    let config = Config::from_env().context("loading configuration")?;
    init_tracing(&config.log_level);
    init_panic_hook(!config.app_env.is_production());

    let jwt = JwtParser::new(config.jwt.clone()).context("configuring JWT parser")?;
    tracing::info!(
        family = ?jwt.family(),
        "JWT verification key loaded"
    );

    let state = AppState::new(Arc::new(jwt));
    let app = build_router(state, &config);

    tracing::info!(
        "starting API in {:?} mode on {}",
        config.app_env,
        config.addr
    );

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

fn build_router(state: AppState, config: &Config) -> Router {
    let v1 = middleware::auth::access::apply(api::v1::routes(), state.clone());

    let router = Router::new().nest("/api/v1", v1).with_state(state);
    let router = middleware::cors::apply(router, config);

    middleware::http::apply(router, &config.http)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AppEnv, HttpLimits};
    use crate::services::auth::{JwtParserSettings, testing};
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use serde_json::json;
    use tower::ServiceExt;

    fn config() -> Config {
        Config {
            addr: "127.0.0.1:0".parse().unwrap(),
            app_env: AppEnv::Development,
            log_level: "debug".into(),
            cors_allowed_origins: vec!["*".into()],
            http: HttpLimits::default(),
            jwt: JwtParserSettings {
                skip_path_regex: Some("^/api/v1/health$".into()),
                ..testing::hmac_settings()
            },
        }
    }

    fn router() -> Router {
        let config = config();
        let jwt = JwtParser::new(config.jwt.clone()).unwrap();
        build_router(AppState::new(Arc::new(jwt)), &config)
    }

    #[test]
    fn log_level_mapping() {
        assert_eq!(default_directive("debug"), "debug");
        assert_eq!(default_directive("WARNING"), "warn");
        assert_eq!(default_directive("error"), "error");
        assert_eq!(default_directive("verbose"), "info");
    }

    #[tokio::test]
    async fn health_is_public() {
        let res = router()
            .oneshot(
                Request::builder()
                    .uri("/api/v1/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        assert!(res.headers().contains_key("x-request-id"));
    }

    #[tokio::test]
    async fn owner_route_goes_through_full_stack() {
        let token = testing::hs256(&json!({ "sub": "ana@example.com", "scope": "todo:write" }));

        let res = router()
            .oneshot(
                Request::builder()
                    .uri("/api/v1/users/ana@example.com/claims/scope")
                    .header(header::AUTHORIZATION, format!("Bearer {token}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);

        let res = router()
            .oneshot(
                Request::builder()
                    .uri("/api/v1/users/bob@example.com/claims/scope")
                    .header(header::AUTHORIZATION, format!("Bearer {token}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::FORBIDDEN);
    }
}
