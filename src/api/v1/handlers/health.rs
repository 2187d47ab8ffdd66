/*
 * Responsibility
 * - GET /health (疎通用)
 * - 既定の JWT_SKIP_PATH_REGEX に一致するので token 無しで通る
 */
use axum::{Json, http::StatusCode, response::IntoResponse};
use serde_json::json;

pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({"status": "ok"})))
}
