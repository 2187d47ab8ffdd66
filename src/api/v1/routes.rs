/*
 * Responsibility
 * - v1 の URL 構造を定義
 * - JWT 検証は app.rs で middleware::auth::access::apply により v1 全体へ掛ける
 *   (/health は skip-path で除外)
 */
use axum::{Router, routing::get};

use crate::state::AppState;

use crate::api::v1::handlers::{
    health::health,
    me::{me, user_claim},
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/me", get(me))
        .route("/users/{email}/claims/{name}", get(user_claim))
}
