//! JWT 検証 → ClaimSet を extensions に入れる
//!
//! - skip-path に一致するリクエストは素通し (claims は入らない)
//! - cookie → query → bearer header の順に探し、後勝ち
//! - 署名検証 + iss/typ/required claims の検証に失敗したら handler は実行されない

use axum::{
    Router,
    body::Body,
    extract::State,
    http::Request,
    middleware::{self, Next},
    response::Response,
};
use tracing::debug;

use crate::error::AppError;
use crate::services::auth::{Authorization, RequestView};
use crate::state::AppState;

/// `/api/v1/*` に認証を掛けるための middleware を適用する。
///
/// 例：
/// ```ignore
/// let v1 = middleware::auth::access::apply(api::v1::routes(), state.clone());
/// app = app.nest("/api/v1", v1);
/// ```
pub fn apply(router: Router<AppState>, state: AppState) -> Router<AppState> {
    // axum 0.8 の from_fn は State extractor を受け取れないため、`from_fn_with_state` で明示的に state を渡す
    router.layer(middleware::from_fn_with_state(state, access_middleware))
}

async fn access_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let outcome = state.jwt.authorize(&RequestView::from(&req));

    match outcome {
        Ok(Authorization::Exempt) => {}
        Ok(Authorization::Authenticated(claims)) => {
            // middleware → extractor への受け渡し
            debug!(sub = ?claims.get_str("sub"), "JWT token claims set to request extensions");
            req.extensions_mut().insert(claims);
        }
        Err(rejection) => {
            debug!(status = %rejection.status(), reason = %rejection, "request rejected");
            return Err(rejection.into());
        }
    }

    Ok(next.run(req).await)
}
