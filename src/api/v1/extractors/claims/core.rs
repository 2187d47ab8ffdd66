use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::error::AppError;
use crate::services::auth::ClaimSet;

/// Handler で、検証済みの ClaimSet を受け取るための extractor
/// middleware が ClaimSet を request.extensions() に insert 済みである前提
/// 見つからない場合は 401 を返す（skip-path 上の route・ミドルウェア未設定）
#[derive(Debug, Clone)]
pub struct Claims(pub ClaimSet);

impl<S> FromRequestParts<S> for Claims
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<ClaimSet>()
            .cloned()
            .map(Claims)
            .ok_or(AppError::Unauthorized("JWT token is required"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;
    use serde_json::json;

    #[tokio::test]
    async fn reads_claims_set_by_middleware() {
        let claims = ClaimSet::try_from(json!({ "sub": "ana@example.com" })).unwrap();
        let mut req = Request::builder().body(()).unwrap();
        req.extensions_mut().insert(claims.clone());

        let (mut parts, _) = req.into_parts();
        let Claims(found) = Claims::from_request_parts(&mut parts, &()).await.unwrap();
        assert_eq!(found, claims);
    }

    #[tokio::test]
    async fn missing_claims_is_unauthorized() {
        let req = Request::builder().body(()).unwrap();
        let (mut parts, _) = req.into_parts();

        let err = Claims::from_request_parts(&mut parts, &()).await.unwrap_err();
        assert_eq!(err.status(), axum::http::StatusCode::UNAUTHORIZED);
    }
}
