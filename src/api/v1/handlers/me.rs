/*
 * Responsibility
 * - 検証済み claims を読む handler (token の再検証はしない)
 * - GET /me: 呼び出し元の sub と全 claims
 * - GET /users/{email}/claims/{name}: 所有者 (sub == email) のみ参照可
 */
use axum::{Json, extract::Path};
use tracing::debug;

use crate::{
    api::v1::{
        dto::me::{ClaimResponse, MeResponse},
        extractors::Claims,
    },
    error::AppError,
};

pub async fn me(Claims(claims): Claims) -> Json<MeResponse> {
    Json(MeResponse {
        subject: claims.get_str("sub").map(str::to_owned),
        claims,
    })
}

pub async fn user_claim(
    Claims(claims): Claims,
    Path((email, name)): Path<(String, String)>,
) -> Result<Json<ClaimResponse>, AppError> {
    let email = email.to_lowercase();
    let owner = claims
        .get_str("sub")
        .is_some_and(|sub| sub.to_lowercase() == email);

    if !owner {
        debug!(email = %email, sub = ?claims.get_str("sub"), "caller does not own resource");
        return Err(AppError::Forbidden("forbidden"));
    }

    let value = claims
        .get(&name)
        .cloned()
        .ok_or(AppError::NotFound { resource: "claim" })?;

    Ok(Json(ClaimResponse { name, value }))
}
