/*
 * Responsibility
 * - /me, /users/{email}/claims/{name} の response DTO
 */
use serde::Serialize;

use crate::services::auth::{ClaimSet, ClaimValue};

#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub subject: Option<String>,
    pub claims: ClaimSet,
}

#[derive(Debug, Serialize)]
pub struct ClaimResponse {
    pub name: String,
    pub value: ClaimValue,
}
