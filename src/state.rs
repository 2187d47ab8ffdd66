/*
 * Responsibility
 * - Router に紐づける共有コンテキスト (AppState)
 *   - jwt: 起動時に検証済みの JwtParser (読み取り専用)
 * - Clone 前提で持つ (内部は Arc/Clone cheap)
 */
use std::sync::Arc;

use crate::services::auth::JwtParser;

#[derive(Clone, Debug)]
pub struct AppState {
    pub jwt: Arc<JwtParser>,
}

impl AppState {
    pub fn new(jwt: Arc<JwtParser>) -> Self {
        Self { jwt }
    }
}
