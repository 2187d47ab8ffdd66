/*
 * Responsibility
 * - middleware の公開インターフェース
 * - auth: JWT 検証 (v1 router に適用), cors / http: router 全体に適用
 */
pub mod auth;
pub mod cors;
pub mod http;
