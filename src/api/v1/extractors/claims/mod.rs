/*!
 * Verified claims extractor
 *
 * Responsibility:
 * - access middleware が検証済みの ClaimSet を handler に提供する
 * - claim の型は services::auth::claims に置き、ここは axum との接続のみ
 *
 * Public API:
 * - Claims
 */

mod core;

pub use core::Claims;
