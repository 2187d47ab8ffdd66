pub mod claims;
mod locator;
mod parser;
mod rejection;
mod signing;
mod validate;
mod verifier;

#[cfg(test)]
pub(crate) mod testing;

pub use claims::{ClaimSet, ClaimValue};
pub use locator::RequestView;
pub use parser::{Authorization, JwtParser, JwtParserSettings, KeySource};
pub use rejection::AuthRejection;
