use serde_json::Value;
use tracing::{debug, warn};

use crate::services::auth::claims::ClaimSet;
use crate::services::auth::parser::JwtParser;
use crate::services::auth::rejection::AuthRejection;

impl JwtParser {
    /// Verify signature (and `exp`/`nbf` when present) and decode the claims.
    ///
    /// The `alg` declared in the token header must be one of the configured
    /// algorithms; a token signed with another family is rejected before the
    /// key is ever used.
    pub fn verify(&self, token: &str) -> Result<ClaimSet, AuthRejection> {
        let header = jsonwebtoken::decode_header(token).map_err(|err| {
            debug!(error = %err, "couldn't parse JWT header");
            AuthRejection::InvalidToken
        })?;

        if !self.algorithms.contains(&header.alg) {
            debug!(
                found = ?header.alg,
                allowed = ?self.algorithms,
                "JWT signing algorithm not allowed"
            );
            return Err(AuthRejection::InvalidToken);
        }

        let data = jsonwebtoken::decode::<Value>(token, &self.decoding_key, &self.validation)
            .map_err(|err| {
                debug!(error = %err, "couldn't verify JWT token");
                AuthRejection::InvalidToken
            })?;

        // jsonwebtoken already refuses non-object payloads while decoding, so
        // this only guards against that changing underneath us.
        ClaimSet::try_from(data.claims).map_err(|err| {
            warn!(error = %err, "couldn't load token claims");
            AuthRejection::Internal
        })
    }
}
