use tracing::debug;

use crate::services::auth::claims::ClaimSet;
use crate::services::auth::parser::JwtParser;
use crate::services::auth::rejection::AuthRejection;

impl JwtParser {
    /// Required issuer / type first (401 on mismatch), then the arbitrary
    /// required claims (403 on mismatch).
    pub fn check_claims(&self, claims: &ClaimSet) -> Result<(), AuthRejection> {
        if let Some(required) = &self.required_issuer {
            match claims.get("iss") {
                None => {
                    debug!("JWT iss claim not found");
                    return Err(AuthRejection::InvalidToken);
                }
                Some(found) if found.as_str() != Some(required.as_str()) => {
                    debug!(required = %required, found = %found, "wrong JWT issuer");
                    return Err(AuthRejection::InvalidToken);
                }
                Some(_) => {}
            }
        }

        if let Some(required) = &self.required_type {
            match claims.get("typ") {
                None => {
                    debug!("JWT typ claim not found");
                    return Err(AuthRejection::InvalidToken);
                }
                Some(found) if found.as_str() != Some(required.as_str()) => {
                    debug!(required = %required, found = %found, "wrong JWT type");
                    return Err(AuthRejection::InvalidToken);
                }
                Some(_) => {}
            }
        }

        for (name, required) in &self.required_claims {
            let found = claims.get(name);
            if found.and_then(|v| v.as_str()) != Some(required.as_str()) {
                debug!(
                    claim = %name,
                    required = %required,
                    found = ?found.map(ToString::to_string),
                    "required claim not found"
                );
                return Err(AuthRejection::Forbidden);
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::auth::JwtParserSettings;
    use crate::services::auth::testing;
    use serde_json::{Value, json};

    fn parser() -> JwtParser {
        JwtParser::new(JwtParserSettings {
            required_issuer: Some("Berimbal".into()),
            required_type: Some("access".into()),
            required_claims: [("role".to_string(), "admin".to_string())].into(),
            ..testing::hmac_settings()
        })
        .unwrap()
    }

    fn claims(value: Value) -> ClaimSet {
        ClaimSet::try_from(value).unwrap()
    }

    #[test]
    fn accepts_when_everything_matches() {
        let c = claims(json!({ "iss": "Berimbal", "typ": "access", "role": "admin", "sub": "x" }));
        assert_eq!(parser().check_claims(&c), Ok(()));
    }

    #[test]
    fn wrong_or_missing_issuer_is_invalid_token() {
        let wrong = claims(json!({ "iss": "other", "typ": "access", "role": "admin" }));
        assert_eq!(parser().check_claims(&wrong), Err(AuthRejection::InvalidToken));

        let missing = claims(json!({ "typ": "access", "role": "admin" }));
        assert_eq!(parser().check_claims(&missing), Err(AuthRejection::InvalidToken));

        let not_a_string = claims(json!({ "iss": ["Berimbal"], "typ": "access", "role": "admin" }));
        assert_eq!(parser().check_claims(&not_a_string), Err(AuthRejection::InvalidToken));
    }

    #[test]
    fn wrong_or_missing_type_is_invalid_token() {
        let wrong = claims(json!({ "iss": "Berimbal", "typ": "refresh", "role": "admin" }));
        assert_eq!(parser().check_claims(&wrong), Err(AuthRejection::InvalidToken));

        let missing = claims(json!({ "iss": "Berimbal", "role": "admin" }));
        assert_eq!(parser().check_claims(&missing), Err(AuthRejection::InvalidToken));
    }

    #[test]
    fn required_claim_mismatch_is_forbidden() {
        let missing = claims(json!({ "iss": "Berimbal", "typ": "access" }));
        assert_eq!(parser().check_claims(&missing), Err(AuthRejection::Forbidden));

        let wrong = claims(json!({ "iss": "Berimbal", "typ": "access", "role": "user" }));
        assert_eq!(parser().check_claims(&wrong), Err(AuthRejection::Forbidden));

        // values are compared as strings only
        let number = claims(json!({ "iss": "Berimbal", "typ": "access", "role": 1 }));
        assert_eq!(parser().check_claims(&number), Err(AuthRejection::Forbidden));
    }

    #[test]
    fn issuer_is_checked_before_required_claims() {
        let c = claims(json!({ "iss": "other", "typ": "access" }));
        assert_eq!(parser().check_claims(&c), Err(AuthRejection::InvalidToken));
    }

    #[test]
    fn nothing_required_accepts_any_claims() {
        let parser = JwtParser::new(testing::hmac_settings()).unwrap();
        assert_eq!(parser.check_claims(&ClaimSet::default()), Ok(()));
    }
}
