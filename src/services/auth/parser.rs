use std::collections::BTreeMap;
use std::path::PathBuf;

use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use regex::Regex;
use tracing::debug;

use crate::config::ConfigError;
use crate::services::auth::claims::ClaimSet;
use crate::services::auth::locator::{RequestView, TokenSources};
use crate::services::auth::rejection::AuthRejection;
use crate::services::auth::signing::{SigningFamily, SigningMethod};

/// Upper bound for `exp`/`nbf` clock skew tolerance.
pub const MAX_LEEWAY_SECONDS: u64 = 86_400;

/// Where the verification key comes from.
#[derive(Debug, Clone)]
pub enum KeySource {
    File(PathBuf),
    Pem(String),
}

/// Raw JWT parser configuration, before validation.
#[derive(Debug, Clone, Default)]
pub struct JwtParserSettings {
    /// Request paths matching this pattern skip authentication.
    pub skip_path_regex: Option<String>,
    /// Header carrying `Bearer <token>`.
    pub from_bearer: Option<String>,
    pub from_cookie: Option<String>,
    pub from_query: Option<String>,
    /// `HS*`, `RS*`, `PS*`, `ES*` or a family name.
    pub signing_method: String,
    pub key: Option<KeySource>,
    /// Required `iss` value. Not verified if unset.
    pub required_issuer: Option<String>,
    /// Required `typ` value. Not verified if unset.
    pub required_type: Option<String>,
    /// Required string values for arbitrary claims.
    pub required_claims: BTreeMap<String, String>,
    pub leeway_seconds: u64,
}

/// Outcome of a request that was let through.
#[derive(Debug, Clone, PartialEq)]
pub enum Authorization {
    /// Path is excluded from authentication; no claims are available.
    Exempt,
    Authenticated(ClaimSet),
}

/// Validated, immutable JWT parser shared by every request.
///
/// - Key material is intentionally not printable via Debug.
pub struct JwtParser {
    pub(super) skip_path: Option<Regex>,
    pub(super) sources: TokenSources,
    pub(super) family: SigningFamily,
    pub(super) algorithms: Vec<Algorithm>,
    pub(super) decoding_key: DecodingKey,
    pub(super) validation: Validation,
    pub(super) required_issuer: Option<String>,
    pub(super) required_type: Option<String>,
    pub(super) required_claims: BTreeMap<String, String>,
}

impl std::fmt::Debug for JwtParser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtParser")
            .field("skip_path", &self.skip_path.as_ref().map(Regex::as_str))
            .field("sources", &self.sources)
            .field("family", &self.family)
            .field("algorithms", &self.algorithms)
            .field("required_issuer", &self.required_issuer)
            .field("required_type", &self.required_type)
            .field("required_claims", &self.required_claims)
            .finish()
    }
}

impl JwtParser {
    /// Validate settings and load the verification key. Any error here must
    /// keep the server from starting.
    pub fn new(settings: JwtParserSettings) -> Result<Self, ConfigError> {
        let sources = TokenSources::new(
            settings.from_cookie.as_deref(),
            settings.from_query.as_deref(),
            settings.from_bearer.as_deref(),
        )?;

        let method: SigningMethod = settings.signing_method.parse()?;

        let material = match settings.key {
            Some(KeySource::File(path)) => std::fs::read(&path).map_err(|e| {
                ConfigError::Key(format!("couldn't read {}: {}", path.display(), e))
            })?,
            Some(KeySource::Pem(pem)) => pem.into_bytes(),
            None => return Err(ConfigError::Missing("JWT_VERIFY_KEY_FILE")),
        };
        let decoding_key = method.family.decoding_key(&material)?;

        let skip_path = settings
            .skip_path_regex
            .as_deref()
            .filter(|p| !p.is_empty())
            .map(Regex::new)
            .transpose()
            .map_err(ConfigError::SkipPathPattern)?;

        if settings.leeway_seconds > MAX_LEEWAY_SECONDS {
            return Err(ConfigError::Invalid("JWT_LEEWAY_SECONDS"));
        }

        // Signature + exp/nbf (only when present). Issuer and type are
        // checked against the claim set so they map to our own rejections.
        let mut validation = Validation::new(method.algorithms[0]);
        validation.algorithms = method.algorithms.clone();
        validation.required_spec_claims.clear();
        validation.validate_exp = true;
        validation.validate_nbf = true;
        validation.validate_aud = false;
        validation.leeway = settings.leeway_seconds;

        Ok(Self {
            skip_path,
            sources,
            family: method.family,
            algorithms: method.algorithms,
            decoding_key,
            validation,
            required_issuer: settings.required_issuer.filter(|s| !s.is_empty()),
            required_type: settings.required_type.filter(|s| !s.is_empty()),
            required_claims: settings.required_claims,
        })
    }

    /// Run the whole pipeline for one request:
    /// skip-path → locate → verify → check claims.
    pub fn authorize(&self, req: &RequestView<'_>) -> Result<Authorization, AuthRejection> {
        if self.is_skipped(req.path) {
            debug!(path = %req.path, "skipping JWT token parser");
            return Ok(Authorization::Exempt);
        }

        let token = self.locate(req).ok_or_else(|| {
            debug!(path = %req.path, "no JWT token found in any configured source");
            AuthRejection::MissingToken
        })?;

        let claims = self.verify(&token)?;
        self.check_claims(&claims)?;

        Ok(Authorization::Authenticated(claims))
    }

    pub fn is_skipped(&self, path: &str) -> bool {
        self.skip_path.as_ref().is_some_and(|re| re.is_match(path))
    }

    pub fn family(&self) -> SigningFamily {
        self.family
    }
}
