//! Signing-method parsing and verification-key loading.

use std::str::FromStr;

use jsonwebtoken::{Algorithm, DecodingKey};

use crate::config::ConfigError;

/// Algorithm family the verification key belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SigningFamily {
    Hmac,
    Rsa,
    Ec,
}

impl SigningFamily {
    fn of(alg: Algorithm) -> Option<Self> {
        match alg {
            Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512 => Some(Self::Hmac),
            Algorithm::RS256
            | Algorithm::RS384
            | Algorithm::RS512
            | Algorithm::PS256
            | Algorithm::PS384
            | Algorithm::PS512 => Some(Self::Rsa),
            Algorithm::ES256 | Algorithm::ES384 => Some(Self::Ec),
            _ => None,
        }
    }

    fn algorithms(self) -> Vec<Algorithm> {
        match self {
            Self::Hmac => vec![Algorithm::HS256, Algorithm::HS384, Algorithm::HS512],
            Self::Rsa => vec![
                Algorithm::RS256,
                Algorithm::RS384,
                Algorithm::RS512,
                Algorithm::PS256,
                Algorithm::PS384,
                Algorithm::PS512,
            ],
            Self::Ec => vec![Algorithm::ES256, Algorithm::ES384],
        }
    }

    /// HMAC takes the material as the raw shared secret; RSA and EC expect a
    /// PEM encoded public key.
    pub fn decoding_key(self, material: &[u8]) -> Result<DecodingKey, ConfigError> {
        match self {
            Self::Hmac => {
                let secret = material.trim_ascii();
                if secret.is_empty() {
                    return Err(ConfigError::Key("HMAC secret is empty".into()));
                }
                Ok(DecodingKey::from_secret(secret))
            }
            Self::Rsa => DecodingKey::from_rsa_pem(material)
                .map_err(|e| ConfigError::Key(format!("expected RSA public key PEM: {}", e))),
            Self::Ec => DecodingKey::from_ec_pem(material)
                .map_err(|e| ConfigError::Key(format!("expected EC public key PEM: {}", e))),
        }
    }
}

/// Parsed `JWT_SIGNING_METHOD`.
///
/// A concrete algorithm (`ES256`) pins verification to that algorithm; a
/// family name (`EC`, `ES`) accepts every algorithm of the family.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SigningMethod {
    pub family: SigningFamily,
    pub algorithms: Vec<Algorithm>,
}

impl FromStr for SigningMethod {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let family = match s.trim().to_ascii_uppercase().as_str() {
            "HMAC" | "HS" => Some(SigningFamily::Hmac),
            "RSA" | "RS" => Some(SigningFamily::Rsa),
            "EC" | "ES" | "ECDSA" => Some(SigningFamily::Ec),
            _ => None,
        };
        if let Some(family) = family {
            return Ok(Self {
                family,
                algorithms: family.algorithms(),
            });
        }

        let unsupported = || ConfigError::UnsupportedSigningMethod(s.to_string());
        let alg = Algorithm::from_str(s.trim()).map_err(|_| unsupported())?;
        let family = SigningFamily::of(alg).ok_or_else(unsupported)?;

        Ok(Self {
            family,
            algorithms: vec![alg],
        })
    }
}
