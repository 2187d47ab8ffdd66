//! Test helpers: fixture keys and token minting.

use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use axum::http::{HeaderMap, HeaderValue, header};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use serde_json::Value;

use crate::services::auth::{JwtParserSettings, KeySource};

pub const HMAC_SECRET: &str = "test-only-hmac-secret-0123456789abcdef";

pub fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("fixtures")
        .join(name)
}

pub fn fixture_string(name: &str) -> String {
    std::fs::read_to_string(fixture(name)).unwrap()
}

/// Every source enabled with the service defaults, HS256 inline secret.
pub fn hmac_settings() -> JwtParserSettings {
    JwtParserSettings {
        skip_path_regex: None,
        from_bearer: Some("Authorization".into()),
        from_cookie: Some("jwt".into()),
        from_query: Some("t".into()),
        signing_method: "HS256".into(),
        key: Some(KeySource::Pem(HMAC_SECRET.into())),
        ..Default::default()
    }
}

pub fn now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs()
}

pub fn in_one_hour() -> u64 {
    now() + 3600
}

pub fn hs256(claims: &Value) -> String {
    jsonwebtoken::encode(
        &Header::new(Algorithm::HS256),
        claims,
        &EncodingKey::from_secret(HMAC_SECRET.as_bytes()),
    )
    .unwrap()
}

pub fn es256(claims: &Value) -> String {
    let key = EncodingKey::from_ec_pem(fixture_string("ec256_private.pem").as_bytes()).unwrap();
    jsonwebtoken::encode(&Header::new(Algorithm::ES256), claims, &key).unwrap()
}

pub fn rsa(alg: Algorithm, claims: &Value) -> String {
    let key = EncodingKey::from_rsa_pem(fixture_string("rsa_private.pem").as_bytes()).unwrap();
    jsonwebtoken::encode(&Header::new(alg), claims, &key).unwrap()
}

pub fn bearer(token: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        header::AUTHORIZATION,
        HeaderValue::from_str(&format!("Bearer {token}")).unwrap(),
    );
    headers
}
