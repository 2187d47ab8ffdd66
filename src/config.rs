/*
 * Responsibility
 * - 環境変数 (.env) からの設定読み込み: listen addr / log level / CORS / JWT parser
 * - 設定値のバリデーション (不足・不正なら起動失敗)
 * - JWT 関連の検証 (鍵のパース等) は JwtParser::new 側で行う
 */
use std::collections::BTreeMap;
use std::fmt;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::services::auth::{JwtParserSettings, KeySource};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    pub fn from_env() -> Self {
        match std::env::var("APP_ENV")
            .unwrap_or_else(|_| "development".to_string())
            .to_ascii_lowercase()
            .as_str()
        {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid(&'static str),
    NoTokenSource,
    UnsupportedSigningMethod(String),
    Key(String),
    SkipPathPattern(regex::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "missing configuration: {}", key),
            ConfigError::Invalid(key) => write!(f, "invalid configuration: {}", key),
            ConfigError::NoTokenSource => write!(
                f,
                "one of JWT_FROM_BEARER, JWT_FROM_COOKIE or JWT_FROM_QUERY must be defined"
            ),
            ConfigError::UnsupportedSigningMethod(method) => write!(
                f,
                "JWT signing method must be HS*, RS*, PS* or ES* (got '{}')",
                method
            ),
            ConfigError::Key(reason) => write!(f, "invalid JWT verification key: {}", reason),
            ConfigError::SkipPathPattern(e) => write!(f, "invalid JWT_SKIP_PATH_REGEX: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::SkipPathPattern(e) => Some(e),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct HttpLimits {
    pub body_limit_bytes: usize,
    pub timeout: Duration,
}

impl Default for HttpLimits {
    fn default() -> Self {
        Self {
            body_limit_bytes: 1024 * 1024,
            timeout: Duration::from_secs(30),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub addr: SocketAddr,
    pub app_env: AppEnv,
    // debug | info | warning | error (RUST_LOG wins when set)
    pub log_level: String,
    // `*` (or empty) means any origin
    pub cors_allowed_origins: Vec<String>,
    pub http: HttpLimits,
    pub jwt: JwtParserSettings,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let port: u16 = std::env::var("PORT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(2000);

        let addr: SocketAddr = SocketAddr::from_str(&format!("0.0.0.0:{}", port))
            .map_err(|_| ConfigError::Invalid("PORT"))?;

        let app_env = AppEnv::from_env();

        let log_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let cors_allowed_origins = split_list(
            &std::env::var("CORS_ALLOWED_ORIGINS").unwrap_or_else(|_| "*".to_string()),
        );

        let defaults = HttpLimits::default();
        let http = HttpLimits {
            body_limit_bytes: std::env::var("HTTP_BODY_LIMIT_BYTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.body_limit_bytes),
            timeout: std::env::var("HTTP_TIMEOUT_SECONDS")
                .ok()
                .and_then(|v| v.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.timeout),
        };

        let jwt = jwt_settings_from_env()?;

        Ok(Self {
            addr,
            app_env,
            log_level,
            cors_allowed_origins,
            http,
            jwt,
        })
    }
}

fn jwt_settings_from_env() -> Result<JwtParserSettings, ConfigError> {
    let key = match (
        non_empty_var("JWT_VERIFY_KEY_FILE"),
        non_empty_var("JWT_VERIFY_KEY_PEM"),
    ) {
        (Some(path), _) => Some(KeySource::File(PathBuf::from(path))),
        (None, Some(pem)) => Some(KeySource::Pem(pem.replace("\\n", "\n"))),
        (None, None) => None,
    };

    let required_claims = match non_empty_var("JWT_REQUIRED_CLAIMS") {
        Some(raw) => parse_required_claims(&raw)?,
        None => BTreeMap::new(),
    };

    let leeway_seconds = match non_empty_var("JWT_LEEWAY_SECONDS") {
        Some(v) => v
            .parse::<u64>()
            .map_err(|_| ConfigError::Invalid("JWT_LEEWAY_SECONDS"))?,
        None => 0,
    };

    Ok(JwtParserSettings {
        skip_path_regex: source_var("JWT_SKIP_PATH_REGEX", "^/api/v1/health$"),
        from_bearer: source_var("JWT_FROM_BEARER", "Authorization"),
        from_cookie: source_var("JWT_FROM_COOKIE", "jwt"),
        from_query: source_var("JWT_FROM_QUERY", "t"),
        signing_method: non_empty_var("JWT_SIGNING_METHOD").unwrap_or_else(|| "ES256".into()),
        key,
        required_issuer: non_empty_var("JWT_REQUIRED_ISSUER"),
        required_type: non_empty_var("JWT_REQUIRED_TYPE"),
        required_claims,
        leeway_seconds,
    })
}

/// Parses `name=value,name=value` into the required-claims map.
pub fn parse_required_claims(raw: &str) -> Result<BTreeMap<String, String>, ConfigError> {
    let mut claims = BTreeMap::new();
    for pair in split_list(raw) {
        let (name, value) = pair
            .split_once('=')
            .ok_or(ConfigError::Invalid("JWT_REQUIRED_CLAIMS"))?;
        let name = name.trim();
        if name.is_empty() {
            return Err(ConfigError::Invalid("JWT_REQUIRED_CLAIMS"));
        }
        claims.insert(name.to_string(), value.trim().to_string());
    }
    Ok(claims)
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn non_empty_var(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

// Unset -> default, set to "" -> disabled.
fn source_var(key: &str, default: &str) -> Option<String> {
    match std::env::var(key) {
        Ok(v) if v.trim().is_empty() => None,
        Ok(v) => Some(v.trim().to_string()),
        Err(_) => Some(default.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_claims_are_parsed_in_pairs() {
        let claims = parse_required_claims("role=admin, tenant = acme ,").unwrap();
        assert_eq!(claims.len(), 2);
        assert_eq!(claims.get("role").map(String::as_str), Some("admin"));
        assert_eq!(claims.get("tenant").map(String::as_str), Some("acme"));
    }

    #[test]
    fn required_claim_value_may_be_empty_or_contain_equals() {
        let claims = parse_required_claims("flag=,expr=a=b").unwrap();
        assert_eq!(claims.get("flag").map(String::as_str), Some(""));
        assert_eq!(claims.get("expr").map(String::as_str), Some("a=b"));
    }

    #[test]
    fn malformed_required_claims_are_rejected() {
        assert!(matches!(
            parse_required_claims("role"),
            Err(ConfigError::Invalid("JWT_REQUIRED_CLAIMS"))
        ));
        assert!(matches!(
            parse_required_claims("=admin"),
            Err(ConfigError::Invalid("JWT_REQUIRED_CLAIMS"))
        ));
    }

    #[test]
    fn origins_list_drops_blanks() {
        assert_eq!(
            split_list(" https://a.example ,, https://b.example"),
            vec!["https://a.example", "https://b.example"]
        );
        assert!(split_list("").is_empty());
    }
}
