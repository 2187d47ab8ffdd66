//! Token lookup across the configured transport locations.
//!
//! Sources are probed in a fixed order: cookie, query parameter, bearer
//! header. A later source that yields a token overrides an earlier one, so
//! when a caller sends several, the bearer header wins over the query
//! parameter, which wins over the cookie.
//!
//! A cookie or query parameter that is present replaces the earlier
//! candidate even when its value is empty; the request then has no token.
//! Only the bearer header needs a non-empty remainder to count.

use axum::extract::OriginalUri;
use axum::http::{HeaderMap, HeaderName, Request};
use axum_extra::extract::cookie::CookieJar;
use tracing::debug;

use crate::config::ConfigError;
use crate::services::auth::parser::JwtParser;

const BEARER_PREFIX: &str = "Bearer ";

/// The parts of an inbound request the locator looks at.
#[derive(Debug, Clone, Copy)]
pub struct RequestView<'a> {
    pub path: &'a str,
    pub headers: &'a HeaderMap,
    pub query: Option<&'a str>,
}

impl<'a> RequestView<'a> {
    pub fn new(path: &'a str, headers: &'a HeaderMap, query: Option<&'a str>) -> Self {
        Self {
            path,
            headers,
            query,
        }
    }
}

impl<'a, B> From<&'a Request<B>> for RequestView<'a> {
    // Inside a nested router the uri is stripped of its prefix; match the
    // path the client actually requested.
    fn from(req: &'a Request<B>) -> Self {
        let uri = req
            .extensions()
            .get::<OriginalUri>()
            .map(|original| &original.0)
            .unwrap_or_else(|| req.uri());

        Self::new(uri.path(), req.headers(), uri.query())
    }
}

#[derive(Debug, Clone)]
pub enum TokenSource {
    Cookie(String),
    Query(String),
    Bearer(HeaderName),
}

impl TokenSource {
    /// `Some` when the source is present on the request, possibly empty.
    fn extract(&self, req: &RequestView<'_>) -> Option<String> {
        match self {
            // the jar percent-decodes cookie values
            Self::Cookie(name) => CookieJar::from_headers(req.headers)
                .get(name)
                .map(|cookie| cookie.value().to_owned()),
            Self::Query(name) => req.query.and_then(|query| {
                url::form_urlencoded::parse(query.as_bytes())
                    .find(|(key, _)| key == name.as_str())
                    .map(|(_, value)| value.into_owned())
            }),
            Self::Bearer(header) => req
                .headers
                .get(header)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.strip_prefix(BEARER_PREFIX))
                .filter(|t| !t.is_empty())
                .map(str::to_owned),
        }
    }

    fn describe(&self) -> (&'static str, &str) {
        match self {
            Self::Cookie(name) => ("cookie", name),
            Self::Query(name) => ("query", name),
            Self::Bearer(header) => ("header", header.as_str()),
        }
    }
}

/// Configured sources in precedence order (lowest first).
#[derive(Debug, Clone)]
pub struct TokenSources(Vec<TokenSource>);

impl TokenSources {
    pub fn new(
        cookie: Option<&str>,
        query: Option<&str>,
        bearer: Option<&str>,
    ) -> Result<Self, ConfigError> {
        let mut sources = Vec::with_capacity(3);

        if let Some(name) = cookie.filter(|s| !s.is_empty()) {
            sources.push(TokenSource::Cookie(name.to_string()));
        }
        if let Some(name) = query.filter(|s| !s.is_empty()) {
            sources.push(TokenSource::Query(name.to_string()));
        }
        if let Some(name) = bearer.filter(|s| !s.is_empty()) {
            let header = HeaderName::from_bytes(name.as_bytes())
                .map_err(|_| ConfigError::Invalid("JWT_FROM_BEARER"))?;
            sources.push(TokenSource::Bearer(header));
        }

        if sources.is_empty() {
            return Err(ConfigError::NoTokenSource);
        }
        Ok(Self(sources))
    }

    pub fn iter(&self) -> impl Iterator<Item = &TokenSource> {
        self.0.iter()
    }
}

impl JwtParser {
    /// Candidate token for this request, last present source wins.
    pub fn locate(&self, req: &RequestView<'_>) -> Option<String> {
        let mut found = None;
        for source in self.sources.iter() {
            if let Some(token) = source.extract(req) {
                let (kind, name) = source.describe();
                debug!(source = kind, name, "using JWT token from request");
                found = Some(token);
            }
        }
        found.filter(|t| !t.is_empty())
    }
}
