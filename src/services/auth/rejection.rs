use axum::http::StatusCode;
use thiserror::Error;

/// Per-request authentication failure.
///
/// Display strings are what callers see; diagnostic detail is logged where
/// the failure is detected and never carried in here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AuthRejection {
    #[error("JWT token is required")]
    MissingToken,
    #[error("JWT token is invalid")]
    InvalidToken,
    #[error("JWT claim not found")]
    Forbidden,
    #[error("Server error")]
    Internal,
}

impl AuthRejection {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::MissingToken | Self::InvalidToken => StatusCode::UNAUTHORIZED,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
