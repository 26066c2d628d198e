//! Auth Error Types
//!
//! This module provides auth-specific error variants that integrate
//! with the unified `kernel::error::AppError` system.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

/// Auth-specific result type alias
pub type AuthResult<T> = Result<T, AuthError>;

/// Auth-specific error variants
///
/// Credential failures intentionally share one message: the caller
/// never learns whether the email or the password was wrong.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Malformed or missing input, user-correctable
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Email already registered
    #[error("An account with this email already exists")]
    DuplicateEmail,

    /// Wrong email or password (indistinguishable on purpose)
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// Account is soft-disabled
    #[error("Account is disabled")]
    AccountDisabled,

    /// Account is locked (too many failed attempts)
    #[error("Account is temporarily locked")]
    AccountLocked,

    /// No token on the request
    #[error("No authentication token provided")]
    MissingToken,

    /// Token is malformed, tampered with, or not yet valid
    #[error("Invalid authentication token")]
    InvalidToken,

    /// Token signature is fine but the expiry has passed
    #[error("Authentication token has expired")]
    ExpiredToken,

    /// Token references an account that no longer exists
    #[error("Account for this token no longer exists")]
    AccountNotFound,

    /// Role check ran without an authenticated account
    #[error("Authentication required")]
    Unauthenticated,

    /// Authenticated, but the role does not permit the operation
    #[error("This action requires one of the following roles: {0}")]
    Forbidden(String),

    /// Resource absent (non-authentication lookups)
    #[error("{0} not found")]
    NotFound(String),

    /// Too many requests from one client
    #[error("Too many attempts, please try again later")]
    RateLimited,

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Get the HTTP status code for this error
    ///
    /// Every authentication failure is 401 regardless of cause; the
    /// body message carries the distinction.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::Validation(_) | AuthError::DuplicateEmail => StatusCode::BAD_REQUEST,
            AuthError::InvalidCredentials
            | AuthError::AccountDisabled
            | AuthError::AccountLocked
            | AuthError::MissingToken
            | AuthError::InvalidToken
            | AuthError::ExpiredToken
            | AuthError::AccountNotFound
            | AuthError::Unauthenticated => StatusCode::UNAUTHORIZED,
            AuthError::Forbidden(_) => StatusCode::FORBIDDEN,
            AuthError::NotFound(_) => StatusCode::NOT_FOUND,
            AuthError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            AuthError::Database(_) | AuthError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::Validation(_) | AuthError::DuplicateEmail => ErrorKind::BadRequest,
            AuthError::InvalidCredentials
            | AuthError::AccountDisabled
            | AuthError::AccountLocked
            | AuthError::MissingToken
            | AuthError::InvalidToken
            | AuthError::ExpiredToken
            | AuthError::AccountNotFound
            | AuthError::Unauthenticated => ErrorKind::Unauthorized,
            AuthError::Forbidden(_) => ErrorKind::Forbidden,
            AuthError::NotFound(_) => ErrorKind::NotFound,
            AuthError::RateLimited => ErrorKind::TooManyRequests,
            AuthError::Database(_) | AuthError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// Hint for the caller, where one exists
    fn action(&self) -> Option<&'static str> {
        match self {
            AuthError::MissingToken => {
                Some("Include the token in the header: Authorization: Bearer <token>")
            }
            AuthError::ExpiredToken => Some("Please sign in again"),
            AuthError::AccountLocked => Some("Try again in 30 minutes"),
            AuthError::DuplicateEmail => Some("Sign in instead, or use a different email"),
            _ => None,
        }
    }

    /// Convert to AppError
    ///
    /// Server-side failures collapse to a generic message; the detail
    /// stays in the logs.
    pub fn to_app_error(&self) -> AppError {
        let message = match self {
            AuthError::Database(_) | AuthError::Internal(_) => {
                "An unexpected error occurred".to_string()
            }
            other => other.to_string(),
        };

        let err = AppError::new(self.kind(), message);
        match self.action() {
            Some(action) => err.with_action(action),
            None => err,
        }
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            AuthError::Database(e) => {
                tracing::error!(error = %e, "Auth database error");
            }
            AuthError::Internal(msg) => {
                tracing::error!(message = %msg, "Auth internal error");
            }
            AuthError::InvalidCredentials => {
                tracing::warn!("Invalid login attempt");
            }
            AuthError::AccountLocked => {
                tracing::warn!("Login attempt on locked account");
            }
            AuthError::RateLimited => {
                tracing::warn!("Rate limit exceeded");
            }
            _ => {
                tracing::debug!(error = %self, "Auth error");
            }
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}

impl From<AppError> for AuthError {
    fn from(err: AppError) -> Self {
        AuthError::Internal(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes_follow_contract() {
        assert_eq!(
            AuthError::Validation("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(AuthError::DuplicateEmail.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            AuthError::InvalidCredentials.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(AuthError::AccountLocked.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            AuthError::AccountDisabled.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(AuthError::ExpiredToken.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            AuthError::Forbidden("admin".into()).status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(AuthError::RateLimited.status_code(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(
            AuthError::Internal("x".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_credential_message_does_not_name_the_field() {
        let message = AuthError::InvalidCredentials.to_string();
        assert_eq!(message, "Invalid email or password");
    }

    #[test]
    fn test_internal_detail_hidden_from_caller() {
        let err = AuthError::Internal("pool exploded at 03:00".into());
        assert_eq!(err.kind(), ErrorKind::InternalServerError);

        let app_err = err.to_app_error();
        assert_eq!(app_err.message(), "An unexpected error occurred");
    }
}
