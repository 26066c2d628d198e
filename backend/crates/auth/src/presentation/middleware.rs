//! Auth Middleware
//!
//! The transport-layer composition of the gate functions: token
//! authentication, role authorization, and per-client rate limiting.
//! Each gate either passes the request on with added context or ends
//! it with a terminal error response.

use axum::body::Body;
use axum::http::{HeaderMap, Request, header};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use std::sync::Arc;

use platform::client::extract_client_info;
use platform::rate_limit::RateLimitConfig;

use crate::application::authenticate::AuthenticateUseCase;
use crate::application::config::AuthConfig;
use crate::application::token::TokenIssuer;
use crate::domain::entity::account::Account;
use crate::domain::repository::{AccountRepository, CredentialRepository, RateLimitRepository};
use crate::domain::value_object::account_role::AccountRole;
use crate::error::AuthError;

/// The authenticated account, attached to request extensions by
/// [`require_auth`] for downstream handlers.
#[derive(Clone)]
pub struct CurrentAccount(pub Account);

/// State for the authentication gate
#[derive(Clone)]
pub struct AuthGateState<R>
where
    R: AccountRepository + CredentialRepository + Clone + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub tokens: Arc<TokenIssuer>,
    pub config: Arc<AuthConfig>,
}

/// State for the rate-limit gate
#[derive(Clone)]
pub struct RateLimitState<R>
where
    R: RateLimitRepository + Clone + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub config: RateLimitConfig,
}

// ============================================================================
// Token extraction
// ============================================================================

/// Extract a bearer token from a request
///
/// Accepts `Authorization: Bearer <token>`, a bare token in the
/// Authorization header (older clients), or a cookie fallback.
pub fn extract_token(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
    if let Some(value) = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
    {
        let token = match value.strip_prefix("Bearer ") {
            Some(rest) => rest.trim(),
            None => value.trim(),
        };
        if !token.is_empty() {
            return Some(token.to_string());
        }
    }

    platform::cookie::extract_cookie(headers, cookie_name)
}

// ============================================================================
// Authentication gate
// ============================================================================

/// Middleware that requires a valid bearer token and a healthy account
///
/// On success the loaded [`CurrentAccount`] is attached to the request.
pub async fn require_auth<R>(
    state: AuthGateState<R>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, Response>
where
    R: AccountRepository + CredentialRepository + Clone + Send + Sync + 'static,
{
    let token = extract_token(req.headers(), &state.config.token_cookie_name);

    let use_case = AuthenticateUseCase::new(state.repo.clone(), state.tokens.clone());

    match use_case.execute(token).await {
        Ok(account) => {
            req.extensions_mut().insert(CurrentAccount(account));
            Ok(next.run(req).await)
        }
        Err(e) => Err(e.into_response()),
    }
}

// ============================================================================
// Role gate
// ============================================================================

/// Pure role check
///
/// `Unauthenticated` when no account is attached (the authentication
/// gate did not run), `Forbidden` when the role is not in the allowed
/// set.
pub fn authorize_role(account: Option<&Account>, allowed: &[AccountRole]) -> Result<(), AuthError> {
    let account = account.ok_or(AuthError::Unauthenticated)?;

    if !allowed.contains(&account.role) {
        let wanted = allowed
            .iter()
            .map(|r| r.code())
            .collect::<Vec<_>>()
            .join(", ");

        tracing::warn!(
            account_id = %account.account_id,
            role = %account.role,
            required = %wanted,
            "Role check failed"
        );

        return Err(AuthError::Forbidden(wanted));
    }

    Ok(())
}

/// Middleware wrapping [`authorize_role`] for a fixed allowed set
pub async fn require_role(
    allowed: &[AccountRole],
    req: Request<Body>,
    next: Next,
) -> Result<Response, Response> {
    let account = req
        .extensions()
        .get::<CurrentAccount>()
        .map(|current| &current.0);

    match authorize_role(account, allowed) {
        Ok(()) => Ok(next.run(req).await),
        Err(e) => Err(e.into_response()),
    }
}

// ============================================================================
// Rate-limit gate
// ============================================================================

/// Middleware limiting requests per client IP
///
/// A store failure ends the request with a 500 rather than waving the
/// client through.
pub async fn rate_limit<R>(
    state: RateLimitState<R>,
    req: Request<Body>,
    next: Next,
) -> Result<Response, Response>
where
    R: RateLimitRepository + Clone + Send + Sync + 'static,
{
    let direct_ip = req
        .extensions()
        .get::<axum::extract::ConnectInfo<std::net::SocketAddr>>()
        .map(|info| info.0.ip());

    let client = extract_client_info(req.headers(), direct_ip);
    let key = client.rate_limit_key();

    match state.repo.check(&key, &state.config).await {
        Ok(result) if result.allowed => Ok(next.run(req).await),
        Ok(_) => Err(AuthError::RateLimited.into_response()),
        Err(e) => Err(e.into_response()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_object::email::Email;
    use axum::http::HeaderValue;

    fn account_with_role(role: AccountRole) -> Account {
        Account::new(
            Email::new("gate@example.com").unwrap(),
            "Gate".to_string(),
            "Keeper".to_string(),
            None,
            role,
        )
    }

    #[test]
    fn test_extract_token_bearer() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_static("Bearer abc.def.ghi"),
        );
        assert_eq!(
            extract_token(&headers, "token"),
            Some("abc.def.ghi".to_string())
        );
    }

    #[test]
    fn test_extract_token_bare_header() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("abc.def.ghi"));
        assert_eq!(
            extract_token(&headers, "token"),
            Some("abc.def.ghi".to_string())
        );
    }

    #[test]
    fn test_extract_token_cookie_fallback() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("token=abc.def.ghi; theme=dark"),
        );
        assert_eq!(
            extract_token(&headers, "token"),
            Some("abc.def.ghi".to_string())
        );
    }

    #[test]
    fn test_extract_token_header_wins_over_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_static("Bearer from-header"),
        );
        headers.insert(header::COOKIE, HeaderValue::from_static("token=from-cookie"));
        assert_eq!(
            extract_token(&headers, "token"),
            Some("from-header".to_string())
        );
    }

    #[test]
    fn test_extract_token_none() {
        assert_eq!(extract_token(&HeaderMap::new(), "token"), None);
    }

    #[test]
    fn test_authorize_role_admin_route() {
        let admin = account_with_role(AccountRole::Admin);
        let customer = account_with_role(AccountRole::Customer);

        assert!(authorize_role(Some(&admin), &[AccountRole::Admin]).is_ok());
        assert!(matches!(
            authorize_role(Some(&customer), &[AccountRole::Admin]),
            Err(AuthError::Forbidden(_))
        ));
    }

    #[test]
    fn test_authorize_role_without_account() {
        assert!(matches!(
            authorize_role(None, &[AccountRole::Admin]),
            Err(AuthError::Unauthenticated)
        ));
    }

    #[test]
    fn test_authorize_role_multi_role_set() {
        let customer = account_with_role(AccountRole::Customer);
        assert!(
            authorize_role(Some(&customer), &[AccountRole::Customer, AccountRole::Admin]).is_ok()
        );
    }
}
