//! Auth Router
//!
//! Assembles the gate pipeline per route group: rate limiting in front
//! of the credential endpoints, authentication in front of profile
//! routes, authentication + admin role in front of admin routes.

use axum::{
    Router,
    extract::Request,
    middleware::{self, Next},
    routing::{get, post, put},
};
use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::token::TokenIssuer;
use crate::domain::repository::{AccountRepository, CredentialRepository, RateLimitRepository};
use crate::domain::value_object::account_role::AccountRole;
use crate::infra::postgres::PgAuthRepository;
use crate::presentation::handlers::{self, AuthAppState};
use crate::presentation::middleware::{
    AuthGateState, RateLimitState, rate_limit, require_auth, require_role,
};

const ADMIN_ONLY: &[AccountRole] = &[AccountRole::Admin];

/// Create the Auth router with the PostgreSQL repository
pub fn auth_router(repo: PgAuthRepository, tokens: TokenIssuer, config: AuthConfig) -> Router {
    auth_router_generic(repo, tokens, config)
}

/// Create the admin router with the PostgreSQL repository
pub fn admin_router(repo: PgAuthRepository, tokens: TokenIssuer, config: AuthConfig) -> Router {
    admin_router_generic(repo, tokens, config)
}

/// Create a generic Auth router for any repository implementation
pub fn auth_router_generic<R>(repo: R, tokens: TokenIssuer, config: AuthConfig) -> Router
where
    R: AccountRepository
        + CredentialRepository
        + RateLimitRepository
        + Clone
        + Send
        + Sync
        + 'static,
{
    let state = AuthAppState {
        repo: Arc::new(repo),
        tokens: Arc::new(tokens),
        config: Arc::new(config),
    };

    let limiter = RateLimitState {
        repo: state.repo.clone(),
        config: state.config.credential_rate_limit.clone(),
    };

    let gate = AuthGateState {
        repo: state.repo.clone(),
        tokens: state.tokens.clone(),
        config: state.config.clone(),
    };

    let public = Router::new()
        .route("/register", post(handlers::register::<R>))
        .route("/login", post(handlers::login::<R>))
        .route_layer(middleware::from_fn(move |req: Request, next: Next| {
            let limiter = limiter.clone();
            async move { rate_limit(limiter, req, next).await }
        }));

    let protected = Router::new()
        .route(
            "/profile",
            get(handlers::get_profile).put(handlers::update_profile::<R>),
        )
        .route_layer(middleware::from_fn(move |req: Request, next: Next| {
            let gate = gate.clone();
            async move { require_auth(gate, req, next).await }
        }));

    Router::new().merge(public).merge(protected).with_state(state)
}

/// Create a generic admin router for any repository implementation
pub fn admin_router_generic<R>(repo: R, tokens: TokenIssuer, config: AuthConfig) -> Router
where
    R: AccountRepository
        + CredentialRepository
        + RateLimitRepository
        + Clone
        + Send
        + Sync
        + 'static,
{
    let state = AuthAppState {
        repo: Arc::new(repo),
        tokens: Arc::new(tokens),
        config: Arc::new(config),
    };

    let gate = AuthGateState {
        repo: state.repo.clone(),
        tokens: state.tokens.clone(),
        config: state.config.clone(),
    };

    // require_auth wraps require_role, so authentication runs first
    Router::new()
        .route("/accounts/{id}/role", put(handlers::update_role::<R>))
        .route_layer(middleware::from_fn(|req: Request, next: Next| async move {
            require_role(ADMIN_ONLY, req, next).await
        }))
        .route_layer(middleware::from_fn(move |req: Request, next: Next| {
            let gate = gate.clone();
            async move { require_auth(gate, req, next).await }
        }))
        .with_state(state)
}
