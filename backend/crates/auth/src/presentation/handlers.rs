//! HTTP Handlers

use axum::Json;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use std::sync::Arc;

use platform::client::extract_client_info;

use crate::application::authenticate::AuthenticateUseCase;
use crate::application::config::AuthConfig;
use crate::application::token::TokenIssuer;
use crate::application::{
    GrantRoleUseCase, LoginInput, LoginUseCase, RegisterInput, RegisterUseCase,
    UpdateProfileUseCase,
};
use crate::domain::entity::account::{Account, ProfileUpdate};
use crate::domain::repository::{AccountRepository, CredentialRepository};
use crate::domain::value_object::{account_id::AccountId, account_role::AccountRole};
use crate::error::{AuthError, AuthResult};
use crate::presentation::dto::{
    AccountDto, AuthResponse, LoginRequest, ProfileResponse, RegisterRequest,
    UpdateProfileRequest, UpdateRoleRequest,
};
use crate::presentation::middleware::{CurrentAccount, extract_token};

/// Shared state for auth handlers
#[derive(Clone)]
pub struct AuthAppState<R>
where
    R: AccountRepository + CredentialRepository + Clone + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub tokens: Arc<TokenIssuer>,
    pub config: Arc<AuthConfig>,
}

// ============================================================================
// Register
// ============================================================================

/// POST /api/auth/register
pub async fn register<R>(
    State(state): State<AuthAppState<R>>,
    headers: HeaderMap,
    axum::extract::ConnectInfo(addr): axum::extract::ConnectInfo<std::net::SocketAddr>,
    Json(req): Json<RegisterRequest>,
) -> AuthResult<impl IntoResponse>
where
    R: AccountRepository + CredentialRepository + Clone + Send + Sync + 'static,
{
    let client = extract_client_info(&headers, Some(addr.ip()));

    // Requesting the admin role needs an authenticated admin grantor
    let granted_by: Option<Account> = if req.role.as_deref() == Some("admin") {
        let token = extract_token(&headers, &state.config.token_cookie_name);
        let use_case = AuthenticateUseCase::new(state.repo.clone(), state.tokens.clone());
        match use_case.execute(token).await {
            Ok(account) => Some(account),
            // No or bad token: fall through with no grantor, the use
            // case answers Forbidden without leaking token state
            Err(_) => None,
        }
    } else {
        None
    };

    let use_case = RegisterUseCase::new(
        state.repo.clone(),
        state.tokens.clone(),
        state.config.clone(),
    );

    let input = RegisterInput {
        first_name: req.first_name,
        last_name: req.last_name,
        email: req.email,
        password: req.password,
        phone: req.phone,
        requested_role: req.role,
    };

    let output = use_case.execute(input, granted_by.as_ref(), &client).await?;

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            success: true,
            message: "Account registered successfully".to_string(),
            token: output.token,
            user: AccountDto::from(&output.account),
        }),
    ))
}

// ============================================================================
// Login
// ============================================================================

/// POST /api/auth/login
pub async fn login<R>(
    State(state): State<AuthAppState<R>>,
    headers: HeaderMap,
    axum::extract::ConnectInfo(addr): axum::extract::ConnectInfo<std::net::SocketAddr>,
    Json(req): Json<LoginRequest>,
) -> AuthResult<Json<AuthResponse>>
where
    R: AccountRepository + CredentialRepository + Clone + Send + Sync + 'static,
{
    let client = extract_client_info(&headers, Some(addr.ip()));

    let use_case = LoginUseCase::new(
        state.repo.clone(),
        state.tokens.clone(),
        state.config.clone(),
    );

    let input = LoginInput {
        email: req.email,
        password: req.password,
    };

    let output = use_case.execute(input, &client).await?;

    Ok(Json(AuthResponse {
        success: true,
        message: "Login successful".to_string(),
        token: output.token,
        user: AccountDto::from(&output.account),
    }))
}

// ============================================================================
// Profile
// ============================================================================

/// GET /api/auth/profile
pub async fn get_profile(
    Extension(CurrentAccount(account)): Extension<CurrentAccount>,
) -> Json<ProfileResponse> {
    Json(ProfileResponse {
        success: true,
        user: AccountDto::from(account),
    })
}

/// PUT /api/auth/profile
pub async fn update_profile<R>(
    State(state): State<AuthAppState<R>>,
    Extension(CurrentAccount(account)): Extension<CurrentAccount>,
    Json(req): Json<UpdateProfileRequest>,
) -> AuthResult<Json<ProfileResponse>>
where
    R: AccountRepository + CredentialRepository + Clone + Send + Sync + 'static,
{
    let use_case = UpdateProfileUseCase::new(state.repo.clone());

    let update = ProfileUpdate {
        first_name: req.first_name,
        last_name: req.last_name,
        phone: req.phone,
        address: req.address,
    };

    let updated = use_case.execute(account, update).await?;

    Ok(Json(ProfileResponse {
        success: true,
        user: AccountDto::from(updated),
    }))
}

// ============================================================================
// Admin: role management
// ============================================================================

/// PUT /api/admin/accounts/{id}/role
pub async fn update_role<R>(
    State(state): State<AuthAppState<R>>,
    Extension(CurrentAccount(actor)): Extension<CurrentAccount>,
    Path(account_id): Path<uuid::Uuid>,
    Json(req): Json<UpdateRoleRequest>,
) -> AuthResult<Json<ProfileResponse>>
where
    R: AccountRepository + CredentialRepository + Clone + Send + Sync + 'static,
{
    let role = AccountRole::from_code(&req.role)
        .ok_or_else(|| AuthError::Validation(format!("Unknown role: {}", req.role)))?;

    let use_case = GrantRoleUseCase::new(state.repo.clone());
    let target = use_case
        .execute(&actor, &AccountId::from_uuid(account_id), role)
        .await?;

    Ok(Json(ProfileResponse {
        success: true,
        user: AccountDto::from(target),
    }))
}
