//! Authenticate Use Case
//!
//! Per-request authentication: verify a bearer token and reload the
//! account it references. The token only identifies; existence, active
//! flag, and lock state come from current store state, so revoking an
//! account takes effect on the very next request.

use std::sync::Arc;

use crate::application::token::TokenIssuer;
use crate::domain::entity::account::Account;
use crate::domain::repository::{AccountRepository, CredentialRepository};
use crate::error::{AuthError, AuthResult};

/// Authenticate use case
pub struct AuthenticateUseCase<R>
where
    R: AccountRepository + CredentialRepository,
{
    repo: Arc<R>,
    tokens: Arc<TokenIssuer>,
}

impl<R> AuthenticateUseCase<R>
where
    R: AccountRepository + CredentialRepository,
{
    pub fn new(repo: Arc<R>, tokens: Arc<TokenIssuer>) -> Self {
        Self { repo, tokens }
    }

    /// Run the gate sequence over an extracted token.
    ///
    /// Ordered per contract:
    /// 1. `MissingToken` when nothing was presented
    /// 2. `InvalidToken` / `ExpiredToken` from verification
    /// 3. `AccountNotFound` when the subject no longer exists
    /// 4. `AccountDisabled` when soft-disabled
    /// 5. `AccountLocked` when the lockout timer is running
    pub async fn execute(&self, token: Option<String>) -> AuthResult<Account> {
        let token = token.ok_or(AuthError::MissingToken)?;

        let claims = self.tokens.verify(&token)?;
        let account_id = claims.account_id()?;

        let account = self
            .repo
            .find_by_id(&account_id)
            .await?
            .ok_or(AuthError::AccountNotFound)?;

        if !account.is_active {
            return Err(AuthError::AccountDisabled);
        }

        let credential = self
            .repo
            .find_by_account_id(&account_id)
            .await?
            .ok_or_else(|| AuthError::Internal("Credential record missing".to_string()))?;

        if credential.is_locked() {
            return Err(AuthError::AccountLocked);
        }

        Ok(account)
    }
}
