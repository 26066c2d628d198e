//! Login Use Case
//!
//! Authenticates an account by email + password and issues a token.
//!
//! Check order is fixed: lookup, active, locked, then password. The
//! lock wins over a correct password, and every credential failure
//! answers with the same `InvalidCredentials`.

use std::sync::Arc;

use platform::client::ClientInfo;

use crate::application::config::AuthConfig;
use crate::application::token::TokenIssuer;
use crate::domain::entity::account::Account;
use crate::domain::repository::{AccountRepository, CredentialRepository};
use crate::domain::value_object::{email::Email, password::RawPassword};
use crate::error::{AuthError, AuthResult};

/// Login input
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

/// Login output
pub struct LoginOutput {
    pub account: Account,
    pub token: String,
}

/// Login use case
pub struct LoginUseCase<R>
where
    R: AccountRepository + CredentialRepository,
{
    repo: Arc<R>,
    tokens: Arc<TokenIssuer>,
    config: Arc<AuthConfig>,
}

impl<R> LoginUseCase<R>
where
    R: AccountRepository + CredentialRepository,
{
    pub fn new(repo: Arc<R>, tokens: Arc<TokenIssuer>, config: Arc<AuthConfig>) -> Self {
        Self {
            repo,
            tokens,
            config,
        }
    }

    pub async fn execute(&self, input: LoginInput, client: &ClientInfo) -> AuthResult<LoginOutput> {
        // A malformed email can't belong to any account; answer exactly
        // as for an unknown one.
        let email = Email::new(&input.email).map_err(|_| AuthError::InvalidCredentials)?;

        let account = self
            .repo
            .find_by_email(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !account.can_login() {
            tracing::warn!(
                account_id = %account.account_id,
                client_ip = ?client.ip_string(),
                "Login attempt on disabled account"
            );
            return Err(AuthError::AccountDisabled);
        }

        let credential = self
            .repo
            .find_by_account_id(&account.account_id)
            .await?
            .ok_or_else(|| AuthError::Internal("Credential record missing".to_string()))?;

        if credential.is_locked() {
            tracing::warn!(
                account_id = %account.account_id,
                client_ip = ?client.ip_string(),
                "Login attempt on locked account"
            );
            return Err(AuthError::AccountLocked);
        }

        // Policy rejects here mean the input can't match any stored hash
        let raw_password =
            RawPassword::new(input.password).map_err(|_| AuthError::InvalidCredentials)?;

        if !credential
            .password_hash
            .verify(&raw_password, self.config.pepper())
        {
            let updated = self.repo.record_failure(&account.account_id).await?;

            if updated.is_locked() {
                tracing::warn!(
                    account_id = %account.account_id,
                    client_ip = ?client.ip_string(),
                    user_agent = ?client.user_agent,
                    "Account locked after repeated login failures"
                );
            } else {
                tracing::warn!(
                    account_id = %account.account_id,
                    failed_attempts = updated.failed_attempts,
                    client_ip = ?client.ip_string(),
                    "Login failed - invalid password"
                );
            }

            return Err(AuthError::InvalidCredentials);
        }

        self.repo.reset_failures(&account.account_id).await?;

        let mut account = account;
        account.record_login();
        self.repo.record_login(&account).await?;

        let token = self.tokens.issue(&account)?;

        tracing::info!(
            account_id = %account.account_id,
            email = %account.email,
            client_ip = ?client.ip_string(),
            user_agent = ?client.user_agent,
            "Login successful"
        );

        Ok(LoginOutput { account, token })
    }
}
