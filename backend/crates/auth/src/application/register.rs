//! Register Use Case
//!
//! Creates a new account and returns a freshly issued token.

use std::sync::Arc;

use platform::client::ClientInfo;

use crate::application::config::AuthConfig;
use crate::application::token::TokenIssuer;
use crate::domain::entity::{account::Account, credential::Credential};
use crate::domain::repository::AccountRepository;
use crate::domain::value_object::{
    account_role::AccountRole,
    email::Email,
    password::{PasswordHash, RawPassword},
};
use crate::error::{AuthError, AuthResult};

/// Maximum length for name fields
const NAME_MAX_LENGTH: usize = 50;

/// Register input
pub struct RegisterInput {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub phone: Option<String>,
    /// Role requested by the caller ("customer" when absent)
    pub requested_role: Option<String>,
}

/// Register output
pub struct RegisterOutput {
    pub account: Account,
    pub token: String,
}

/// Register use case
pub struct RegisterUseCase<R>
where
    R: AccountRepository,
{
    repo: Arc<R>,
    tokens: Arc<TokenIssuer>,
    config: Arc<AuthConfig>,
}

impl<R> RegisterUseCase<R>
where
    R: AccountRepository,
{
    pub fn new(repo: Arc<R>, tokens: Arc<TokenIssuer>, config: Arc<AuthConfig>) -> Self {
        Self {
            repo,
            tokens,
            config,
        }
    }

    /// Execute registration.
    ///
    /// `granted_by` is the authenticated account making the request, if
    /// any. Requesting the admin role without an active admin grantor
    /// fails with `Forbidden` - accounts cannot self-escalate.
    pub async fn execute(
        &self,
        input: RegisterInput,
        granted_by: Option<&Account>,
        client: &ClientInfo,
    ) -> AuthResult<RegisterOutput> {
        let first_name = validate_name("firstName", &input.first_name)?;
        let last_name = validate_name("lastName", &input.last_name)?;

        let email = Email::new(&input.email)?;

        let role = self.resolve_role(input.requested_role.as_deref(), granted_by)?;

        if self.repo.exists_by_email(&email).await? {
            return Err(AuthError::DuplicateEmail);
        }

        let raw_password = RawPassword::new(input.password)?;
        let password_hash = PasswordHash::from_raw(&raw_password, self.config.pepper())?;

        let account = Account::new(email, first_name, last_name, input.phone, role);
        let credential = Credential::new(account.account_id, password_hash);

        self.repo.create(&account, &credential).await?;

        let token = self.tokens.issue(&account)?;

        tracing::info!(
            account_id = %account.account_id,
            email = %account.email,
            role = %account.role,
            client_ip = ?client.ip_string(),
            user_agent = ?client.user_agent,
            "Account registered"
        );

        Ok(RegisterOutput { account, token })
    }

    /// Resolve the requested role against who is asking
    fn resolve_role(
        &self,
        requested: Option<&str>,
        granted_by: Option<&Account>,
    ) -> AuthResult<AccountRole> {
        let role = match requested {
            None => AccountRole::default(),
            Some(code) => AccountRole::from_code(code)
                .ok_or_else(|| AuthError::Validation(format!("Unknown role: {}", code)))?,
        };

        if role.is_admin() {
            match granted_by {
                Some(grantor) if grantor.role.is_admin() && grantor.is_active => {
                    tracing::info!(
                        granted_by = %grantor.account_id,
                        "Admin role granted at registration"
                    );
                }
                _ => return Err(AuthError::Forbidden(AccountRole::Admin.code().to_string())),
            }
        }

        Ok(role)
    }
}

/// Validate a required name field
fn validate_name(field: &str, value: &str) -> AuthResult<String> {
    let trimmed = value.trim();

    if trimmed.is_empty() {
        return Err(AuthError::Validation(format!("{} is required", field)));
    }

    if trimmed.chars().count() > NAME_MAX_LENGTH {
        return Err(AuthError::Validation(format!(
            "{} must be at most {} characters",
            field, NAME_MAX_LENGTH
        )));
    }

    Ok(trimmed.to_string())
}
