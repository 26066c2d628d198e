//! Repository Traits
//!
//! Interfaces for data persistence. Implementation is in infrastructure layer.

use platform::rate_limit::{RateLimitConfig, RateLimitResult};

use crate::domain::entity::{account::Account, credential::Credential};
use crate::domain::value_object::{account_id::AccountId, email::Email};
use crate::error::AuthResult;

/// Account repository trait
#[trait_variant::make(AccountRepository: Send)]
pub trait LocalAccountRepository {
    /// Create a new account with its credentials in one transaction.
    /// Fails with `DuplicateEmail` if the email is already registered.
    async fn create(&self, account: &Account, credential: &Credential) -> AuthResult<()>;

    /// Find account by ID
    async fn find_by_id(&self, account_id: &AccountId) -> AuthResult<Option<Account>>;

    /// Find account by email (case-insensitive via canonical form)
    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<Account>>;

    /// Check if an email is already registered
    async fn exists_by_email(&self, email: &Email) -> AuthResult<bool>;

    /// Persist profile field changes
    async fn update_profile(&self, account: &Account) -> AuthResult<()>;

    /// Persist a role change
    async fn update_role(&self, account: &Account) -> AuthResult<()>;

    /// Persist the last-login timestamp
    async fn record_login(&self, account: &Account) -> AuthResult<()>;
}

/// Credential repository trait
#[trait_variant::make(CredentialRepository: Send)]
pub trait LocalCredentialRepository {
    /// Find credentials by account ID
    async fn find_by_account_id(&self, account_id: &AccountId) -> AuthResult<Option<Credential>>;

    /// Record a failed login attempt and return the updated credential.
    ///
    /// Must be a single atomic read-modify-write at the storage layer:
    /// concurrent failures from the same account may not bypass the
    /// lockout threshold by racing separate read/write round trips.
    async fn record_failure(&self, account_id: &AccountId) -> AuthResult<Credential>;

    /// Clear the failure counter and any lockout timer
    async fn reset_failures(&self, account_id: &AccountId) -> AuthResult<()>;
}

/// Rate limit repository trait
#[trait_variant::make(RateLimitRepository: Send)]
pub trait LocalRateLimitRepository {
    /// Count a request against `key`'s current window and report
    /// whether it is still within the limit.
    async fn check(&self, key: &str, config: &RateLimitConfig) -> AuthResult<RateLimitResult>;
}
