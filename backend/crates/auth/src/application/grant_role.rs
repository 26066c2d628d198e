//! Grant Role Use Case
//!
//! Role changes go through an admin, never through self-service.

use std::sync::Arc;

use crate::domain::entity::account::Account;
use crate::domain::repository::AccountRepository;
use crate::domain::value_object::{account_id::AccountId, account_role::AccountRole};
use crate::error::{AuthError, AuthResult};

/// Grant role use case
pub struct GrantRoleUseCase<R>
where
    R: AccountRepository,
{
    repo: Arc<R>,
}

impl<R> GrantRoleUseCase<R>
where
    R: AccountRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    /// Change `target_id`'s role. `actor` must be an active admin;
    /// the route is gated, but the invariant lives here too.
    pub async fn execute(
        &self,
        actor: &Account,
        target_id: &AccountId,
        role: AccountRole,
    ) -> AuthResult<Account> {
        if !actor.role.is_admin() || !actor.is_active {
            return Err(AuthError::Forbidden(AccountRole::Admin.code().to_string()));
        }

        let mut target = self
            .repo
            .find_by_id(target_id)
            .await?
            .ok_or_else(|| AuthError::NotFound("Account".to_string()))?;

        let previous = target.role;
        target.set_role(role);
        self.repo.update_role(&target).await?;

        tracing::info!(
            actor = %actor.account_id,
            target = %target.account_id,
            from = %previous,
            to = %role,
            "Account role changed"
        );

        Ok(target)
    }
}
