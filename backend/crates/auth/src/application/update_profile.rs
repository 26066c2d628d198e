//! Update Profile Use Case
//!
//! Applies an allow-listed set of profile changes to the calling
//! account. Email, role, and active flag are not reachable from here.

use std::sync::Arc;

use crate::domain::entity::account::{Account, ProfileUpdate};
use crate::domain::repository::AccountRepository;
use crate::error::{AuthError, AuthResult};

/// Maximum length for name fields
const NAME_MAX_LENGTH: usize = 50;

/// Update profile use case
pub struct UpdateProfileUseCase<R>
where
    R: AccountRepository,
{
    repo: Arc<R>,
}

impl<R> UpdateProfileUseCase<R>
where
    R: AccountRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn execute(&self, account: Account, update: ProfileUpdate) -> AuthResult<Account> {
        if update.is_empty() {
            return Err(AuthError::Validation(
                "No updatable fields provided".to_string(),
            ));
        }

        let update = validate_update(update)?;

        let mut account = account;
        account.apply_profile_update(update);

        self.repo.update_profile(&account).await?;

        tracing::info!(
            account_id = %account.account_id,
            "Profile updated"
        );

        Ok(account)
    }
}

/// Trim and bound the incoming fields
fn validate_update(update: ProfileUpdate) -> AuthResult<ProfileUpdate> {
    let check_name = |field: &str, value: Option<String>| -> AuthResult<Option<String>> {
        match value {
            None => Ok(None),
            Some(v) => {
                let trimmed = v.trim().to_string();
                if trimmed.is_empty() {
                    return Err(AuthError::Validation(format!("{} cannot be empty", field)));
                }
                if trimmed.chars().count() > NAME_MAX_LENGTH {
                    return Err(AuthError::Validation(format!(
                        "{} must be at most {} characters",
                        field, NAME_MAX_LENGTH
                    )));
                }
                Ok(Some(trimmed))
            }
        }
    };

    Ok(ProfileUpdate {
        first_name: check_name("firstName", update.first_name)?,
        last_name: check_name("lastName", update.last_name)?,
        phone: update.phone.map(|p| p.trim().to_string()),
        address: update.address.map(|a| a.trim().to_string()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_update_trims_names() {
        let update = validate_update(ProfileUpdate {
            first_name: Some("  Bob ".to_string()),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(update.first_name.as_deref(), Some("Bob"));
    }

    #[test]
    fn test_validate_update_rejects_blank_name() {
        assert!(
            validate_update(ProfileUpdate {
                last_name: Some("   ".to_string()),
                ..Default::default()
            })
            .is_err()
        );
    }
}
