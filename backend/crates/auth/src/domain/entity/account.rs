//! Account Entity
//!
//! Core account profile entity containing non-sensitive data.
//! Credential material lives in the Credential entity.

use chrono::{DateTime, Utc};

use crate::domain::value_object::{
    account_id::AccountId, account_role::AccountRole, email::Email,
};

/// Account entity
///
/// A registered customer or administrator identity.
/// The password hash is never part of this entity, so anything built
/// from an Account (API responses, logs) cannot leak it.
#[derive(Debug, Clone)]
pub struct Account {
    /// Internal UUID identifier
    pub account_id: AccountId,
    /// Login identifier (unique, case-insensitive)
    pub email: Email,
    /// Given name
    pub first_name: String,
    /// Family name
    pub last_name: String,
    /// Contact phone number
    pub phone: Option<String>,
    /// Shipping address (free-form)
    pub address: Option<String>,
    /// Role (Customer, Admin)
    pub role: AccountRole,
    /// Soft-disable flag, independent of lockout state
    pub is_active: bool,
    /// Last successful login time
    pub last_login_at: Option<DateTime<Utc>>,
    /// Created timestamp
    pub created_at: DateTime<Utc>,
    /// Updated timestamp
    pub updated_at: DateTime<Utc>,
}

/// Allow-listed profile fields a caller may change
///
/// Everything else (email, role, active flag) has its own path.
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

impl ProfileUpdate {
    /// True when no field is set
    pub fn is_empty(&self) -> bool {
        self.first_name.is_none()
            && self.last_name.is_none()
            && self.phone.is_none()
            && self.address.is_none()
    }
}

impl Account {
    /// Create a new account
    pub fn new(
        email: Email,
        first_name: String,
        last_name: String,
        phone: Option<String>,
        role: AccountRole,
    ) -> Self {
        let now = Utc::now();

        Self {
            account_id: AccountId::new(),
            email,
            first_name,
            last_name,
            phone,
            address: None,
            role,
            is_active: true,
            last_login_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Record successful login
    pub fn record_login(&mut self) {
        let now = Utc::now();
        self.last_login_at = Some(now);
        self.updated_at = now;
    }

    /// Check if the account may log in at all
    pub fn can_login(&self) -> bool {
        self.is_active
    }

    /// Update account role
    pub fn set_role(&mut self, role: AccountRole) {
        self.role = role;
        self.updated_at = Utc::now();
    }

    /// Soft-disable or re-enable the account
    pub fn set_active(&mut self, active: bool) {
        self.is_active = active;
        self.updated_at = Utc::now();
    }

    /// Apply an allow-listed profile update
    pub fn apply_profile_update(&mut self, update: ProfileUpdate) {
        if let Some(first_name) = update.first_name {
            self.first_name = first_name;
        }
        if let Some(last_name) = update.last_name {
            self.last_name = last_name;
        }
        if let Some(phone) = update.phone {
            self.phone = Some(phone);
        }
        if let Some(address) = update.address {
            self.address = Some(address);
        }
        self.updated_at = Utc::now();
    }

    /// Full display name
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account() -> Account {
        Account::new(
            Email::new("alice@example.com").unwrap(),
            "Alice".to_string(),
            "Doe".to_string(),
            None,
            AccountRole::default(),
        )
    }

    #[test]
    fn test_new_account_defaults() {
        let account = account();
        assert_eq!(account.role, AccountRole::Customer);
        assert!(account.is_active);
        assert!(account.last_login_at.is_none());
        assert!(account.can_login());
    }

    #[test]
    fn test_deactivated_account_cannot_login() {
        let mut account = account();
        account.set_active(false);
        assert!(!account.can_login());
    }

    #[test]
    fn test_record_login_stamps_time() {
        let mut account = account();
        account.record_login();
        assert!(account.last_login_at.is_some());
    }

    #[test]
    fn test_profile_update_applies_only_set_fields() {
        let mut account = account();
        account.apply_profile_update(ProfileUpdate {
            phone: Some("+1-555-0100".to_string()),
            ..Default::default()
        });

        assert_eq!(account.first_name, "Alice");
        assert_eq!(account.phone.as_deref(), Some("+1-555-0100"));
        assert!(account.address.is_none());
    }

    #[test]
    fn test_profile_update_is_empty() {
        assert!(ProfileUpdate::default().is_empty());
        assert!(
            !ProfileUpdate {
                first_name: Some("Bob".to_string()),
                ..Default::default()
            }
            .is_empty()
        );
    }
}
