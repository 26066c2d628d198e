//! API DTOs (Data Transfer Objects)
//!
//! Explicit request/response schemas per endpoint, validated at the
//! boundary before anything reaches a use case.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::entity::account::Account;

// ============================================================================
// Register
// ============================================================================

/// Register request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub phone: Option<String>,
    /// Role code; "admin" requires an admin bearer token on the request
    pub role: Option<String>,
}

// ============================================================================
// Login
// ============================================================================

/// Login request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

// ============================================================================
// Responses carrying a token
// ============================================================================

/// Response for register/login: token plus public profile
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub success: bool,
    pub message: String,
    pub token: String,
    pub user: AccountDto,
}

// ============================================================================
// Profile
// ============================================================================

/// Profile response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    pub success: bool,
    pub user: AccountDto,
}

/// Profile update request (allow-listed fields only)
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

// ============================================================================
// Admin
// ============================================================================

/// Role change request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRoleRequest {
    pub role: String,
}

// ============================================================================
// Account DTO (public profile)
// ============================================================================

/// Public account representation
///
/// Built from the Account entity, which carries no credential material,
/// so a hash can never end up in a response body.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountDto {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub role: String,
    pub is_active: bool,
    pub last_login_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<&Account> for AccountDto {
    fn from(account: &Account) -> Self {
        Self {
            id: account.account_id.to_string(),
            first_name: account.first_name.clone(),
            last_name: account.last_name.clone(),
            email: account.email.to_string(),
            phone: account.phone.clone(),
            address: account.address.clone(),
            role: account.role.code().to_string(),
            is_active: account.is_active,
            last_login_at: account.last_login_at,
            created_at: account.created_at,
        }
    }
}

impl From<Account> for AccountDto {
    fn from(account: Account) -> Self {
        Self::from(&account)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_object::{account_role::AccountRole, email::Email};

    #[test]
    fn test_account_dto_has_no_credential_fields() {
        let account = Account::new(
            Email::new("dto@example.com").unwrap(),
            "Dee".to_string(),
            "Tio".to_string(),
            None,
            AccountRole::Customer,
        );

        let json = serde_json::to_value(AccountDto::from(&account)).unwrap();
        let keys: Vec<&str> = json.as_object().unwrap().keys().map(|k| k.as_str()).collect();

        assert!(keys.contains(&"email"));
        assert!(keys.contains(&"role"));
        assert!(!keys.iter().any(|k| k.to_lowercase().contains("password")));
        assert!(!keys.iter().any(|k| k.to_lowercase().contains("hash")));
    }

    #[test]
    fn test_register_request_camel_case() {
        let req: RegisterRequest = serde_json::from_str(
            r#"{
                "firstName": "Alice",
                "lastName": "Doe",
                "email": "alice@example.com",
                "password": "secret123x",
                "phone": "+1-555-0100"
            }"#,
        )
        .unwrap();

        assert_eq!(req.first_name, "Alice");
        assert_eq!(req.phone.as_deref(), Some("+1-555-0100"));
        assert!(req.role.is_none());
    }
}
