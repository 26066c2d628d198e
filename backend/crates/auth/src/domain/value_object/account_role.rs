use serde::{Deserialize, Serialize};
use std::fmt;

/// Account role
///
/// Closed enumeration: customers shop, admins administrate.
/// New accounts default to Customer; Admin is only granted by an
/// existing admin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[repr(i16)]
pub enum AccountRole {
    #[default]
    Customer = 0,
    Admin = 1,
}

impl AccountRole {
    #[inline]
    pub const fn id(&self) -> i16 {
        *self as i16
    }

    #[inline]
    pub const fn code(&self) -> &'static str {
        match self {
            AccountRole::Customer => "customer",
            AccountRole::Admin => "admin",
        }
    }

    #[inline]
    pub const fn is_admin(&self) -> bool {
        matches!(self, AccountRole::Admin)
    }

    /// Create from numeric ID (database representation)
    #[inline]
    pub fn from_id(id: i16) -> Option<Self> {
        match id {
            0 => Some(AccountRole::Customer),
            1 => Some(AccountRole::Admin),
            _ => None,
        }
    }

    /// Create from string code (API representation)
    #[inline]
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "customer" => Some(AccountRole::Customer),
            "admin" => Some(AccountRole::Admin),
            _ => None,
        }
    }
}

impl fmt::Display for AccountRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}
