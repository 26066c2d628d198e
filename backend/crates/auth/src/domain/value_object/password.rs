//! Password Value Objects
//!
//! Domain wrappers over `platform::password`. `RawPassword` carries
//! validated user input (zeroized on drop), `PasswordHash` the Argon2id
//! PHC string that is all the store ever sees.

use std::fmt;

use platform::password::{ClearTextPassword, HashedPassword, PasswordHashError};

use crate::error::{AuthError, AuthResult};

// ============================================================================
// Raw Password (User Input)
// ============================================================================

/// Raw password from user input
///
/// Memory is automatically zeroized when dropped.
pub struct RawPassword(ClearTextPassword);

impl RawPassword {
    /// Create a new raw password with policy validation
    ///
    /// Policy (NIST SP 800-63B): 8..=128 characters after NFKC
    /// normalization, no control characters, no trivial patterns.
    pub fn new(raw: String) -> AuthResult<Self> {
        let clear_text =
            ClearTextPassword::new(raw).map_err(|e| AuthError::Validation(e.to_string()))?;
        Ok(Self(clear_text))
    }

    pub(crate) fn inner(&self) -> &ClearTextPassword {
        &self.0
    }
}

impl fmt::Debug for RawPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("RawPassword").field(&"[REDACTED]").finish()
    }
}

// ============================================================================
// Password Hash (for storage)
// ============================================================================

/// Hashed password for database storage
///
/// Stores the password in Argon2id PHC string format.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash(HashedPassword);

impl PasswordHash {
    /// Create from raw password by hashing
    ///
    /// ## Arguments
    /// * `raw` - The validated raw password
    /// * `pepper` - Optional application-wide secret
    pub fn from_raw(raw: &RawPassword, pepper: Option<&[u8]>) -> AuthResult<Self> {
        let hashed = raw.inner().hash(pepper).map_err(|e| match e {
            PasswordHashError::HashingFailed(msg) => {
                AuthError::Internal(format!("Password hashing failed: {}", msg))
            }
            PasswordHashError::InvalidHashFormat => {
                AuthError::Internal("Unexpected error during password hashing".to_string())
            }
        })?;

        Ok(Self(hashed))
    }

    /// Create from PHC string (from database)
    pub fn from_phc_string(phc_string: impl Into<String>) -> AuthResult<Self> {
        let hashed = HashedPassword::from_phc_string(phc_string)
            .map_err(|_| AuthError::Internal("Stored password hash is malformed".to_string()))?;
        Ok(Self(hashed))
    }

    /// Verify a raw password against this hash
    pub fn verify(&self, raw: &RawPassword, pepper: Option<&[u8]>) -> bool {
        self.0.verify(raw.inner(), pepper)
    }

    /// Get the PHC string for storage
    pub fn as_str(&self) -> &str {
        self.0.as_phc_string()
    }
}

impl fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("PasswordHash").field(&"[PHC string]").finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let raw = RawPassword::new("sufficiently long 9".to_string()).unwrap();
        let hash = PasswordHash::from_raw(&raw, None).unwrap();

        assert!(hash.verify(&raw, None));
        assert!(hash.as_str().starts_with("$argon2"));
    }

    #[test]
    fn test_wrong_password_fails() {
        let raw = RawPassword::new("sufficiently long 9".to_string()).unwrap();
        let other = RawPassword::new("a different secret".to_string()).unwrap();
        let hash = PasswordHash::from_raw(&raw, None).unwrap();

        assert!(!hash.verify(&other, None));
    }

    #[test]
    fn test_policy_violation_is_validation_error() {
        assert!(matches!(
            RawPassword::new("short".to_string()),
            Err(AuthError::Validation(_))
        ));
    }

    #[test]
    fn test_phc_roundtrip() {
        let raw = RawPassword::new("sufficiently long 9".to_string()).unwrap();
        let hash = PasswordHash::from_raw(&raw, None).unwrap();

        let restored = PasswordHash::from_phc_string(hash.as_str()).unwrap();
        assert!(restored.verify(&raw, None));
    }
}
