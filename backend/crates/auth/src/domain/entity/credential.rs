//! Credential Entity
//!
//! Authentication credentials for an account.
//! Separated from the Account entity to isolate sensitive data.

use chrono::{DateTime, Utc};

use crate::domain::value_object::{account_id::AccountId, password::PasswordHash};

/// Credential entity
///
/// Contains the password hash and login failure tracking.
/// Lockout state machine: Unlocked -> (threshold failures) -> Locked
/// -> (timer elapses or successful login) -> Unlocked.
#[derive(Debug, Clone)]
pub struct Credential {
    /// Reference to Account
    pub account_id: AccountId,
    /// Hashed password (Argon2id PHC string)
    pub password_hash: PasswordHash,
    /// Consecutive login failure count
    pub failed_attempts: u16,
    /// Last login failure time
    pub last_failed_at: Option<DateTime<Utc>>,
    /// Account locked until (temporary lockout after failures)
    pub lock_until: Option<DateTime<Utc>>,
    /// Created timestamp
    pub created_at: DateTime<Utc>,
    /// Updated timestamp
    pub updated_at: DateTime<Utc>,
}

impl Credential {
    /// Maximum login failures before temporary lockout
    pub const MAX_FAILED_ATTEMPTS: u16 = 5;
    /// Lockout duration in minutes
    pub const LOCKOUT_MINUTES: i64 = 30;

    /// Create new credentials
    pub fn new(account_id: AccountId, password_hash: PasswordHash) -> Self {
        let now = Utc::now();
        Self {
            account_id,
            password_hash,
            failed_attempts: 0,
            last_failed_at: None,
            lock_until: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Check if the account is currently locked
    pub fn is_locked(&self) -> bool {
        if let Some(lock_until) = self.lock_until {
            Utc::now() < lock_until
        } else {
            false
        }
    }

    /// Record a failed login attempt
    ///
    /// Crossing the threshold starts the lockout timer and zeroes the
    /// counter, so the next cycle after the lock expires starts fresh.
    pub fn record_failure(&mut self) {
        let now = Utc::now();
        self.failed_attempts += 1;
        self.last_failed_at = Some(now);
        self.updated_at = now;

        if self.failed_attempts >= Self::MAX_FAILED_ATTEMPTS {
            self.lock_until = Some(now + chrono::Duration::minutes(Self::LOCKOUT_MINUTES));
            self.failed_attempts = 0;
        }
    }

    /// Reset failure tracking on successful login
    pub fn reset_failures(&mut self) {
        self.failed_attempts = 0;
        self.last_failed_at = None;
        self.lock_until = None;
        self.updated_at = Utc::now();
    }

    /// Replace the password hash
    pub fn update_password(&mut self, new_hash: PasswordHash) {
        self.password_hash = new_hash;
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_object::password::RawPassword;

    fn credential() -> Credential {
        let raw = RawPassword::new("plenty strong 42".to_string()).unwrap();
        let hash = PasswordHash::from_raw(&raw, None).unwrap();
        Credential::new(AccountId::new(), hash)
    }

    #[test]
    fn test_new_credential_unlocked() {
        let credential = credential();
        assert_eq!(credential.failed_attempts, 0);
        assert!(!credential.is_locked());
        assert!(credential.lock_until.is_none());
    }

    #[test]
    fn test_failures_below_threshold_do_not_lock() {
        let mut credential = credential();
        for expected in 1..Credential::MAX_FAILED_ATTEMPTS {
            credential.record_failure();
            assert_eq!(credential.failed_attempts, expected);
            assert!(!credential.is_locked());
        }
    }

    #[test]
    fn test_threshold_failure_locks_and_zeroes_counter() {
        let mut credential = credential();
        for _ in 0..Credential::MAX_FAILED_ATTEMPTS {
            credential.record_failure();
        }

        assert!(credential.is_locked());
        assert_eq!(credential.failed_attempts, 0);

        let lock_until = credential.lock_until.unwrap();
        let expected = Utc::now() + chrono::Duration::minutes(Credential::LOCKOUT_MINUTES);
        assert!((expected - lock_until).num_seconds().abs() < 5);
    }

    #[test]
    fn test_expired_lock_reports_unlocked() {
        let mut credential = credential();
        credential.lock_until = Some(Utc::now() - chrono::Duration::seconds(1));
        assert!(!credential.is_locked());
    }

    #[test]
    fn test_reset_clears_lock_and_counter() {
        let mut credential = credential();
        for _ in 0..Credential::MAX_FAILED_ATTEMPTS {
            credential.record_failure();
        }
        assert!(credential.is_locked());

        credential.reset_failures();
        assert!(!credential.is_locked());
        assert_eq!(credential.failed_attempts, 0);
        assert!(credential.last_failed_at.is_none());
        assert!(credential.lock_until.is_none());
    }
}
