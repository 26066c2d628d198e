//! PostgreSQL Repository Implementations

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use platform::rate_limit::{RateLimitConfig, RateLimitResult};

use crate::domain::entity::{account::Account, credential::Credential};
use crate::domain::repository::{AccountRepository, CredentialRepository, RateLimitRepository};
use crate::domain::value_object::{
    account_id::AccountId, account_role::AccountRole, email::Email, password::PasswordHash,
};
use crate::error::{AuthError, AuthResult};

/// How long a spent rate-limit window is kept before cleanup
const RATE_LIMIT_RETENTION_MS: i64 = 24 * 3600 * 1000;

/// PostgreSQL-backed auth repository
#[derive(Clone)]
pub struct PgAuthRepository {
    pool: PgPool,
}

impl PgAuthRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Remove rate-limit windows old enough to be irrelevant
    pub async fn cleanup_expired_rate_limits(&self) -> AuthResult<u64> {
        let cutoff_ms = Utc::now().timestamp_millis() - RATE_LIMIT_RETENTION_MS;

        let deleted = sqlx::query("DELETE FROM auth_rate_limits WHERE window_start_ms < $1")
            .bind(cutoff_ms)
            .execute(&self.pool)
            .await?
            .rows_affected();

        tracing::info!(windows_deleted = deleted, "Cleaned up stale rate-limit windows");

        Ok(deleted)
    }
}

// ============================================================================
// Account Repository Implementation
// ============================================================================

impl AccountRepository for PgAuthRepository {
    async fn create(&self, account: &Account, credential: &Credential) -> AuthResult<()> {
        let mut tx = self.pool.begin().await?;

        let inserted = sqlx::query(
            r#"
            INSERT INTO accounts (
                account_id,
                email,
                first_name,
                last_name,
                phone,
                address,
                account_role,
                is_active,
                last_login_at,
                created_at,
                updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            "#,
        )
        .bind(account.account_id.as_uuid())
        .bind(account.email.as_str())
        .bind(&account.first_name)
        .bind(&account.last_name)
        .bind(&account.phone)
        .bind(&account.address)
        .bind(account.role.id())
        .bind(account.is_active)
        .bind(account.last_login_at)
        .bind(account.created_at)
        .bind(account.updated_at)
        .execute(&mut *tx)
        .await;

        if let Err(e) = inserted {
            if is_unique_violation(&e) {
                return Err(AuthError::DuplicateEmail);
            }
            return Err(e.into());
        }

        sqlx::query(
            r#"
            INSERT INTO credentials (
                account_id,
                password_hash,
                failed_attempts,
                last_failed_at,
                lock_until,
                created_at,
                updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(credential.account_id.as_uuid())
        .bind(credential.password_hash.as_str())
        .bind(credential.failed_attempts as i16)
        .bind(credential.last_failed_at)
        .bind(credential.lock_until)
        .bind(credential.created_at)
        .bind(credential.updated_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(())
    }

    async fn find_by_id(&self, account_id: &AccountId) -> AuthResult<Option<Account>> {
        let row = sqlx::query_as::<_, AccountRow>(
            r#"
            SELECT
                account_id,
                email,
                first_name,
                last_name,
                phone,
                address,
                account_role,
                is_active,
                last_login_at,
                created_at,
                updated_at
            FROM accounts
            WHERE account_id = $1
            "#,
        )
        .bind(account_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| r.into_account()).transpose()
    }

    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<Account>> {
        // Emails are stored in canonical lowercase form
        let row = sqlx::query_as::<_, AccountRow>(
            r#"
            SELECT
                account_id,
                email,
                first_name,
                last_name,
                phone,
                address,
                account_role,
                is_active,
                last_login_at,
                created_at,
                updated_at
            FROM accounts
            WHERE email = $1
            "#,
        )
        .bind(email.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| r.into_account()).transpose()
    }

    async fn exists_by_email(&self, email: &Email) -> AuthResult<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM accounts WHERE email = $1)",
        )
        .bind(email.as_str())
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn update_profile(&self, account: &Account) -> AuthResult<()> {
        sqlx::query(
            r#"
            UPDATE accounts SET
                first_name = $2,
                last_name = $3,
                phone = $4,
                address = $5,
                updated_at = $6
            WHERE account_id = $1
            "#,
        )
        .bind(account.account_id.as_uuid())
        .bind(&account.first_name)
        .bind(&account.last_name)
        .bind(&account.phone)
        .bind(&account.address)
        .bind(account.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn update_role(&self, account: &Account) -> AuthResult<()> {
        sqlx::query(
            r#"
            UPDATE accounts SET
                account_role = $2,
                updated_at = $3
            WHERE account_id = $1
            "#,
        )
        .bind(account.account_id.as_uuid())
        .bind(account.role.id())
        .bind(account.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn record_login(&self, account: &Account) -> AuthResult<()> {
        sqlx::query(
            r#"
            UPDATE accounts SET
                last_login_at = $2,
                updated_at = $3
            WHERE account_id = $1
            "#,
        )
        .bind(account.account_id.as_uuid())
        .bind(account.last_login_at)
        .bind(account.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

// ============================================================================
// Credential Repository Implementation
// ============================================================================

impl CredentialRepository for PgAuthRepository {
    async fn find_by_account_id(&self, account_id: &AccountId) -> AuthResult<Option<Credential>> {
        let row = sqlx::query_as::<_, CredentialRow>(
            r#"
            SELECT
                account_id,
                password_hash,
                failed_attempts,
                last_failed_at,
                lock_until,
                created_at,
                updated_at
            FROM credentials
            WHERE account_id = $1
            "#,
        )
        .bind(account_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| r.into_credential()).transpose()
    }

    async fn record_failure(&self, account_id: &AccountId) -> AuthResult<Credential> {
        // One atomic read-modify-write. Concurrent failures each take a
        // row lock in turn, so the threshold cannot be raced past.
        let now = Utc::now();
        let lock_deadline = now + chrono::Duration::minutes(Credential::LOCKOUT_MINUTES);

        let row = sqlx::query_as::<_, CredentialRow>(
            r#"
            UPDATE credentials SET
                failed_attempts = CASE
                    WHEN failed_attempts + 1 >= $2 THEN 0
                    ELSE failed_attempts + 1
                END,
                lock_until = CASE
                    WHEN failed_attempts + 1 >= $2 THEN $3
                    ELSE lock_until
                END,
                last_failed_at = $4,
                updated_at = $4
            WHERE account_id = $1
            RETURNING
                account_id,
                password_hash,
                failed_attempts,
                last_failed_at,
                lock_until,
                created_at,
                updated_at
            "#,
        )
        .bind(account_id.as_uuid())
        .bind(Credential::MAX_FAILED_ATTEMPTS as i16)
        .bind(lock_deadline)
        .bind(now)
        .fetch_optional(&self.pool)
        .await?;

        row.ok_or(AuthError::AccountNotFound)?.into_credential()
    }

    async fn reset_failures(&self, account_id: &AccountId) -> AuthResult<()> {
        sqlx::query(
            r#"
            UPDATE credentials SET
                failed_attempts = 0,
                last_failed_at = NULL,
                lock_until = NULL,
                updated_at = $2
            WHERE account_id = $1
            "#,
        )
        .bind(account_id.as_uuid())
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

// ============================================================================
// Rate Limit Repository Implementation
// ============================================================================

impl RateLimitRepository for PgAuthRepository {
    async fn check(&self, key: &str, config: &RateLimitConfig) -> AuthResult<RateLimitResult> {
        let now_ms = Utc::now().timestamp_millis();
        let window_ms = config.window_ms();
        let window_start = (now_ms / window_ms) * window_ms;

        let row = sqlx::query_as::<_, (i32,)>(
            r#"
            INSERT INTO auth_rate_limits (rate_key, window_start_ms, request_count)
            VALUES ($1, $2, 1)
            ON CONFLICT (rate_key, window_start_ms)
            DO UPDATE SET request_count = auth_rate_limits.request_count + 1
            RETURNING request_count
            "#,
        )
        .bind(key)
        .bind(window_start)
        .fetch_one(&self.pool)
        .await?;

        let count = row.0 as u32;
        let allowed = count <= config.max_requests;

        if !allowed {
            tracing::warn!(
                key = %key,
                count = count,
                max = config.max_requests,
                "Rate limit exceeded"
            );
        }

        Ok(RateLimitResult {
            allowed,
            remaining: config.max_requests.saturating_sub(count),
            reset_at_ms: window_start + window_ms,
        })
    }
}

// ============================================================================
// Helpers
// ============================================================================

fn is_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .is_some_and(|db_err| db_err.is_unique_violation())
}

// ============================================================================
// Row Types for sqlx mapping
// ============================================================================

#[derive(sqlx::FromRow)]
struct AccountRow {
    account_id: Uuid,
    email: String,
    first_name: String,
    last_name: String,
    phone: Option<String>,
    address: Option<String>,
    account_role: i16,
    is_active: bool,
    last_login_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl AccountRow {
    fn into_account(self) -> AuthResult<Account> {
        let role = AccountRole::from_id(self.account_role).ok_or_else(|| {
            AuthError::Internal(format!("Invalid account_role id: {}", self.account_role))
        })?;

        Ok(Account {
            account_id: AccountId::from_uuid(self.account_id),
            email: Email::from_db(self.email),
            first_name: self.first_name,
            last_name: self.last_name,
            phone: self.phone,
            address: self.address,
            role,
            is_active: self.is_active,
            last_login_at: self.last_login_at,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct CredentialRow {
    account_id: Uuid,
    password_hash: String,
    failed_attempts: i16,
    last_failed_at: Option<DateTime<Utc>>,
    lock_until: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl CredentialRow {
    fn into_credential(self) -> AuthResult<Credential> {
        Ok(Credential {
            account_id: AccountId::from_uuid(self.account_id),
            password_hash: PasswordHash::from_phc_string(self.password_hash)?,
            failed_attempts: self.failed_attempts.max(0) as u16,
            last_failed_at: self.last_failed_at,
            lock_until: self.lock_until,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}
