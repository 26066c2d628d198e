//! Token Issuer
//!
//! Creates and verifies the signed, time-limited bearer tokens that
//! prove identity between requests. Stateless: the only thing trusted
//! here is the configured secret. Account state (exists, active,
//! locked) is the authenticator's job, re-checked per request.

use chrono::Utc;
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode,
    errors::ErrorKind as JwtErrorKind,
};
use serde::{Deserialize, Serialize};

use crate::application::config::AuthConfig;
use crate::domain::entity::account::Account;
use crate::domain::value_object::account_id::AccountId;
use crate::error::{AuthError, AuthResult};

/// Clock skew tolerance in seconds
const LEEWAY_SECS: u64 = 30;

/// Claims carried by a bearer token
///
/// The embedded email/role identify the account for logging and
/// lookups only; authorization always uses the freshly loaded account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Account UUID
    pub sub: String,
    /// Email at issuance time
    pub email: String,
    /// Role code at issuance time
    pub role: String,
    /// Issued-at (Unix seconds)
    pub iat: i64,
    /// Not valid before (Unix seconds)
    pub nbf: i64,
    /// Expiry (Unix seconds)
    pub exp: i64,
}

impl TokenClaims {
    /// Parse the subject back into a typed account ID
    pub fn account_id(&self) -> AuthResult<AccountId> {
        self.sub
            .parse::<uuid::Uuid>()
            .map(AccountId::from_uuid)
            .map_err(|_| AuthError::InvalidToken)
    }
}

/// Issues and verifies bearer tokens (HS256)
#[derive(Clone)]
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl_secs: i64,
}

impl TokenIssuer {
    /// Create an issuer from configuration
    pub fn new(config: &AuthConfig) -> AuthResult<Self> {
        if config.token_secret.is_empty() {
            return Err(AuthError::Internal(
                "Token secret is not configured".to_string(),
            ));
        }
        if config.token_secret.len() < 32 {
            tracing::warn!("Token secret is shorter than recommended (32 bytes)");
        }

        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = LEEWAY_SECS;
        validation.validate_nbf = true;
        validation.validate_aud = false;

        Ok(Self {
            encoding_key: EncodingKey::from_secret(config.token_secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.token_secret.as_bytes()),
            validation,
            ttl_secs: config.token_ttl_secs(),
        })
    }

    /// Issue a token for an account with the configured TTL
    pub fn issue(&self, account: &Account) -> AuthResult<String> {
        self.issue_with_ttl(account, self.ttl_secs)
    }

    /// Issue a token with an explicit lifetime in seconds
    pub fn issue_with_ttl(&self, account: &Account, ttl_secs: i64) -> AuthResult<String> {
        let now = Utc::now().timestamp();

        let claims = TokenClaims {
            sub: account.account_id.to_string(),
            email: account.email.to_string(),
            role: account.role.code().to_string(),
            iat: now,
            nbf: now,
            exp: now + ttl_secs,
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AuthError::Internal(format!("Failed to sign token: {}", e)))
    }

    /// Verify a token and return its claims
    ///
    /// Distinguishes a merely expired token from an invalid one so the
    /// caller can answer precisely. A token that is not yet valid, is
    /// malformed, or carries a wrong signature is invalid.
    pub fn verify(&self, token: &str) -> AuthResult<TokenClaims> {
        decode::<TokenClaims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                JwtErrorKind::ExpiredSignature => AuthError::ExpiredToken,
                _ => AuthError::InvalidToken,
            })
    }
}

impl std::fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenIssuer")
            .field("algorithm", &Algorithm::HS256)
            .field("ttl_secs", &self.ttl_secs)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_object::{account_role::AccountRole, email::Email};

    fn issuer_with_secret(secret: &str) -> TokenIssuer {
        TokenIssuer::new(&AuthConfig::from_secret(secret)).unwrap()
    }

    fn issuer() -> TokenIssuer {
        issuer_with_secret("test-secret-key-that-is-long-enough")
    }

    fn account() -> Account {
        Account::new(
            Email::new("carol@example.com").unwrap(),
            "Carol".to_string(),
            "Reed".to_string(),
            None,
            AccountRole::Admin,
        )
    }

    #[test]
    fn test_issue_and_verify() {
        let issuer = issuer();
        let account = account();

        let token = issuer.issue(&account).unwrap();
        let claims = issuer.verify(&token).unwrap();

        assert_eq!(claims.sub, account.account_id.to_string());
        assert_eq!(claims.email, "carol@example.com");
        assert_eq!(claims.role, "admin");
        assert_eq!(claims.account_id().unwrap(), account.account_id);
        assert_eq!(claims.exp - claims.iat, AuthConfig::default().token_ttl_secs());
    }

    #[test]
    fn test_expired_token_is_expired_not_invalid() {
        let issuer = issuer();
        let token = issuer.issue_with_ttl(&account(), -3600).unwrap();

        assert!(matches!(issuer.verify(&token), Err(AuthError::ExpiredToken)));
    }

    #[test]
    fn test_garbage_token_is_invalid() {
        let issuer = issuer();
        assert!(matches!(
            issuer.verify("not.a.token"),
            Err(AuthError::InvalidToken)
        ));
        assert!(matches!(issuer.verify(""), Err(AuthError::InvalidToken)));
    }

    #[test]
    fn test_wrong_secret_is_invalid() {
        let signer = issuer_with_secret("secret-one-for-testing-purposes!");
        let verifier = issuer_with_secret("secret-two-for-testing-purposes!");

        let token = signer.issue(&account()).unwrap();
        assert!(matches!(
            verifier.verify(&token),
            Err(AuthError::InvalidToken)
        ));
    }

    #[test]
    fn test_tampered_token_is_invalid() {
        let issuer = issuer();
        let mut token = issuer.issue(&account()).unwrap();

        // Flip a character in the payload segment
        let dot = token.find('.').unwrap() + 1;
        let original = token.as_bytes()[dot];
        let replacement = if original == b'A' { b'B' } else { b'A' };
        token.replace_range(dot..dot + 1, &(replacement as char).to_string());

        assert!(matches!(issuer.verify(&token), Err(AuthError::InvalidToken)));
    }

    #[test]
    fn test_empty_secret_rejected() {
        assert!(TokenIssuer::new(&AuthConfig::default()).is_err());
    }
}
