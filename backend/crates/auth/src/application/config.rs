//! Application Configuration
//!
//! Configuration for the Auth application layer. Built once at startup
//! and passed by reference into handlers and middleware; there is no
//! ambient global.

use std::time::Duration;

use platform::rate_limit::RateLimitConfig;

/// Auth application configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Secret for signing bearer tokens (HS256)
    pub token_secret: String,
    /// Token lifetime (7 days)
    pub token_ttl: Duration,
    /// Cookie name checked as a token fallback for older clients
    pub token_cookie_name: String,
    /// Password pepper (optional, application-wide secret)
    pub password_pepper: Option<Vec<u8>>,
    /// Per-IP limit applied to login/register
    pub credential_rate_limit: RateLimitConfig,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            token_secret: String::new(),
            token_ttl: Duration::from_secs(7 * 24 * 3600), // 1 week
            token_cookie_name: "token".to_string(),
            password_pepper: None,
            credential_rate_limit: RateLimitConfig::new(10, 15 * 60),
        }
    }
}

impl AuthConfig {
    /// Create config with the given token secret
    pub fn from_secret(secret: impl Into<String>) -> Self {
        Self {
            token_secret: secret.into(),
            ..Default::default()
        }
    }

    /// Create config with a random token secret (for development)
    ///
    /// Every restart invalidates all outstanding tokens.
    pub fn development() -> Self {
        let secret = platform::crypto::to_base64(&platform::crypto::random_bytes(32));
        Self::from_secret(secret)
    }

    /// Get token TTL in seconds
    pub fn token_ttl_secs(&self) -> i64 {
        self.token_ttl.as_secs() as i64
    }

    /// Get password pepper as slice
    pub fn pepper(&self) -> Option<&[u8]> {
        self.password_pepper.as_deref()
    }
}
