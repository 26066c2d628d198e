//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations:
//! - Password hashing (Argon2id, NIST SP 800-63B compliant)
//! - Cryptographic utilities (random secrets, Base64)
//! - Client identification (IP / user agent extraction)
//! - Cookie parsing
//! - Rate limiting primitives

pub mod client;
pub mod cookie;
pub mod crypto;
pub mod password;
pub mod rate_limit;
