//! Salted, iterated SHA-256 password hashing.
//!
//! Encoded form: `sha256$<iterations>$<salt>$<digest>`, with salt and digest
//! in unpadded standard base64.

use base64::{engine::general_purpose::STANDARD_NO_PAD, Engine};
use sha2::{Digest, Sha256};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

const SCHEME: &str = "sha256";
/// Iteration count used by `hash_password`.
pub const DEFAULT_ITERATIONS: u32 = 100_000;

/// Stored hash could not be decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PasswordHashError {
    UnknownScheme(String),
    Malformed(&'static str),
}

impl Display for PasswordHashError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownScheme(scheme) => write!(f, "unknown password hash scheme `{scheme}`"),
            Self::Malformed(reason) => write!(f, "malformed password hash: {reason}"),
        }
    }
}

impl Error for PasswordHashError {}

/// Hashes `plain` with a fresh random salt and the default iteration count.
pub fn hash_password(plain: &str) -> String {
    hash_password_with_iterations(plain, DEFAULT_ITERATIONS)
}

/// Hashes `plain` with a fresh random salt and `iterations` rounds.
///
/// A zero iteration count is raised to one.
pub fn hash_password_with_iterations(plain: &str, iterations: u32) -> String {
    let iterations = iterations.max(1);
    let salt = Uuid::new_v4().into_bytes();
    let digest = derive(plain.as_bytes(), &salt, iterations);
    format!(
        "{SCHEME}${iterations}${}${}",
        STANDARD_NO_PAD.encode(salt),
        STANDARD_NO_PAD.encode(digest)
    )
}

/// Checks `plain` against an encoded hash produced by `hash_password`.
///
/// Returns `Ok(false)` on mismatch and `Err` only when `encoded` itself is
/// unreadable.
pub fn verify_password(plain: &str, encoded: &str) -> Result<bool, PasswordHashError> {
    let mut parts = encoded.split('$');
    let scheme = parts.next().unwrap_or_default();
    if scheme != SCHEME {
        return Err(PasswordHashError::UnknownScheme(scheme.to_string()));
    }

    let iterations = parts
        .next()
        .and_then(|value| value.parse::<u32>().ok())
        .filter(|value| *value > 0)
        .ok_or(PasswordHashError::Malformed("invalid iteration count"))?;
    let salt = decode_part(parts.next(), "invalid salt")?;
    let expected = decode_part(parts.next(), "invalid digest")?;
    if parts.next().is_some() {
        return Err(PasswordHashError::Malformed("unexpected trailing segment"));
    }

    let actual = derive(plain.as_bytes(), &salt, iterations);
    Ok(constant_time_eq(&actual, &expected))
}

fn decode_part(part: Option<&str>, reason: &'static str) -> Result<Vec<u8>, PasswordHashError> {
    part.filter(|value| !value.is_empty())
        .and_then(|value| STANDARD_NO_PAD.decode(value).ok())
        .ok_or(PasswordHashError::Malformed(reason))
}

fn derive(plain: &[u8], salt: &[u8], iterations: u32) -> Vec<u8> {
    let mut hasher = Sha256::new();
    hasher.update(salt);
    hasher.update(plain);
    let mut digest = hasher.finalize();

    for _ in 1..iterations {
        let mut hasher = Sha256::new();
        hasher.update(digest);
        hasher.update(salt);
        digest = hasher.finalize();
    }

    digest.to_vec()
}

fn constant_time_eq(left: &[u8], right: &[u8]) -> bool {
    if left.len() != right.len() {
        return false;
    }
    left.iter()
        .zip(right)
        .fold(0u8, |acc, (a, b)| acc | (a ^ b))
        == 0
}
