//! Salted password digests.

use sha2::{Digest, Sha256};
use uuid::Uuid;

pub fn new_salt() -> String {
    Uuid::new_v4().simple().to_string()
}

/// Hex-encoded SHA-256 of `salt` followed by `password`.
pub fn digest(salt: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}

pub fn verify(salt: &str, password: &str, expected: &str) -> bool {
    digest(salt, password) == expected
}
