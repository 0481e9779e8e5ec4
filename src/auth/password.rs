//! Salted password hashing.
//!
//! Hashes are hex-encoded SHA-256 digests of the process-wide salt followed
//! by the password. They depend on nothing else, so a rotated password only
//! needs a new hash written to the user row.

use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

#[derive(Clone)]
pub struct PasswordHasher {
    salt: String,
}

impl PasswordHasher {
    pub fn new(salt: impl Into<String>) -> Self {
        Self { salt: salt.into() }
    }

    pub fn hash(&self, password: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.salt.as_bytes());
        hasher.update(password.as_bytes());
        hex::encode(hasher.finalize())
    }

    /// Compares in constant time with respect to the hash contents
    pub fn verify(&self, password: &str, password_hash: &str) -> bool {
        let candidate = self.hash(password);
        candidate.as_bytes().ct_eq(password_hash.as_bytes()).into()
    }
}
