//! Password hashing adapter backed by bcrypt.

use tracing::debug;

use crate::domain::ports::{PasswordHasher, PasswordHasherError};
use crate::domain::{PasswordHash, PlainPassword};

/// Default bcrypt cost factor.
///
/// High enough for interactive sign-in latency to stay acceptable while
/// keeping offline guessing expensive.
pub const DEFAULT_BCRYPT_COST: u32 = 10;

/// Bcrypt-backed implementation of the `PasswordHasher` port.
#[derive(Debug, Clone)]
pub struct BcryptPasswordHasher {
    cost: u32,
}

impl BcryptPasswordHasher {
    /// Create a hasher with an explicit cost factor.
    #[must_use]
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }
}

impl Default for BcryptPasswordHasher {
    fn default() -> Self {
        Self::new(DEFAULT_BCRYPT_COST)
    }
}

impl PasswordHasher for BcryptPasswordHasher {
    fn hash(&self, password: &PlainPassword) -> Result<PasswordHash, PasswordHasherError> {
        let encoded = bcrypt::hash(password.expose(), self.cost)
            .map_err(|err| PasswordHasherError::hashing(err.to_string()))?;
        PasswordHash::new(encoded).map_err(|err| PasswordHasherError::hashing(err.to_string()))
    }

    fn verify(&self, password: &str, hash: &PasswordHash) -> Result<bool, PasswordHasherError> {
        match bcrypt::verify(password, hash.expose()) {
            Ok(matches) => Ok(matches),
            Err(err) => {
                // An unparseable stored hash is a data problem, not a wrong
                // password; let the caller surface it as an internal error.
                debug!(error = %err, "bcrypt verification failed");
                Err(PasswordHasherError::hashing(err.to_string()))
            }
        }
    }
}
