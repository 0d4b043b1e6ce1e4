//! Driven port for password hashing.

use super::define_port_error;
use crate::domain::{PasswordHash, PlainPassword};

define_port_error! {
    /// Errors raised by [`PasswordHasher`] adapters.
    pub enum PasswordHasherError {
        /// The hashing backend rejected the input or failed internally.
        Hashing { message: String } => "password hashing failed: {message}",
    }
}

/// Hashing port used at sign-up and sign-in.
///
/// Hashing is CPU-bound and fast enough at the configured cost to run inline
/// on the request path, so the port is synchronous.
#[cfg_attr(test, mockall::automock)]
pub trait PasswordHasher: Send + Sync {
    /// Hash a sign-up password.
    fn hash(&self, password: &PlainPassword) -> Result<PasswordHash, PasswordHasherError>;

    /// Verify a sign-in password against a stored hash.
    ///
    /// Returns `Ok(false)` on mismatch; `Err` is reserved for backend
    /// failures such as an unparseable stored hash.
    fn verify(&self, password: &str, hash: &PasswordHash) -> Result<bool, PasswordHasherError>;
}
