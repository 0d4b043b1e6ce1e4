//! Driving ports for account creation and sign-in.
//!
//! Inbound adapters call these to run the user-facing authentication
//! use-cases without knowing the backing infrastructure.

use async_trait::async_trait;

use crate::domain::{Email, Error, Fullname, PlainPassword, SignInCredentials, User};

/// Validated sign-up request assembled by the inbound adapter.
#[derive(Debug, Clone)]
pub struct SignUpRequest {
    /// Email the account signs in with; unique across users.
    pub email: Email,
    /// Name shown to other users.
    pub fullname: Fullname,
    /// Raw password that already satisfied the length policy.
    pub password: PlainPassword,
}

/// Domain use-case port for account creation.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountCommand: Send + Sync {
    /// Create an account: hash the password, mint an id, persist.
    async fn sign_up(&self, request: SignUpRequest) -> Result<User, Error>;
}

/// Domain use-case port for authentication.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoginService: Send + Sync {
    /// Validate credentials and return the authenticated user.
    ///
    /// A missing account and a wrong password are indistinguishable to the
    /// caller; both yield InvalidCredentials.
    async fn sign_in(&self, credentials: &SignInCredentials) -> Result<User, Error>;
}
