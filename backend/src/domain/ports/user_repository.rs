//! Driven port for user persistence.

use async_trait::async_trait;

use super::define_port_error;
use crate::domain::{Email, User, UserId};

define_port_error! {
    /// Persistence errors raised by [`UserRepository`] adapters.
    pub enum UserRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
        /// Another account already uses this email.
        DuplicateEmail { email: String } => "email '{email}' is already registered",
    }
}

/// Persistence port for user aggregates.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new user record.
    ///
    /// Fails with [`UserRepositoryError::DuplicateEmail`] when the email is
    /// already taken.
    async fn insert(&self, user: &User) -> Result<(), UserRepositoryError>;

    /// Replace an existing user record.
    async fn update(&self, user: &User) -> Result<(), UserRepositoryError>;

    /// Fetch a user by identifier.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserRepositoryError>;

    /// Fetch a user by email address.
    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, UserRepositoryError>;

    /// Delete a user; returns whether a record was removed.
    ///
    /// Owned collections and authored comments cascade in the backing store.
    async fn delete(&self, id: &UserId) -> Result<bool, UserRepositoryError>;

    /// List every user, ordered by email.
    async fn list(&self) -> Result<Vec<User>, UserRepositoryError>;
}
