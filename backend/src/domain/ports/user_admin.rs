//! Driving ports for user administration and user reads.

use async_trait::async_trait;

use crate::domain::{Error, Requester, User, UserId};

/// Admin-only user lifecycle mutations.
///
/// Every method re-runs the admin authorization check before touching the
/// target; there is no caching between calls.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserAdminCommand: Send + Sync {
    /// Block a user from signing in.
    async fn block(&self, requester: &Requester, target: &UserId) -> Result<User, Error>;

    /// Lift a block.
    async fn unblock(&self, requester: &Requester, target: &UserId) -> Result<User, Error>;

    /// Grant administrator privileges.
    async fn grant_admin(&self, requester: &Requester, target: &UserId) -> Result<User, Error>;

    /// Revoke administrator privileges.
    async fn revoke_admin(&self, requester: &Requester, target: &UserId) -> Result<User, Error>;

    /// Delete a user account entirely.
    async fn delete_user(&self, requester: &Requester, target: &UserId) -> Result<(), Error>;
}

/// Read access to user records.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UsersQuery: Send + Sync {
    /// List every user; restricted to administrators.
    async fn list_users(&self, requester: &Requester) -> Result<Vec<User>, Error>;

    /// Fetch a single user, e.g. the session subject.
    async fn find_user(&self, id: &UserId) -> Result<User, Error>;
}
