//! User lifecycle use-cases: sign-up, sign-in, and admin mutations.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::info;

use crate::domain::access::AccessGuard;
use crate::domain::ports::{
    AccountCommand, LoginService, PasswordHasher, PasswordHasherError, SignUpRequest,
    UserAdminCommand, UserRepository, UserRepositoryError, UsersQuery,
};
use crate::domain::{Error, Requester, SignInCredentials, User, UserId};

/// User lifecycle service implementing the account, login, admin, and query
/// driving ports.
#[derive(Clone)]
pub struct UserService<U, H> {
    users: Arc<U>,
    hasher: Arc<H>,
    guard: AccessGuard<U>,
}

impl<U, H> UserService<U, H>
where
    U: UserRepository,
{
    /// Create a new service over the given repository and hasher.
    pub fn new(users: Arc<U>, hasher: Arc<H>) -> Self {
        let guard = AccessGuard::new(Arc::clone(&users));
        Self {
            users,
            hasher,
            guard,
        }
    }
}

fn map_repository_error(error: UserRepositoryError) -> Error {
    match error {
        UserRepositoryError::Connection { message } => Error::service_unavailable(message),
        UserRepositoryError::Query { message } => Error::internal(message),
        UserRepositoryError::DuplicateEmail { email } => {
            Error::invalid_request("email is already registered")
                .with_details(json!({ "field": "email", "code": "email_taken", "email": email }))
        }
    }
}

fn map_hasher_error(error: PasswordHasherError) -> Error {
    match error {
        PasswordHasherError::Hashing { message } => Error::internal(message),
    }
}

fn invalid_credentials() -> Error {
    Error::invalid_credentials("invalid email or password")
}

impl<U, H> UserService<U, H>
where
    U: UserRepository,
    H: PasswordHasher,
{
    async fn fetch_target(&self, target: &UserId) -> Result<User, Error> {
        self.users
            .find_by_id(target)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| Error::not_found("no such user"))
    }

    /// Run an admin-gated mutation of a target user.
    async fn admin_mutation(
        &self,
        requester: &Requester,
        target: &UserId,
        mutate: impl FnOnce(User) -> User + Send,
    ) -> Result<User, Error> {
        self.guard.require_admin(requester).await?;
        let user = self.fetch_target(target).await?;
        let mutated = mutate(user);
        self.users
            .update(&mutated)
            .await
            .map_err(map_repository_error)?;
        Ok(mutated)
    }
}

#[async_trait]
impl<U, H> AccountCommand for UserService<U, H>
where
    U: UserRepository,
    H: PasswordHasher,
{
    async fn sign_up(&self, request: SignUpRequest) -> Result<User, Error> {
        let password_hash = self
            .hasher
            .hash(&request.password)
            .map_err(map_hasher_error)?;
        let user = User::new(
            UserId::random(),
            request.email,
            request.fullname,
            password_hash,
        );
        self.users.insert(&user).await.map_err(map_repository_error)?;
        info!(user_id = %user.id(), "account created");
        Ok(user)
    }
}

#[async_trait]
impl<U, H> LoginService for UserService<U, H>
where
    U: UserRepository,
    H: PasswordHasher,
{
    async fn sign_in(&self, credentials: &SignInCredentials) -> Result<User, Error> {
        // A missing account and a wrong password must be indistinguishable.
        let user = self
            .users
            .find_by_email(credentials.email())
            .await
            .map_err(map_repository_error)?
            .ok_or_else(invalid_credentials)?;
        let matches = self
            .hasher
            .verify(credentials.password(), user.password_hash())
            .map_err(map_hasher_error)?;
        if !matches {
            return Err(invalid_credentials());
        }
        if user.blocked() {
            return Err(Error::not_authorized("account is blocked"));
        }
        Ok(user)
    }
}

#[async_trait]
impl<U, H> UserAdminCommand for UserService<U, H>
where
    U: UserRepository,
    H: PasswordHasher,
{
    async fn block(&self, requester: &Requester, target: &UserId) -> Result<User, Error> {
        self.admin_mutation(requester, target, |user| user.with_blocked(true))
            .await
    }

    async fn unblock(&self, requester: &Requester, target: &UserId) -> Result<User, Error> {
        self.admin_mutation(requester, target, |user| user.with_blocked(false))
            .await
    }

    async fn grant_admin(&self, requester: &Requester, target: &UserId) -> Result<User, Error> {
        self.admin_mutation(requester, target, |user| user.with_admin(true))
            .await
    }

    async fn revoke_admin(&self, requester: &Requester, target: &UserId) -> Result<User, Error> {
        self.admin_mutation(requester, target, |user| user.with_admin(false))
            .await
    }

    async fn delete_user(&self, requester: &Requester, target: &UserId) -> Result<(), Error> {
        self.guard.require_admin(requester).await?;
        let removed = self
            .users
            .delete(target)
            .await
            .map_err(map_repository_error)?;
        if !removed {
            return Err(Error::not_found("no such user"));
        }
        info!(user_id = %target, "account deleted");
        Ok(())
    }
}

#[async_trait]
impl<U, H> UsersQuery for UserService<U, H>
where
    U: UserRepository,
    H: PasswordHasher,
{
    async fn list_users(&self, requester: &Requester) -> Result<Vec<User>, Error> {
        self.guard.require_admin(requester).await?;
        self.users.list().await.map_err(map_repository_error)
    }

    async fn find_user(&self, id: &UserId) -> Result<User, Error> {
        self.fetch_target(id).await
    }
}
