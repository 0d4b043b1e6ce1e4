//! Authorization guard shared by every mutating use-case.
//!
//! The guard receives a requester id together with an externally supplied
//! "is authenticated" flag (derived from the session by the inbound
//! adapter), fetches the requester, and decides whether the action may
//! proceed. The check runs on every call; nothing is cached.

use std::sync::Arc;

use crate::domain::ports::{UserRepository, UserRepositoryError};
use crate::domain::{Collection, Error, User, UserId};

/// The identity attempting an operation, as the inbound adapter saw it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Requester {
    id: UserId,
    authenticated: bool,
}

impl Requester {
    /// A requester backed by a live authenticated session.
    #[must_use]
    pub fn authenticated(id: UserId) -> Self {
        Self {
            id,
            authenticated: true,
        }
    }

    /// A requester whose authentication could not be established.
    ///
    /// Exists so callers can thread a known-bad context through the guard
    /// and get the uniform NotAuthorized answer.
    #[must_use]
    pub fn unauthenticated(id: UserId) -> Self {
        Self {
            id,
            authenticated: false,
        }
    }

    /// Claimed user identifier.
    #[must_use]
    pub fn id(&self) -> &UserId {
        &self.id
    }

    /// Whether the inbound adapter authenticated this requester.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }
}

/// Decides whether a requester may mutate a target.
///
/// All failure paths collapse into a NotAuthorized error so callers cannot
/// distinguish "no such user" from "not permitted".
#[derive(Clone)]
pub struct AccessGuard<U> {
    users: Arc<U>,
}

fn denied() -> Error {
    Error::not_authorized("not authorized")
}

fn map_user_repository_error(error: UserRepositoryError) -> Error {
    match error {
        UserRepositoryError::Connection { message } => Error::service_unavailable(message),
        UserRepositoryError::Query { message } => Error::internal(message),
        UserRepositoryError::DuplicateEmail { email } => {
            Error::internal(format!("unexpected duplicate email '{email}' during lookup"))
        }
    }
}

impl<U> AccessGuard<U>
where
    U: UserRepository,
{
    /// Create a guard over the given user repository.
    pub fn new(users: Arc<U>) -> Self {
        Self { users }
    }

    async fn fetch_requester(&self, requester: &Requester) -> Result<User, Error> {
        if !requester.is_authenticated() {
            return Err(denied());
        }
        let user = self
            .users
            .find_by_id(requester.id())
            .await
            .map_err(map_user_repository_error)?;
        match user {
            Some(user) if !user.blocked() => Ok(user),
            _ => Err(denied()),
        }
    }

    /// Permit any known, unblocked, authenticated requester.
    pub async fn require_known(&self, requester: &Requester) -> Result<User, Error> {
        self.fetch_requester(requester).await
    }

    /// Permit only authenticated administrators.
    pub async fn require_admin(&self, requester: &Requester) -> Result<User, Error> {
        let user = self.fetch_requester(requester).await?;
        if user.is_admin() { Ok(user) } else { Err(denied()) }
    }

    /// Permit the collection owner or an administrator.
    pub async fn require_collection_access(
        &self,
        requester: &Requester,
        collection: &Collection,
    ) -> Result<User, Error> {
        let user = self.fetch_requester(requester).await?;
        if user.is_admin() || collection.owner_id() == user.id() {
            Ok(user)
        } else {
            Err(denied())
        }
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for the authorization guard.
    use super::*;
    use crate::domain::ports::MockUserRepository;
    use crate::domain::{
        CollectionId, CollectionName, Email, ErrorCode, Fullname, PasswordHash, Topic,
    };
    use rstest::rstest;

    fn user(id: UserId, admin: bool, blocked: bool) -> User {
        User::from_parts(
            id,
            Email::new("ada@example.com").expect("valid email"),
            Fullname::new("Ada Lovelace").expect("valid fullname"),
            blocked,
            admin,
            PasswordHash::new("$2b$10$abcdefg").expect("valid hash"),
        )
    }

    fn collection(owner: UserId) -> Collection {
        Collection::new(
            CollectionId::random(),
            CollectionName::new("Stamps").expect("valid name"),
            owner,
            Topic::new("Philately").expect("valid topic"),
            None,
        )
    }

    fn guard_with(repo: MockUserRepository) -> AccessGuard<MockUserRepository> {
        AccessGuard::new(Arc::new(repo))
    }

    #[tokio::test]
    async fn unauthenticated_requesters_are_denied_without_lookup() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_id().times(0);
        let guard = guard_with(repo);

        let err = guard
            .require_known(&Requester::unauthenticated(UserId::random()))
            .await
            .expect_err("denied");
        assert_eq!(err.code(), ErrorCode::NotAuthorized);
    }

    #[tokio::test]
    async fn unknown_requesters_are_denied() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_id().times(1).return_once(|_| Ok(None));
        let guard = guard_with(repo);

        let err = guard
            .require_admin(&Requester::authenticated(UserId::random()))
            .await
            .expect_err("denied");
        assert_eq!(err.code(), ErrorCode::NotAuthorized);
    }

    #[rstest]
    #[case(false, false)]
    #[case(false, true)]
    #[case(true, true)]
    #[tokio::test]
    async fn only_unblocked_admins_pass_the_admin_check(
        #[case] admin: bool,
        #[case] blocked: bool,
    ) {
        let id = UserId::random();
        let fetched = user(id, admin, blocked);
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_id()
            .times(1)
            .return_once(move |_| Ok(Some(fetched)));
        let guard = guard_with(repo);

        let err = guard
            .require_admin(&Requester::authenticated(id))
            .await
            .expect_err("denied");
        assert_eq!(err.code(), ErrorCode::NotAuthorized);
    }

    #[tokio::test]
    async fn admins_pass_the_admin_check() {
        let id = UserId::random();
        let fetched = user(id, true, false);
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_id()
            .times(1)
            .return_once(move |_| Ok(Some(fetched)));
        let guard = guard_with(repo);

        let admin = guard
            .require_admin(&Requester::authenticated(id))
            .await
            .expect("admin passes");
        assert!(admin.is_admin());
    }

    #[tokio::test]
    async fn owners_may_mutate_their_collection() {
        let id = UserId::random();
        let fetched = user(id, false, false);
        let target = collection(id);
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_id()
            .times(1)
            .return_once(move |_| Ok(Some(fetched)));
        let guard = guard_with(repo);

        guard
            .require_collection_access(&Requester::authenticated(id), &target)
            .await
            .expect("owner passes");
    }

    #[tokio::test]
    async fn admins_may_mutate_any_collection() {
        let id = UserId::random();
        let fetched = user(id, true, false);
        let target = collection(UserId::random());
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_id()
            .times(1)
            .return_once(move |_| Ok(Some(fetched)));
        let guard = guard_with(repo);

        guard
            .require_collection_access(&Requester::authenticated(id), &target)
            .await
            .expect("admin passes");
    }

    #[tokio::test]
    async fn strangers_may_not_mutate_a_collection() {
        let id = UserId::random();
        let fetched = user(id, false, false);
        let target = collection(UserId::random());
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_id()
            .times(1)
            .return_once(move |_| Ok(Some(fetched)));
        let guard = guard_with(repo);

        let err = guard
            .require_collection_access(&Requester::authenticated(id), &target)
            .await
            .expect_err("denied");
        assert_eq!(err.code(), ErrorCode::NotAuthorized);
    }

    #[tokio::test]
    async fn repository_failures_surface_as_service_errors() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_id()
            .times(1)
            .return_once(|_| Err(UserRepositoryError::connection("database unavailable")));
        let guard = guard_with(repo);

        let err = guard
            .require_known(&Requester::authenticated(UserId::random()))
            .await
            .expect_err("failure surfaces");
        assert_eq!(err.code(), ErrorCode::ServiceUnavailable);
    }
}
