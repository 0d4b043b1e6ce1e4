//! PostgreSQL-backed `UserRepository` implementation using Diesel.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{UserRepository, UserRepositoryError};
use crate::domain::{Email, Fullname, PasswordHash, User, UserId};

use super::error_map::{map_diesel_error, map_pool_error};
use super::models::{NewUserRow, UserChangeset, UserRow};
use super::pool::DbPool;
use super::schema::users;

/// Diesel-backed implementation of the `UserRepository` port.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    /// Create a new repository with the given connection pool.
    #[must_use]
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn connection(message: String) -> UserRepositoryError {
    UserRepositoryError::connection(message)
}

fn query(message: String) -> UserRepositoryError {
    UserRepositoryError::query(message)
}

/// Map a write failure, surfacing unique-violations on email as duplicates.
fn map_write_error(error: diesel::result::Error, email: &Email) -> UserRepositoryError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    if let DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) = &error {
        return UserRepositoryError::duplicate_email(email.as_ref());
    }
    map_diesel_error(error, connection, query)
}

/// Convert a database row to a domain user.
///
/// A row that fails domain validation means the table was written outside
/// the application; surface it as a query error rather than panicking.
fn row_to_user(row: UserRow) -> Result<User, UserRepositoryError> {
    let email = Email::new(&row.email)
        .map_err(|err| query(format!("corrupt user row {}: {err}", row.id)))?;
    let fullname = Fullname::new(row.fullname)
        .map_err(|err| query(format!("corrupt user row {}: {err}", row.id)))?;
    let password_hash = PasswordHash::new(row.password_hash)
        .map_err(|err| query(format!("corrupt user row {}: {err}", row.id)))?;
    Ok(User::from_parts(
        UserId::from_uuid(row.id),
        email,
        fullname,
        row.blocked,
        row.is_admin,
        password_hash,
    ))
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn insert(&self, user: &User) -> Result<(), UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(|e| map_pool_error(e, connection))?;
        let row = NewUserRow {
            id: *user.id().as_uuid(),
            email: user.email().as_ref(),
            fullname: user.fullname().as_ref(),
            blocked: user.blocked(),
            is_admin: user.is_admin(),
            password_hash: user.password_hash().expose(),
        };
        diesel::insert_into(users::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|err| map_write_error(err, user.email()))
    }

    async fn update(&self, user: &User) -> Result<(), UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(|e| map_pool_error(e, connection))?;
        let changeset = UserChangeset {
            email: user.email().as_ref(),
            fullname: user.fullname().as_ref(),
            blocked: user.blocked(),
            is_admin: user.is_admin(),
            password_hash: user.password_hash().expose(),
        };
        diesel::update(users::table.find(user.id().as_uuid()))
            .set(&changeset)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|err| map_write_error(err, user.email()))
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(|e| map_pool_error(e, connection))?;
        let row: Option<UserRow> = users::table
            .find(id.as_uuid())
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(|err| map_diesel_error(err, connection, query))?;
        row.map(row_to_user).transpose()
    }

    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(|e| map_pool_error(e, connection))?;
        let row: Option<UserRow> = users::table
            .filter(users::email.eq(email.as_ref()))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(|err| map_diesel_error(err, connection, query))?;
        row.map(row_to_user).transpose()
    }

    async fn delete(&self, id: &UserId) -> Result<bool, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(|e| map_pool_error(e, connection))?;
        let deleted = diesel::delete(users::table.find(id.as_uuid()))
            .execute(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, connection, query))?;
        Ok(deleted > 0)
    }

    async fn list(&self) -> Result<Vec<User>, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(|e| map_pool_error(e, connection))?;
        let rows: Vec<UserRow> = users::table
            .order(users::email.asc())
            .select(UserRow::as_select())
            .load(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, connection, query))?;
        rows.into_iter().map(row_to_user).collect()
    }
}
