//! Shared Diesel and pool error translation for persistence adapters.
//!
//! Every port error enum exposes `connection` and `query` constructors, so
//! adapters pass those in as closures and get uniform mapping behaviour.

use tracing::debug;

use super::pool::PoolError;

/// Map a pool failure into a port connection error.
pub(super) fn map_pool_error<E>(error: PoolError, connection: impl Fn(String) -> E) -> E {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => connection(message),
    }
}

/// Map a Diesel failure into a port connection or query error.
///
/// Raw driver messages are logged at debug level and replaced with stable
/// text so database internals never reach clients.
pub(super) fn map_diesel_error<E>(
    error: diesel::result::Error,
    connection: impl Fn(String) -> E,
    query: impl Fn(String) -> E,
) -> E {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        other => debug!(error = %other, "diesel operation failed"),
    }

    match error {
        DieselError::NotFound => query("record not found".to_owned()),
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            connection("database connection error".to_owned())
        }
        _ => query("database error".to_owned()),
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::ports::UserRepositoryError;

    fn conn(message: String) -> UserRepositoryError {
        UserRepositoryError::connection(message)
    }

    fn query(message: String) -> UserRepositoryError {
        UserRepositoryError::query(message)
    }

    #[test]
    fn pool_errors_become_connection_errors() {
        let mapped = map_pool_error(PoolError::checkout("connection refused"), conn);
        assert!(matches!(mapped, UserRepositoryError::Connection { .. }));
        assert!(mapped.to_string().contains("connection refused"));
    }

    #[test]
    fn not_found_becomes_a_query_error() {
        let mapped = map_diesel_error(diesel::result::Error::NotFound, conn, query);
        assert!(matches!(mapped, UserRepositoryError::Query { .. }));
        assert!(mapped.to_string().contains("record not found"));
    }

    #[test]
    fn closed_connections_become_connection_errors() {
        let err = diesel::result::Error::DatabaseError(
            diesel::result::DatabaseErrorKind::ClosedConnection,
            Box::new("server closed the connection".to_owned()),
        );
        let mapped = map_diesel_error(err, conn, query);
        assert!(matches!(mapped, UserRepositoryError::Connection { .. }));
    }
}
