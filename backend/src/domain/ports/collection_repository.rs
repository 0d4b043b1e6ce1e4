//! Driven port for collection persistence.

use async_trait::async_trait;

use super::define_port_error;
use crate::domain::{Collection, CollectionId, UserId};

define_port_error! {
    /// Persistence errors raised by [`CollectionRepository`] adapters.
    pub enum CollectionRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "collection repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "collection repository query failed: {message}",
    }
}

/// Persistence port for collection aggregates.
///
/// Adapters resolve the collection's topic name against the shared topic
/// store, creating topics on first use.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CollectionRepository: Send + Sync {
    /// Insert a new collection record.
    async fn insert(&self, collection: &Collection) -> Result<(), CollectionRepositoryError>;

    /// Replace an existing collection record.
    async fn update(&self, collection: &Collection) -> Result<(), CollectionRepositoryError>;

    /// Delete a collection; returns whether a record was removed.
    ///
    /// Fields, items, and item field values cascade in the backing store.
    async fn delete(&self, id: &CollectionId) -> Result<bool, CollectionRepositoryError>;

    /// Fetch a collection by identifier.
    async fn find_by_id(
        &self,
        id: &CollectionId,
    ) -> Result<Option<Collection>, CollectionRepositoryError>;

    /// List the collections owned by a user, ordered by name.
    async fn list_by_owner(
        &self,
        owner_id: &UserId,
    ) -> Result<Vec<Collection>, CollectionRepositoryError>;

    /// List every collection, ordered by name.
    async fn list_all(&self) -> Result<Vec<Collection>, CollectionRepositoryError>;
}
