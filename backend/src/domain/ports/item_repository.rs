//! Driven port for item persistence.

use async_trait::async_trait;

use super::define_port_error;
use crate::domain::{CollectionId, Item, ItemId};

define_port_error! {
    /// Persistence errors raised by [`ItemRepository`] adapters.
    pub enum ItemRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "item repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "item repository query failed: {message}",
    }
}

/// Persistence port for item aggregates.
///
/// Typed field values are not part of this port; they live in the per-type
/// stores behind [`super::FieldValueStore`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ItemRepository: Send + Sync {
    /// Insert a new item record.
    async fn insert(&self, item: &Item) -> Result<(), ItemRepositoryError>;

    /// Replace an existing item record.
    async fn update(&self, item: &Item) -> Result<(), ItemRepositoryError>;

    /// Delete an item; returns whether a record was removed.
    ///
    /// Field values and comments cascade in the backing store.
    async fn delete(&self, id: &ItemId) -> Result<bool, ItemRepositoryError>;

    /// Fetch an item by identifier.
    async fn find_by_id(&self, id: &ItemId) -> Result<Option<Item>, ItemRepositoryError>;

    /// List a collection's items, oldest first.
    async fn list_for_collection(
        &self,
        collection_id: &CollectionId,
    ) -> Result<Vec<Item>, ItemRepositoryError>;
}
