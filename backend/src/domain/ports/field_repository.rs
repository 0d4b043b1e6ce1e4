//! Driven port for collection field definitions.

use async_trait::async_trait;

use super::define_port_error;
use crate::domain::{CollectionField, CollectionId, FieldId};

define_port_error! {
    /// Persistence errors raised by [`CollectionFieldRepository`] adapters.
    pub enum FieldRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "field repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "field repository query failed: {message}",
    }
}

/// Persistence port for the typed field definitions of a collection.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CollectionFieldRepository: Send + Sync {
    /// Insert a new field definition.
    async fn insert(&self, field: &CollectionField) -> Result<(), FieldRepositoryError>;

    /// Delete a field definition; returns whether a record was removed.
    ///
    /// Stored item values for the field cascade in the backing store.
    async fn delete(&self, id: &FieldId) -> Result<bool, FieldRepositoryError>;

    /// Fetch a field definition by identifier.
    async fn find_by_id(
        &self,
        id: &FieldId,
    ) -> Result<Option<CollectionField>, FieldRepositoryError>;

    /// List the field definitions of a collection, ordered by name.
    async fn list_for_collection(
        &self,
        collection_id: &CollectionId,
    ) -> Result<Vec<CollectionField>, FieldRepositoryError>;
}
