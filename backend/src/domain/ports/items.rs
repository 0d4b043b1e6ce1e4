//! Driving ports for the item pipeline.

use std::collections::BTreeSet;

use async_trait::async_trait;

use crate::domain::{
    CollectionId, Error, FieldValueMap, Item, ItemId, ItemName, Requester, Tag,
};

/// Validated content for an item create or update.
///
/// `values` must match the target collection's field definitions exactly;
/// the use-case enforces the per-type set-equality before any write.
#[derive(Debug, Clone)]
pub struct ItemWrite {
    /// Item name.
    pub name: ItemName,
    /// The item's tag set.
    pub tags: BTreeSet<Tag>,
    /// Typed values keyed by collection field id.
    pub values: FieldValueMap,
}

/// An item together with its typed field values.
#[derive(Debug, Clone)]
pub struct ItemWithValues {
    /// The item itself.
    pub item: Item,
    /// Its stored values keyed by field id.
    pub values: FieldValueMap,
}

/// Mutating item use-cases.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ItemCommand: Send + Sync {
    /// Create an item in a collection; collection owner or admin only.
    async fn create(
        &self,
        requester: &Requester,
        collection_id: &CollectionId,
        write: ItemWrite,
    ) -> Result<ItemWithValues, Error>;

    /// Replace an item's name, tags, and field values; owner or admin only.
    async fn update(
        &self,
        requester: &Requester,
        id: &ItemId,
        write: ItemWrite,
    ) -> Result<ItemWithValues, Error>;

    /// Delete an item; owner or admin only.
    async fn delete(&self, requester: &Requester, id: &ItemId) -> Result<(), Error>;
}

/// Read-only item use-cases.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ItemQuery: Send + Sync {
    /// Fetch an item with its field values.
    async fn get(&self, id: &ItemId) -> Result<ItemWithValues, Error>;

    /// List a collection's items, oldest first.
    async fn list_for_collection(&self, collection_id: &CollectionId)
    -> Result<Vec<Item>, Error>;
}
