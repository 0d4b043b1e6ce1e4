//! Driven port for the per-type item field value stores.
//!
//! Values are keyed by (item id, collection field id) and each field type
//! has its own store. The save methods are deliberately separate: the item
//! use-case writes one type group at a time with no cross-store transaction,
//! so a failure partway leaves earlier groups committed.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::define_port_error;
use crate::domain::{FieldId, FieldValueMap, ItemId};

define_port_error! {
    /// Persistence errors raised by [`FieldValueStore`] adapters.
    pub enum FieldValueStoreError {
        /// Store connection could not be established.
        Connection { message: String } => "field value store connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "field value store query failed: {message}",
    }
}

/// Persistence port for typed item field values.
///
/// Saves upsert on the (item id, field id) key so item updates overwrite in
/// place.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FieldValueStore: Send + Sync {
    /// Upsert the number values for an item.
    async fn save_numbers(
        &self,
        item_id: &ItemId,
        values: &[(FieldId, f64)],
    ) -> Result<(), FieldValueStoreError>;

    /// Upsert the single-line text values for an item.
    async fn save_texts(
        &self,
        item_id: &ItemId,
        values: &[(FieldId, String)],
    ) -> Result<(), FieldValueStoreError>;

    /// Upsert the multiline text values for an item.
    async fn save_multiline_texts(
        &self,
        item_id: &ItemId,
        values: &[(FieldId, String)],
    ) -> Result<(), FieldValueStoreError>;

    /// Upsert the checkbox values for an item.
    async fn save_checkboxes(
        &self,
        item_id: &ItemId,
        values: &[(FieldId, bool)],
    ) -> Result<(), FieldValueStoreError>;

    /// Upsert the date values for an item.
    async fn save_dates(
        &self,
        item_id: &ItemId,
        values: &[(FieldId, DateTime<Utc>)],
    ) -> Result<(), FieldValueStoreError>;

    /// Load every stored value for an item across all five stores.
    async fn load_for_item(&self, item_id: &ItemId) -> Result<FieldValueMap, FieldValueStoreError>;
}
