//! Item pipeline use-cases: create/update with dynamic typed fields.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::info;

use crate::domain::access::AccessGuard;
use crate::domain::ports::{
    CollectionFieldRepository, CollectionRepository, CollectionRepositoryError,
    FieldRepositoryError, FieldValueStore, FieldValueStoreError, ItemCommand, ItemQuery,
    ItemRepository, ItemRepositoryError, ItemWithValues, ItemWrite, UserRepository,
};
use crate::domain::{
    Collection, CollectionId, Error, FieldSetError, Item, ItemId, Requester, TypedFieldWrites,
};

/// Item service implementing the command and query driving ports.
///
/// The write path always runs validate → authorize → persist. Field values
/// are written per type group with no cross-store transaction: a failure
/// partway leaves the groups already written committed.
#[derive(Clone)]
pub struct ItemService<I, C, F, V, U> {
    items: Arc<I>,
    collections: Arc<C>,
    fields: Arc<F>,
    values: Arc<V>,
    guard: AccessGuard<U>,
}

impl<I, C, F, V, U> ItemService<I, C, F, V, U>
where
    U: UserRepository,
{
    /// Create a new service over the given repositories and stores.
    pub fn new(
        items: Arc<I>,
        collections: Arc<C>,
        fields: Arc<F>,
        values: Arc<V>,
        users: Arc<U>,
    ) -> Self {
        Self {
            items,
            collections,
            fields,
            values,
            guard: AccessGuard::new(users),
        }
    }
}

fn map_item_error(error: ItemRepositoryError) -> Error {
    match error {
        ItemRepositoryError::Connection { message } => Error::service_unavailable(message),
        ItemRepositoryError::Query { message } => Error::internal(message),
    }
}

fn map_collection_error(error: CollectionRepositoryError) -> Error {
    match error {
        CollectionRepositoryError::Connection { message } => Error::service_unavailable(message),
        CollectionRepositoryError::Query { message } => Error::internal(message),
    }
}

fn map_field_error(error: FieldRepositoryError) -> Error {
    match error {
        FieldRepositoryError::Connection { message } => Error::service_unavailable(message),
        FieldRepositoryError::Query { message } => Error::internal(message),
    }
}

fn map_value_error(error: FieldValueStoreError) -> Error {
    match error {
        FieldValueStoreError::Connection { message } => Error::service_unavailable(message),
        FieldValueStoreError::Query { message } => Error::internal(message),
    }
}

fn map_field_set_error(error: &FieldSetError) -> Error {
    let mismatches: Vec<_> = error
        .mismatches
        .iter()
        .map(|mismatch| {
            json!({
                "fieldType": mismatch.field_type,
                "missing": mismatch.missing.iter().map(ToString::to_string).collect::<Vec<_>>(),
                "unexpected": mismatch
                    .unexpected
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>(),
            })
        })
        .collect();
    Error::invalid_request("field values do not match the collection schema")
        .with_details(json!({ "code": "field_set_mismatch", "mismatches": mismatches }))
}

impl<I, C, F, V, U> ItemService<I, C, F, V, U>
where
    I: ItemRepository,
    C: CollectionRepository,
    F: CollectionFieldRepository,
    V: FieldValueStore,
    U: UserRepository,
{
    async fn fetch_item(&self, id: &ItemId) -> Result<Item, Error> {
        self.items
            .find_by_id(id)
            .await
            .map_err(map_item_error)?
            .ok_or_else(|| Error::not_found("no such item"))
    }

    async fn fetch_collection(&self, id: &CollectionId) -> Result<Collection, Error> {
        self.collections
            .find_by_id(id)
            .await
            .map_err(map_collection_error)?
            .ok_or_else(|| Error::not_found("no such collection"))
    }

    /// Validate the supplied values against the collection schema.
    ///
    /// Runs before any write so a mismatched request leaves no trace.
    async fn partition_against_schema(
        &self,
        collection_id: &CollectionId,
        write: &ItemWrite,
    ) -> Result<TypedFieldWrites, Error> {
        let defined = self
            .fields
            .list_for_collection(collection_id)
            .await
            .map_err(map_field_error)?;
        TypedFieldWrites::partition(&defined, write.values.clone())
            .map_err(|err| map_field_set_error(&err))
    }

    /// Write each type group into its own store, one group at a time.
    ///
    /// No rollback: a failure leaves the groups already written committed.
    async fn persist_values(
        &self,
        item_id: &ItemId,
        writes: &TypedFieldWrites,
    ) -> Result<(), Error> {
        self.values
            .save_numbers(item_id, writes.numbers())
            .await
            .map_err(map_value_error)?;
        self.values
            .save_texts(item_id, writes.texts())
            .await
            .map_err(map_value_error)?;
        self.values
            .save_multiline_texts(item_id, writes.multiline_texts())
            .await
            .map_err(map_value_error)?;
        self.values
            .save_checkboxes(item_id, writes.checkboxes())
            .await
            .map_err(map_value_error)?;
        self.values
            .save_dates(item_id, writes.dates())
            .await
            .map_err(map_value_error)?;
        Ok(())
    }
}

#[async_trait]
impl<I, C, F, V, U> ItemCommand for ItemService<I, C, F, V, U>
where
    I: ItemRepository,
    C: CollectionRepository,
    F: CollectionFieldRepository,
    V: FieldValueStore,
    U: UserRepository,
{
    async fn create(
        &self,
        requester: &Requester,
        collection_id: &CollectionId,
        write: ItemWrite,
    ) -> Result<ItemWithValues, Error> {
        let collection = self.fetch_collection(collection_id).await?;
        self.guard
            .require_collection_access(requester, &collection)
            .await?;
        let writes = self.partition_against_schema(collection_id, &write).await?;

        let item = Item::new(
            ItemId::random(),
            *collection.id(),
            write.name,
            write.tags,
            chrono::Utc::now(),
        );
        self.items.insert(&item).await.map_err(map_item_error)?;
        self.persist_values(item.id(), &writes).await?;
        info!(item_id = %item.id(), collection_id = %collection_id, "item created");
        Ok(ItemWithValues {
            values: writes.to_map(),
            item,
        })
    }

    async fn update(
        &self,
        requester: &Requester,
        id: &ItemId,
        write: ItemWrite,
    ) -> Result<ItemWithValues, Error> {
        let item = self.fetch_item(id).await?;
        let collection = self.fetch_collection(item.collection_id()).await?;
        self.guard
            .require_collection_access(requester, &collection)
            .await?;
        let writes = self
            .partition_against_schema(item.collection_id(), &write)
            .await?;

        let updated = item.with_content(write.name, write.tags);
        self.items.update(&updated).await.map_err(map_item_error)?;
        self.persist_values(updated.id(), &writes).await?;
        Ok(ItemWithValues {
            values: writes.to_map(),
            item: updated,
        })
    }

    async fn delete(&self, requester: &Requester, id: &ItemId) -> Result<(), Error> {
        let item = self.fetch_item(id).await?;
        let collection = self.fetch_collection(item.collection_id()).await?;
        self.guard
            .require_collection_access(requester, &collection)
            .await?;
        // Field values and comments cascade in the backing store.
        let removed = self.items.delete(id).await.map_err(map_item_error)?;
        if !removed {
            return Err(Error::not_found("no such item"));
        }
        info!(item_id = %id, "item deleted");
        Ok(())
    }
}

#[async_trait]
impl<I, C, F, V, U> ItemQuery for ItemService<I, C, F, V, U>
where
    I: ItemRepository,
    C: CollectionRepository,
    F: CollectionFieldRepository,
    V: FieldValueStore,
    U: UserRepository,
{
    async fn get(&self, id: &ItemId) -> Result<ItemWithValues, Error> {
        let item = self.fetch_item(id).await?;
        let values = self
            .values
            .load_for_item(id)
            .await
            .map_err(map_value_error)?;
        Ok(ItemWithValues { item, values })
    }

    async fn list_for_collection(
        &self,
        collection_id: &CollectionId,
    ) -> Result<Vec<Item>, Error> {
        self.fetch_collection(collection_id).await?;
        self.items
            .list_for_collection(collection_id)
            .await
            .map_err(map_item_error)
    }
}
