//! PostgreSQL-backed `ItemRepository` implementation using Diesel.

use std::collections::BTreeSet;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{ItemRepository, ItemRepositoryError};
use crate::domain::{CollectionId, Item, ItemId, ItemName, Tag};

use super::error_map::{map_diesel_error, map_pool_error};
use super::models::{ItemRow, NewItemRow};
use super::pool::DbPool;
use super::schema::items;

/// Diesel-backed implementation of the `ItemRepository` port.
#[derive(Clone)]
pub struct DieselItemRepository {
    pool: DbPool,
}

impl DieselItemRepository {
    /// Create a new repository with the given connection pool.
    #[must_use]
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn connection(message: String) -> ItemRepositoryError {
    ItemRepositoryError::connection(message)
}

fn query(message: String) -> ItemRepositoryError {
    ItemRepositoryError::query(message)
}

fn tags_to_vec(item: &Item) -> Vec<String> {
    item.tags().iter().map(|tag| tag.as_ref().to_owned()).collect()
}

/// Convert a database row to a domain item.
fn row_to_item(row: ItemRow) -> Result<Item, ItemRepositoryError> {
    let name = ItemName::new(row.name)
        .map_err(|err| query(format!("corrupt item row {}: {err}", row.id)))?;
    let tags: BTreeSet<Tag> = row
        .tags
        .iter()
        .map(|raw| {
            Tag::new(raw).map_err(|err| query(format!("corrupt item row {}: {err}", row.id)))
        })
        .collect::<Result<_, _>>()?;
    Ok(Item::new(
        ItemId::from_uuid(row.id),
        CollectionId::from_uuid(row.collection_id),
        name,
        tags,
        row.created_at,
    ))
}

#[async_trait]
impl ItemRepository for DieselItemRepository {
    async fn insert(&self, item: &Item) -> Result<(), ItemRepositoryError> {
        let mut conn = self.pool.get().await.map_err(|e| map_pool_error(e, connection))?;
        let row = NewItemRow {
            id: *item.id().as_uuid(),
            collection_id: *item.collection_id().as_uuid(),
            name: item.name().as_ref(),
            tags: tags_to_vec(item),
            created_at: item.created_at(),
        };
        diesel::insert_into(items::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|err| map_diesel_error(err, connection, query))
    }

    async fn update(&self, item: &Item) -> Result<(), ItemRepositoryError> {
        let mut conn = self.pool.get().await.map_err(|e| map_pool_error(e, connection))?;
        diesel::update(items::table.find(item.id().as_uuid()))
            .set((
                items::name.eq(item.name().as_ref()),
                items::tags.eq(tags_to_vec(item)),
            ))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|err| map_diesel_error(err, connection, query))
    }

    async fn delete(&self, id: &ItemId) -> Result<bool, ItemRepositoryError> {
        let mut conn = self.pool.get().await.map_err(|e| map_pool_error(e, connection))?;
        let deleted = diesel::delete(items::table.find(id.as_uuid()))
            .execute(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, connection, query))?;
        Ok(deleted > 0)
    }

    async fn find_by_id(&self, id: &ItemId) -> Result<Option<Item>, ItemRepositoryError> {
        let mut conn = self.pool.get().await.map_err(|e| map_pool_error(e, connection))?;
        let row: Option<ItemRow> = items::table
            .find(id.as_uuid())
            .select(ItemRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(|err| map_diesel_error(err, connection, query))?;
        row.map(row_to_item).transpose()
    }

    async fn list_for_collection(
        &self,
        collection_id: &CollectionId,
    ) -> Result<Vec<Item>, ItemRepositoryError> {
        let mut conn = self.pool.get().await.map_err(|e| map_pool_error(e, connection))?;
        let rows: Vec<ItemRow> = items::table
            .filter(items::collection_id.eq(collection_id.as_uuid()))
            .order(items::created_at.asc())
            .select(ItemRow::as_select())
            .load(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, connection, query))?;
        rows.into_iter().map(row_to_item).collect()
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for row conversion.
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    #[test]
    fn rows_convert_to_domain_items() {
        let row = ItemRow {
            id: Uuid::new_v4(),
            collection_id: Uuid::new_v4(),
            name: "Penny Black".to_owned(),
            tags: vec!["rare".to_owned(), "stamp".to_owned()],
            created_at: Utc::now(),
        };
        let item = row_to_item(row).expect("valid row converts");
        assert_eq!(item.tags().len(), 2);
        assert_eq!(item.name().as_ref(), "Penny Black");
    }

    #[test]
    fn blank_stored_tags_surface_as_query_errors() {
        let row = ItemRow {
            id: Uuid::new_v4(),
            collection_id: Uuid::new_v4(),
            name: "Penny Black".to_owned(),
            tags: vec![String::new()],
            created_at: Utc::now(),
        };
        let err = row_to_item(row).expect_err("corrupt row fails");
        assert!(matches!(err, ItemRepositoryError::Query { .. }));
    }
}
