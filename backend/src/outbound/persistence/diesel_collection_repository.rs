//! PostgreSQL-backed `CollectionRepository` implementation using Diesel.
//!
//! Topic names resolve against the shared `topics` table; a topic row is
//! created the first time a name appears.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::upsert::excluded;
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use uuid::Uuid;

use crate::domain::ports::{CollectionRepository, CollectionRepositoryError};
use crate::domain::{Collection, CollectionId, CollectionName, ImageUrl, Topic, UserId};

use super::error_map::{map_diesel_error, map_pool_error};
use super::models::{CollectionChangeset, CollectionJoinRow, NewCollectionRow, NewTopicRow};
use super::pool::DbPool;
use super::schema::{collections, topics};

/// Diesel-backed implementation of the `CollectionRepository` port.
#[derive(Clone)]
pub struct DieselCollectionRepository {
    pool: DbPool,
}

impl DieselCollectionRepository {
    /// Create a new repository with the given connection pool.
    #[must_use]
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn connection(message: String) -> CollectionRepositoryError {
    CollectionRepositoryError::connection(message)
}

fn query(message: String) -> CollectionRepositoryError {
    CollectionRepositoryError::query(message)
}

/// Convert a joined row to a domain collection.
fn row_to_collection(row: CollectionJoinRow) -> Result<Collection, CollectionRepositoryError> {
    let name = CollectionName::new(row.name)
        .map_err(|err| query(format!("corrupt collection row {}: {err}", row.id)))?;
    let topic = Topic::new(row.topic)
        .map_err(|err| query(format!("corrupt collection row {}: {err}", row.id)))?;
    let image_url = row
        .image_url
        .map(|raw| {
            ImageUrl::new(raw)
                .map_err(|err| query(format!("corrupt collection row {}: {err}", row.id)))
        })
        .transpose()?;
    Ok(Collection::new(
        CollectionId::from_uuid(row.id),
        name,
        UserId::from_uuid(row.owner_id),
        topic,
        image_url,
    ))
}

/// Find or create the topic row for a name, returning its id.
///
/// The upsert tolerates a concurrent first use of the same topic name.
async fn resolve_topic_id(
    conn: &mut AsyncPgConnection,
    topic: &Topic,
) -> Result<Uuid, CollectionRepositoryError> {
    let existing: Option<Uuid> = topics::table
        .filter(topics::name.eq(topic.as_ref()))
        .select(topics::id)
        .first(conn)
        .await
        .optional()
        .map_err(|err| map_diesel_error(err, connection, query))?;
    if let Some(id) = existing {
        return Ok(id);
    }

    let row = NewTopicRow {
        id: Uuid::new_v4(),
        name: topic.as_ref(),
    };
    diesel::insert_into(topics::table)
        .values(&row)
        .on_conflict(topics::name)
        .do_update()
        .set(topics::name.eq(excluded(topics::name)))
        .returning(topics::id)
        .get_result(conn)
        .await
        .map_err(|err| map_diesel_error(err, connection, query))
}

fn joined_select() -> (
    collections::id,
    collections::name,
    collections::owner_id,
    topics::name,
    collections::image_url,
) {
    (
        collections::id,
        collections::name,
        collections::owner_id,
        topics::name,
        collections::image_url,
    )
}

#[async_trait]
impl CollectionRepository for DieselCollectionRepository {
    async fn insert(&self, collection: &Collection) -> Result<(), CollectionRepositoryError> {
        let mut conn = self.pool.get().await.map_err(|e| map_pool_error(e, connection))?;
        let topic_id = resolve_topic_id(&mut conn, collection.topic()).await?;
        let row = NewCollectionRow {
            id: *collection.id().as_uuid(),
            name: collection.name().as_ref(),
            owner_id: *collection.owner_id().as_uuid(),
            topic_id,
            image_url: collection.image_url().map(AsRef::as_ref),
        };
        diesel::insert_into(collections::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|err| map_diesel_error(err, connection, query))
    }

    async fn update(&self, collection: &Collection) -> Result<(), CollectionRepositoryError> {
        let mut conn = self.pool.get().await.map_err(|e| map_pool_error(e, connection))?;
        let topic_id = resolve_topic_id(&mut conn, collection.topic()).await?;
        let changeset = CollectionChangeset {
            name: collection.name().as_ref(),
            topic_id,
            image_url: collection.image_url().map(AsRef::as_ref),
        };
        diesel::update(collections::table.find(collection.id().as_uuid()))
            .set(&changeset)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|err| map_diesel_error(err, connection, query))
    }

    async fn delete(&self, id: &CollectionId) -> Result<bool, CollectionRepositoryError> {
        let mut conn = self.pool.get().await.map_err(|e| map_pool_error(e, connection))?;
        let deleted = diesel::delete(collections::table.find(id.as_uuid()))
            .execute(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, connection, query))?;
        Ok(deleted > 0)
    }

    async fn find_by_id(
        &self,
        id: &CollectionId,
    ) -> Result<Option<Collection>, CollectionRepositoryError> {
        let mut conn = self.pool.get().await.map_err(|e| map_pool_error(e, connection))?;
        let row: Option<CollectionJoinRow> = collections::table
            .inner_join(topics::table)
            .filter(collections::id.eq(id.as_uuid()))
            .select(joined_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(|err| map_diesel_error(err, connection, query))?;
        row.map(row_to_collection).transpose()
    }

    async fn list_by_owner(
        &self,
        owner_id: &UserId,
    ) -> Result<Vec<Collection>, CollectionRepositoryError> {
        let mut conn = self.pool.get().await.map_err(|e| map_pool_error(e, connection))?;
        let rows: Vec<CollectionJoinRow> = collections::table
            .inner_join(topics::table)
            .filter(collections::owner_id.eq(owner_id.as_uuid()))
            .order(collections::name.asc())
            .select(joined_select())
            .load(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, connection, query))?;
        rows.into_iter().map(row_to_collection).collect()
    }

    async fn list_all(&self) -> Result<Vec<Collection>, CollectionRepositoryError> {
        let mut conn = self.pool.get().await.map_err(|e| map_pool_error(e, connection))?;
        let rows: Vec<CollectionJoinRow> = collections::table
            .inner_join(topics::table)
            .order(collections::name.asc())
            .select(joined_select())
            .load(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, connection, query))?;
        rows.into_iter().map(row_to_collection).collect()
    }
}
