//! PostgreSQL-backed `CollectionFieldRepository` implementation using Diesel.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{CollectionFieldRepository, FieldRepositoryError};
use crate::domain::{CollectionField, CollectionId, FieldId, FieldName, FieldType};

use super::error_map::{map_diesel_error, map_pool_error};
use super::models::{FieldRow, NewFieldRow};
use super::pool::DbPool;
use super::schema::collection_fields;

/// Diesel-backed implementation of the `CollectionFieldRepository` port.
#[derive(Clone)]
pub struct DieselFieldRepository {
    pool: DbPool,
}

impl DieselFieldRepository {
    /// Create a new repository with the given connection pool.
    #[must_use]
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn connection(message: String) -> FieldRepositoryError {
    FieldRepositoryError::connection(message)
}

fn query(message: String) -> FieldRepositoryError {
    FieldRepositoryError::query(message)
}

/// Convert a database row to a domain field definition.
fn row_to_field(row: FieldRow) -> Result<CollectionField, FieldRepositoryError> {
    let name = FieldName::new(row.name)
        .map_err(|err| query(format!("corrupt field row {}: {err}", row.id)))?;
    let field_type = FieldType::from_db_str(&row.field_type)
        .map_err(|err| query(format!("corrupt field row {}: {err}", row.id)))?;
    Ok(CollectionField::new(
        FieldId::from_uuid(row.id),
        CollectionId::from_uuid(row.collection_id),
        name,
        field_type,
    ))
}

#[async_trait]
impl CollectionFieldRepository for DieselFieldRepository {
    async fn insert(&self, field: &CollectionField) -> Result<(), FieldRepositoryError> {
        let mut conn = self.pool.get().await.map_err(|e| map_pool_error(e, connection))?;
        let row = NewFieldRow {
            id: *field.id().as_uuid(),
            collection_id: *field.collection_id().as_uuid(),
            name: field.name().as_ref(),
            field_type: field.field_type().as_db_str(),
        };
        diesel::insert_into(collection_fields::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|err| map_diesel_error(err, connection, query))
    }

    async fn delete(&self, id: &FieldId) -> Result<bool, FieldRepositoryError> {
        let mut conn = self.pool.get().await.map_err(|e| map_pool_error(e, connection))?;
        let deleted = diesel::delete(collection_fields::table.find(id.as_uuid()))
            .execute(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, connection, query))?;
        Ok(deleted > 0)
    }

    async fn find_by_id(
        &self,
        id: &FieldId,
    ) -> Result<Option<CollectionField>, FieldRepositoryError> {
        let mut conn = self.pool.get().await.map_err(|e| map_pool_error(e, connection))?;
        let row: Option<FieldRow> = collection_fields::table
            .find(id.as_uuid())
            .select(FieldRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(|err| map_diesel_error(err, connection, query))?;
        row.map(row_to_field).transpose()
    }

    async fn list_for_collection(
        &self,
        collection_id: &CollectionId,
    ) -> Result<Vec<CollectionField>, FieldRepositoryError> {
        let mut conn = self.pool.get().await.map_err(|e| map_pool_error(e, connection))?;
        let rows: Vec<FieldRow> = collection_fields::table
            .filter(collection_fields::collection_id.eq(collection_id.as_uuid()))
            .order(collection_fields::name.asc())
            .select(FieldRow::as_select())
            .load(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, connection, query))?;
        rows.into_iter().map(row_to_field).collect()
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for row conversion.
    use super::*;
    use uuid::Uuid;

    #[test]
    fn rows_convert_to_domain_fields() {
        let row = FieldRow {
            id: Uuid::new_v4(),
            collection_id: Uuid::new_v4(),
            name: "Year".to_owned(),
            field_type: "number".to_owned(),
        };
        let field = row_to_field(row).expect("valid row converts");
        assert_eq!(field.field_type(), FieldType::Number);
        assert_eq!(field.name().as_ref(), "Year");
    }

    #[test]
    fn unknown_field_types_surface_as_query_errors() {
        let row = FieldRow {
            id: Uuid::new_v4(),
            collection_id: Uuid::new_v4(),
            name: "Year".to_owned(),
            field_type: "blob".to_owned(),
        };
        let err = row_to_field(row).expect_err("corrupt row fails");
        assert!(matches!(err, FieldRepositoryError::Query { .. }));
    }
}
