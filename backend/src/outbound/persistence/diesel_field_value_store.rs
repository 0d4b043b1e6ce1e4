//! PostgreSQL-backed `FieldValueStore` implementation using Diesel.
//!
//! Each field type has its own table keyed by (item id, field id). Saves are
//! batch upserts on that composite key; there is no transaction spanning the
//! five tables, matching the pipeline's write-per-group contract.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel::upsert::excluded;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{FieldValueStore, FieldValueStoreError};
use crate::domain::{FieldId, FieldValue, FieldValueMap, ItemId};

use super::error_map::{map_diesel_error, map_pool_error};
use super::models::{
    CheckboxValueRow, DateValueRow, MultilineValueRow, NumberValueRow, TextValueRow,
};
use super::pool::DbPool;
use super::schema::{
    item_checkbox_values, item_date_values, item_multiline_values, item_number_values,
    item_text_values,
};

/// Diesel-backed implementation of the `FieldValueStore` port.
#[derive(Clone)]
pub struct DieselFieldValueStore {
    pool: DbPool,
}

impl DieselFieldValueStore {
    /// Create a new store with the given connection pool.
    #[must_use]
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn connection(message: String) -> FieldValueStoreError {
    FieldValueStoreError::connection(message)
}

fn query(message: String) -> FieldValueStoreError {
    FieldValueStoreError::query(message)
}

#[async_trait]
impl FieldValueStore for DieselFieldValueStore {
    async fn save_numbers(
        &self,
        item_id: &ItemId,
        values: &[(FieldId, f64)],
    ) -> Result<(), FieldValueStoreError> {
        if values.is_empty() {
            return Ok(());
        }
        let mut conn = self.pool.get().await.map_err(|e| map_pool_error(e, connection))?;
        let rows: Vec<NumberValueRow> = values
            .iter()
            .map(|(field_id, value)| NumberValueRow {
                item_id: *item_id.as_uuid(),
                field_id: *field_id.as_uuid(),
                value: *value,
            })
            .collect();
        diesel::insert_into(item_number_values::table)
            .values(&rows)
            .on_conflict((item_number_values::item_id, item_number_values::field_id))
            .do_update()
            .set(item_number_values::value.eq(excluded(item_number_values::value)))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|err| map_diesel_error(err, connection, query))
    }

    async fn save_texts(
        &self,
        item_id: &ItemId,
        values: &[(FieldId, String)],
    ) -> Result<(), FieldValueStoreError> {
        if values.is_empty() {
            return Ok(());
        }
        let mut conn = self.pool.get().await.map_err(|e| map_pool_error(e, connection))?;
        let rows: Vec<TextValueRow> = values
            .iter()
            .map(|(field_id, value)| TextValueRow {
                item_id: *item_id.as_uuid(),
                field_id: *field_id.as_uuid(),
                value: value.clone(),
            })
            .collect();
        diesel::insert_into(item_text_values::table)
            .values(&rows)
            .on_conflict((item_text_values::item_id, item_text_values::field_id))
            .do_update()
            .set(item_text_values::value.eq(excluded(item_text_values::value)))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|err| map_diesel_error(err, connection, query))
    }

    async fn save_multiline_texts(
        &self,
        item_id: &ItemId,
        values: &[(FieldId, String)],
    ) -> Result<(), FieldValueStoreError> {
        if values.is_empty() {
            return Ok(());
        }
        let mut conn = self.pool.get().await.map_err(|e| map_pool_error(e, connection))?;
        let rows: Vec<MultilineValueRow> = values
            .iter()
            .map(|(field_id, value)| MultilineValueRow {
                item_id: *item_id.as_uuid(),
                field_id: *field_id.as_uuid(),
                value: value.clone(),
            })
            .collect();
        diesel::insert_into(item_multiline_values::table)
            .values(&rows)
            .on_conflict((
                item_multiline_values::item_id,
                item_multiline_values::field_id,
            ))
            .do_update()
            .set(item_multiline_values::value.eq(excluded(item_multiline_values::value)))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|err| map_diesel_error(err, connection, query))
    }

    async fn save_checkboxes(
        &self,
        item_id: &ItemId,
        values: &[(FieldId, bool)],
    ) -> Result<(), FieldValueStoreError> {
        if values.is_empty() {
            return Ok(());
        }
        let mut conn = self.pool.get().await.map_err(|e| map_pool_error(e, connection))?;
        let rows: Vec<CheckboxValueRow> = values
            .iter()
            .map(|(field_id, value)| CheckboxValueRow {
                item_id: *item_id.as_uuid(),
                field_id: *field_id.as_uuid(),
                value: *value,
            })
            .collect();
        diesel::insert_into(item_checkbox_values::table)
            .values(&rows)
            .on_conflict((
                item_checkbox_values::item_id,
                item_checkbox_values::field_id,
            ))
            .do_update()
            .set(item_checkbox_values::value.eq(excluded(item_checkbox_values::value)))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|err| map_diesel_error(err, connection, query))
    }

    async fn save_dates(
        &self,
        item_id: &ItemId,
        values: &[(FieldId, DateTime<Utc>)],
    ) -> Result<(), FieldValueStoreError> {
        if values.is_empty() {
            return Ok(());
        }
        let mut conn = self.pool.get().await.map_err(|e| map_pool_error(e, connection))?;
        let rows: Vec<DateValueRow> = values
            .iter()
            .map(|(field_id, value)| DateValueRow {
                item_id: *item_id.as_uuid(),
                field_id: *field_id.as_uuid(),
                value: *value,
            })
            .collect();
        diesel::insert_into(item_date_values::table)
            .values(&rows)
            .on_conflict((item_date_values::item_id, item_date_values::field_id))
            .do_update()
            .set(item_date_values::value.eq(excluded(item_date_values::value)))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|err| map_diesel_error(err, connection, query))
    }

    async fn load_for_item(
        &self,
        item_id: &ItemId,
    ) -> Result<FieldValueMap, FieldValueStoreError> {
        let mut conn = self.pool.get().await.map_err(|e| map_pool_error(e, connection))?;
        let mut map = FieldValueMap::new();

        let numbers: Vec<NumberValueRow> = item_number_values::table
            .filter(item_number_values::item_id.eq(item_id.as_uuid()))
            .select(NumberValueRow::as_select())
            .load(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, connection, query))?;
        for row in numbers {
            map.insert(FieldId::from_uuid(row.field_id), FieldValue::Number(row.value));
        }

        let texts: Vec<TextValueRow> = item_text_values::table
            .filter(item_text_values::item_id.eq(item_id.as_uuid()))
            .select(TextValueRow::as_select())
            .load(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, connection, query))?;
        for row in texts {
            map.insert(FieldId::from_uuid(row.field_id), FieldValue::Text(row.value));
        }

        let multilines: Vec<MultilineValueRow> = item_multiline_values::table
            .filter(item_multiline_values::item_id.eq(item_id.as_uuid()))
            .select(MultilineValueRow::as_select())
            .load(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, connection, query))?;
        for row in multilines {
            map.insert(
                FieldId::from_uuid(row.field_id),
                FieldValue::MultilineText(row.value),
            );
        }

        let checkboxes: Vec<CheckboxValueRow> = item_checkbox_values::table
            .filter(item_checkbox_values::item_id.eq(item_id.as_uuid()))
            .select(CheckboxValueRow::as_select())
            .load(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, connection, query))?;
        for row in checkboxes {
            map.insert(
                FieldId::from_uuid(row.field_id),
                FieldValue::Checkbox(row.value),
            );
        }

        let dates: Vec<DateValueRow> = item_date_values::table
            .filter(item_date_values::item_id.eq(item_id.as_uuid()))
            .select(DateValueRow::as_select())
            .load(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, connection, query))?;
        for row in dates {
            map.insert(FieldId::from_uuid(row.field_id), FieldValue::Date(row.value));
        }

        Ok(map)
    }
}
