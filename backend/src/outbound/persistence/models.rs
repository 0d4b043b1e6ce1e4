//! Row structs bridging Diesel tables and domain entities.
//!
//! Rows are deliberately separate from domain types: they mirror column
//! order and database primitives, and the adapters own the conversion in
//! both directions.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{
    collection_fields, collections, comments, item_checkbox_values, item_date_values,
    item_multiline_values, item_number_values, item_text_values, items, topics, users,
};

/// Full user row as stored.
#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UserRow {
    pub id: Uuid,
    pub email: String,
    pub fullname: String,
    pub blocked: bool,
    pub is_admin: bool,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insertable user row; timestamps default in the database.
#[derive(Debug, Insertable)]
#[diesel(table_name = users)]
pub struct NewUserRow<'a> {
    pub id: Uuid,
    pub email: &'a str,
    pub fullname: &'a str,
    pub blocked: bool,
    pub is_admin: bool,
    pub password_hash: &'a str,
}

/// Changeset applied when replacing a user record.
#[derive(Debug, AsChangeset)]
#[diesel(table_name = users)]
pub struct UserChangeset<'a> {
    pub email: &'a str,
    pub fullname: &'a str,
    pub blocked: bool,
    pub is_admin: bool,
    pub password_hash: &'a str,
}

/// Topic row.
#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = topics)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TopicRow {
    pub id: Uuid,
    pub name: String,
}

/// Insertable topic row.
#[derive(Debug, Insertable)]
#[diesel(table_name = topics)]
pub struct NewTopicRow<'a> {
    pub id: Uuid,
    pub name: &'a str,
}

/// Collection row joined with its topic name.
///
/// Matches the select clause in the collection adapter; the raw `topic_id`
/// never leaves the persistence layer.
#[derive(Debug, Queryable)]
pub struct CollectionJoinRow {
    pub id: Uuid,
    pub name: String,
    pub owner_id: Uuid,
    pub topic: String,
    pub image_url: Option<String>,
}

/// Insertable collection row; timestamps default in the database.
#[derive(Debug, Insertable)]
#[diesel(table_name = collections)]
pub struct NewCollectionRow<'a> {
    pub id: Uuid,
    pub name: &'a str,
    pub owner_id: Uuid,
    pub topic_id: Uuid,
    pub image_url: Option<&'a str>,
}

/// Changeset applied when replacing a collection's mutable attributes.
#[derive(Debug, AsChangeset)]
#[diesel(table_name = collections)]
#[diesel(treat_none_as_null = true)]
pub struct CollectionChangeset<'a> {
    pub name: &'a str,
    pub topic_id: Uuid,
    pub image_url: Option<&'a str>,
}

/// Collection field row as stored.
#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = collection_fields)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct FieldRow {
    pub id: Uuid,
    pub collection_id: Uuid,
    pub name: String,
    pub field_type: String,
}

/// Insertable collection field row.
#[derive(Debug, Insertable)]
#[diesel(table_name = collection_fields)]
pub struct NewFieldRow<'a> {
    pub id: Uuid,
    pub collection_id: Uuid,
    pub name: &'a str,
    pub field_type: &'a str,
}

/// Item row as stored.
#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = items)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ItemRow {
    pub id: Uuid,
    pub collection_id: Uuid,
    pub name: String,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
}

/// Insertable item row.
#[derive(Debug, Insertable)]
#[diesel(table_name = items)]
pub struct NewItemRow<'a> {
    pub id: Uuid,
    pub collection_id: Uuid,
    pub name: &'a str,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
}

/// Comment row as stored.
#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = comments)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct CommentRow {
    pub id: Uuid,
    pub item_id: Uuid,
    pub author_id: Uuid,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

/// Insertable comment row.
#[derive(Debug, Insertable)]
#[diesel(table_name = comments)]
pub struct NewCommentRow<'a> {
    pub id: Uuid,
    pub item_id: Uuid,
    pub author_id: Uuid,
    pub body: &'a str,
    pub created_at: DateTime<Utc>,
}

/// Number value row; also insertable for upserts.
#[derive(Debug, Queryable, Selectable, Insertable)]
#[diesel(table_name = item_number_values)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NumberValueRow {
    pub item_id: Uuid,
    pub field_id: Uuid,
    pub value: f64,
}

/// Single-line text value row; also insertable for upserts.
#[derive(Debug, Queryable, Selectable, Insertable)]
#[diesel(table_name = item_text_values)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TextValueRow {
    pub item_id: Uuid,
    pub field_id: Uuid,
    pub value: String,
}

/// Multiline text value row; also insertable for upserts.
#[derive(Debug, Queryable, Selectable, Insertable)]
#[diesel(table_name = item_multiline_values)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct MultilineValueRow {
    pub item_id: Uuid,
    pub field_id: Uuid,
    pub value: String,
}

/// Checkbox value row; also insertable for upserts.
#[derive(Debug, Queryable, Selectable, Insertable)]
#[diesel(table_name = item_checkbox_values)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct CheckboxValueRow {
    pub item_id: Uuid,
    pub field_id: Uuid,
    pub value: bool,
}

/// Date value row; also insertable for upserts.
#[derive(Debug, Queryable, Selectable, Insertable)]
#[diesel(table_name = item_date_values)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct DateValueRow {
    pub item_id: Uuid,
    pub field_id: Uuid,
    pub value: DateTime<Utc>,
}
