//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the migrations exactly; Diesel uses them for
//! compile-time query validation and type-safe SQL generation. Regenerate
//! with `diesel print-schema` after a migration changes the schema.

diesel::table! {
    /// User accounts.
    users (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Sign-in email, unique, stored lowercased.
        email -> Varchar,
        /// Name shown to other users.
        fullname -> Varchar,
        /// Blocked accounts cannot sign in.
        blocked -> Bool,
        /// Administrator flag.
        is_admin -> Bool,
        /// Encoded bcrypt hash.
        password_hash -> Varchar,
        /// Record creation timestamp.
        created_at -> Timestamptz,
        /// Last modification timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Topics collections are filed under, created on first use.
    topics (id) {
        id -> Uuid,
        /// Topic name, unique.
        name -> Varchar,
    }
}

diesel::table! {
    /// Collections of items, each owned by one user.
    collections (id) {
        id -> Uuid,
        name -> Varchar,
        owner_id -> Uuid,
        topic_id -> Uuid,
        /// Optional cover image URL.
        image_url -> Nullable<Varchar>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Typed field definitions attached to a collection.
    collection_fields (id) {
        id -> Uuid,
        collection_id -> Uuid,
        name -> Varchar,
        /// One of: number, text, multiline_text, checkbox, date.
        field_type -> Varchar,
    }
}

diesel::table! {
    /// Items within a collection.
    items (id) {
        id -> Uuid,
        collection_id -> Uuid,
        name -> Varchar,
        /// Free-form tags, stored as a text array.
        tags -> Array<Text>,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Comments referencing one item and one author.
    comments (id) {
        id -> Uuid,
        item_id -> Uuid,
        author_id -> Uuid,
        body -> Text,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Number field values, keyed by (item id, field id).
    item_number_values (item_id, field_id) {
        item_id -> Uuid,
        field_id -> Uuid,
        value -> Float8,
    }
}

diesel::table! {
    /// Single-line text field values, keyed by (item id, field id).
    item_text_values (item_id, field_id) {
        item_id -> Uuid,
        field_id -> Uuid,
        value -> Varchar,
    }
}

diesel::table! {
    /// Multiline text field values, keyed by (item id, field id).
    item_multiline_values (item_id, field_id) {
        item_id -> Uuid,
        field_id -> Uuid,
        value -> Text,
    }
}

diesel::table! {
    /// Checkbox field values, keyed by (item id, field id).
    item_checkbox_values (item_id, field_id) {
        item_id -> Uuid,
        field_id -> Uuid,
        value -> Bool,
    }
}

diesel::table! {
    /// Date field values, keyed by (item id, field id).
    item_date_values (item_id, field_id) {
        item_id -> Uuid,
        field_id -> Uuid,
        value -> Timestamptz,
    }
}

diesel::joinable!(collections -> users (owner_id));
diesel::joinable!(collections -> topics (topic_id));
diesel::joinable!(collection_fields -> collections (collection_id));
diesel::joinable!(items -> collections (collection_id));
diesel::joinable!(comments -> items (item_id));
diesel::joinable!(comments -> users (author_id));
diesel::joinable!(item_number_values -> items (item_id));
diesel::joinable!(item_text_values -> items (item_id));
diesel::joinable!(item_multiline_values -> items (item_id));
diesel::joinable!(item_checkbox_values -> items (item_id));
diesel::joinable!(item_date_values -> items (item_id));

diesel::allow_tables_to_appear_in_same_query!(
    users,
    topics,
    collections,
    collection_fields,
    items,
    comments,
    item_number_values,
    item_text_values,
    item_multiline_values,
    item_checkbox_values,
    item_date_values,
);
