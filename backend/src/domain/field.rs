//! Typed custom field definitions attached to a collection.

use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::ids::{CollectionId, FieldId};

/// Validation errors returned by the field constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValidationError {
    EmptyName,
    NameTooLong { max: usize },
    UnknownType { value: String },
}

impl fmt::Display for FieldValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "field name must not be empty"),
            Self::NameTooLong { max } => write!(f, "field name must be at most {max} characters"),
            Self::UnknownType { value } => write!(f, "unknown field type '{value}'"),
        }
    }
}

impl std::error::Error for FieldValidationError {}

/// Maximum allowed length for a field name.
pub const FIELD_NAME_MAX: usize = 64;

/// The five value shapes a collection field can take.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum FieldType {
    Number,
    Text,
    MultilineText,
    Checkbox,
    Date,
}

impl FieldType {
    /// All field types in a stable order, used for per-type set checks.
    pub const ALL: [FieldType; 5] = [
        FieldType::Number,
        FieldType::Text,
        FieldType::MultilineText,
        FieldType::Checkbox,
        FieldType::Date,
    ];

    /// Stable string used in the relational store.
    #[must_use]
    pub fn as_db_str(&self) -> &'static str {
        match self {
            Self::Number => "number",
            Self::Text => "text",
            Self::MultilineText => "multiline_text",
            Self::Checkbox => "checkbox",
            Self::Date => "date",
        }
    }

    /// Parse the stable database string back into a [`FieldType`].
    pub fn from_db_str(value: &str) -> Result<Self, FieldValidationError> {
        match value {
            "number" => Ok(Self::Number),
            "text" => Ok(Self::Text),
            "multiline_text" => Ok(Self::MultilineText),
            "checkbox" => Ok(Self::Checkbox),
            "date" => Ok(Self::Date),
            other => Err(FieldValidationError::UnknownType {
                value: other.to_owned(),
            }),
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_db_str())
    }
}

/// Validated field name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldName(String);

impl FieldName {
    /// Validate and construct a [`FieldName`] from raw input.
    pub fn new(name: impl Into<String>) -> Result<Self, FieldValidationError> {
        let name = name.into();
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(FieldValidationError::EmptyName);
        }
        if trimmed.chars().count() > FIELD_NAME_MAX {
            return Err(FieldValidationError::NameTooLong {
                max: FIELD_NAME_MAX,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for FieldName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for FieldName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

/// A typed field definition belonging to one collection.
///
/// Items in the collection must supply a value for every defined field, and
/// for no field outside this set.
#[derive(Debug, Clone, PartialEq)]
pub struct CollectionField {
    id: FieldId,
    collection_id: CollectionId,
    name: FieldName,
    field_type: FieldType,
}

impl CollectionField {
    /// Build a new [`CollectionField`] from validated components.
    #[must_use]
    pub fn new(
        id: FieldId,
        collection_id: CollectionId,
        name: FieldName,
        field_type: FieldType,
    ) -> Self {
        Self {
            id,
            collection_id,
            name,
            field_type,
        }
    }

    /// Stable field identifier.
    #[must_use]
    pub fn id(&self) -> &FieldId {
        &self.id
    }

    /// Identifier of the owning collection.
    #[must_use]
    pub fn collection_id(&self) -> &CollectionId {
        &self.collection_id
    }

    /// Field name shown to users.
    #[must_use]
    pub fn name(&self) -> &FieldName {
        &self.name
    }

    /// Declared value shape for this field.
    #[must_use]
    pub fn field_type(&self) -> FieldType {
        self.field_type
    }
}
