//! Typed item field values and the schema check run before any write.
//!
//! A collection defines a set of typed fields; an item write must supply a
//! value for exactly that set. [`TypedFieldWrites::partition`] enforces the
//! set-equality per field type and splits the accepted values into per-type
//! groups, ready for the independent per-type stores.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::field::{CollectionField, FieldType};
use super::ids::{FieldId, ItemId};

/// A single typed value supplied for one collection field.
///
/// The wire shape is externally tagged by field type:
/// `{"type": "number", "value": 42.0}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "type", content = "value", rename_all = "camelCase")]
pub enum FieldValue {
    Number(f64),
    Text(String),
    MultilineText(String),
    Checkbox(bool),
    Date(DateTime<Utc>),
}

impl FieldValue {
    /// The field type this value satisfies.
    #[must_use]
    pub fn field_type(&self) -> FieldType {
        match self {
            Self::Number(_) => FieldType::Number,
            Self::Text(_) => FieldType::Text,
            Self::MultilineText(_) => FieldType::MultilineText,
            Self::Checkbox(_) => FieldType::Checkbox,
            Self::Date(_) => FieldType::Date,
        }
    }
}

/// Field values supplied for an item, keyed by collection field id.
pub type FieldValueMap = BTreeMap<FieldId, FieldValue>;

/// Composite key addressing one typed value: (item id, collection field id).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FieldValueKey {
    item_id: ItemId,
    field_id: FieldId,
}

impl FieldValueKey {
    /// Derive the composite key for an item/field pair.
    #[must_use]
    pub fn new(item_id: ItemId, field_id: FieldId) -> Self {
        Self { item_id, field_id }
    }

    /// The item component of the key.
    #[must_use]
    pub fn item_id(&self) -> &ItemId {
        &self.item_id
    }

    /// The field component of the key.
    #[must_use]
    pub fn field_id(&self) -> &FieldId {
        &self.field_id
    }
}

impl fmt::Display for FieldValueKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.item_id, self.field_id)
    }
}

/// One per-type discrepancy between the supplied values and the schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSetMismatch {
    /// Field type whose supplied set differs from the defined set.
    pub field_type: FieldType,
    /// Defined fields of this type with no supplied value.
    pub missing: BTreeSet<FieldId>,
    /// Supplied values of this type with no matching defined field.
    pub unexpected: BTreeSet<FieldId>,
}

/// Error returned when an item write does not match the collection schema.
///
/// Carries every per-type discrepancy so clients can repair a request in one
/// round trip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSetError {
    /// All per-type mismatches, in [`FieldType::ALL`] order.
    pub mismatches: Vec<FieldSetMismatch>,
}

impl fmt::Display for FieldSetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "field values do not match the collection schema ({} mismatched type(s))",
            self.mismatches.len()
        )
    }
}

impl std::error::Error for FieldSetError {}

/// Supplied field values partitioned by type, ready for persistence.
///
/// Groups preserve ascending field-id order because the source map is
/// ordered. Construction is only possible through [`Self::partition`], so a
/// value of this type is proof the schema check passed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TypedFieldWrites {
    numbers: Vec<(FieldId, f64)>,
    texts: Vec<(FieldId, String)>,
    multiline_texts: Vec<(FieldId, String)>,
    checkboxes: Vec<(FieldId, bool)>,
    dates: Vec<(FieldId, DateTime<Utc>)>,
}

impl TypedFieldWrites {
    /// Check the supplied values against the collection's defined fields and
    /// split them into per-type groups.
    ///
    /// For every field type the set of supplied field ids must equal the set
    /// of defined field ids — no omissions, no extras, no type confusion. A
    /// value supplied under the wrong type surfaces as missing from its
    /// declared bucket and unexpected in the supplied one.
    ///
    /// # Errors
    ///
    /// Returns [`FieldSetError`] listing every mismatched type. No value is
    /// considered persistable when any mismatch exists.
    pub fn partition(
        fields: &[CollectionField],
        values: FieldValueMap,
    ) -> Result<Self, FieldSetError> {
        let mut mismatches = Vec::new();
        for field_type in FieldType::ALL {
            let defined: BTreeSet<FieldId> = fields
                .iter()
                .filter(|field| field.field_type() == field_type)
                .map(|field| *field.id())
                .collect();
            let supplied: BTreeSet<FieldId> = values
                .iter()
                .filter(|(_, value)| value.field_type() == field_type)
                .map(|(id, _)| *id)
                .collect();
            if defined != supplied {
                mismatches.push(FieldSetMismatch {
                    field_type,
                    missing: defined.difference(&supplied).copied().collect(),
                    unexpected: supplied.difference(&defined).copied().collect(),
                });
            }
        }
        if !mismatches.is_empty() {
            return Err(FieldSetError { mismatches });
        }

        let mut writes = Self::default();
        for (field_id, value) in values {
            match value {
                FieldValue::Number(number) => writes.numbers.push((field_id, number)),
                FieldValue::Text(text) => writes.texts.push((field_id, text)),
                FieldValue::MultilineText(text) => writes.multiline_texts.push((field_id, text)),
                FieldValue::Checkbox(checked) => writes.checkboxes.push((field_id, checked)),
                FieldValue::Date(date) => writes.dates.push((field_id, date)),
            }
        }
        Ok(writes)
    }

    /// Number values in ascending field-id order.
    #[must_use]
    pub fn numbers(&self) -> &[(FieldId, f64)] {
        &self.numbers
    }

    /// Single-line text values in ascending field-id order.
    #[must_use]
    pub fn texts(&self) -> &[(FieldId, String)] {
        &self.texts
    }

    /// Multiline text values in ascending field-id order.
    #[must_use]
    pub fn multiline_texts(&self) -> &[(FieldId, String)] {
        &self.multiline_texts
    }

    /// Checkbox values in ascending field-id order.
    #[must_use]
    pub fn checkboxes(&self) -> &[(FieldId, bool)] {
        &self.checkboxes
    }

    /// Date values in ascending field-id order.
    #[must_use]
    pub fn dates(&self) -> &[(FieldId, DateTime<Utc>)] {
        &self.dates
    }

    /// Reassemble the partitioned values into a single map.
    #[must_use]
    pub fn to_map(&self) -> FieldValueMap {
        let mut map = FieldValueMap::new();
        for (id, number) in &self.numbers {
            map.insert(*id, FieldValue::Number(*number));
        }
        for (id, text) in &self.texts {
            map.insert(*id, FieldValue::Text(text.clone()));
        }
        for (id, text) in &self.multiline_texts {
            map.insert(*id, FieldValue::MultilineText(text.clone()));
        }
        for (id, checked) in &self.checkboxes {
            map.insert(*id, FieldValue::Checkbox(*checked));
        }
        for (id, date) in &self.dates {
            map.insert(*id, FieldValue::Date(*date));
        }
        map
    }
}
