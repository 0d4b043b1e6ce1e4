//! Item aggregate: a record within a collection carrying tags and typed
//! field values.

use std::collections::BTreeSet;
use std::fmt;

use chrono::{DateTime, Utc};

use super::ids::{CollectionId, ItemId};

/// Validation errors returned by the item constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemValidationError {
    EmptyName,
    NameTooLong { max: usize },
    EmptyTag,
    TagTooLong { max: usize },
}

impl fmt::Display for ItemValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "item name must not be empty"),
            Self::NameTooLong { max } => write!(f, "item name must be at most {max} characters"),
            Self::EmptyTag => write!(f, "tags must not be empty"),
            Self::TagTooLong { max } => write!(f, "tags must be at most {max} characters"),
        }
    }
}

impl std::error::Error for ItemValidationError {}

/// Maximum allowed length for an item name.
pub const ITEM_NAME_MAX: usize = 120;
/// Maximum allowed length for a single tag.
pub const TAG_MAX: usize = 50;

/// Validated item name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemName(String);

impl ItemName {
    /// Validate and construct an [`ItemName`] from raw input.
    pub fn new(name: impl Into<String>) -> Result<Self, ItemValidationError> {
        let name = name.into();
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(ItemValidationError::EmptyName);
        }
        if trimmed.chars().count() > ITEM_NAME_MAX {
            return Err(ItemValidationError::NameTooLong { max: ITEM_NAME_MAX });
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for ItemName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for ItemName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

/// A single free-form tag attached to an item.
///
/// Tags are trimmed and lowercased so the set semantics of
/// [`Item::tags`] are case-insensitive.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Tag(String);

impl Tag {
    /// Validate and construct a [`Tag`] from raw input.
    pub fn new(tag: impl AsRef<str>) -> Result<Self, ItemValidationError> {
        let trimmed = tag.as_ref().trim();
        if trimmed.is_empty() {
            return Err(ItemValidationError::EmptyTag);
        }
        if trimmed.chars().count() > TAG_MAX {
            return Err(ItemValidationError::TagTooLong { max: TAG_MAX });
        }
        Ok(Self(trimmed.to_lowercase()))
    }
}

impl AsRef<str> for Tag {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

/// A record within a collection.
///
/// Typed field values are stored separately, keyed by (item id, field id);
/// see the field value ports.
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    id: ItemId,
    collection_id: CollectionId,
    name: ItemName,
    tags: BTreeSet<Tag>,
    created_at: DateTime<Utc>,
}

impl Item {
    /// Build a new [`Item`] from validated components.
    #[must_use]
    pub fn new(
        id: ItemId,
        collection_id: CollectionId,
        name: ItemName,
        tags: BTreeSet<Tag>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            collection_id,
            name,
            tags,
            created_at,
        }
    }

    /// Stable item identifier.
    #[must_use]
    pub fn id(&self) -> &ItemId {
        &self.id
    }

    /// Identifier of the owning collection.
    #[must_use]
    pub fn collection_id(&self) -> &CollectionId {
        &self.collection_id
    }

    /// Item name shown to users.
    #[must_use]
    pub fn name(&self) -> &ItemName {
        &self.name
    }

    /// The item's tag set.
    #[must_use]
    pub fn tags(&self) -> &BTreeSet<Tag> {
        &self.tags
    }

    /// Creation timestamp.
    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Copy of this item with name and tags replaced.
    ///
    /// Identity, owning collection, and the creation timestamp are fixed for
    /// the lifetime of the item.
    #[must_use]
    pub fn with_content(mut self, name: ItemName, tags: BTreeSet<Tag>) -> Self {
        self.name = name;
        self.tags = tags;
        self
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("")]
    #[case("  ")]
    fn tag_rejects_blank(#[case] input: &str) {
        let err = Tag::new(input).expect_err("blank tag must fail");
        assert_eq!(err, ItemValidationError::EmptyTag);
    }

    #[test]
    fn tags_normalise_to_lowercase() {
        let tag = Tag::new("  Vintage ").expect("valid tag");
        assert_eq!(tag.as_ref(), "vintage");
    }

    #[test]
    fn duplicate_tags_collapse_in_the_set() {
        let tags: BTreeSet<Tag> = ["rare", "Rare", "RARE"]
            .iter()
            .map(|raw| Tag::new(raw).expect("valid tag"))
            .collect();
        assert_eq!(tags.len(), 1);
    }

    #[test]
    fn with_content_preserves_identity() {
        let id = ItemId::random();
        let collection_id = CollectionId::random();
        let created_at = Utc::now();
        let item = Item::new(
            id,
            collection_id,
            ItemName::new("Penny Black").expect("valid name"),
            BTreeSet::new(),
            created_at,
        );
        let tags: BTreeSet<Tag> = [Tag::new("stamp").expect("valid tag")].into_iter().collect();
        let updated = item.with_content(ItemName::new("Penny Red").expect("valid name"), tags);
        assert_eq!(updated.id(), &id);
        assert_eq!(updated.collection_id(), &collection_id);
        assert_eq!(updated.created_at(), created_at);
        assert_eq!(updated.name().as_ref(), "Penny Red");
    }
}
