//! Collection aggregate: a named, topic-tagged group of items owned by a user.

use std::fmt;

use url::Url;

use super::ids::{CollectionId, UserId};

/// Validation errors returned by the collection constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CollectionValidationError {
    EmptyName,
    NameTooLong { max: usize },
    EmptyTopic,
    TopicTooLong { max: usize },
    InvalidImageUrl,
}

impl fmt::Display for CollectionValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "collection name must not be empty"),
            Self::NameTooLong { max } => {
                write!(f, "collection name must be at most {max} characters")
            }
            Self::EmptyTopic => write!(f, "topic must not be empty"),
            Self::TopicTooLong { max } => write!(f, "topic must be at most {max} characters"),
            Self::InvalidImageUrl => write!(f, "image must be an absolute http(s) URL"),
        }
    }
}

impl std::error::Error for CollectionValidationError {}

/// Maximum allowed length for a collection name.
pub const COLLECTION_NAME_MAX: usize = 120;
/// Maximum allowed length for a topic name.
pub const TOPIC_MAX: usize = 64;

/// Validated collection name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionName(String);

impl CollectionName {
    /// Validate and construct a [`CollectionName`] from raw input.
    pub fn new(name: impl Into<String>) -> Result<Self, CollectionValidationError> {
        let name = name.into();
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(CollectionValidationError::EmptyName);
        }
        if trimmed.chars().count() > COLLECTION_NAME_MAX {
            return Err(CollectionValidationError::NameTooLong {
                max: COLLECTION_NAME_MAX,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for CollectionName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for CollectionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

/// Topic a collection is filed under, e.g. "Books" or "Coins".
///
/// Topics are shared between collections; the repository resolves the name to
/// a `topics` row, creating one when it first appears.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Topic(String);

impl Topic {
    /// Validate and construct a [`Topic`] from raw input.
    pub fn new(topic: impl Into<String>) -> Result<Self, CollectionValidationError> {
        let topic = topic.into();
        let trimmed = topic.trim();
        if trimmed.is_empty() {
            return Err(CollectionValidationError::EmptyTopic);
        }
        if trimmed.chars().count() > TOPIC_MAX {
            return Err(CollectionValidationError::TopicTooLong { max: TOPIC_MAX });
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for Topic {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

/// Validated absolute URL pointing at a collection cover image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUrl(String);

impl ImageUrl {
    /// Validate and construct an [`ImageUrl`] from raw input.
    pub fn new(url: impl AsRef<str>) -> Result<Self, CollectionValidationError> {
        let raw = url.as_ref().trim();
        let parsed = Url::parse(raw).map_err(|_| CollectionValidationError::InvalidImageUrl)?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(CollectionValidationError::InvalidImageUrl);
        }
        Ok(Self(raw.to_owned()))
    }
}

impl AsRef<str> for ImageUrl {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for ImageUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

/// A named group of items owned by exactly one user.
#[derive(Debug, Clone, PartialEq)]
pub struct Collection {
    id: CollectionId,
    name: CollectionName,
    owner_id: UserId,
    topic: Topic,
    image_url: Option<ImageUrl>,
}

impl Collection {
    /// Build a new [`Collection`] from validated components.
    #[must_use]
    pub fn new(
        id: CollectionId,
        name: CollectionName,
        owner_id: UserId,
        topic: Topic,
        image_url: Option<ImageUrl>,
    ) -> Self {
        Self {
            id,
            name,
            owner_id,
            topic,
            image_url,
        }
    }

    /// Stable collection identifier.
    #[must_use]
    pub fn id(&self) -> &CollectionId {
        &self.id
    }

    /// Collection name shown to users.
    #[must_use]
    pub fn name(&self) -> &CollectionName {
        &self.name
    }

    /// Identifier of the owning user.
    #[must_use]
    pub fn owner_id(&self) -> &UserId {
        &self.owner_id
    }

    /// Topic the collection is filed under.
    #[must_use]
    pub fn topic(&self) -> &Topic {
        &self.topic
    }

    /// Optional cover image URL.
    #[must_use]
    pub fn image_url(&self) -> Option<&ImageUrl> {
        self.image_url.as_ref()
    }

    /// Copy of this collection with its mutable attributes replaced.
    ///
    /// Ownership never changes; only the explicit delete use-case removes a
    /// collection from its owner.
    #[must_use]
    pub fn with_attributes(
        mut self,
        name: CollectionName,
        topic: Topic,
        image_url: Option<ImageUrl>,
    ) -> Self {
        self.name = name;
        self.topic = topic;
        self.image_url = image_url;
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
    #[case("   ")]
    fn name_rejects_blank(#[case] input: &str) {
        let err = CollectionName::new(input).expect_err("blank name must fail");
        assert_eq!(err, CollectionValidationError::EmptyName);
    }

    #[test]
    fn name_rejects_excessive_length() {
        let err = CollectionName::new("x".repeat(COLLECTION_NAME_MAX + 1)).expect_err("too long");
        assert_eq!(
            err,
            CollectionValidationError::NameTooLong {
                max: COLLECTION_NAME_MAX
            }
        );
    }

    #[rstest]
    #[case("not a url")]
    #[case("ftp://example.com/cover.png")]
    #[case("/relative/cover.png")]
    fn image_url_rejects_non_http_input(#[case] input: &str) {
        let err = ImageUrl::new(input).expect_err("invalid url must fail");
        assert_eq!(err, CollectionValidationError::InvalidImageUrl);
    }

    #[test]
    fn image_url_accepts_https() {
        let url = ImageUrl::new("https://img.example.com/cover.png").expect("valid url");
        assert_eq!(url.as_ref(), "https://img.example.com/cover.png");
    }

    #[test]
    fn with_attributes_keeps_identity_and_owner() {
        let owner = UserId::random();
        let collection = Collection::new(
            CollectionId::random(),
            CollectionName::new("Stamps").expect("valid name"),
            owner,
            Topic::new("Philately").expect("valid topic"),
            None,
        );
        let id = *collection.id();
        let updated = collection.with_attributes(
            CollectionName::new("Rare stamps").expect("valid name"),
            Topic::new("Philately").expect("valid topic"),
            Some(ImageUrl::new("https://img.example.com/s.png").expect("valid url")),
        );
        assert_eq!(updated.id(), &id);
        assert_eq!(updated.owner_id(), &owner);
        assert_eq!(updated.name().as_ref(), "Rare stamps");
        assert!(updated.image_url().is_some());
    }
}
