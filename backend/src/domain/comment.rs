//! Comments left by users on items.

use std::fmt;

use chrono::{DateTime, Utc};

use super::ids::{CommentId, ItemId, UserId};

/// Validation errors returned by the comment constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommentValidationError {
    EmptyText,
    TextTooLong { max: usize },
}

impl fmt::Display for CommentValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyText => write!(f, "comment text must not be empty"),
            Self::TextTooLong { max } => {
                write!(f, "comment text must be at most {max} characters")
            }
        }
    }
}

impl std::error::Error for CommentValidationError {}

/// Maximum allowed length for a comment.
pub const COMMENT_MAX: usize = 2000;

/// Validated comment body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentText(String);

impl CommentText {
    /// Validate and construct a [`CommentText`] from raw input.
    pub fn new(text: impl Into<String>) -> Result<Self, CommentValidationError> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(CommentValidationError::EmptyText);
        }
        if text.chars().count() > COMMENT_MAX {
            return Err(CommentValidationError::TextTooLong { max: COMMENT_MAX });
        }
        Ok(Self(text))
    }
}

impl AsRef<str> for CommentText {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for CommentText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

/// A comment referencing one item and one author.
#[derive(Debug, Clone, PartialEq)]
pub struct Comment {
    id: CommentId,
    item_id: ItemId,
    author_id: UserId,
    text: CommentText,
    created_at: DateTime<Utc>,
}

impl Comment {
    /// Build a new [`Comment`] from validated components.
    #[must_use]
    pub fn new(
        id: CommentId,
        item_id: ItemId,
        author_id: UserId,
        text: CommentText,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            item_id,
            author_id,
            text,
            created_at,
        }
    }

    /// Stable comment identifier.
    #[must_use]
    pub fn id(&self) -> &CommentId {
        &self.id
    }

    /// Identifier of the item commented on.
    #[must_use]
    pub fn item_id(&self) -> &ItemId {
        &self.item_id
    }

    /// Identifier of the comment author.
    #[must_use]
    pub fn author_id(&self) -> &UserId {
        &self.author_id
    }

    /// Comment body.
    #[must_use]
    pub fn text(&self) -> &CommentText {
        &self.text
    }

    /// Creation timestamp; comments list in this order.
    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("")]
    #[case("   \n ")]
    fn text_rejects_blank(#[case] input: &str) {
        let err = CommentText::new(input).expect_err("blank text must fail");
        assert_eq!(err, CommentValidationError::EmptyText);
    }

    #[test]
    fn text_rejects_excessive_length() {
        let err = CommentText::new("x".repeat(COMMENT_MAX + 1)).expect_err("too long");
        assert_eq!(err, CommentValidationError::TextTooLong { max: COMMENT_MAX });
    }

    #[test]
    fn interior_whitespace_is_preserved() {
        let text = CommentText::new("lovely\n\nitem").expect("valid text");
        assert_eq!(text.as_ref(), "lovely\n\nitem");
    }
}
