//! Validated UUID identifier newtypes for every aggregate.
//!
//! Each entity gets its own identifier type so ids cannot be crossed between
//! aggregates by accident. All identifiers are UUID v4 underneath and share
//! the same constructor surface, generated by `define_entity_id!`.

use uuid::Uuid;

/// Validation error returned when parsing an identifier from a string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdValidationError {
    /// The input was empty.
    Empty,
    /// The input was not a valid UUID.
    InvalidUuid,
}

impl std::fmt::Display for IdValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "identifier must not be empty"),
            Self::InvalidUuid => write!(f, "identifier must be a valid UUID"),
        }
    }
}

impl std::error::Error for IdValidationError {}

macro_rules! define_entity_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            PartialOrd,
            Ord,
            Hash,
            serde::Serialize,
            serde::Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Generate a new random identifier.
            #[must_use]
            pub fn random() -> Self {
                Self(Uuid::new_v4())
            }

            /// Wrap an existing UUID.
            #[must_use]
            pub fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Parse an identifier from string input.
            pub fn parse(input: impl AsRef<str>) -> Result<Self, IdValidationError> {
                let raw = input.as_ref();
                if raw.is_empty() {
                    return Err(IdValidationError::Empty);
                }
                Uuid::parse_str(raw)
                    .map(Self)
                    .map_err(|_| IdValidationError::InvalidUuid)
            }

            /// Access the underlying UUID.
            #[must_use]
            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<$name> for Uuid {
            fn from(value: $name) -> Self {
                value.0
            }
        }
    };
}

define_entity_id! {
    /// Stable user identifier.
    UserId
}

define_entity_id! {
    /// Stable collection identifier.
    CollectionId
}

define_entity_id! {
    /// Stable collection field identifier.
    FieldId
}

define_entity_id! {
    /// Stable item identifier.
    ItemId
}

define_entity_id! {
    /// Stable comment identifier.
    CommentId
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", IdValidationError::Empty)]
    #[case("not-a-uuid", IdValidationError::InvalidUuid)]
    #[case(" 123e4567-e89b-12d3-a456-426614174000", IdValidationError::InvalidUuid)]
    fn parse_rejects_invalid_input(#[case] input: &str, #[case] expected: IdValidationError) {
        let err = UserId::parse(input).expect_err("invalid input must fail");
        assert_eq!(err, expected);
    }

    #[test]
    fn parse_round_trips_display() {
        let id = ItemId::random();
        let parsed = ItemId::parse(id.to_string()).expect("valid uuid");
        assert_eq!(parsed, id);
    }

    #[test]
    fn serialises_as_plain_uuid_string() {
        let id = CollectionId::from_uuid(Uuid::nil());
        let value = serde_json::to_value(id).expect("serialise id");
        assert_eq!(value, serde_json::json!("00000000-0000-0000-0000-000000000000"));
    }
}
