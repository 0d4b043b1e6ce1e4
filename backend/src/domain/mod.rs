//! Domain layer: entities, ports, and use-case services.
//!
//! Types here are transport and storage agnostic. Entities carry validated
//! constructors and document their invariants; services compose repository
//! ports with the authorization guard; everything fallible returns the
//! typed [`Error`] envelope rather than panicking.

mod access;
mod auth;
mod collection;
mod collection_service;
mod comment;
mod comment_service;
mod error;
mod field;
mod field_value;
mod ids;
mod item;
mod item_service;
pub mod ports;
mod trace_id;
mod user;
mod user_service;

pub use self::access::{AccessGuard, Requester};
pub use self::auth::{
    CredentialsValidationError, PASSWORD_MIN, PasswordPolicyError, PlainPassword,
    SignInCredentials,
};
pub use self::collection::{
    COLLECTION_NAME_MAX, Collection, CollectionName, CollectionValidationError, ImageUrl, TOPIC_MAX,
    Topic,
};
pub use self::collection_service::CollectionService;
pub use self::comment::{COMMENT_MAX, Comment, CommentText, CommentValidationError};
pub use self::comment_service::CommentService;
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::field::{
    CollectionField, FIELD_NAME_MAX, FieldName, FieldType, FieldValidationError,
};
pub use self::field_value::{
    FieldSetError, FieldSetMismatch, FieldValue, FieldValueKey, FieldValueMap, TypedFieldWrites,
};
pub use self::ids::{CollectionId, CommentId, FieldId, IdValidationError, ItemId, UserId};
pub use self::item::{ITEM_NAME_MAX, Item, ItemName, ItemValidationError, TAG_MAX, Tag};
pub use self::item_service::ItemService;
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{
    Email, FULLNAME_MAX, Fullname, PasswordHash, User, UserValidationError,
};
pub use self::user_service::UserService;

/// Convenient result alias for domain operations.
pub type DomainResult<T> = Result<T, Error>;
