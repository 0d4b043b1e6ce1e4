//! Domain ports for the hexagonal boundary.
//!
//! Driven ports (repositories, stores, the hasher) describe what the domain
//! expects from adapters; each exposes a typed error enum so adapters map
//! their failures into predictable variants instead of `anyhow::Result`.
//! Driving ports are the use-case traits inbound adapters call.

mod macros;
pub(crate) use macros::define_port_error;

mod account;
mod collection_repository;
mod collections;
mod comment_repository;
mod comments;
mod field_repository;
mod field_value_store;
mod item_repository;
mod items;
mod password_hasher;
mod user_admin;
mod user_repository;

#[cfg(test)]
pub use account::{MockAccountCommand, MockLoginService};
pub use account::{AccountCommand, LoginService, SignUpRequest};
#[cfg(test)]
pub use collection_repository::MockCollectionRepository;
pub use collection_repository::{CollectionRepository, CollectionRepositoryError};
#[cfg(test)]
pub use collections::{MockCollectionCommand, MockCollectionQuery};
pub use collections::{
    CollectionCommand, CollectionQuery, CollectionWithFields, CreateCollectionRequest,
    FieldDefinition, UpdateCollectionRequest,
};
#[cfg(test)]
pub use comment_repository::MockCommentRepository;
pub use comment_repository::{CommentRepository, CommentRepositoryError};
#[cfg(test)]
pub use comments::{MockCommentCommand, MockCommentQuery};
pub use comments::{CommentCommand, CommentQuery};
#[cfg(test)]
pub use field_repository::MockCollectionFieldRepository;
pub use field_repository::{CollectionFieldRepository, FieldRepositoryError};
#[cfg(test)]
pub use field_value_store::MockFieldValueStore;
pub use field_value_store::{FieldValueStore, FieldValueStoreError};
#[cfg(test)]
pub use item_repository::MockItemRepository;
pub use item_repository::{ItemRepository, ItemRepositoryError};
#[cfg(test)]
pub use items::{MockItemCommand, MockItemQuery};
pub use items::{ItemCommand, ItemQuery, ItemWithValues, ItemWrite};
#[cfg(test)]
pub use password_hasher::MockPasswordHasher;
pub use password_hasher::{PasswordHasher, PasswordHasherError};
#[cfg(test)]
pub use user_admin::{MockUserAdminCommand, MockUsersQuery};
pub use user_admin::{UserAdminCommand, UsersQuery};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserRepository, UserRepositoryError};
