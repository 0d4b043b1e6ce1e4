//! Diesel persistence adapters for the domain's driven ports.

mod diesel_collection_repository;
mod diesel_comment_repository;
mod diesel_field_repository;
mod diesel_field_value_store;
mod diesel_item_repository;
mod diesel_user_repository;
mod error_map;
mod models;
mod pool;
pub mod schema;

pub use diesel_collection_repository::DieselCollectionRepository;
pub use diesel_comment_repository::DieselCommentRepository;
pub use diesel_field_repository::DieselFieldRepository;
pub use diesel_field_value_store::DieselFieldValueStore;
pub use diesel_item_repository::DieselItemRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use pool::{DbPool, PoolConfig, PoolError};
