//! Wiring of use-case services onto port implementations.

use std::sync::Arc;

use curio_backend::domain::{CollectionService, CommentService, ItemService, UserService};
use curio_backend::inbound::http::state::HttpState;
use curio_backend::outbound::memory::MemoryStore;
use curio_backend::outbound::persistence::{
    DbPool, DieselCollectionRepository, DieselCommentRepository, DieselFieldRepository,
    DieselFieldValueStore, DieselItemRepository, DieselUserRepository,
};
use curio_backend::outbound::security::BcryptPasswordHasher;

/// Build the HTTP state over Diesel adapters when a pool is available,
/// falling back to the shared in-memory store otherwise.
pub fn build_http_state(db_pool: Option<DbPool>) -> HttpState {
    match db_pool {
        Some(pool) => build_diesel_state(&pool),
        None => {
            tracing::warn!("no database configured; using the in-memory store (dev only)");
            HttpState::with_memory_store(MemoryStore::new())
        }
    }
}

fn build_diesel_state(pool: &DbPool) -> HttpState {
    let users = Arc::new(DieselUserRepository::new(pool.clone()));
    let user_service = Arc::new(UserService::new(
        Arc::clone(&users),
        Arc::new(BcryptPasswordHasher::default()),
    ));
    let collection_service = Arc::new(CollectionService::new(
        Arc::new(DieselCollectionRepository::new(pool.clone())),
        Arc::new(DieselFieldRepository::new(pool.clone())),
        Arc::clone(&users),
    ));
    let item_service = Arc::new(ItemService::new(
        Arc::new(DieselItemRepository::new(pool.clone())),
        Arc::new(DieselCollectionRepository::new(pool.clone())),
        Arc::new(DieselFieldRepository::new(pool.clone())),
        Arc::new(DieselFieldValueStore::new(pool.clone())),
        Arc::clone(&users),
    ));
    let comment_service = Arc::new(CommentService::new(
        Arc::new(DieselCommentRepository::new(pool.clone())),
        Arc::new(DieselItemRepository::new(pool.clone())),
        users,
    ));
    HttpState {
        account: user_service.clone(),
        login: user_service.clone(),
        user_admin: user_service.clone(),
        users: user_service,
        collection_commands: collection_service.clone(),
        collections: collection_service,
        item_commands: item_service.clone(),
        items: item_service,
        comment_commands: comment_service.clone(),
        comments: comment_service,
    }
}
