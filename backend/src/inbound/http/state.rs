//! Shared HTTP adapter state.
//!
//! Handlers accept this state via `actix_web::web::Data` so they depend only
//! on domain driving ports and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    AccountCommand, CollectionCommand, CollectionQuery, CommentCommand, CommentQuery,
    ItemCommand, ItemQuery, LoginService, UserAdminCommand, UsersQuery,
};
use crate::domain::{CollectionService, CommentService, ItemService, UserService};
use crate::outbound::memory::MemoryStore;
use crate::outbound::security::BcryptPasswordHasher;

/// Dependency bundle for HTTP handlers, one field per driving port.
#[derive(Clone)]
pub struct HttpState {
    /// Sign-up use-case.
    pub account: Arc<dyn AccountCommand>,
    /// Sign-in use-case.
    pub login: Arc<dyn LoginService>,
    /// Admin user mutations.
    pub user_admin: Arc<dyn UserAdminCommand>,
    /// User reads.
    pub users: Arc<dyn UsersQuery>,
    /// Collection mutations.
    pub collection_commands: Arc<dyn CollectionCommand>,
    /// Collection reads.
    pub collections: Arc<dyn CollectionQuery>,
    /// Item mutations.
    pub item_commands: Arc<dyn ItemCommand>,
    /// Item reads.
    pub items: Arc<dyn ItemQuery>,
    /// Comment mutations.
    pub comment_commands: Arc<dyn CommentCommand>,
    /// Comment reads.
    pub comments: Arc<dyn CommentQuery>,
}

impl HttpState {
    /// Wire every use-case over one shared [`MemoryStore`].
    ///
    /// Backs the database-less development server and the test suites; the
    /// binary wires Diesel adapters instead when a database is configured.
    #[must_use]
    pub fn with_memory_store(store: MemoryStore) -> Self {
        let users = Arc::new(store.clone());
        let user_service = Arc::new(UserService::new(
            Arc::clone(&users),
            Arc::new(BcryptPasswordHasher::default()),
        ));
        let collection_service = Arc::new(CollectionService::new(
            Arc::new(store.clone()),
            Arc::new(store.clone()),
            Arc::clone(&users),
        ));
        let item_service = Arc::new(ItemService::new(
            Arc::new(store.clone()),
            Arc::new(store.clone()),
            Arc::new(store.clone()),
            Arc::new(store.clone()),
            Arc::clone(&users),
        ));
        let comment_service = Arc::new(CommentService::new(
            Arc::new(store.clone()),
            Arc::new(store),
            users,
        ));
        Self {
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
}
