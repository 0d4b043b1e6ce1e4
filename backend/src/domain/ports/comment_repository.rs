//! Driven port for comment persistence.

use async_trait::async_trait;

use super::define_port_error;
use crate::domain::{Comment, ItemId};

define_port_error! {
    /// Persistence errors raised by [`CommentRepository`] adapters.
    pub enum CommentRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "comment repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "comment repository query failed: {message}",
    }
}

/// Persistence port for item comments.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CommentRepository: Send + Sync {
    /// Insert a new comment record.
    async fn insert(&self, comment: &Comment) -> Result<(), CommentRepositoryError>;

    /// List an item's comments in creation order.
    async fn list_for_item(&self, item_id: &ItemId)
    -> Result<Vec<Comment>, CommentRepositoryError>;
}
