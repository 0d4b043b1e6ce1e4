//! Driving ports for item comments.

use async_trait::async_trait;

use crate::domain::{Comment, CommentText, Error, ItemId, Requester};

/// Mutating comment use-cases.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CommentCommand: Send + Sync {
    /// Add a comment to an item; any known authenticated user may comment.
    async fn add(
        &self,
        requester: &Requester,
        item_id: &ItemId,
        text: CommentText,
    ) -> Result<Comment, Error>;
}

/// Read-only comment use-cases.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CommentQuery: Send + Sync {
    /// List an item's comments in creation order.
    async fn list_for_item(&self, item_id: &ItemId) -> Result<Vec<Comment>, Error>;
}
