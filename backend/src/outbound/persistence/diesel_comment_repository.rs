//! PostgreSQL-backed `CommentRepository` implementation using Diesel.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{CommentRepository, CommentRepositoryError};
use crate::domain::{Comment, CommentId, CommentText, ItemId, UserId};

use super::error_map::{map_diesel_error, map_pool_error};
use super::models::{CommentRow, NewCommentRow};
use super::pool::DbPool;
use super::schema::comments;

/// Diesel-backed implementation of the `CommentRepository` port.
#[derive(Clone)]
pub struct DieselCommentRepository {
    pool: DbPool,
}

impl DieselCommentRepository {
    /// Create a new repository with the given connection pool.
    #[must_use]
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn connection(message: String) -> CommentRepositoryError {
    CommentRepositoryError::connection(message)
}

fn query(message: String) -> CommentRepositoryError {
    CommentRepositoryError::query(message)
}

/// Convert a database row to a domain comment.
fn row_to_comment(row: CommentRow) -> Result<Comment, CommentRepositoryError> {
    let text = CommentText::new(row.body)
        .map_err(|err| query(format!("corrupt comment row {}: {err}", row.id)))?;
    Ok(Comment::new(
        CommentId::from_uuid(row.id),
        ItemId::from_uuid(row.item_id),
        UserId::from_uuid(row.author_id),
        text,
        row.created_at,
    ))
}

#[async_trait]
impl CommentRepository for DieselCommentRepository {
    async fn insert(&self, comment: &Comment) -> Result<(), CommentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(|e| map_pool_error(e, connection))?;
        let row = NewCommentRow {
            id: *comment.id().as_uuid(),
            item_id: *comment.item_id().as_uuid(),
            author_id: *comment.author_id().as_uuid(),
            body: comment.text().as_ref(),
            created_at: comment.created_at(),
        };
        diesel::insert_into(comments::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|err| map_diesel_error(err, connection, query))
    }

    async fn list_for_item(
        &self,
        item_id: &ItemId,
    ) -> Result<Vec<Comment>, CommentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(|e| map_pool_error(e, connection))?;
        let rows: Vec<CommentRow> = comments::table
            .filter(comments::item_id.eq(item_id.as_uuid()))
            .order(comments::created_at.asc())
            .select(CommentRow::as_select())
            .load(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, connection, query))?;
        rows.into_iter().map(row_to_comment).collect()
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for row conversion.
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    #[test]
    fn rows_convert_to_domain_comments() {
        let row = CommentRow {
            id: Uuid::new_v4(),
            item_id: Uuid::new_v4(),
            author_id: Uuid::new_v4(),
            body: "lovely item".to_owned(),
            created_at: Utc::now(),
        };
        let comment = row_to_comment(row).expect("valid row converts");
        assert_eq!(comment.text().as_ref(), "lovely item");
    }

    #[test]
    fn blank_bodies_surface_as_query_errors() {
        let row = CommentRow {
            id: Uuid::new_v4(),
            item_id: Uuid::new_v4(),
            author_id: Uuid::new_v4(),
            body: "   ".to_owned(),
            created_at: Utc::now(),
        };
        let err = row_to_comment(row).expect_err("corrupt row fails");
        assert!(matches!(err, CommentRepositoryError::Query { .. }));
    }
}
