//! Comment use-cases.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::access::AccessGuard;
use crate::domain::ports::{
    CommentCommand, CommentQuery, CommentRepository, CommentRepositoryError, ItemRepository,
    ItemRepositoryError, UserRepository,
};
use crate::domain::{Comment, CommentId, CommentText, Error, Item, ItemId, Requester};

/// Comment service implementing the command and query driving ports.
#[derive(Clone)]
pub struct CommentService<Cm, I, U> {
    comments: Arc<Cm>,
    items: Arc<I>,
    guard: AccessGuard<U>,
}

impl<Cm, I, U> CommentService<Cm, I, U>
where
    U: UserRepository,
{
    /// Create a new service over the given repositories.
    pub fn new(comments: Arc<Cm>, items: Arc<I>, users: Arc<U>) -> Self {
        Self {
            comments,
            items,
            guard: AccessGuard::new(users),
        }
    }
}

fn map_comment_error(error: CommentRepositoryError) -> Error {
    match error {
        CommentRepositoryError::Connection { message } => Error::service_unavailable(message),
        CommentRepositoryError::Query { message } => Error::internal(message),
    }
}

fn map_item_error(error: ItemRepositoryError) -> Error {
    match error {
        ItemRepositoryError::Connection { message } => Error::service_unavailable(message),
        ItemRepositoryError::Query { message } => Error::internal(message),
    }
}

impl<Cm, I, U> CommentService<Cm, I, U>
where
    Cm: CommentRepository,
    I: ItemRepository,
    U: UserRepository,
{
    async fn fetch_item(&self, id: &ItemId) -> Result<Item, Error> {
        self.items
            .find_by_id(id)
            .await
            .map_err(map_item_error)?
            .ok_or_else(|| Error::not_found("no such item"))
    }
}

#[async_trait]
impl<Cm, I, U> CommentCommand for CommentService<Cm, I, U>
where
    Cm: CommentRepository,
    I: ItemRepository,
    U: UserRepository,
{
    async fn add(
        &self,
        requester: &Requester,
        item_id: &ItemId,
        text: CommentText,
    ) -> Result<Comment, Error> {
        let author = self.guard.require_known(requester).await?;
        let item = self.fetch_item(item_id).await?;
        let comment = Comment::new(
            CommentId::random(),
            *item.id(),
            *author.id(),
            text,
            chrono::Utc::now(),
        );
        self.comments
            .insert(&comment)
            .await
            .map_err(map_comment_error)?;
        Ok(comment)
    }
}

#[async_trait]
impl<Cm, I, U> CommentQuery for CommentService<Cm, I, U>
where
    Cm: CommentRepository,
    I: ItemRepository,
    U: UserRepository,
{
    async fn list_for_item(&self, item_id: &ItemId) -> Result<Vec<Comment>, Error> {
        self.fetch_item(item_id).await?;
        self.comments
            .list_for_item(item_id)
            .await
            .map_err(map_comment_error)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for the comment use-cases.
    use std::collections::BTreeSet;

    use super::*;
    use crate::domain::ports::{
        MockCommentRepository, MockItemRepository, MockUserRepository,
    };
    use crate::domain::{
        CollectionId, Email, ErrorCode, Fullname, ItemName, PasswordHash, User, UserId,
    };

    fn known_user(id: UserId) -> User {
        User::from_parts(
            id,
            Email::new("ada@example.com").expect("valid email"),
            Fullname::new("Ada Lovelace").expect("valid fullname"),
            false,
            false,
            PasswordHash::new("$2b$10$stored").expect("valid hash"),
        )
    }

    fn stored_item() -> Item {
        Item::new(
            ItemId::random(),
            CollectionId::random(),
            ItemName::new("Penny Black").expect("valid name"),
            BTreeSet::new(),
            chrono::Utc::now(),
        )
    }

    fn service(
        comments: MockCommentRepository,
        items: MockItemRepository,
        users: MockUserRepository,
    ) -> CommentService<MockCommentRepository, MockItemRepository, MockUserRepository> {
        CommentService::new(Arc::new(comments), Arc::new(items), Arc::new(users))
    }

    #[tokio::test]
    async fn any_known_user_may_comment() {
        let author_id = UserId::random();
        let author = known_user(author_id);
        let item = stored_item();
        let item_id = *item.id();

        let mut users = MockUserRepository::new();
        users
            .expect_find_by_id()
            .times(1)
            .return_once(move |_| Ok(Some(author)));
        let mut items = MockItemRepository::new();
        items
            .expect_find_by_id()
            .times(1)
            .return_once(move |_| Ok(Some(item)));
        let mut comments = MockCommentRepository::new();
        comments.expect_insert().times(1).return_once(|_| Ok(()));

        let comment = service(comments, items, users)
            .add(
                &Requester::authenticated(author_id),
                &item_id,
                CommentText::new("lovely").expect("valid text"),
            )
            .await
            .expect("comment succeeds");
        assert_eq!(comment.author_id(), &author_id);
        assert_eq!(comment.item_id(), &item_id);
    }

    #[tokio::test]
    async fn unknown_requesters_may_not_comment() {
        let mut users = MockUserRepository::new();
        users.expect_find_by_id().times(1).return_once(|_| Ok(None));
        let mut comments = MockCommentRepository::new();
        comments.expect_insert().times(0);

        let err = service(comments, MockItemRepository::new(), users)
            .add(
                &Requester::authenticated(UserId::random()),
                &ItemId::random(),
                CommentText::new("lovely").expect("valid text"),
            )
            .await
            .expect_err("unknown requester denied");
        assert_eq!(err.code(), ErrorCode::NotAuthorized);
    }

    #[tokio::test]
    async fn commenting_on_a_missing_item_is_not_found() {
        let author_id = UserId::random();
        let author = known_user(author_id);
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_id()
            .times(1)
            .return_once(move |_| Ok(Some(author)));
        let mut items = MockItemRepository::new();
        items.expect_find_by_id().times(1).return_once(|_| Ok(None));

        let err = service(MockCommentRepository::new(), items, users)
            .add(
                &Requester::authenticated(author_id),
                &ItemId::random(),
                CommentText::new("lovely").expect("valid text"),
            )
            .await
            .expect_err("missing item fails");
        assert_eq!(err.code(), ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn listing_returns_comments_in_creation_order() {
        let item = stored_item();
        let item_id = *item.id();
        let first = Comment::new(
            crate::domain::CommentId::random(),
            item_id,
            UserId::random(),
            CommentText::new("first").expect("valid text"),
            chrono::Utc::now(),
        );
        let second = Comment::new(
            crate::domain::CommentId::random(),
            item_id,
            UserId::random(),
            CommentText::new("second").expect("valid text"),
            chrono::Utc::now(),
        );
        let listed = vec![first.clone(), second.clone()];

        let mut items = MockItemRepository::new();
        items
            .expect_find_by_id()
            .times(1)
            .return_once(move |_| Ok(Some(item)));
        let mut comments = MockCommentRepository::new();
        comments
            .expect_list_for_item()
            .times(1)
            .return_once(move |_| Ok(listed));

        let fetched = service(comments, items, MockUserRepository::new())
            .list_for_item(&item_id)
            .await
            .expect("list succeeds");
        assert_eq!(fetched, vec![first, second]);
    }
}
