//! Comment API handlers.
//!
//! ```text
//! POST /api/v1/items/{id}/comments
//! GET  /api/v1/items/{id}/comments
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::{Comment, CommentText, CommentValidationError, Error, ItemId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Wire representation of a comment.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CommentDto {
    pub id: String,
    pub item_id: String,
    pub author_id: String,
    pub text: String,
    #[schema(value_type = String, example = "2026-01-01T00:00:00Z")]
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl From<Comment> for CommentDto {
    fn from(comment: Comment) -> Self {
        Self {
            id: comment.id().to_string(),
            item_id: comment.item_id().to_string(),
            author_id: comment.author_id().to_string(),
            text: comment.text().to_string(),
            created_at: comment.created_at(),
        }
    }
}

/// Request body for `POST /api/v1/items/{id}/comments`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddCommentBody {
    pub text: String,
}

fn map_comment_validation_error(err: &CommentValidationError) -> Error {
    Error::invalid_request(err.to_string()).with_details(json!({ "field": "text" }))
}

/// Add a comment to an item; any signed-in user may comment.
#[utoipa::path(
    post,
    path = "/api/v1/items/{id}/comments",
    params(("id" = Uuid, Path, description = "Item id")),
    request_body = AddCommentBody,
    responses(
        (status = 201, description = "Comment added", body = CommentDto),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "No session", body = Error),
        (status = 404, description = "No such item", body = Error)
    ),
    tags = ["comments"],
    operation_id = "addComment"
)]
#[post("/items/{id}/comments")]
pub async fn add_comment(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<Uuid>,
    payload: web::Json<AddCommentBody>,
) -> ApiResult<HttpResponse> {
    let requester = session.requester()?;
    let item_id = ItemId::from_uuid(path.into_inner());
    let text = CommentText::new(payload.into_inner().text)
        .map_err(|err| map_comment_validation_error(&err))?;
    let comment = state
        .comment_commands
        .add(&requester, &item_id, text)
        .await?;
    Ok(HttpResponse::Created().json(CommentDto::from(comment)))
}

/// List an item's comments in creation order.
#[utoipa::path(
    get,
    path = "/api/v1/items/{id}/comments",
    params(("id" = Uuid, Path, description = "Item id")),
    responses(
        (status = 200, description = "Comments", body = [CommentDto]),
        (status = 404, description = "No such item", body = Error)
    ),
    tags = ["comments"],
    operation_id = "listComments",
    security([])
)]
#[get("/items/{id}/comments")]
pub async fn list_comments(
    state: web::Data<HttpState>,
    path: web::Path<Uuid>,
) -> ApiResult<web::Json<Vec<CommentDto>>> {
    let item_id = ItemId::from_uuid(path.into_inner());
    let comments = state.comments.list_for_item(&item_id).await?;
    Ok(web::Json(
        comments.into_iter().map(CommentDto::from).collect(),
    ))
}

#[cfg(test)]
mod tests {
    //! End-to-end coverage for the comment endpoints.
    use actix_web::http::StatusCode;
    use actix_web::{App, test as actix_test};
    use serde_json::{Value, json};

    use crate::inbound::http::test_utils::{TestHarness, seed_user};

    #[actix_web::test]
    async fn commenting_requires_a_session() {
        let harness = TestHarness::new();
        let app = actix_test::init_service(App::new().configure(harness.configure())).await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri(&format!("/api/v1/items/{}/comments", uuid::Uuid::new_v4()))
                .set_json(json!({ "text": "lovely" }))
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn any_user_may_comment_on_any_item() {
        let harness = TestHarness::new();
        seed_user(&harness.store, "ada@example.com", "longenough", false, false).await;
        seed_user(&harness.store, "bob@example.com", "longenough", false, false).await;
        let app = actix_test::init_service(App::new().configure(harness.configure())).await;

        // Ada owns the collection and the item.
        let ada = harness.login(&app, "ada@example.com", "longenough").await;
        let created = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/collections")
                .cookie(ada.clone())
                .set_json(json!({ "name": "Stamps", "topic": "Philately" }))
                .to_request(),
        )
        .await;
        let body: Value = actix_test::read_body_json(created).await;
        let collection_id = body
            .pointer("/collection/id")
            .and_then(Value::as_str)
            .expect("collection id")
            .to_owned();
        let created = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri(&format!("/api/v1/collections/{collection_id}/items"))
                .cookie(ada)
                .set_json(json!({ "name": "Penny Black" }))
                .to_request(),
        )
        .await;
        let body: Value = actix_test::read_body_json(created).await;
        let item_id = body
            .pointer("/item/id")
            .and_then(Value::as_str)
            .expect("item id")
            .to_owned();

        // Bob, who owns nothing, comments on it.
        let bob = harness.login(&app, "bob@example.com", "longenough").await;
        let commented = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri(&format!("/api/v1/items/{item_id}/comments"))
                .cookie(bob)
                .set_json(json!({ "text": "lovely stamp" }))
                .to_request(),
        )
        .await;
        assert_eq!(commented.status(), StatusCode::CREATED);

        let listed = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri(&format!("/api/v1/items/{item_id}/comments"))
                .to_request(),
        )
        .await;
        let comments: Value = actix_test::read_body_json(listed).await;
        let comments = comments.as_array().expect("comment array");
        assert_eq!(comments.len(), 1);
        assert_eq!(
            comments[0].get("text").and_then(Value::as_str),
            Some("lovely stamp")
        );
    }

    #[actix_web::test]
    async fn blank_comments_are_rejected() {
        let harness = TestHarness::new();
        seed_user(&harness.store, "ada@example.com", "longenough", false, false).await;
        let app = actix_test::init_service(App::new().configure(harness.configure())).await;
        let cookie = harness.login(&app, "ada@example.com", "longenough").await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri(&format!("/api/v1/items/{}/comments", uuid::Uuid::new_v4()))
                .cookie(cookie)
                .set_json(json!({ "text": "   " }))
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
