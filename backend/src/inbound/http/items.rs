//! Item API handlers.
//!
//! ```text
//! POST   /api/v1/collections/{id}/items
//! GET    /api/v1/collections/{id}/items
//! GET    /api/v1/items/{id}
//! PUT    /api/v1/items/{id}
//! DELETE /api/v1/items/{id}
//! ```
//!
//! Field values travel as a map from field id to a tagged value:
//! `{"<field-uuid>": {"type": "number", "value": 1840.0}}`.

use std::collections::BTreeSet;

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::ports::{ItemWithValues, ItemWrite};
use crate::domain::{
    CollectionId, Error, FieldValueMap, Item, ItemId, ItemName, ItemValidationError, Tag,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Wire representation of an item.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ItemDto {
    pub id: String,
    pub collection_id: String,
    pub name: String,
    pub tags: Vec<String>,
    #[schema(value_type = String, example = "2026-01-01T00:00:00Z")]
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl From<Item> for ItemDto {
    fn from(item: Item) -> Self {
        Self {
            id: item.id().to_string(),
            collection_id: item.collection_id().to_string(),
            name: item.name().to_string(),
            tags: item.tags().iter().map(ToString::to_string).collect(),
            created_at: item.created_at(),
        }
    }
}

/// Item plus its typed field values.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ItemWithValuesDto {
    pub item: ItemDto,
    /// Typed values keyed by field id.
    #[schema(value_type = Object)]
    pub values: FieldValueMap,
}

impl From<ItemWithValues> for ItemWithValuesDto {
    fn from(fetched: ItemWithValues) -> Self {
        Self {
            item: ItemDto::from(fetched.item),
            values: fetched.values,
        }
    }
}

/// Write request body for item create and update.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ItemWriteBody {
    pub name: String,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Typed values keyed by field id; must match the collection schema.
    #[serde(default)]
    #[schema(value_type = Object)]
    pub values: FieldValueMap,
}

fn map_item_validation_error(err: &ItemValidationError) -> Error {
    let field = match err {
        ItemValidationError::EmptyName | ItemValidationError::NameTooLong { .. } => "name",
        ItemValidationError::EmptyTag | ItemValidationError::TagTooLong { .. } => "tags",
    };
    Error::invalid_request(err.to_string()).with_details(json!({ "field": field }))
}

impl TryFrom<ItemWriteBody> for ItemWrite {
    type Error = Error;

    fn try_from(body: ItemWriteBody) -> Result<Self, Self::Error> {
        let name = ItemName::new(body.name).map_err(|err| map_item_validation_error(&err))?;
        let tags: BTreeSet<Tag> = body
            .tags
            .iter()
            .map(|raw| Tag::new(raw).map_err(|err| map_item_validation_error(&err)))
            .collect::<Result<_, _>>()?;
        Ok(Self {
            name,
            tags,
            values: body.values,
        })
    }
}

/// Create an item in a collection; collection owner or admin only.
#[utoipa::path(
    post,
    path = "/api/v1/collections/{id}/items",
    params(("id" = Uuid, Path, description = "Collection id")),
    request_body = ItemWriteBody,
    responses(
        (status = 201, description = "Item created", body = ItemWithValuesDto),
        (status = 400, description = "Field values do not match the schema", body = Error),
        (status = 403, description = "Not owner or admin", body = Error),
        (status = 404, description = "No such collection", body = Error)
    ),
    tags = ["items"],
    operation_id = "createItem"
)]
#[post("/collections/{id}/items")]
pub async fn create_item(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<Uuid>,
    payload: web::Json<ItemWriteBody>,
) -> ApiResult<HttpResponse> {
    let requester = session.requester()?;
    let collection_id = CollectionId::from_uuid(path.into_inner());
    let write = ItemWrite::try_from(payload.into_inner())?;
    let created = state
        .item_commands
        .create(&requester, &collection_id, write)
        .await?;
    Ok(HttpResponse::Created().json(ItemWithValuesDto::from(created)))
}

/// List a collection's items, oldest first.
#[utoipa::path(
    get,
    path = "/api/v1/collections/{id}/items",
    params(("id" = Uuid, Path, description = "Collection id")),
    responses(
        (status = 200, description = "Items", body = [ItemDto]),
        (status = 404, description = "No such collection", body = Error)
    ),
    tags = ["items"],
    operation_id = "listItems",
    security([])
)]
#[get("/collections/{id}/items")]
pub async fn list_items(
    state: web::Data<HttpState>,
    path: web::Path<Uuid>,
) -> ApiResult<web::Json<Vec<ItemDto>>> {
    let collection_id = CollectionId::from_uuid(path.into_inner());
    let items = state.items.list_for_collection(&collection_id).await?;
    Ok(web::Json(items.into_iter().map(ItemDto::from).collect()))
}

/// Fetch an item with its typed field values.
#[utoipa::path(
    get,
    path = "/api/v1/items/{id}",
    params(("id" = Uuid, Path, description = "Item id")),
    responses(
        (status = 200, description = "Item", body = ItemWithValuesDto),
        (status = 404, description = "No such item", body = Error)
    ),
    tags = ["items"],
    operation_id = "getItem",
    security([])
)]
#[get("/items/{id}")]
pub async fn get_item(
    state: web::Data<HttpState>,
    path: web::Path<Uuid>,
) -> ApiResult<web::Json<ItemWithValuesDto>> {
    let id = ItemId::from_uuid(path.into_inner());
    let fetched = state.items.get(&id).await?;
    Ok(web::Json(ItemWithValuesDto::from(fetched)))
}

/// Replace an item's name, tags, and field values; owner or admin only.
#[utoipa::path(
    put,
    path = "/api/v1/items/{id}",
    params(("id" = Uuid, Path, description = "Item id")),
    request_body = ItemWriteBody,
    responses(
        (status = 200, description = "Item updated", body = ItemWithValuesDto),
        (status = 400, description = "Field values do not match the schema", body = Error),
        (status = 403, description = "Not owner or admin", body = Error),
        (status = 404, description = "No such item", body = Error)
    ),
    tags = ["items"],
    operation_id = "updateItem"
)]
#[put("/items/{id}")]
pub async fn update_item(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<Uuid>,
    payload: web::Json<ItemWriteBody>,
) -> ApiResult<web::Json<ItemWithValuesDto>> {
    let requester = session.requester()?;
    let id = ItemId::from_uuid(path.into_inner());
    let write = ItemWrite::try_from(payload.into_inner())?;
    let updated = state.item_commands.update(&requester, &id, write).await?;
    Ok(web::Json(ItemWithValuesDto::from(updated)))
}

/// Delete an item; owner or admin only.
#[utoipa::path(
    delete,
    path = "/api/v1/items/{id}",
    params(("id" = Uuid, Path, description = "Item id")),
    responses(
        (status = 204, description = "Item deleted"),
        (status = 403, description = "Not owner or admin", body = Error),
        (status = 404, description = "No such item", body = Error)
    ),
    tags = ["items"],
    operation_id = "deleteItem"
)]
#[delete("/items/{id}")]
pub async fn delete_item(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let requester = session.requester()?;
    let id = ItemId::from_uuid(path.into_inner());
    state.item_commands.delete(&requester, &id).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
mod tests {
    //! End-to-end coverage for the item endpoints.
    use actix_web::http::StatusCode;
    use actix_web::{App, test as actix_test};
    use serde_json::{Value, json};

    use crate::inbound::http::test_utils::{TestHarness, seed_user};

    /// Create a collection with Year/Country fields; returns (collection id,
    /// year field id, country field id).
    async fn seed_collection<S, B>(
        app: &S,
        cookie: actix_web::cookie::Cookie<'static>,
    ) -> (String, String, String)
    where
        S: actix_web::dev::Service<
                actix_http::Request,
                Response = actix_web::dev::ServiceResponse<B>,
                Error = actix_web::Error,
            >,
        B: actix_web::body::MessageBody,
    {
        let created = actix_test::call_service(
            app,
            actix_test::TestRequest::post()
                .uri("/api/v1/collections")
                .cookie(cookie)
                .set_json(json!({
                    "name": "Stamps",
                    "topic": "Philately",
                    "fields": [
                        { "name": "Year", "fieldType": "number" },
                        { "name": "Country", "fieldType": "text" }
                    ]
                }))
                .to_request(),
        )
        .await;
        assert_eq!(created.status(), StatusCode::CREATED);
        let body: Value = actix_test::read_body_json(created).await;
        let collection_id = body
            .pointer("/collection/id")
            .and_then(Value::as_str)
            .expect("collection id")
            .to_owned();
        let fields = body.get("fields").and_then(Value::as_array).expect("fields");
        let field_id = |name: &str| {
            fields
                .iter()
                .find(|f| f.get("name").and_then(Value::as_str) == Some(name))
                .and_then(|f| f.get("id"))
                .and_then(Value::as_str)
                .expect("field id")
                .to_owned()
        };
        (collection_id, field_id("Year"), field_id("Country"))
    }

    #[actix_web::test]
    async fn create_and_fetch_round_trips_name_and_tags() {
        let harness = TestHarness::new();
        seed_user(&harness.store, "ada@example.com", "longenough", false, false).await;
        let app = actix_test::init_service(App::new().configure(harness.configure())).await;
        let cookie = harness.login(&app, "ada@example.com", "longenough").await;
        let (collection_id, year, country) =
            seed_collection(&app, cookie.clone()).await;

        let created = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri(&format!("/api/v1/collections/{collection_id}/items"))
                .cookie(cookie)
                .set_json(json!({
                    "name": "Penny Black",
                    "tags": ["Rare", "rare", "stamp"],
                    "values": {
                        year.as_str(): { "type": "number", "value": 1840.0 },
                        country.as_str(): { "type": "text", "value": "United Kingdom" }
                    }
                }))
                .to_request(),
        )
        .await;
        assert_eq!(created.status(), StatusCode::CREATED);
        let body: Value = actix_test::read_body_json(created).await;
        let item_id = body
            .pointer("/item/id")
            .and_then(Value::as_str)
            .expect("item id")
            .to_owned();

        let fetched = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri(&format!("/api/v1/items/{item_id}"))
                .to_request(),
        )
        .await;
        assert!(fetched.status().is_success());
        let body: Value = actix_test::read_body_json(fetched).await;
        assert_eq!(
            body.pointer("/item/name").and_then(Value::as_str),
            Some("Penny Black")
        );
        // Tags are a lowercased set: duplicates collapse.
        let tags = body
            .pointer("/item/tags")
            .and_then(Value::as_array)
            .expect("tags");
        assert_eq!(tags.len(), 2);
        assert_eq!(
            body.pointer(&format!("/values/{year}/value"))
                .and_then(Value::as_f64),
            Some(1840.0)
        );
    }

    #[actix_web::test]
    async fn mismatched_values_are_rejected_with_details() {
        let harness = TestHarness::new();
        seed_user(&harness.store, "ada@example.com", "longenough", false, false).await;
        let app = actix_test::init_service(App::new().configure(harness.configure())).await;
        let cookie = harness.login(&app, "ada@example.com", "longenough").await;
        let (collection_id, year, _) = seed_collection(&app, cookie.clone()).await;

        // Omits the Country field entirely.
        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri(&format!("/api/v1/collections/{collection_id}/items"))
                .cookie(cookie)
                .set_json(json!({
                    "name": "Penny Black",
                    "values": { year.as_str(): { "type": "number", "value": 1840.0 } }
                }))
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(
            body.pointer("/details/code").and_then(Value::as_str),
            Some("field_set_mismatch")
        );
        // No item was created.
        let listed = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri(&format!("/api/v1/collections/{collection_id}/items"))
                .to_request(),
        )
        .await;
        let items: Value = actix_test::read_body_json(listed).await;
        assert_eq!(items.as_array().map(Vec::len), Some(0));
    }

    #[actix_web::test]
    async fn update_replaces_values_in_place() {
        let harness = TestHarness::new();
        seed_user(&harness.store, "ada@example.com", "longenough", false, false).await;
        let app = actix_test::init_service(App::new().configure(harness.configure())).await;
        let cookie = harness.login(&app, "ada@example.com", "longenough").await;
        let (collection_id, year, country) =
            seed_collection(&app, cookie.clone()).await;

        let created = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri(&format!("/api/v1/collections/{collection_id}/items"))
                .cookie(cookie.clone())
                .set_json(json!({
                    "name": "Penny Black",
                    "values": {
                        year.as_str(): { "type": "number", "value": 1840.0 },
                        country.as_str(): { "type": "text", "value": "UK" }
                    }
                }))
                .to_request(),
        )
        .await;
        let body: Value = actix_test::read_body_json(created).await;
        let item_id = body
            .pointer("/item/id")
            .and_then(Value::as_str)
            .expect("item id")
            .to_owned();

        let updated = actix_test::call_service(
            &app,
            actix_test::TestRequest::put()
                .uri(&format!("/api/v1/items/{item_id}"))
                .cookie(cookie)
                .set_json(json!({
                    "name": "Penny Red",
                    "tags": ["red"],
                    "values": {
                        year.as_str(): { "type": "number", "value": 1841.0 },
                        country.as_str(): { "type": "text", "value": "UK" }
                    }
                }))
                .to_request(),
        )
        .await;
        assert!(updated.status().is_success());
        let body: Value = actix_test::read_body_json(updated).await;
        assert_eq!(
            body.pointer("/item/name").and_then(Value::as_str),
            Some("Penny Red")
        );
        assert_eq!(
            body.pointer(&format!("/values/{year}/value"))
                .and_then(Value::as_f64),
            Some(1841.0)
        );
    }
}
