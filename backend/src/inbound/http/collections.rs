//! Collection API handlers.
//!
//! ```text
//! POST   /api/v1/collections
//! GET    /api/v1/collections[?owner=<uuid>]
//! GET    /api/v1/collections/{id}
//! PUT    /api/v1/collections/{id}
//! DELETE /api/v1/collections/{id}
//! POST   /api/v1/collections/{id}/fields
//! DELETE /api/v1/collections/{id}/fields/{field_id}
//! ```

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::ports::{
    CreateCollectionRequest, FieldDefinition, UpdateCollectionRequest,
};
use crate::domain::{
    Collection, CollectionField, CollectionId, CollectionName, CollectionValidationError, Error,
    FieldId, FieldName, FieldType, FieldValidationError, ImageUrl, Topic, UserId,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Wire representation of a collection.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CollectionDto {
    pub id: String,
    pub name: String,
    pub owner_id: String,
    pub topic: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl From<Collection> for CollectionDto {
    fn from(collection: Collection) -> Self {
        Self {
            id: collection.id().to_string(),
            name: collection.name().to_string(),
            owner_id: collection.owner_id().to_string(),
            topic: collection.topic().to_string(),
            image_url: collection.image_url().map(ToString::to_string),
        }
    }
}

/// Wire representation of a collection field definition.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FieldDto {
    pub id: String,
    pub collection_id: String,
    pub name: String,
    pub field_type: FieldType,
}

impl From<CollectionField> for FieldDto {
    fn from(field: CollectionField) -> Self {
        Self {
            id: field.id().to_string(),
            collection_id: field.collection_id().to_string(),
            name: field.name().to_string(),
            field_type: field.field_type(),
        }
    }
}

/// Collection plus its field definitions.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CollectionWithFieldsDto {
    pub collection: CollectionDto,
    pub fields: Vec<FieldDto>,
}

/// Field definition supplied at creation time.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FieldDefinitionBody {
    pub name: String,
    pub field_type: FieldType,
}

/// Create request body for `POST /api/v1/collections`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateCollectionBody {
    pub name: String,
    pub topic: String,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub fields: Vec<FieldDefinitionBody>,
}

/// Update request body for `PUT /api/v1/collections/{id}`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCollectionBody {
    pub name: String,
    pub topic: String,
    #[serde(default)]
    pub image_url: Option<String>,
}

/// Optional owner filter for collection listings.
#[derive(Debug, Deserialize)]
pub struct ListCollectionsParams {
    owner: Option<Uuid>,
}

fn map_collection_validation_error(err: &CollectionValidationError) -> Error {
    let field = match err {
        CollectionValidationError::EmptyName | CollectionValidationError::NameTooLong { .. } => {
            "name"
        }
        CollectionValidationError::EmptyTopic | CollectionValidationError::TopicTooLong { .. } => {
            "topic"
        }
        CollectionValidationError::InvalidImageUrl => "imageUrl",
    };
    Error::invalid_request(err.to_string()).with_details(json!({ "field": field }))
}

fn map_field_validation_error(err: &FieldValidationError) -> Error {
    Error::invalid_request(err.to_string()).with_details(json!({ "field": "fields" }))
}

fn parse_image_url(raw: Option<String>) -> Result<Option<ImageUrl>, Error> {
    raw.map(|value| ImageUrl::new(value).map_err(|err| map_collection_validation_error(&err)))
        .transpose()
}

fn parse_field_definition(body: FieldDefinitionBody) -> Result<FieldDefinition, Error> {
    Ok(FieldDefinition {
        name: FieldName::new(body.name).map_err(|err| map_field_validation_error(&err))?,
        field_type: body.field_type,
    })
}

impl TryFrom<CreateCollectionBody> for CreateCollectionRequest {
    type Error = Error;

    fn try_from(body: CreateCollectionBody) -> Result<Self, Self::Error> {
        Ok(Self {
            name: CollectionName::new(body.name)
                .map_err(|err| map_collection_validation_error(&err))?,
            topic: Topic::new(body.topic).map_err(|err| map_collection_validation_error(&err))?,
            image_url: parse_image_url(body.image_url)?,
            fields: body
                .fields
                .into_iter()
                .map(parse_field_definition)
                .collect::<Result<_, _>>()?,
        })
    }
}

impl TryFrom<UpdateCollectionBody> for UpdateCollectionRequest {
    type Error = Error;

    fn try_from(body: UpdateCollectionBody) -> Result<Self, Self::Error> {
        Ok(Self {
            name: CollectionName::new(body.name)
                .map_err(|err| map_collection_validation_error(&err))?,
            topic: Topic::new(body.topic).map_err(|err| map_collection_validation_error(&err))?,
            image_url: parse_image_url(body.image_url)?,
        })
    }
}

/// Create a collection owned by the session user.
#[utoipa::path(
    post,
    path = "/api/v1/collections",
    request_body = CreateCollectionBody,
    responses(
        (status = 201, description = "Collection created", body = CollectionWithFieldsDto),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "No session", body = Error),
        (status = 403, description = "Requester unknown or blocked", body = Error)
    ),
    tags = ["collections"],
    operation_id = "createCollection"
)]
#[post("/collections")]
pub async fn create_collection(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CreateCollectionBody>,
) -> ApiResult<HttpResponse> {
    let requester = session.requester()?;
    let request = CreateCollectionRequest::try_from(payload.into_inner())?;
    let created = state.collection_commands.create(&requester, request).await?;
    Ok(HttpResponse::Created().json(CollectionWithFieldsDto {
        collection: CollectionDto::from(created.collection),
        fields: created.fields.into_iter().map(FieldDto::from).collect(),
    }))
}

/// List collections, optionally restricted to one owner.
#[utoipa::path(
    get,
    path = "/api/v1/collections",
    params(("owner" = Option<Uuid>, Query, description = "Restrict to this owner")),
    responses((status = 200, description = "Collections", body = [CollectionDto])),
    tags = ["collections"],
    operation_id = "listCollections",
    security([])
)]
#[get("/collections")]
pub async fn list_collections(
    state: web::Data<HttpState>,
    params: web::Query<ListCollectionsParams>,
) -> ApiResult<web::Json<Vec<CollectionDto>>> {
    let collections = match params.into_inner().owner {
        Some(owner) => {
            state
                .collections
                .list_owned(&UserId::from_uuid(owner))
                .await?
        }
        None => state.collections.list_all().await?,
    };
    Ok(web::Json(
        collections.into_iter().map(CollectionDto::from).collect(),
    ))
}

/// Fetch a collection with its field definitions.
#[utoipa::path(
    get,
    path = "/api/v1/collections/{id}",
    params(("id" = Uuid, Path, description = "Collection id")),
    responses(
        (status = 200, description = "Collection", body = CollectionWithFieldsDto),
        (status = 404, description = "No such collection", body = Error)
    ),
    tags = ["collections"],
    operation_id = "getCollection",
    security([])
)]
#[get("/collections/{id}")]
pub async fn get_collection(
    state: web::Data<HttpState>,
    path: web::Path<Uuid>,
) -> ApiResult<web::Json<CollectionWithFieldsDto>> {
    let id = CollectionId::from_uuid(path.into_inner());
    let fetched = state.collections.get(&id).await?;
    Ok(web::Json(CollectionWithFieldsDto {
        collection: CollectionDto::from(fetched.collection),
        fields: fetched.fields.into_iter().map(FieldDto::from).collect(),
    }))
}

/// Replace a collection's mutable attributes; owner or admin only.
#[utoipa::path(
    put,
    path = "/api/v1/collections/{id}",
    params(("id" = Uuid, Path, description = "Collection id")),
    request_body = UpdateCollectionBody,
    responses(
        (status = 200, description = "Collection updated", body = CollectionDto),
        (status = 403, description = "Not owner or admin", body = Error),
        (status = 404, description = "No such collection", body = Error)
    ),
    tags = ["collections"],
    operation_id = "updateCollection"
)]
#[put("/collections/{id}")]
pub async fn update_collection(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<Uuid>,
    payload: web::Json<UpdateCollectionBody>,
) -> ApiResult<web::Json<CollectionDto>> {
    let requester = session.requester()?;
    let id = CollectionId::from_uuid(path.into_inner());
    let request = UpdateCollectionRequest::try_from(payload.into_inner())?;
    let updated = state
        .collection_commands
        .update(&requester, &id, request)
        .await?;
    Ok(web::Json(CollectionDto::from(updated)))
}

/// Delete a collection and everything in it; owner or admin only.
#[utoipa::path(
    delete,
    path = "/api/v1/collections/{id}",
    params(("id" = Uuid, Path, description = "Collection id")),
    responses(
        (status = 204, description = "Collection deleted"),
        (status = 403, description = "Not owner or admin", body = Error),
        (status = 404, description = "No such collection", body = Error)
    ),
    tags = ["collections"],
    operation_id = "deleteCollection"
)]
#[delete("/collections/{id}")]
pub async fn delete_collection(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let requester = session.requester()?;
    let id = CollectionId::from_uuid(path.into_inner());
    state.collection_commands.delete(&requester, &id).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Add a field definition to a collection; owner or admin only.
#[utoipa::path(
    post,
    path = "/api/v1/collections/{id}/fields",
    params(("id" = Uuid, Path, description = "Collection id")),
    request_body = FieldDefinitionBody,
    responses(
        (status = 201, description = "Field added", body = FieldDto),
        (status = 403, description = "Not owner or admin", body = Error),
        (status = 404, description = "No such collection", body = Error)
    ),
    tags = ["collections"],
    operation_id = "addField"
)]
#[post("/collections/{id}/fields")]
pub async fn add_field(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<Uuid>,
    payload: web::Json<FieldDefinitionBody>,
) -> ApiResult<HttpResponse> {
    let requester = session.requester()?;
    let id = CollectionId::from_uuid(path.into_inner());
    let definition = parse_field_definition(payload.into_inner())?;
    let field = state
        .collection_commands
        .add_field(&requester, &id, definition)
        .await?;
    Ok(HttpResponse::Created().json(FieldDto::from(field)))
}

/// Remove a field definition from a collection; owner or admin only.
#[utoipa::path(
    delete,
    path = "/api/v1/collections/{id}/fields/{field_id}",
    params(
        ("id" = Uuid, Path, description = "Collection id"),
        ("field_id" = Uuid, Path, description = "Field id")
    ),
    responses(
        (status = 204, description = "Field removed"),
        (status = 403, description = "Not owner or admin", body = Error),
        (status = 404, description = "No such collection or field", body = Error)
    ),
    tags = ["collections"],
    operation_id = "removeField"
)]
#[delete("/collections/{id}/fields/{field_id}")]
pub async fn remove_field(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<(Uuid, Uuid)>,
) -> ApiResult<HttpResponse> {
    let requester = session.requester()?;
    let (collection_id, field_id) = path.into_inner();
    state
        .collection_commands
        .remove_field(
            &requester,
            &CollectionId::from_uuid(collection_id),
            &FieldId::from_uuid(field_id),
        )
        .await?;
    Ok(HttpResponse::NoContent().finish())
}
