//! OpenAPI document assembled from the handler annotations.

use utoipa::OpenApi;

use crate::domain::{Error, ErrorCode, FieldType, FieldValue};
use crate::inbound::http::collections::{
    CollectionDto, CollectionWithFieldsDto, CreateCollectionBody, FieldDefinitionBody, FieldDto,
    UpdateCollectionBody,
};
use crate::inbound::http::comments::{AddCommentBody, CommentDto};
use crate::inbound::http::items::{ItemDto, ItemWithValuesDto, ItemWriteBody};
use crate::inbound::http::users::{LoginBody, SignUpBody, UserDto};

/// Public OpenAPI surface served by Swagger UI in debug builds.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "curio backend",
        description = "CRUD backend for user-owned collections of typed items"
    ),
    paths(
        crate::inbound::http::health::live,
        crate::inbound::http::health::ready,
        crate::inbound::http::users::sign_up,
        crate::inbound::http::users::login,
        crate::inbound::http::users::logout,
        crate::inbound::http::users::current_user,
        crate::inbound::http::users::list_users,
        crate::inbound::http::users::block_user,
        crate::inbound::http::users::unblock_user,
        crate::inbound::http::users::grant_admin,
        crate::inbound::http::users::revoke_admin,
        crate::inbound::http::users::delete_user,
        crate::inbound::http::collections::create_collection,
        crate::inbound::http::collections::list_collections,
        crate::inbound::http::collections::get_collection,
        crate::inbound::http::collections::update_collection,
        crate::inbound::http::collections::delete_collection,
        crate::inbound::http::collections::add_field,
        crate::inbound::http::collections::remove_field,
        crate::inbound::http::items::create_item,
        crate::inbound::http::items::list_items,
        crate::inbound::http::items::get_item,
        crate::inbound::http::items::update_item,
        crate::inbound::http::items::delete_item,
        crate::inbound::http::comments::add_comment,
        crate::inbound::http::comments::list_comments,
    ),
    components(schemas(
        Error,
        ErrorCode,
        FieldType,
        FieldValue,
        UserDto,
        SignUpBody,
        LoginBody,
        CollectionDto,
        FieldDto,
        CollectionWithFieldsDto,
        FieldDefinitionBody,
        CreateCollectionBody,
        UpdateCollectionBody,
        ItemDto,
        ItemWithValuesDto,
        ItemWriteBody,
        CommentDto,
        AddCommentBody,
    )),
    tags(
        (name = "health", description = "Liveness and readiness"),
        (name = "users", description = "Accounts, sessions, and admin actions"),
        (name = "collections", description = "Collections and field definitions"),
        (name = "items", description = "Items and typed field values"),
        (name = "comments", description = "Item comments")
    )
)]
pub struct ApiDoc;
