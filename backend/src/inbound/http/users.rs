//! User API handlers: sign-up, sign-in, session, and admin actions.
//!
//! ```text
//! POST /api/v1/signup {"email":"ada@example.com","fullname":"Ada","password":"secret-pw"}
//! POST /api/v1/login  {"email":"ada@example.com","password":"secret-pw"}
//! POST /api/v1/logout
//! GET  /api/v1/me
//! GET  /api/v1/users
//! POST /api/v1/users/{id}/block | /unblock
//! PUT | DELETE /api/v1/users/{id}/admin
//! DELETE /api/v1/users/{id}
//! ```

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::ports::SignUpRequest;
use crate::domain::{
    CredentialsValidationError, Email, Error, ErrorCode, Fullname, PlainPassword,
    SignInCredentials, User, UserId, UserValidationError,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Wire representation of a user; never carries the password hash.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserDto {
    /// Stable user identifier.
    pub id: String,
    /// Sign-in email address.
    pub email: String,
    /// Name shown to other users.
    pub fullname: String,
    /// Whether the account is blocked.
    pub blocked: bool,
    /// Whether the account holds admin privileges.
    pub is_admin: bool,
}

impl From<User> for UserDto {
    fn from(user: User) -> Self {
        Self {
            id: user.id().to_string(),
            email: user.email().to_string(),
            fullname: user.fullname().to_string(),
            blocked: user.blocked(),
            is_admin: user.is_admin(),
        }
    }
}

/// Sign-up request body for `POST /api/v1/signup`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SignUpBody {
    pub email: String,
    pub fullname: String,
    pub password: String,
}

/// Login request body for `POST /api/v1/login`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginBody {
    pub email: String,
    pub password: String,
}

fn map_user_validation_error(err: &UserValidationError) -> Error {
    let field = match err {
        UserValidationError::EmptyEmail | UserValidationError::InvalidEmail => "email",
        UserValidationError::EmptyFullname | UserValidationError::FullnameTooLong { .. } => {
            "fullname"
        }
        UserValidationError::EmptyPasswordHash => "password",
    };
    Error::invalid_request(err.to_string()).with_details(json!({ "field": field }))
}

fn map_credentials_error(err: &CredentialsValidationError) -> Error {
    match err {
        CredentialsValidationError::InvalidEmail(inner) => map_user_validation_error(inner),
        CredentialsValidationError::EmptyPassword => Error::invalid_request(err.to_string())
            .with_details(json!({ "field": "password" })),
    }
}

impl TryFrom<SignUpBody> for SignUpRequest {
    type Error = Error;

    fn try_from(body: SignUpBody) -> Result<Self, Self::Error> {
        let email = Email::new(&body.email).map_err(|err| map_user_validation_error(&err))?;
        let fullname =
            Fullname::new(body.fullname).map_err(|err| map_user_validation_error(&err))?;
        let password = PlainPassword::new(body.password)
            .map_err(|err| Error::password_too_short(err.to_string()))?;
        Ok(Self {
            email,
            fullname,
            password,
        })
    }
}

/// Create an account.
#[utoipa::path(
    post,
    path = "/api/v1/signup",
    request_body = SignUpBody,
    responses(
        (status = 201, description = "Account created", body = UserDto),
        (status = 400, description = "Invalid request or password too short", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["users"],
    operation_id = "signUp",
    security([])
)]
#[post("/signup")]
pub async fn sign_up(
    state: web::Data<HttpState>,
    payload: web::Json<SignUpBody>,
) -> ApiResult<HttpResponse> {
    let request = SignUpRequest::try_from(payload.into_inner())?;
    let user = state.account.sign_up(request).await?;
    Ok(HttpResponse::Created().json(UserDto::from(user)))
}

/// Authenticate and establish a session.
#[utoipa::path(
    post,
    path = "/api/v1/login",
    request_body = LoginBody,
    responses(
        (status = 200, description = "Signed in", body = UserDto,
            headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Malformed credentials", body = Error),
        (status = 401, description = "Invalid credentials", body = Error),
        (status = 403, description = "Account blocked", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["users"],
    operation_id = "login",
    security([])
)]
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<LoginBody>,
) -> ApiResult<HttpResponse> {
    let body = payload.into_inner();
    let credentials = SignInCredentials::try_from_parts(&body.email, &body.password)
        .map_err(|err| map_credentials_error(&err))?;
    let user = state.login.sign_in(&credentials).await?;
    session.persist_user(user.id())?;
    Ok(HttpResponse::Ok().json(UserDto::from(user)))
}

/// Drop the session.
#[utoipa::path(
    post,
    path = "/api/v1/logout",
    responses((status = 204, description = "Signed out")),
    tags = ["users"],
    operation_id = "logout",
    security([])
)]
#[post("/logout")]
pub async fn logout(session: SessionContext) -> HttpResponse {
    session.clear();
    HttpResponse::NoContent().finish()
}

/// The session's user.
#[utoipa::path(
    get,
    path = "/api/v1/me",
    responses(
        (status = 200, description = "Current user", body = UserDto),
        (status = 401, description = "No session", body = Error)
    ),
    tags = ["users"],
    operation_id = "currentUser"
)]
#[get("/me")]
pub async fn current_user(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<UserDto>> {
    let id = session.require_user_id()?;
    // A session for a since-deleted account is no session at all.
    let user = state.users.find_user(&id).await.map_err(|err| {
        if err.code() == ErrorCode::NotFound {
            Error::unauthorized("login required")
        } else {
            err
        }
    })?;
    Ok(web::Json(UserDto::from(user)))
}

/// List every user; admin only.
#[utoipa::path(
    get,
    path = "/api/v1/users",
    responses(
        (status = 200, description = "Users", body = [UserDto]),
        (status = 401, description = "No session", body = Error),
        (status = 403, description = "Not an admin", body = Error)
    ),
    tags = ["users"],
    operation_id = "listUsers"
)]
#[get("/users")]
pub async fn list_users(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<UserDto>>> {
    let requester = session.requester()?;
    let users = state.users.list_users(&requester).await?;
    Ok(web::Json(users.into_iter().map(UserDto::from).collect()))
}

/// Block a user from signing in; admin only.
#[utoipa::path(
    post,
    path = "/api/v1/users/{id}/block",
    params(("id" = Uuid, Path, description = "Target user id")),
    responses(
        (status = 200, description = "User blocked", body = UserDto),
        (status = 403, description = "Not an admin", body = Error),
        (status = 404, description = "No such user", body = Error)
    ),
    tags = ["users"],
    operation_id = "blockUser"
)]
#[post("/users/{id}/block")]
pub async fn block_user(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<Uuid>,
) -> ApiResult<web::Json<UserDto>> {
    let requester = session.requester()?;
    let target = UserId::from_uuid(path.into_inner());
    let user = state.user_admin.block(&requester, &target).await?;
    Ok(web::Json(UserDto::from(user)))
}

/// Lift a block; admin only.
#[utoipa::path(
    post,
    path = "/api/v1/users/{id}/unblock",
    params(("id" = Uuid, Path, description = "Target user id")),
    responses(
        (status = 200, description = "User unblocked", body = UserDto),
        (status = 403, description = "Not an admin", body = Error),
        (status = 404, description = "No such user", body = Error)
    ),
    tags = ["users"],
    operation_id = "unblockUser"
)]
#[post("/users/{id}/unblock")]
pub async fn unblock_user(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<Uuid>,
) -> ApiResult<web::Json<UserDto>> {
    let requester = session.requester()?;
    let target = UserId::from_uuid(path.into_inner());
    let user = state.user_admin.unblock(&requester, &target).await?;
    Ok(web::Json(UserDto::from(user)))
}

/// Grant admin privileges; admin only.
#[utoipa::path(
    put,
    path = "/api/v1/users/{id}/admin",
    params(("id" = Uuid, Path, description = "Target user id")),
    responses(
        (status = 200, description = "Admin granted", body = UserDto),
        (status = 403, description = "Not an admin", body = Error),
        (status = 404, description = "No such user", body = Error)
    ),
    tags = ["users"],
    operation_id = "grantAdmin"
)]
#[put("/users/{id}/admin")]
pub async fn grant_admin(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<Uuid>,
) -> ApiResult<web::Json<UserDto>> {
    let requester = session.requester()?;
    let target = UserId::from_uuid(path.into_inner());
    let user = state.user_admin.grant_admin(&requester, &target).await?;
    Ok(web::Json(UserDto::from(user)))
}

/// Revoke admin privileges; admin only.
#[utoipa::path(
    delete,
    path = "/api/v1/users/{id}/admin",
    params(("id" = Uuid, Path, description = "Target user id")),
    responses(
        (status = 200, description = "Admin revoked", body = UserDto),
        (status = 403, description = "Not an admin", body = Error),
        (status = 404, description = "No such user", body = Error)
    ),
    tags = ["users"],
    operation_id = "revokeAdmin"
)]
#[delete("/users/{id}/admin")]
pub async fn revoke_admin(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<Uuid>,
) -> ApiResult<web::Json<UserDto>> {
    let requester = session.requester()?;
    let target = UserId::from_uuid(path.into_inner());
    let user = state.user_admin.revoke_admin(&requester, &target).await?;
    Ok(web::Json(UserDto::from(user)))
}

/// Delete an account; admin only.
#[utoipa::path(
    delete,
    path = "/api/v1/users/{id}",
    params(("id" = Uuid, Path, description = "Target user id")),
    responses(
        (status = 204, description = "User deleted"),
        (status = 403, description = "Not an admin", body = Error),
        (status = 404, description = "No such user", body = Error)
    ),
    tags = ["users"],
    operation_id = "deleteUser"
)]
#[delete("/users/{id}")]
pub async fn delete_user(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let requester = session.requester()?;
    let target = UserId::from_uuid(path.into_inner());
    state.user_admin.delete_user(&requester, &target).await?;
    Ok(HttpResponse::NoContent().finish())
}
