use axum::{
    Json, Router,
    extract::{OriginalUri, Path, State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::IntoResponse,
    routing::get,
};
use axum_helpers::{
    AppError, ErrorResponse,
    errors::responses::{
        BadRequestObjectIdResponse, GatewayTimeoutResponse, InternalServerErrorResponse,
        NotFoundResponse, ServiceUnavailableResponse,
    },
};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::models::{CreatedUser, User};
use crate::repository::UserRepository;
use crate::service::UserService;

/// OpenAPI documentation for Users API
#[derive(OpenApi)]
#[openapi(
    paths(list_users, create_user, get_user, replace_user, patch_user, delete_user),
    components(
        schemas(User, CreatedUser, ErrorResponse),
        responses(
            BadRequestObjectIdResponse,
            NotFoundResponse,
            InternalServerErrorResponse,
            ServiceUnavailableResponse,
            GatewayTimeoutResponse
        )
    ),
    tags(
        (name = "Users", description = "User management endpoints (MongoDB)")
    )
)]
pub struct ApiDoc;

/// Create the users router with all HTTP endpoints
pub fn router<R: UserRepository + 'static>(service: UserService<R>) -> Router {
    let shared_service = Arc::new(service);

    Router::new()
        .route("/", get(list_users).post(create_user))
        .route(
            "/{id}",
            get(get_user)
                .put(replace_user)
                .patch(patch_user)
                .delete(delete_user),
        )
        .with_state(shared_service)
}

fn body(payload: Result<Json<User>, JsonRejection>) -> Result<User, AppError> {
    payload.map(|Json(user)| user).map_err(AppError::from)
}

/// List all users
#[utoipa::path(
    get,
    path = "",
    tag = "Users",
    responses(
        (status = 200, description = "All users in store order", body = Vec<User>),
        (status = 500, response = InternalServerErrorResponse),
        (status = 503, response = ServiceUnavailableResponse),
        (status = 504, response = GatewayTimeoutResponse)
    )
)]
async fn list_users<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
) -> Result<Json<Vec<User>>, AppError> {
    let users = service.list_users().await?;
    Ok(Json(users))
}

/// Create a new user
///
/// Any `id` in the body is ignored; the store assigns one.
#[utoipa::path(
    post,
    path = "",
    tag = "Users",
    request_body = User,
    responses(
        (status = 201, description = "User created", body = CreatedUser,
            headers(("Location" = String, description = "URL of the new user"))),
        (status = 400, description = "Malformed JSON body", body = ErrorResponse),
        (status = 500, response = InternalServerErrorResponse),
        (status = 503, response = ServiceUnavailableResponse),
        (status = 504, response = GatewayTimeoutResponse)
    )
)]
async fn create_user<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
    OriginalUri(uri): OriginalUri,
    payload: Result<Json<User>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let id = service.create_user(body(payload)?).await?;
    let location = format!("{}/{}", uri.path().trim_end_matches('/'), id);

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(CreatedUser { id }),
    ))
}

/// Get a user by ID
#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Users",
    params(
        ("id" = String, Path, description = "User ID (24 hex characters)")
    ),
    responses(
        (status = 200, description = "User found", body = User),
        (status = 400, response = BadRequestObjectIdResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse),
        (status = 503, response = ServiceUnavailableResponse),
        (status = 504, response = GatewayTimeoutResponse)
    )
)]
async fn get_user<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
    Path(id): Path<String>,
) -> Result<Json<User>, AppError> {
    let user = service.get_user(&id).await?;
    Ok(Json(user))
}

/// Update a user
///
/// Sets every attribute present in the body. The path ID wins over any
/// `id` in the body.
#[utoipa::path(
    put,
    path = "/{id}",
    tag = "Users",
    params(
        ("id" = String, Path, description = "User ID (24 hex characters)")
    ),
    request_body = User,
    responses(
        (status = 204, description = "User updated"),
        (status = 400, response = BadRequestObjectIdResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse),
        (status = 503, response = ServiceUnavailableResponse),
        (status = 504, response = GatewayTimeoutResponse)
    )
)]
async fn replace_user<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
    Path(id): Path<String>,
    payload: Result<Json<User>, JsonRejection>,
) -> Result<StatusCode, AppError> {
    service.update_user(&id, body(payload)?).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Partially update a user
///
/// Same semantics as PUT: only attributes present in the body change.
#[utoipa::path(
    patch,
    path = "/{id}",
    tag = "Users",
    params(
        ("id" = String, Path, description = "User ID (24 hex characters)")
    ),
    request_body = User,
    responses(
        (status = 204, description = "User updated"),
        (status = 400, response = BadRequestObjectIdResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse),
        (status = 503, response = ServiceUnavailableResponse),
        (status = 504, response = GatewayTimeoutResponse)
    )
)]
async fn patch_user<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
    Path(id): Path<String>,
    payload: Result<Json<User>, JsonRejection>,
) -> Result<StatusCode, AppError> {
    service.update_user(&id, body(payload)?).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Delete a user
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Users",
    params(
        ("id" = String, Path, description = "User ID (24 hex characters)")
    ),
    responses(
        (status = 204, description = "User deleted"),
        (status = 400, response = BadRequestObjectIdResponse),
        (status = 404, response = NotFoundResponse),
        (status = 503, response = ServiceUnavailableResponse),
        (status = 504, response = GatewayTimeoutResponse)
    )
)]
async fn delete_user<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    service.delete_user(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
