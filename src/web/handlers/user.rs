//! User handlers for Web API.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use crate::web::dto::{
    ApiResponse, CreateUserRequest, MessageResponse, UpdateUserRequest, UserResponse,
    ValidatedJson,
};
use crate::web::error::ApiError;
use crate::web::handlers::{run_blocking, AppState};
use crate::FilebayError;

fn store_error(context: &'static str) -> impl FnOnce(FilebayError) -> ApiError {
    move |e| {
        tracing::error!("{}: {}", context, e);
        ApiError::internal(context)
    }
}

/// GET /api/users - List all users.
#[utoipa::path(
    get,
    path = "/users",
    tag = "users",
    responses(
        (status = 200, description = "List of users", body = Vec<UserResponse>)
    )
)]
pub async fn list_users(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<UserResponse>>>, ApiError> {
    let users = Arc::clone(&state.users);
    let users = run_blocking("Failed to list users", move || users.list())
        .await?
        .map_err(store_error("Failed to list users"))?;

    Ok(Json(ApiResponse::new(
        users.into_iter().map(UserResponse::from).collect(),
    )))
}

/// POST /api/users - Create a user.
#[utoipa::path(
    post,
    path = "/users",
    tag = "users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created", body = UserResponse),
        (status = 400, description = "Malformed JSON"),
        (status = 422, description = "Validation error")
    )
)]
pub async fn create_user(
    State(state): State<Arc<AppState>>,
    ValidatedJson(req): ValidatedJson<CreateUserRequest>,
) -> Result<(StatusCode, Json<ApiResponse<UserResponse>>), ApiError> {
    let users = Arc::clone(&state.users);
    let user = run_blocking("Failed to create user", move || users.create(req.into()))
        .await?
        .map_err(store_error("Failed to create user"))?;

    tracing::info!(user_id = %user.id, "User created");

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new(UserResponse::from(user))),
    ))
}

/// GET /api/users/{id} - Get a user.
#[utoipa::path(
    get,
    path = "/users/{id}",
    tag = "users",
    params(
        ("id" = String, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User details", body = UserResponse),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<UserResponse>>, ApiError> {
    let users = Arc::clone(&state.users);
    let user = run_blocking("Failed to get user", move || users.get(&id))
        .await?
        .map_err(store_error("Failed to get user"))?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    Ok(Json(ApiResponse::new(UserResponse::from(user))))
}

/// PUT /api/users/{id} - Update a user.
#[utoipa::path(
    put,
    path = "/users/{id}",
    tag = "users",
    params(
        ("id" = String, Path, description = "User ID")
    ),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "User updated", body = UserResponse),
        (status = 404, description = "User not found"),
        (status = 422, description = "Validation error")
    )
)]
pub async fn update_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    ValidatedJson(req): ValidatedJson<UpdateUserRequest>,
) -> Result<Json<ApiResponse<UserResponse>>, ApiError> {
    let users = Arc::clone(&state.users);
    let user = run_blocking("Failed to update user", move || {
        users.update(&id, req.into())
    })
    .await?
    .map_err(store_error("Failed to update user"))?
    .ok_or_else(|| ApiError::not_found("User not found"))?;

    Ok(Json(ApiResponse::new(UserResponse::from(user))))
}

/// DELETE /api/users/{id} - Delete a user.
#[utoipa::path(
    delete,
    path = "/users/{id}",
    tag = "users",
    params(
        ("id" = String, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User deleted", body = MessageResponse),
        (status = 404, description = "User not found")
    )
)]
pub async fn delete_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    let users = Arc::clone(&state.users);
    let user_id = id.clone();
    let deleted = run_blocking("Failed to delete user", move || users.delete(&user_id))
        .await?
        .map_err(store_error("Failed to delete user"))?;

    if !deleted {
        return Err(ApiError::not_found("User not found"));
    }

    tracing::info!(user_id = %id, "User deleted");

    Ok(Json(ApiResponse::new(MessageResponse::new(
        "User deleted successfully",
    ))))
}
