use crate::{
    api::{models::*, routes::AppState},
    constants::{USER_CREATED, USER_DELETED, USER_UPDATED},
    core::{
        errors::{FieldError, UserSphereError},
        models::user::{CreateUserInput, UpdateUserInput},
    },
};
use axum::{
    Json, Router,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
    routing::get,
};

fn rejected(field: &str, detail: String) -> ApiError {
    ApiError(UserSphereError::Validation(vec![FieldError::new(field, detail)]))
}

// Field-level shape problems are reported by the validation gate; what is left
// here is a body that is not a JSON object at all.
fn rejected_body(rejection: JsonRejection) -> ApiError {
    let detail = match rejection {
        JsonRejection::MissingJsonContentType(_) => "Content-Type must be application/json",
        JsonRejection::JsonSyntaxError(_) => "Request body must be valid JSON",
        _ => "Request body must be a JSON object",
    };
    rejected("body", detail.to_string())
}

// Define API routes
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users).post(create_user))
        .route("/users/{id}", get(get_user).put(update_user).delete(delete_user))
}

#[utoipa::path(
    get,
    path = "/api/users",
    params(ListUsersQuery),
    responses(
        (status = 200, description = "Page of users, newest first", body = UserListResponse),
        (status = 400, description = "Invalid page or limit", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "users"
)]
pub async fn list_users(
    State(state): State<AppState>,
    query: Result<Query<ListUsersQuery>, QueryRejection>,
) -> Result<Json<UserListResponse>, ApiError> {
    let Query(query) = query.map_err(|e| rejected("query", e.body_text()))?;
    let page = state.service.list_users(query.into()).await?;
    Ok(Json(UserListResponse {
        success: true,
        data: page.users,
        pagination: page.pagination,
    }))
}

#[utoipa::path(
    get,
    path = "/api/users/{id}",
    params(
        ("id" = i64, Path, description = "ID of the user to retrieve")
    ),
    responses(
        (status = 200, description = "User retrieved successfully", body = UserResponse),
        (status = 400, description = "Invalid user ID", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "users"
)]
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<UserResponse>, ApiError> {
    let user = state.service.get_user(&id).await?;
    Ok(Json(UserResponse {
        success: true,
        message: None,
        data: user,
    }))
}

#[utoipa::path(
    post,
    path = "/api/users",
    request_body = CreateUserInput,
    responses(
        (status = 201, description = "User created successfully", body = UserResponse),
        (status = 400, description = "Validation failed or email already exists", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "users"
)]
pub async fn create_user(
    State(state): State<AppState>,
    payload: Result<Json<CreateUserInput>, JsonRejection>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    let Json(input) = payload.map_err(rejected_body)?;
    let user = state.service.create_user(input).await?;
    Ok((
        StatusCode::CREATED,
        Json(UserResponse {
            success: true,
            message: Some(USER_CREATED.to_string()),
            data: user,
        }),
    ))
}

#[utoipa::path(
    put,
    path = "/api/users/{id}",
    params(
        ("id" = i64, Path, description = "ID of the user to update")
    ),
    request_body = UpdateUserInput,
    responses(
        (status = 200, description = "User updated successfully", body = UserResponse),
        (status = 400, description = "Invalid user ID, validation failed or email already exists", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "users"
)]
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateUserInput>, JsonRejection>,
) -> Result<Json<UserResponse>, ApiError> {
    let Json(input) = payload.map_err(rejected_body)?;
    let user = state.service.update_user(&id, input).await?;
    Ok(Json(UserResponse {
        success: true,
        message: Some(USER_UPDATED.to_string()),
        data: user,
    }))
}

#[utoipa::path(
    delete,
    path = "/api/users/{id}",
    params(
        ("id" = i64, Path, description = "ID of the user to delete")
    ),
    responses(
        (status = 200, description = "User deleted successfully", body = MessageResponse),
        (status = 400, description = "Invalid user ID", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "users"
)]
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    state.service.delete_user(&id).await?;
    Ok(Json(MessageResponse {
        success: true,
        message: USER_DELETED.to_string(),
    }))
}
