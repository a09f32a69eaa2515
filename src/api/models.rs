use axum::{Json, http::StatusCode, response::IntoResponse};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::constants::{
    EMAIL_EXISTS, INTERNAL_ERROR, INVALID_USER_ID, USER_ID_POSITIVE, USER_NOT_FOUND, VALIDATION_FAILED,
};
use crate::core::errors::{FieldError, UserSphereError};
use crate::core::models::user::{Pagination, User};
use crate::core::services::ListUsersParams;

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListUsersQuery {
    /// 1-based page number, defaults to 1
    pub page: Option<u64>,
    /// Page size, defaults to 10
    pub limit: Option<u64>,
    /// Case-insensitive substring matched against name, email and company
    pub search: Option<String>,
}

impl From<ListUsersQuery> for ListUsersParams {
    fn from(query: ListUsersQuery) -> Self {
        ListUsersParams {
            page: query.page,
            limit: query.limit,
            search: query.search,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub data: User,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserListResponse {
    pub success: bool,
    pub data: Vec<User>,
    pub pagination: Pagination,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub success: bool,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<FieldError>>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RouteNotFoundResponse {
    pub success: bool,
    pub message: String,
    pub path: String,
    pub method: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub success: bool,
    pub status: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    /// Seconds since the process started serving
    pub uptime: f64,
    pub environment: String,
    pub database: String,
}

// Newtype wrapper for UserSphereError to implement IntoResponse
#[derive(Debug)]
pub struct ApiError(pub UserSphereError);

impl From<UserSphereError> for ApiError {
    fn from(err: UserSphereError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, message, errors) = match self.0 {
            UserSphereError::Validation(errors) => (StatusCode::BAD_REQUEST, VALIDATION_FAILED, Some(errors)),
            UserSphereError::InvalidIdentifier(_) => (
                StatusCode::BAD_REQUEST,
                INVALID_USER_ID,
                Some(vec![FieldError::new("id", USER_ID_POSITIVE)]),
            ),
            UserSphereError::UserNotFound(_) => (StatusCode::NOT_FOUND, USER_NOT_FOUND, None),
            UserSphereError::EmailAlreadyRegistered(_) => (StatusCode::BAD_REQUEST, EMAIL_EXISTS, None),
            UserSphereError::StorageError(_) | UserSphereError::DatabaseError(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR, None)
            }
        };
        let body = ErrorResponse {
            success: false,
            message: message.to_string(),
            errors,
        };
        (status, Json(body)).into_response()
    }
}
