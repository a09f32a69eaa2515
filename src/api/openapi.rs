use utoipa::OpenApi;

use crate::{
    api::models::{
        ErrorResponse, HealthResponse, MessageResponse, RouteNotFoundResponse, UserListResponse, UserResponse,
    },
    core::{
        errors::FieldError,
        models::user::{Address, AddressInput, CreateUserInput, Geo, GeoInput, Pagination, UpdateUserInput, User},
    },
};

#[derive(OpenApi)]
#[openapi(
    paths(
        super::handlers::list_users,
        super::handlers::get_user,
        super::handlers::create_user,
        super::handlers::update_user,
        super::handlers::delete_user,
        super::routes::health
    ),
    components(schemas(
        CreateUserInput,
        UpdateUserInput,
        AddressInput,
        GeoInput,
        User,
        Address,
        Geo,
        Pagination,
        FieldError,
        UserResponse,
        UserListResponse,
        MessageResponse,
        ErrorResponse,
        RouteNotFoundResponse,
        HealthResponse
    )),
    tags(
        (name = "users", description = "User directory CRUD"),
        (name = "health", description = "Liveness and readiness")
    ),
    info(
        title = "UserSphere API",
        description = "API for listing, searching, creating, editing and deleting user records",
        version = "1.0.0"
    )
)]
pub struct ApiDoc;
