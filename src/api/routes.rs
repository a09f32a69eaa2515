use crate::{
    api::{handlers::user_routes, models::*, openapi::ApiDoc},
    config::Config,
    constants::{API_VERSION, ROUTE_NOT_FOUND},
    core::services::UserService,
};
use axum::{
    Json, Router,
    extract::{OriginalUri, State},
    http::{HeaderValue, Method, StatusCode, header},
    response::IntoResponse,
    routing::get,
};
use chrono::Utc;
use serde_json::{Value, json};
use std::sync::Arc;
use std::time::Instant;
use tower_http::{
    compression::CompressionLayer,
    cors::{AllowOrigin, Any, CorsLayer},
    set_header::SetResponseHeaderLayer,
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::warn;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Shared handler state. Cheap to clone; the service is behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<UserService>,
    pub environment: String,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(service: Arc<UserService>, environment: impl Into<String>) -> Self {
        AppState {
            service,
            environment: environment.into(),
            started_at: Instant::now(),
        }
    }
}

async fn root() -> Json<Value> {
    Json(json!({
        "success": true,
        "message": "UserSphere API is running",
        "version": API_VERSION,
        "endpoints": {
            "health": "/health",
            "users": "/api/users",
            "docs": "/docs"
        }
    }))
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service and database are reachable", body = HealthResponse),
        (status = 503, description = "Database is unreachable", body = HealthResponse)
    ),
    tag = "health"
)]
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let database_ok = match state.service.store().ping().await {
        Ok(()) => true,
        Err(e) => {
            warn!("Health check failed: {}", e);
            false
        }
    };
    let (status, label, database) = if database_ok {
        (StatusCode::OK, "OK", "connected")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "DEGRADED", "unavailable")
    };
    (
        status,
        Json(HealthResponse {
            success: database_ok,
            status: label.to_string(),
            timestamp: Utc::now(),
            uptime: state.started_at.elapsed().as_secs_f64(),
            environment: state.environment.clone(),
            database: database.to_string(),
        }),
    )
}

async fn not_found(method: Method, OriginalUri(uri): OriginalUri) -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(RouteNotFoundResponse {
            success: false,
            message: ROUTE_NOT_FOUND.to_string(),
            path: uri.to_string(),
            method: method.to_string(),
        }),
    )
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);
    if allowed_origins.iter().any(|origin| origin == "*") {
        return cors.allow_origin(Any);
    }
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    cors.allow_origin(AllowOrigin::list(origins))
}

/// Full application: user API under `/api`, root and health endpoints,
/// Swagger UI, JSON 404 fallback and the middleware stack.
pub fn build_router(state: AppState, config: &Config) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .nest("/api", user_routes())
        .fallback(not_found)
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(CompressionLayer::new()) // Gzip compression
        .layer(TimeoutLayer::new(config.request_timeout))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("SAMEORIGIN"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::REFERRER_POLICY,
            HeaderValue::from_static("no-referrer"),
        ))
        .layer(cors_layer(&config.allowed_origins))
        .layer(TraceLayer::new_for_http()) // Request tracing
}
