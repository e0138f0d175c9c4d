//! Router configuration for the API.
//!
//! This module provides centralized route registration and middleware
//! configuration for the application.

use axum::{Router, middleware};
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::doc::ApiDoc;
use crate::api::handlers;
use crate::api::middleware::{
    error_details_middleware, logging_middleware, request_id_middleware,
};
use crate::state::AppState;

/// Creates the main application router with all routes and middleware.
///
/// # Middleware Order
/// Middleware is applied in reverse order of declaration (last added runs first):
/// 1. Request ID middleware (runs first) - generates/propagates request IDs
/// 2. Logging middleware - logs requests with request IDs
/// 3. Error details middleware - shapes error bodies with the request path
///
/// # Routes
/// - `/users` - User CRUD and the paginated listing
/// - `/users/{id}/subscriptions` - Per-user subscription lifecycle
/// - `/subscriptions/top` - Service popularity ranking
/// - `/swagger-ui` - API documentation
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/users", handlers::users::user_routes())
        .merge(handlers::subscriptions::subscription_routes())
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Middleware is applied in reverse order - last added runs first
        .layer(middleware::from_fn(error_details_middleware))
        .layer(middleware::from_fn(logging_middleware))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
