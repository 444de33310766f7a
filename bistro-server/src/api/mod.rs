//! API route modules
//!
//! # Structure
//!
//! - [`health`] - liveness check
//! - [`auth`] - login
//! - [`users`] - registration and profile
//! - [`categories`] - category management
//! - [`menu_items`] - menu item management
//! - [`cart`] - per-user cart ledger
//! - [`orders`] - checkout and order lifecycle
//! - [`groups`] - manager / delivery-crew membership

pub mod auth;
pub mod cart;
pub mod categories;
pub mod groups;
pub mod health;
pub mod menu_items;
pub mod orders;
pub mod users;

use axum::Router;
use axum::middleware as axum_middleware;
use http::{HeaderName, HeaderValue};
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{
    MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer,
};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::core::ServerState;

// Re-export common types for handlers
pub use crate::utils::{AppResponse, AppResult};

/// Custom request ID generator
#[derive(Clone)]
struct XRequestId;

impl MakeRequestId for XRequestId {
    fn make_request_id<B>(&mut self, _request: &http::Request<B>) -> Option<RequestId> {
        let id = Uuid::new_v4().to_string();
        HeaderValue::from_str(&id).ok().map(RequestId::new)
    }
}

/// Build a router with all routes registered (no middleware, no state)
pub fn build_router() -> Router<ServerState> {
    Router::new()
        // Public routes
        .merge(health::router())
        .merge(auth::router())
        // Catalog - anonymous reads, manager writes
        .merge(categories::router())
        .merge(menu_items::router())
        // Authenticated routes
        .merge(users::router())
        .merge(cart::router())
        .merge(orders::router())
        // Staff administration
        .merge(groups::router())
}

/// Build a fully configured application with all middleware
pub fn build_app(state: &ServerState) -> Router<ServerState> {
    build_router()
        // ========== Tower HTTP Middleware ==========
        // CORS - handle cross-origin requests
        .layer(CorsLayer::permissive())
        // Compression - gzip responses
        .layer(CompressionLayer::new())
        // Trace - request tracing (logs at INFO level)
        .layer(TraceLayer::new_for_http())
        // ========== Application Middleware ==========
        // Request ID - unique ID per request, propagated to the response
        .layer(SetRequestIdLayer::new(
            HeaderName::from_static("x-request-id"),
            XRequestId,
        ))
        .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
            "x-request-id",
        )))
        // JWT authentication - injects CurrentUser before routing
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            crate::auth::require_auth,
        ))
}
