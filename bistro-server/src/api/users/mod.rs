//! Users API Module

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/users", post(handler::register))
        .route("/api/users/me", get(handler::me))
}
