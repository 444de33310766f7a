//! Order API Module
//!
//! Checkout plus the role-gated order lifecycle.

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/orders", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::checkout))
        .route(
            "/{id}",
            get(handler::get_by_id)
                .put(handler::update_full)
                .patch(handler::update_partial)
                .delete(handler::delete),
        )
}
