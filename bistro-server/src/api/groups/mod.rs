//! Group API Module
//!
//! Manager and delivery-crew membership administration.

mod handler;

use axum::{
    Router,
    routing::{delete, get},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/groups", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route(
            "/{role}/users",
            get(handler::list_members).post(handler::add_member),
        )
        .route("/{role}/users/{user_id}", delete(handler::remove_member))
}
