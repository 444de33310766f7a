//! Cart API Module

mod handler;

use axum::{
    Router,
    routing::{delete, get},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/cart", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route(
            "/",
            get(handler::get_cart)
                .post(handler::add)
                .delete(handler::clear),
        )
        .route("/{menu_item_id}", delete(handler::remove))
}
