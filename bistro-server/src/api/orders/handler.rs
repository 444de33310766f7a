//! Order API Handlers
//!
//! The listing partition, the detail view and both update paths apply the
//! access policy; handlers never test role membership directly.

use axum::{
    Json,
    extract::{Path, State},
};

use crate::auth::CurrentUser;
use crate::auth::policy::{self, Operation};
use crate::core::ServerState;
use crate::db::repository::order::{self, OrderScope};
use crate::utils::{AppError, AppResponse, AppResult, ok_with_message};
use shared::models::{
    CheckoutResponse, OrderDetailResponse, OrderResponse, OrderUpdate, Role, StatusPatch,
};
use shared::money;

/// Which slice of the order table the caller may list.
fn scope_for(user: &CurrentUser) -> OrderScope {
    if user.is_manager() {
        OrderScope::All
    } else if user.has_role(Role::DeliveryCrew) {
        OrderScope::Crew(user.id)
    } else {
        OrderScope::Owner(user.id)
    }
}

/// POST /api/orders - convert the caller's cart into an order
pub async fn checkout(
    State(state): State<ServerState>,
    current_user: CurrentUser,
) -> AppResult<Json<AppResponse<CheckoutResponse>>> {
    policy::require(&current_user, Operation::Checkout)?;

    let placed = order::checkout(&state.pool, current_user.id).await?;

    Ok(ok_with_message(
        CheckoutResponse {
            order_id: placed.id,
            total: money::to_decimal(placed.total),
        },
        "Order placed",
    ))
}

/// GET /api/orders - role-partitioned listing, newest first
pub async fn list(
    State(state): State<ServerState>,
    current_user: CurrentUser,
) -> AppResult<Json<Vec<OrderResponse>>> {
    policy::require(&current_user, Operation::ListOrders)?;
    let orders = order::list_scoped(&state.pool, scope_for(&current_user)).await?;
    Ok(Json(orders.into_iter().map(OrderResponse::from).collect()))
}

/// GET /api/orders/{id} - order with its frozen items
pub async fn get_by_id(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<OrderDetailResponse>> {
    let found = order::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Order {id} not found")))?;

    if !policy::can_view_order(&current_user, &found) {
        return Err(AppError::forbidden(
            "You do not have permission to view this order",
        ));
    }

    let items = order::items_for(&state.pool, id).await?;
    Ok(Json(OrderDetailResponse::new(found, items)))
}

/// PUT /api/orders/{id} - full update (manager/admin)
pub async fn update_full(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<i64>,
    Json(payload): Json<OrderUpdate>,
) -> AppResult<Json<OrderResponse>> {
    policy::require(&current_user, Operation::UpdateOrder)?;
    let updated = apply_manager_update(&state, &current_user, id, payload).await?;
    Ok(Json(updated.into()))
}

/// PATCH /api/orders/{id} - partial update
///
/// Managers/admins may patch any updatable field. Delivery crew may patch
/// exactly the status of an order assigned to them; any other field in the
/// payload is a validation error.
pub async fn update_partial(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<i64>,
    Json(payload): Json<serde_json::Value>,
) -> AppResult<Json<OrderResponse>> {
    if policy::allows(&current_user, Operation::UpdateOrder) {
        let update: OrderUpdate = serde_json::from_value(payload)
            .map_err(|e| AppError::validation(format!("Invalid order update: {e}")))?;
        let updated = apply_manager_update(&state, &current_user, id, update).await?;
        return Ok(Json(updated.into()));
    }

    policy::require(&current_user, Operation::UpdateOrderStatus)?;

    let found = order::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Order {id} not found")))?;
    if !policy::can_update_status(&current_user, &found) {
        return Err(AppError::forbidden("Order is not assigned to you"));
    }

    let patch: StatusPatch = serde_json::from_value(payload).map_err(|e| {
        AppError::validation(format!("Status update accepts only the status field: {e}"))
    })?;

    let updated = order::set_status(&state.pool, id, patch.status.0).await?;
    tracing::info!(
        user_id = current_user.id,
        order_id = id,
        status = patch.status.0,
        "Order status updated"
    );
    Ok(Json(updated.into()))
}

/// DELETE /api/orders/{id} - delete an order and its items
pub async fn delete(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    policy::require(&current_user, Operation::DeleteOrder)?;
    let result = order::delete(&state.pool, id).await?;

    tracing::info!(user_id = current_user.id, order_id = id, "Order deleted");
    Ok(Json(result))
}

async fn apply_manager_update(
    state: &ServerState,
    current_user: &CurrentUser,
    id: i64,
    payload: OrderUpdate,
) -> AppResult<shared::models::Order> {
    let updated = order::update_fields(
        &state.pool,
        id,
        payload.status.map(|s| s.0),
        payload.delivery_crew_id,
    )
    .await?;

    tracing::info!(
        user_id = current_user.id,
        order_id = id,
        "Order updated"
    );
    Ok(updated)
}
