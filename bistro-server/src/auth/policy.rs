//! Access Control Policy
//!
//! Pure decision functions over (actor, operation). All role gating lives
//! here; handlers never test role membership directly. The admin flag
//! bypasses every check.

use shared::models::{Order, Role};

use crate::auth::CurrentUser;
use crate::utils::AppError;

/// Operations gated by the policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// Create/modify/delete menu items and categories
    ManageMenu,
    /// View and mutate the caller's own cart
    ViewCart,
    /// Convert the caller's cart into an order
    Checkout,
    /// List orders (result set is partitioned separately)
    ListOrders,
    /// Full update of any order field
    UpdateOrder,
    /// Status-only update of an assigned order
    UpdateOrderStatus,
    /// Delete an order
    DeleteOrder,
    /// Add/remove manager or delivery-crew membership
    ManageGroups,
}

impl Operation {
    /// Short name used in denial messages and security logs
    pub fn name(&self) -> &'static str {
        match self {
            Operation::ManageMenu => "menu:manage",
            Operation::ViewCart => "cart:view",
            Operation::Checkout => "cart:checkout",
            Operation::ListOrders => "orders:list",
            Operation::UpdateOrder => "orders:update",
            Operation::UpdateOrderStatus => "orders:update_status",
            Operation::DeleteOrder => "orders:delete",
            Operation::ManageGroups => "groups:manage",
        }
    }
}

/// Whether the actor may invoke the operation at all.
///
/// Per-order ownership/assignment is checked separately by
/// [`can_view_order`] and [`can_update_status`].
pub fn allows(user: &CurrentUser, op: Operation) -> bool {
    if user.is_admin {
        return true;
    }
    match op {
        // Any authenticated user operates on their own cart and orders
        Operation::ViewCart | Operation::Checkout | Operation::ListOrders => true,

        // Staff management operations
        Operation::ManageMenu
        | Operation::UpdateOrder
        | Operation::DeleteOrder
        | Operation::ManageGroups => user.has_role(Role::Manager),

        Operation::UpdateOrderStatus => user.has_role(Role::DeliveryCrew),
    }
}

/// Require an operation, mapping denial to a Forbidden error.
pub fn require(user: &CurrentUser, op: Operation) -> Result<(), AppError> {
    if allows(user, op) {
        Ok(())
    } else {
        crate::security_log!(
            "WARN",
            "permission_denied",
            user_id = user.id,
            username = user.username.clone(),
            operation = op.name()
        );
        Err(AppError::forbidden(format!(
            "Permission denied: {}",
            op.name()
        )))
    }
}

/// Order visibility partition: owner, assigned crew member, manager, admin.
pub fn can_view_order(user: &CurrentUser, order: &Order) -> bool {
    user.is_manager() || order.user_id == user.id || order.delivery_crew_id == Some(user.id)
}

/// Status updates are reserved for the crew member the order is assigned to.
pub fn can_update_status(user: &CurrentUser, order: &Order) -> bool {
    order.delivery_crew_id == Some(user.id)
}
