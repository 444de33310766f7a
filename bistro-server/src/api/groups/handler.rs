//! Group API Handlers
//!
//! Adding an existing member is an idempotent success; removing a
//! non-member is a not-found error.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Deserialize;

use crate::auth::CurrentUser;
use crate::auth::policy::{self, Operation};
use crate::core::ServerState;
use crate::db::repository::user;
use crate::utils::{AppError, AppResponse, AppResult, ok_with_message};
use shared::models::{Role, UserSummary};

/// Resolve the role path segment; unknown group names are 404s.
fn parse_role(segment: &str) -> Result<Role, AppError> {
    segment
        .parse::<Role>()
        .map_err(|_| AppError::not_found(format!("Group '{segment}' does not exist")))
}

/// Add-member payload
#[derive(Debug, Deserialize)]
pub struct AddMemberRequest {
    pub user_id: i64,
}

/// GET /api/groups/{role}/users - list members of a role
pub async fn list_members(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(role): Path<String>,
) -> AppResult<Json<Vec<UserSummary>>> {
    policy::require(&current_user, Operation::ManageGroups)?;
    let role = parse_role(&role)?;
    let members = user::in_role(&state.pool, role).await?;
    Ok(Json(members))
}

/// POST /api/groups/{role}/users - add a user to a role
pub async fn add_member(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(role): Path<String>,
    Json(payload): Json<AddMemberRequest>,
) -> AppResult<Json<AppResponse<bool>>> {
    policy::require(&current_user, Operation::ManageGroups)?;
    let role = parse_role(&role)?;

    let added = user::add_role(&state.pool, payload.user_id, role).await?;
    if added {
        tracing::info!(
            user_id = current_user.id,
            target_user = payload.user_id,
            role = %role,
            "User added to group"
        );
        Ok(ok_with_message(true, format!("User added to the {role} group")))
    } else {
        Ok(ok_with_message(
            false,
            format!("User is already in the {role} group"),
        ))
    }
}

/// DELETE /api/groups/{role}/users/{user_id} - remove a user from a role
pub async fn remove_member(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path((role, user_id)): Path<(String, i64)>,
) -> AppResult<Json<AppResponse<bool>>> {
    policy::require(&current_user, Operation::ManageGroups)?;
    let role = parse_role(&role)?;

    let removed = user::remove_role(&state.pool, user_id, role).await?;
    if !removed {
        return Err(AppError::not_found(format!(
            "User {user_id} is not in the {role} group"
        )));
    }

    tracing::info!(
        user_id = current_user.id,
        target_user = user_id,
        role = %role,
        "User removed from group"
    );
    Ok(ok_with_message(true, format!("User removed from the {role} group")))
}
