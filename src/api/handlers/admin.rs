/*
 * Responsibility
 * - Admin-only user management: list, role assignment, removal
 * - Role mutations are audit-logged with the acting admin
 */
use axum::{
    Json,
    extract::{Path, State},
};

use crate::api::dto::links::Link;
use crate::api::dto::users::{
    AssignRoleLinks, AssignRoleRequest, AssignRoleResponse, UserCollectionResponse,
    UserDeletedLinks, UserDeletedResponse,
};
use crate::api::extractors::AuthCtxExtractor;
use crate::error::AppError;
use crate::repos::{role_repo, user_repo};
use crate::services::auth::rbac::Role;
use crate::state::AppState;

pub async fn list_users(
    State(state): State<AppState>,
) -> Result<Json<UserCollectionResponse>, AppError> {
    let rows = user_repo::list_with_roles(&state.db).await?;

    Ok(Json(UserCollectionResponse::new(rows)))
}

pub async fn assign_role(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    Path(user_id): Path<i64>,
    Json(req): Json<AssignRoleRequest>,
) -> Result<Json<AssignRoleResponse>, AppError> {
    let role_name = req
        .role
        .as_deref()
        .filter(|name| !name.trim().is_empty())
        .ok_or_else(|| AppError::bad_request("Role name is required"))?;

    let role = role_name
        .parse::<Role>()
        .map_err(|_| AppError::bad_request("Invalid role name"))?;

    let role_id = role_repo::find_id_by_name(&state.db, role.as_str())
        .await?
        .ok_or_else(|| AppError::bad_request("Invalid role name"))?;

    if !user_repo::exists(&state.db, user_id).await? {
        return Err(AppError::not_found("User not found"));
    }

    user_repo::assign_role(&state.db, user_id, role_id).await?;

    tracing::info!(
        admin = %ctx.username(),
        admin_id = ctx.user_id(),
        user_id,
        role = %role,
        "role assigned"
    );

    Ok(Json(AssignRoleResponse {
        message: format!("User {user_id} assigned to role {role}"),
        links: AssignRoleLinks {
            user: Link::new(format!("/admin/users/{user_id}")),
        },
    }))
}

pub async fn delete_user(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    Path(user_id): Path<i64>,
) -> Result<Json<UserDeletedResponse>, AppError> {
    let deleted = user_repo::delete(&state.db, user_id).await?;

    if !deleted {
        return Err(AppError::not_found("User not found"));
    }

    tracing::info!(
        admin = %ctx.username(),
        admin_id = ctx.user_id(),
        user_id,
        "user deleted"
    );

    Ok(Json(UserDeletedResponse {
        message: format!("User {user_id} deleted successfully"),
        links: UserDeletedLinks {
            users: Link::new("/admin/users"),
        },
    }))
}
