/// User management endpoints (admin only)
///
/// - `GET /api/users?username=&role=` - List accounts of the caller's country
/// - `POST /api/users` - Create account
/// - `GET /api/users/:id` - Fetch account
/// - `PUT /api/users/:id` - Update account (new password is re-hashed)
/// - `DELETE /api/users/:id` - Delete account
///
/// Password hashes never leave the server; every response carries
/// [`UserProfile`]s.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    routes::{ApiResponse, Data, Deleted},
};
use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use buildledger_shared::{
    auth::authorization::{require_permission, ResourcePermission},
    isolation::CallerIdentity,
    models::{CreateUser, UpdateUser, UserFilter, UserProfile},
};

pub async fn list_users(
    State(state): State<AppState>,
    Extension(caller): Extension<CallerIdentity>,
    Query(filter): Query<UserFilter>,
) -> ApiResult<Data<Vec<UserProfile>>> {
    require_permission(&caller, ResourcePermission::ManageUsers)?;
    let users = state.store.scoped(&caller).users(&filter).await;
    Ok(ApiResponse::ok(users.iter().map(|u| u.profile()).collect()))
}

pub async fn get_user(
    State(state): State<AppState>,
    Extension(caller): Extension<CallerIdentity>,
    Path(id): Path<String>,
) -> ApiResult<Data<UserProfile>> {
    require_permission(&caller, ResourcePermission::ManageUsers)?;
    let user = state
        .store
        .scoped(&caller)
        .user(&id)
        .await
        .ok_or_else(|| ApiError::not_found("User"))?;
    Ok(ApiResponse::ok(user.profile()))
}

pub async fn create_user(
    State(state): State<AppState>,
    Extension(caller): Extension<CallerIdentity>,
    Json(input): Json<CreateUser>,
) -> ApiResult<Data<UserProfile>> {
    require_permission(&caller, ResourcePermission::ManageUsers)?;
    let user = state.store.scoped(&caller).create_user(input).await?;
    Ok(ApiResponse::ok(user.profile()))
}

pub async fn update_user(
    State(state): State<AppState>,
    Extension(caller): Extension<CallerIdentity>,
    Path(id): Path<String>,
    Json(patch): Json<UpdateUser>,
) -> ApiResult<Data<UserProfile>> {
    require_permission(&caller, ResourcePermission::ManageUsers)?;
    let user = state
        .store
        .scoped(&caller)
        .update_user(&id, patch)
        .await?
        .ok_or_else(|| ApiError::not_found("User"))?;
    Ok(ApiResponse::ok(user.profile()))
}

/// Deletes an account; admins cannot delete their own
pub async fn delete_user(
    State(state): State<AppState>,
    Extension(caller): Extension<CallerIdentity>,
    Path(id): Path<String>,
) -> ApiResult<Data<Deleted>> {
    require_permission(&caller, ResourcePermission::ManageUsers)?;
    if id == caller.user_id() {
        return Err(ApiError::BadRequest("Cannot delete your own account".to_string()));
    }
    if !state.store.scoped(&caller).delete_user(&id).await? {
        return Err(ApiError::not_found("User"));
    }
    Ok(ApiResponse::ok(Deleted::new(id)))
}
