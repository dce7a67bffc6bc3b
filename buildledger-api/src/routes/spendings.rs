/// Spending endpoints
///
/// - `GET /api/spendings?projectId=&sectionId=&category=` - List with project and section names
/// - `POST /api/spendings` - Record a manual spending
/// - `GET /api/spendings/:id` - Fetch spending
/// - `PUT /api/spendings/:id` - Update spending
/// - `DELETE /api/spendings/:id` - Delete spending (manager)
///
/// Spendings derived from payments and inventory purchases are listed here too
/// and carry `sourceType`/`sourceId`.

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
    aggregation::SpendingView,
    auth::authorization::{require_permission, ResourcePermission},
    isolation::CallerIdentity,
    models::{CreateSpending, SpendingFilter, Spending, UpdateSpending},
};

pub async fn list_spendings(
    State(state): State<AppState>,
    Extension(caller): Extension<CallerIdentity>,
    Query(filter): Query<SpendingFilter>,
) -> ApiResult<Data<Vec<SpendingView>>> {
    let rows = state.store.scoped(&caller).spendings(&filter).await;
    Ok(ApiResponse::ok(rows))
}

pub async fn get_spending(
    State(state): State<AppState>,
    Extension(caller): Extension<CallerIdentity>,
    Path(id): Path<String>,
) -> ApiResult<Data<Spending>> {
    let record = state
        .store
        .scoped(&caller)
        .spending(&id)
        .await
        .ok_or_else(|| ApiError::not_found("Spending"))?;
    Ok(ApiResponse::ok(record))
}

/// Manual spending; the creator is taken from the token
pub async fn create_spending(
    State(state): State<AppState>,
    Extension(caller): Extension<CallerIdentity>,
    Json(input): Json<CreateSpending>,
) -> ApiResult<Data<Spending>> {
    require_permission(&caller, ResourcePermission::Write)?;
    let record = state.store.scoped(&caller).create_spending(input).await?;
    Ok(ApiResponse::ok(record))
}

pub async fn update_spending(
    State(state): State<AppState>,
    Extension(caller): Extension<CallerIdentity>,
    Path(id): Path<String>,
    Json(patch): Json<UpdateSpending>,
) -> ApiResult<Data<Spending>> {
    require_permission(&caller, ResourcePermission::Write)?;
    let record = state
        .store
        .scoped(&caller)
        .update_spending(&id, patch)
        .await?
        .ok_or_else(|| ApiError::not_found("Spending"))?;
    Ok(ApiResponse::ok(record))
}

pub async fn delete_spending(
    State(state): State<AppState>,
    Extension(caller): Extension<CallerIdentity>,
    Path(id): Path<String>,
) -> ApiResult<Data<Deleted>> {
    require_permission(&caller, ResourcePermission::Delete)?;
    if !state.store.scoped(&caller).delete_spending(&id).await? {
        return Err(ApiError::not_found("Spending"));
    }
    Ok(ApiResponse::ok(Deleted::new(id)))
}
