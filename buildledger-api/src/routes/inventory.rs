/// Inventory endpoints
///
/// - `GET /api/inventory?projectId=&sectionId=&status=` - List with names
/// - `POST /api/inventory` - Add stock (derives a spending when tied to a project)
/// - `GET /api/inventory/:id` - Fetch item
/// - `PUT /api/inventory/:id` - Update item (value and status are recomputed)
/// - `DELETE /api/inventory/:id` - Delete item (manager)

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
    aggregation::InventoryView,
    auth::authorization::{require_permission, ResourcePermission},
    isolation::CallerIdentity,
    models::{CreateInventoryItem, InventoryFilter, InventoryItem, UpdateInventoryItem},
};

pub async fn list_inventory(
    State(state): State<AppState>,
    Extension(caller): Extension<CallerIdentity>,
    Query(filter): Query<InventoryFilter>,
) -> ApiResult<Data<Vec<InventoryView>>> {
    let rows = state.store.scoped(&caller).inventory(&filter).await;
    Ok(ApiResponse::ok(rows))
}

pub async fn get_inventory_item(
    State(state): State<AppState>,
    Extension(caller): Extension<CallerIdentity>,
    Path(id): Path<String>,
) -> ApiResult<Data<InventoryItem>> {
    let record = state
        .store
        .scoped(&caller)
        .inventory_item(&id)
        .await
        .ok_or_else(|| ApiError::not_found("Inventory item"))?;
    Ok(ApiResponse::ok(record))
}

pub async fn create_inventory_item(
    State(state): State<AppState>,
    Extension(caller): Extension<CallerIdentity>,
    Json(input): Json<CreateInventoryItem>,
) -> ApiResult<Data<InventoryItem>> {
    require_permission(&caller, ResourcePermission::Write)?;
    let record = state.store.scoped(&caller).create_inventory_item(input).await?;
    Ok(ApiResponse::ok(record))
}

pub async fn update_inventory_item(
    State(state): State<AppState>,
    Extension(caller): Extension<CallerIdentity>,
    Path(id): Path<String>,
    Json(patch): Json<UpdateInventoryItem>,
) -> ApiResult<Data<InventoryItem>> {
    require_permission(&caller, ResourcePermission::Write)?;
    let record = state
        .store
        .scoped(&caller)
        .update_inventory_item(&id, patch)
        .await?
        .ok_or_else(|| ApiError::not_found("Inventory item"))?;
    Ok(ApiResponse::ok(record))
}

pub async fn delete_inventory_item(
    State(state): State<AppState>,
    Extension(caller): Extension<CallerIdentity>,
    Path(id): Path<String>,
) -> ApiResult<Data<Deleted>> {
    require_permission(&caller, ResourcePermission::Delete)?;
    if !state.store.scoped(&caller).delete_inventory_item(&id).await? {
        return Err(ApiError::not_found("Inventory item"));
    }
    Ok(ApiResponse::ok(Deleted::new(id)))
}
