/// Section endpoints
///
/// - `GET /api/sections?projectId=` - List sections with project names
/// - `POST /api/sections` - Create section
/// - `GET /api/sections/:id` - Fetch section
/// - `PUT /api/sections/:id` - Update section (progress is recomputed)
/// - `DELETE /api/sections/:id` - Delete section (manager)

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
    aggregation::SectionView,
    auth::authorization::{require_permission, ResourcePermission},
    isolation::CallerIdentity,
    models::{CreateSection, SectionFilter, Section, UpdateSection},
};

pub async fn list_sections(
    State(state): State<AppState>,
    Extension(caller): Extension<CallerIdentity>,
    Query(filter): Query<SectionFilter>,
) -> ApiResult<Data<Vec<SectionView>>> {
    let rows = state.store.scoped(&caller).sections(&filter).await;
    Ok(ApiResponse::ok(rows))
}

pub async fn get_section(
    State(state): State<AppState>,
    Extension(caller): Extension<CallerIdentity>,
    Path(id): Path<String>,
) -> ApiResult<Data<Section>> {
    let record = state
        .store
        .scoped(&caller)
        .section(&id)
        .await
        .ok_or_else(|| ApiError::not_found("Section"))?;
    Ok(ApiResponse::ok(record))
}

pub async fn create_section(
    State(state): State<AppState>,
    Extension(caller): Extension<CallerIdentity>,
    Json(input): Json<CreateSection>,
) -> ApiResult<Data<Section>> {
    require_permission(&caller, ResourcePermission::Write)?;
    let record = state.store.scoped(&caller).create_section(input).await?;
    Ok(ApiResponse::ok(record))
}

pub async fn update_section(
    State(state): State<AppState>,
    Extension(caller): Extension<CallerIdentity>,
    Path(id): Path<String>,
    Json(patch): Json<UpdateSection>,
) -> ApiResult<Data<Section>> {
    require_permission(&caller, ResourcePermission::Write)?;
    let record = state
        .store
        .scoped(&caller)
        .update_section(&id, patch)
        .await?
        .ok_or_else(|| ApiError::not_found("Section"))?;
    Ok(ApiResponse::ok(record))
}

pub async fn delete_section(
    State(state): State<AppState>,
    Extension(caller): Extension<CallerIdentity>,
    Path(id): Path<String>,
) -> ApiResult<Data<Deleted>> {
    require_permission(&caller, ResourcePermission::Delete)?;
    if !state.store.scoped(&caller).delete_section(&id).await? {
        return Err(ApiError::not_found("Section"));
    }
    Ok(ApiResponse::ok(Deleted::new(id)))
}
