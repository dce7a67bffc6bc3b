/// Project endpoints
///
/// - `GET /api/projects?status=` - List projects
/// - `POST /api/projects` - Create project
/// - `GET /api/projects/:id` - Fetch project
/// - `PUT /api/projects/:id` - Update project
/// - `DELETE /api/projects/:id` - Delete project (manager)

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
    models::{CreateProject, Project, ProjectFilter, UpdateProject},
};

pub async fn list_projects(
    State(state): State<AppState>,
    Extension(caller): Extension<CallerIdentity>,
    Query(filter): Query<ProjectFilter>,
) -> ApiResult<Data<Vec<Project>>> {
    let projects = state.store.scoped(&caller).projects(&filter).await;
    Ok(ApiResponse::ok(projects))
}

pub async fn get_project(
    State(state): State<AppState>,
    Extension(caller): Extension<CallerIdentity>,
    Path(id): Path<String>,
) -> ApiResult<Data<Project>> {
    let project = state
        .store
        .scoped(&caller)
        .project(&id)
        .await
        .ok_or_else(|| ApiError::not_found("Project"))?;
    Ok(ApiResponse::ok(project))
}

pub async fn create_project(
    State(state): State<AppState>,
    Extension(caller): Extension<CallerIdentity>,
    Json(input): Json<CreateProject>,
) -> ApiResult<Data<Project>> {
    require_permission(&caller, ResourcePermission::Write)?;
    let project = state.store.scoped(&caller).create_project(input).await?;
    Ok(ApiResponse::ok(project))
}

pub async fn update_project(
    State(state): State<AppState>,
    Extension(caller): Extension<CallerIdentity>,
    Path(id): Path<String>,
    Json(patch): Json<UpdateProject>,
) -> ApiResult<Data<Project>> {
    require_permission(&caller, ResourcePermission::Write)?;
    let project = state
        .store
        .scoped(&caller)
        .update_project(&id, patch)
        .await?
        .ok_or_else(|| ApiError::not_found("Project"))?;
    Ok(ApiResponse::ok(project))
}

pub async fn delete_project(
    State(state): State<AppState>,
    Extension(caller): Extension<CallerIdentity>,
    Path(id): Path<String>,
) -> ApiResult<Data<Deleted>> {
    require_permission(&caller, ResourcePermission::Delete)?;
    if !state.store.scoped(&caller).delete_project(&id).await? {
        return Err(ApiError::not_found("Project"));
    }
    Ok(ApiResponse::ok(Deleted::new(id)))
}
