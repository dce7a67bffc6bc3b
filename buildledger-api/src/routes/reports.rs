/// Rollups, dashboard and reports
///
/// - `GET /api/projects/:id/full-expenses` - Project expense rollup
/// - `GET /api/sections/:id/full-costs` - Section cost rollup
/// - `GET /api/dashboard` - Country dashboard
/// - `GET /api/reports/:country/projects` - Per-project budget report
/// - `GET /api/reports/:country/balances?asOf=` - Active employee balances
///
/// Report paths carry a country segment; it must name the caller's own
/// country (403 otherwise, 400 when it is not a country at all).

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    routes::{employees::AsOfQuery, ApiResponse, Data},
};
use axum::{
    extract::{Path, Query, State},
    Extension,
};
use buildledger_shared::{
    aggregation::{BalanceReport, DashboardSummary, ProjectExpenses, ProjectReport, SectionCosts},
    isolation::CallerIdentity,
};

pub async fn project_full_expenses(
    State(state): State<AppState>,
    Extension(caller): Extension<CallerIdentity>,
    Path(id): Path<String>,
) -> ApiResult<Data<ProjectExpenses>> {
    let expenses = state
        .store
        .scoped(&caller)
        .project_full_expenses(&id)
        .await
        .ok_or_else(|| ApiError::not_found("Project"))?;
    Ok(ApiResponse::ok(expenses))
}

pub async fn section_full_costs(
    State(state): State<AppState>,
    Extension(caller): Extension<CallerIdentity>,
    Path(id): Path<String>,
) -> ApiResult<Data<SectionCosts>> {
    let costs = state
        .store
        .scoped(&caller)
        .section_full_costs(&id)
        .await
        .ok_or_else(|| ApiError::not_found("Section"))?;
    Ok(ApiResponse::ok(costs))
}

pub async fn dashboard(
    State(state): State<AppState>,
    Extension(caller): Extension<CallerIdentity>,
) -> ApiResult<Data<DashboardSummary>> {
    Ok(ApiResponse::ok(state.store.scoped(&caller).dashboard().await))
}

pub async fn project_report(
    State(state): State<AppState>,
    Extension(caller): Extension<CallerIdentity>,
    Path(country): Path<String>,
) -> ApiResult<Data<ProjectReport>> {
    let country = caller.authorize_path_country(&country)?;
    Ok(ApiResponse::ok(state.store.get_project_report(country).await))
}

pub async fn balance_report(
    State(state): State<AppState>,
    Extension(caller): Extension<CallerIdentity>,
    Path(country): Path<String>,
    Query(query): Query<AsOfQuery>,
) -> ApiResult<Data<BalanceReport>> {
    let country = caller.authorize_path_country(&country)?;
    let report = state.store.get_balance_report(country, query.date()).await;
    Ok(ApiResponse::ok(report))
}
