/// Employee endpoints
///
/// - `GET /api/employees?projectId=&sectionId=&active=&employeeType=` - List with names
/// - `POST /api/employees` - Hire
/// - `GET /api/employees/:id` - Fetch employee
/// - `PUT /api/employees/:id` - Update employee
/// - `DELETE /api/employees/:id` - Deactivate (manager)
/// - `GET /api/employees/:id/balance?asOf=YYYY-MM-DD` - Earned vs paid

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
    aggregation::{EmployeeBalance, EmployeeView},
    auth::authorization::{require_permission, ResourcePermission},
    isolation::CallerIdentity,
    models::{CreateEmployee, Employee, EmployeeFilter, UpdateEmployee},
};
use chrono::NaiveDate;
use serde::Deserialize;

/// Query for balance endpoints
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AsOfQuery {
    /// Defaults to today (UTC)
    pub as_of: Option<NaiveDate>,
}

impl AsOfQuery {
    pub fn date(&self) -> NaiveDate {
        self.as_of.unwrap_or_else(|| chrono::Utc::now().date_naive())
    }
}

pub async fn list_employees(
    State(state): State<AppState>,
    Extension(caller): Extension<CallerIdentity>,
    Query(filter): Query<EmployeeFilter>,
) -> ApiResult<Data<Vec<EmployeeView>>> {
    let employees = state.store.scoped(&caller).employees(&filter).await;
    Ok(ApiResponse::ok(employees))
}

pub async fn get_employee(
    State(state): State<AppState>,
    Extension(caller): Extension<CallerIdentity>,
    Path(id): Path<String>,
) -> ApiResult<Data<Employee>> {
    let employee = state
        .store
        .scoped(&caller)
        .employee(&id)
        .await
        .ok_or_else(|| ApiError::not_found("Employee"))?;
    Ok(ApiResponse::ok(employee))
}

pub async fn create_employee(
    State(state): State<AppState>,
    Extension(caller): Extension<CallerIdentity>,
    Json(input): Json<CreateEmployee>,
) -> ApiResult<Data<Employee>> {
    require_permission(&caller, ResourcePermission::Write)?;
    let employee = state.store.scoped(&caller).create_employee(input).await?;
    Ok(ApiResponse::ok(employee))
}

pub async fn update_employee(
    State(state): State<AppState>,
    Extension(caller): Extension<CallerIdentity>,
    Path(id): Path<String>,
    Json(patch): Json<UpdateEmployee>,
) -> ApiResult<Data<Employee>> {
    require_permission(&caller, ResourcePermission::Write)?;
    let employee = state
        .store
        .scoped(&caller)
        .update_employee(&id, patch)
        .await?
        .ok_or_else(|| ApiError::not_found("Employee"))?;
    Ok(ApiResponse::ok(employee))
}

/// Deactivates the employee; the record and its payments stay
pub async fn delete_employee(
    State(state): State<AppState>,
    Extension(caller): Extension<CallerIdentity>,
    Path(id): Path<String>,
) -> ApiResult<Data<Deleted>> {
    require_permission(&caller, ResourcePermission::Delete)?;
    if !state.store.scoped(&caller).delete_employee(&id).await? {
        return Err(ApiError::not_found("Employee"));
    }
    Ok(ApiResponse::ok(Deleted::new(id)))
}

pub async fn employee_balance(
    State(state): State<AppState>,
    Extension(caller): Extension<CallerIdentity>,
    Path(id): Path<String>,
    Query(query): Query<AsOfQuery>,
) -> ApiResult<Data<EmployeeBalance>> {
    let balance = state
        .store
        .get_employee_balance_as_of(caller.country(), &id, query.date())
        .await
        .ok_or_else(|| ApiError::not_found("Employee"))?;
    Ok(ApiResponse::ok(balance))
}
