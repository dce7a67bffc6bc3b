/// Payment endpoints
///
/// - `GET /api/payments?employeeId=&projectId=&sectionId=&paymentType=` - List with names
/// - `POST /api/payments` - Record a payment (derives a spending when tied to a project)
/// - `GET /api/payments/:id` - Fetch payment
/// - `PUT /api/payments/:id` - Update payment
/// - `DELETE /api/payments/:id` - Delete payment (manager)

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
    aggregation::PaymentView,
    auth::authorization::{require_permission, ResourcePermission},
    isolation::CallerIdentity,
    models::{CreatePayment, PaymentFilter, Payment, UpdatePayment},
};

pub async fn list_payments(
    State(state): State<AppState>,
    Extension(caller): Extension<CallerIdentity>,
    Query(filter): Query<PaymentFilter>,
) -> ApiResult<Data<Vec<PaymentView>>> {
    let rows = state.store.scoped(&caller).payments(&filter).await;
    Ok(ApiResponse::ok(rows))
}

pub async fn get_payment(
    State(state): State<AppState>,
    Extension(caller): Extension<CallerIdentity>,
    Path(id): Path<String>,
) -> ApiResult<Data<Payment>> {
    let record = state
        .store
        .scoped(&caller)
        .payment(&id)
        .await
        .ok_or_else(|| ApiError::not_found("Payment"))?;
    Ok(ApiResponse::ok(record))
}

/// Records a payment
///
/// The employee must exist in the caller's country (422 otherwise). A payment
/// tied to a project also appears as a spending of that project.
pub async fn create_payment(
    State(state): State<AppState>,
    Extension(caller): Extension<CallerIdentity>,
    Json(input): Json<CreatePayment>,
) -> ApiResult<Data<Payment>> {
    require_permission(&caller, ResourcePermission::Write)?;
    let record = state.store.scoped(&caller).create_payment(input).await?;
    Ok(ApiResponse::ok(record))
}

pub async fn update_payment(
    State(state): State<AppState>,
    Extension(caller): Extension<CallerIdentity>,
    Path(id): Path<String>,
    Json(patch): Json<UpdatePayment>,
) -> ApiResult<Data<Payment>> {
    require_permission(&caller, ResourcePermission::Write)?;
    let record = state
        .store
        .scoped(&caller)
        .update_payment(&id, patch)
        .await?
        .ok_or_else(|| ApiError::not_found("Payment"))?;
    Ok(ApiResponse::ok(record))
}

pub async fn delete_payment(
    State(state): State<AppState>,
    Extension(caller): Extension<CallerIdentity>,
    Path(id): Path<String>,
) -> ApiResult<Data<Deleted>> {
    require_permission(&caller, ResourcePermission::Delete)?;
    if !state.store.scoped(&caller).delete_payment(&id).await? {
        return Err(ApiError::not_found("Payment"));
    }
    Ok(ApiResponse::ok(Deleted::new(id)))
}
