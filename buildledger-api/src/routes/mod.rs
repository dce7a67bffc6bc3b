/// API route handlers
///
/// This module contains all route handlers organized by resource:
///
/// - `health`: Health check endpoint
/// - `auth`: Login and caller profile
/// - `projects`, `sections`, `spendings`, `employees`, `payments`,
///   `inventory`: Branch record CRUD
/// - `users`: Account management (admin only)
/// - `reports`: Rollups, dashboard and per-country reports
///
/// Successful responses are wrapped as `{ "success": true, "data": ... }`.

use axum::Json;
use serde::Serialize;

pub mod auth;
pub mod employees;
pub mod health;
pub mod inventory;
pub mod payments;
pub mod projects;
pub mod reports;
pub mod sections;
pub mod spendings;
pub mod users;

/// Success envelope
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Json<Self> {
        Json(Self {
            success: true,
            data,
        })
    }
}

/// Body of a successful delete
#[derive(Debug, Serialize)]
pub struct Deleted {
    pub id: String,
    pub deleted: bool,
}

impl Deleted {
    pub fn new(id: String) -> Self {
        Self { id, deleted: true }
    }
}

/// Handler return type
pub type Data<T> = Json<ApiResponse<T>>;
