/// Authentication endpoints
///
/// # Endpoints
///
/// - `POST /auth/login` - Exchange branch credentials for a token
/// - `GET /api/me` - Caller profile
///
/// A token binds its holder to one country for its whole lifetime; there is
/// no way to switch branch without logging in again.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    routes::{ApiResponse, Data},
};
use axum::{extract::State, Extension, Json};
use buildledger_shared::{
    auth::jwt,
    isolation::CallerIdentity,
    models::{Country, UserProfile},
};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    /// Branch to log into (`egypt` or `libya`)
    #[validate(length(min = 1, message = "Country is required"))]
    pub country: String,

    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Login response
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    /// Bearer token
    pub token: String,

    /// Token expiry (Unix seconds)
    pub expires_at: i64,

    pub user: UserProfile,
}

/// Login endpoint
///
/// # Endpoint
///
/// ```text
/// POST /auth/login
/// Content-Type: application/json
///
/// {
///   "country": "egypt",
///   "username": "admin",
///   "password": "..."
/// }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: Unknown country
/// - `401 Unauthorized`: Invalid credentials or inactive account
/// - `422 Unprocessable Entity`: Validation failed
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Data<LoginResponse>> {
    req.validate()?;

    let country = Country::parse(&req.country)?;

    let user = state
        .store
        .authenticate(country, &req.username, &req.password)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Invalid username or password".to_string()))?;

    let claims = jwt::Claims::for_user(&user);
    let token = jwt::create_token(&claims, state.jwt_secret())?;

    tracing::info!(user_id = %user.id, country = %country, "User logged in");

    Ok(ApiResponse::ok(LoginResponse {
        token,
        expires_at: claims.exp,
        user: user.profile(),
    }))
}

/// Caller profile
///
/// Answers from the stored account so deactivation and role changes show up
/// immediately, even though the token itself stays valid until expiry.
pub async fn me(
    State(state): State<AppState>,
    Extension(caller): Extension<CallerIdentity>,
) -> ApiResult<Data<UserProfile>> {
    let user = state
        .store
        .find_user(caller.country(), caller.user_id())
        .await
        .ok_or_else(|| ApiError::not_found("User"))?;

    Ok(ApiResponse::ok(user.profile()))
}
