/// Error handling for the API server
///
/// This module provides a unified error type that maps to HTTP responses.
/// All handlers return `Result<T, ApiError>`; core errors convert with `?`.
///
/// Every error body has the same shape:
///
/// ```json
/// {
///   "success": false,
///   "error": "validation_error",
///   "message": "Request validation failed",
///   "details": [{ "field": "name", "message": "Name must be 1-200 characters" }]
/// }
/// ```

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use buildledger_shared::auth::authorization::AuthzError;
use buildledger_shared::auth::jwt::JwtError;
use buildledger_shared::auth::password::PasswordError;
use buildledger_shared::error::{StoreError, ValidationFailure};
use serde::{Deserialize, Serialize};
use std::fmt;

/// API result type alias
pub type ApiResult<T> = Result<T, ApiError>;

/// Unified API error type
#[derive(Debug)]
pub enum ApiError {
    /// Bad request (400)
    BadRequest(String),

    /// Unauthorized (401)
    Unauthorized(String),

    /// Forbidden (403)
    Forbidden(String),

    /// Not found (404)
    NotFound(String),

    /// Unprocessable entity (422) - validation errors
    ValidationError(Vec<ValidationErrorDetail>),

    /// Internal server error (500)
    InternalError(String),

    /// Service unavailable (503)
    ServiceUnavailable(String),
}

/// Validation error detail
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationErrorDetail {
    /// Field that failed validation
    pub field: String,

    /// Error message
    pub message: String,
}

impl From<ValidationFailure> for ValidationErrorDetail {
    fn from(failure: ValidationFailure) -> Self {
        Self {
            field: failure.field,
            message: failure.message,
        }
    }
}

/// Error response format
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Always false
    pub success: bool,

    /// Error code (e.g., "bad_request", "unauthorized")
    pub error: String,

    /// Human-readable error message
    pub message: String,

    /// Optional validation errors
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<ValidationErrorDetail>>,
}

impl ApiError {
    /// 404 for an entity kind, e.g. `ApiError::not_found("Project")`
    pub fn not_found(what: &str) -> Self {
        ApiError::NotFound(format!("{} not found", what))
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            ApiError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            ApiError::Forbidden(msg) => write!(f, "Forbidden: {}", msg),
            ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ApiError::ValidationError(errors) => {
                write!(f, "Validation failed: {} errors", errors.len())
            }
            ApiError::InternalError(msg) => write!(f, "Internal error: {}", msg),
            ApiError::ServiceUnavailable(msg) => write!(f, "Service unavailable: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message, details) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg, None),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "unauthorized", msg, None),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, "forbidden", msg, None),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg, None),
            ApiError::ValidationError(errors) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "validation_error",
                "Request validation failed".to_string(),
                Some(errors),
            ),
            ApiError::InternalError(msg) => {
                // Log internal errors but don't expose details to clients
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".to_string(),
                    None,
                )
            }
            ApiError::ServiceUnavailable(msg) => (
                StatusCode::SERVICE_UNAVAILABLE,
                "service_unavailable",
                msg,
                None,
            ),
        };

        let body = Json(ErrorResponse {
            success: false,
            error: error_code.to_string(),
            message,
            details,
        });

        (status, body).into_response()
    }
}

/// Convert store errors to API errors
impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Validation(failures) => {
                ApiError::ValidationError(failures.into_iter().map(Into::into).collect())
            }
            StoreError::InvalidCountry(_) | StoreError::InvalidPartition { .. } => {
                ApiError::BadRequest(err.to_string())
            }
            StoreError::BackendUnavailable(msg) => ApiError::ServiceUnavailable(msg),
            _ => ApiError::InternalError(err.to_string()),
        }
    }
}

/// Convert request validation errors to API errors
impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        ApiError::from(StoreError::from(errors))
    }
}

/// Convert authorization errors to API errors
impl From<AuthzError> for ApiError {
    fn from(err: AuthzError) -> Self {
        match err {
            AuthzError::InsufficientRole { .. } => {
                ApiError::Forbidden("Insufficient permissions".to_string())
            }
            AuthzError::CountryMismatch { .. } => ApiError::Forbidden(err.to_string()),
            AuthzError::InvalidCountry(_) => ApiError::BadRequest(err.to_string()),
        }
    }
}

/// Convert password errors to API errors
impl From<PasswordError> for ApiError {
    fn from(err: PasswordError) -> Self {
        ApiError::InternalError(format!("Password operation failed: {}", err))
    }
}

/// Convert JWT errors to API errors
impl From<JwtError> for ApiError {
    fn from(err: JwtError) -> Self {
        match err {
            JwtError::Expired => ApiError::Unauthorized("Token expired".to_string()),
            JwtError::InvalidIssuer { .. } => {
                ApiError::Unauthorized("Invalid token issuer".to_string())
            }
            JwtError::CreateError(msg) => ApiError::InternalError(msg),
            _ => ApiError::Unauthorized(format!("Invalid token: {}", err)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use buildledger_shared::models::{Country, UserRole};

    #[test]
    fn test_error_display() {
        let err = ApiError::BadRequest("Invalid input".to_string());
        assert_eq!(err.to_string(), "Bad request: Invalid input");

        let err = ApiError::not_found("Project");
        assert_eq!(err.to_string(), "Not found: Project not found");
    }

    #[test]
    fn test_store_validation_maps_to_422() {
        let err = ApiError::from(StoreError::validation("username", "Username already exists"));
        match &err {
            ApiError::ValidationError(details) => {
                assert_eq!(details.len(), 1);
                assert_eq!(details[0].field, "username");
            }
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(err.into_response().status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn test_store_error_statuses() {
        let bad_country = ApiError::from(StoreError::InvalidCountry("mars".to_string()));
        assert_eq!(bad_country.into_response().status(), StatusCode::BAD_REQUEST);

        let down = ApiError::from(StoreError::BackendUnavailable("no pool".to_string()));
        assert_eq!(down.into_response().status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn test_authz_error_statuses() {
        let mismatch = ApiError::from(AuthzError::CountryMismatch {
            caller: Country::Egypt,
            requested: Country::Libya,
        });
        assert_eq!(mismatch.into_response().status(), StatusCode::FORBIDDEN);

        let role = ApiError::from(AuthzError::InsufficientRole {
            required: UserRole::Admin,
            actual: UserRole::User,
        });
        assert_eq!(role.into_response().status(), StatusCode::FORBIDDEN);

        let invalid = ApiError::from(AuthzError::InvalidCountry("mars".to_string()));
        assert_eq!(invalid.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_jwt_errors_are_unauthorized() {
        let err = ApiError::from(JwtError::Expired);
        assert_eq!(err.into_response().status(), StatusCode::UNAUTHORIZED);
    }
}
