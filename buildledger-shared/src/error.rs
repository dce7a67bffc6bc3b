/// Common error type for the record store
///
/// Every fallible core operation returns [`StoreResult`]. Not-found conditions
/// are deliberately absent from this enum: lookups return `Option<T>`, updates
/// return `Option<T>` and deletes return `bool`, so callers decide how a missing
/// record is reported.
///
/// # Example
///
/// ```
/// use buildledger_shared::error::{StoreError, ValidationFailure};
///
/// let err = StoreError::validation("amountUSD", "split payments require both currency amounts");
/// assert!(err.to_string().contains("amountUSD"));
/// ```

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::auth::password::PasswordError;
use crate::models::EntityKind;

/// Result type alias used throughout the store
pub type StoreResult<T> = Result<T, StoreError>;

/// A single field-level validation problem
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationFailure {
    /// Field that failed validation (camelCase, as it appears in JSON)
    pub field: String,

    /// Human-readable message
    pub message: String,
}

impl ValidationFailure {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Store error taxonomy
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A country value outside the recognised set was supplied
    #[error("Invalid country: {0}")]
    InvalidCountry(String),

    /// A create call carried no country for a partitioned entity kind
    #[error("Cannot resolve partition for {kind}: country is required")]
    InvalidPartition { kind: EntityKind },

    /// Entity-specific field violations
    #[error("Validation failed: {}", format_failures(.0))]
    Validation(Vec<ValidationFailure>),

    /// File-mode I/O failure
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Document could not be encoded or decoded
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Remote database failure
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Remote schema migration failure
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Password hashing failure (seeding, user creation)
    #[error("Password error: {0}")]
    Password(#[from] PasswordError),

    /// The configured backend cannot be reached
    #[error("Storage backend unavailable: {0}")]
    BackendUnavailable(String),
}

impl StoreError {
    /// Shorthand for a single-field validation failure
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        StoreError::Validation(vec![ValidationFailure::new(field, message)])
    }

    /// Wraps an I/O error with the path it occurred on
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        StoreError::Io {
            path: path.into(),
            source,
        }
    }
}

fn format_failures(failures: &[ValidationFailure]) -> String {
    failures
        .iter()
        .map(|f| format!("{}: {}", f.field, f.message))
        .collect::<Vec<_>>()
        .join("; ")
}

impl From<validator::ValidationErrors> for StoreError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut failures: Vec<ValidationFailure> = errors
            .field_errors()
            .iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |error| ValidationFailure {
                    field: field.to_string(),
                    message: error
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| "Validation failed".to_string()),
                })
            })
            .collect();
        failures.sort_by(|a, b| a.field.cmp(&b.field));
        StoreError::Validation(failures)
    }
}

/// Collects hand-written rule violations before failing
///
/// Entity validators push every problem they find so a caller sees all of them
/// at once rather than fixing one field per round trip.
#[derive(Debug, Default)]
pub(crate) struct Violations(Vec<ValidationFailure>);

impl Violations {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, field: &str, message: &str) {
        self.0.push(ValidationFailure::new(field, message));
    }

    pub(crate) fn check(&mut self, ok: bool, field: &str, message: &str) {
        if !ok {
            self.push(field, message);
        }
    }

    pub(crate) fn into_result(self) -> StoreResult<()> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(StoreError::Validation(self.0))
        }
    }
}
