/// Authorization helpers and permission checks
///
/// BuildLedger uses a small role hierarchy within a branch:
///
/// 1. **Branch binding**: a caller only ever sees their own country's data
///    (enforced by [`crate::isolation`])
/// 2. **Role-based permissions**: `admin > manager > user`
///
/// # Example
///
/// ```
/// use buildledger_shared::auth::authorization::{require_permission, require_role, ResourcePermission};
/// use buildledger_shared::isolation::CallerIdentity;
/// use buildledger_shared::models::{Country, UserRole};
///
/// let caller = CallerIdentity::new("u1", "mona", UserRole::Manager, Country::Libya);
/// assert!(require_role(&caller, UserRole::User).is_ok());
/// assert!(require_permission(&caller, ResourcePermission::Delete).is_ok());
/// assert!(require_permission(&caller, ResourcePermission::ManageUsers).is_err());
/// ```

use crate::isolation::CallerIdentity;
use crate::models::{Country, UserRole};

/// Error type for authorization checks
#[derive(Debug, thiserror::Error)]
pub enum AuthzError {
    /// Caller's role is below the required one
    #[error("Insufficient permissions: requires {required:?}, has {actual:?}")]
    InsufficientRole {
        required: UserRole,
        actual: UserRole,
    },

    /// A URL names a branch other than the caller's own
    #[error("Access to {requested} data denied for a {caller} account")]
    CountryMismatch { caller: Country, requested: Country },

    /// A URL segment is not a recognised country
    #[error("Invalid country: {0}")]
    InvalidCountry(String),
}

/// Operations guarded by role
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourcePermission {
    /// List and fetch branch records
    Read,

    /// Create and update branch records
    Write,

    /// Delete branch records
    Delete,

    /// Manage accounts
    ManageUsers,
}

impl ResourcePermission {
    /// Gets the minimum role required for this permission
    pub fn min_role(&self) -> UserRole {
        match self {
            ResourcePermission::Read | ResourcePermission::Write => UserRole::User,
            ResourcePermission::Delete => UserRole::Manager,
            ResourcePermission::ManageUsers => UserRole::Admin,
        }
    }
}

/// Checks that the caller holds `required_role` or higher
pub fn require_role(caller: &CallerIdentity, required_role: UserRole) -> Result<(), AuthzError> {
    let actual = caller.role();
    if !actual.has_permission(&required_role) {
        return Err(AuthzError::InsufficientRole {
            required: required_role,
            actual,
        });
    }
    Ok(())
}

/// Checks that the caller may perform `permission`
pub fn require_permission(
    caller: &CallerIdentity,
    permission: ResourcePermission,
) -> Result<(), AuthzError> {
    require_role(caller, permission.min_role())
}
