/// Authentication and authorization utilities
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing and verification
/// - [`jwt`]: Access tokens carrying the caller's identity and branch
/// - [`authorization`]: Role checks against a [`crate::isolation::CallerIdentity`]
///
/// # Example
///
/// ```no_run
/// use buildledger_shared::auth::password::{hash_password, verify_password};
/// use buildledger_shared::auth::jwt::{create_token, Claims};
/// use buildledger_shared::models::{Country, UserRole};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let hash = hash_password("user_password")?;
/// assert!(verify_password("user_password", &hash)?);
///
/// let claims = Claims::new("user-id", "ahmed", UserRole::User, Country::Egypt);
/// let token = create_token(&claims, "secret-key-of-at-least-thirty-two-bytes")?;
/// # Ok(())
/// # }
/// ```

pub mod authorization;
pub mod jwt;
pub mod password;
