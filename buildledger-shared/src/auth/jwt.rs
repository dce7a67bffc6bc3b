/// JWT token generation and validation
///
/// Access tokens carry the caller's identity, including the branch they belong
/// to. The country claim is what every scoped read and write uses, so it is
/// fixed at issuance and never taken from request data.
///
/// # Claims
///
/// - `sub`: user id
/// - `iss`: always `"buildledger"`
/// - `iat` / `nbf` / `exp`: Unix timestamps
/// - `username`, `role`, `country`: identity of the caller
///
/// # Example
///
/// ```
/// use buildledger_shared::auth::jwt::{create_token, validate_token, Claims};
/// use buildledger_shared::models::{Country, UserRole};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let secret = "a-secret-of-at-least-thirty-two-bytes!";
/// let claims = Claims::new("user-1", "ahmed", UserRole::Manager, Country::Egypt);
/// let token = create_token(&claims, secret)?;
///
/// let validated = validate_token(&token, secret)?;
/// assert_eq!(validated.country, Country::Egypt);
/// # Ok(())
/// # }
/// ```

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::models::{Country, User, UserRole};

/// Issuer written into and required from every token
pub const ISSUER: &str = "buildledger";

/// Error type for JWT operations
#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    #[error("Failed to create token: {0}")]
    CreateError(String),

    #[error("Failed to validate token: {0}")]
    ValidationError(String),

    #[error("Token has expired")]
    Expired,

    #[error("Invalid issuer: expected {expected}")]
    InvalidIssuer { expected: String },
}

/// JWT claims
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject - user id
    pub sub: String,

    pub iss: String,

    pub iat: i64,

    pub exp: i64,

    pub nbf: i64,

    pub username: String,

    pub role: UserRole,

    /// Branch the caller is bound to
    pub country: Country,
}

impl Claims {
    /// Default lifetime of an access token
    pub fn default_expiration() -> Duration {
        Duration::hours(24)
    }

    pub fn new(user_id: &str, username: &str, role: UserRole, country: Country) -> Self {
        Self::with_expiration(user_id, username, role, country, Self::default_expiration())
    }

    pub fn with_expiration(
        user_id: &str,
        username: &str,
        role: UserRole,
        country: Country,
        expires_in: Duration,
    ) -> Self {
        let now = Utc::now();

        Self {
            sub: user_id.to_string(),
            iss: ISSUER.to_string(),
            iat: now.timestamp(),
            exp: (now + expires_in).timestamp(),
            nbf: now.timestamp(),
            username: username.to_string(),
            role,
            country,
        }
    }

    /// Claims for a stored account
    pub fn for_user(user: &User) -> Self {
        Self::new(&user.id, &user.username, user.role, user.country)
    }

    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }
}

/// Signs claims with HS256
///
/// The secret should be at least 32 bytes.
pub fn create_token(claims: &Claims, secret: &str) -> Result<String, JwtError> {
    let header = Header::new(Algorithm::HS256);
    let key = EncodingKey::from_secret(secret.as_bytes());

    encode(&header, claims, &key)
        .map_err(|e| JwtError::CreateError(format!("Token encoding failed: {}", e)))
}

/// Validates signature, expiry, not-before and issuer, and returns the claims
pub fn validate_token(token: &str, secret: &str) -> Result<Claims, JwtError> {
    let key = DecodingKey::from_secret(secret.as_bytes());

    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[ISSUER]);
    validation.validate_exp = true;
    validation.validate_nbf = true;

    let token_data = decode::<Claims>(token, &key, &validation).map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::Expired,
        jsonwebtoken::errors::ErrorKind::InvalidIssuer => JwtError::InvalidIssuer {
            expected: ISSUER.to_string(),
        },
        _ => JwtError::ValidationError(format!("Token validation failed: {}", e)),
    })?;

    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret-key-at-least-32-bytes-long";

    #[test]
    fn test_create_and_validate() {
        let claims = Claims::new("u1", "ahmed", UserRole::Admin, Country::Libya);
        let token = create_token(&claims, SECRET).expect("Token creation should succeed");

        let validated = validate_token(&token, SECRET).expect("Validation should succeed");
        assert_eq!(validated, claims);
        assert_eq!(validated.iss, "buildledger");
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let claims = Claims::new("u1", "ahmed", UserRole::User, Country::Egypt);
        let token = create_token(&claims, SECRET).unwrap();

        assert!(validate_token(&token, "another-secret-key-at-least-32-bytes").is_err());
    }

    #[test]
    fn test_expired_token_rejected() {
        let claims = Claims::with_expiration(
            "u1",
            "ahmed",
            UserRole::User,
            Country::Egypt,
            Duration::seconds(-120),
        );
        assert!(claims.is_expired());
        let token = create_token(&claims, SECRET).unwrap();

        assert!(matches!(validate_token(&token, SECRET), Err(JwtError::Expired)));
    }

    #[test]
    fn test_foreign_issuer_rejected() {
        let mut claims = Claims::new("u1", "ahmed", UserRole::User, Country::Egypt);
        claims.iss = "someone-else".to_string();
        let token = create_token(&claims, SECRET).unwrap();

        assert!(matches!(
            validate_token(&token, SECRET),
            Err(JwtError::InvalidIssuer { .. })
        ));
    }

    #[test]
    fn test_garbage_token_rejected() {
        assert!(validate_token("not.a.token", SECRET).is_err());
    }
}
