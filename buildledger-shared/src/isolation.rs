/// Country isolation
///
/// Every request is bound to exactly one branch. The binding comes from the
/// caller's validated token and is carried as an immutable [`CallerIdentity`];
/// nothing in a request body, query string or path can change it.
///
/// Two entry points exist:
///
/// - Claim-based: [`crate::store::Store::scoped`] yields a
///   [`crate::store::ScopedStore`] that reads only the caller's country and
///   stamps it on every create.
/// - Path-based: routes shaped like `/reports/:country/...` validate the
///   segment with [`parse_path_country`]. That alone does not isolate anything,
///   so handlers go through [`CallerIdentity::authorize_path_country`], which
///   also requires the segment to equal the caller's own country.
///
/// # Example
///
/// ```
/// use buildledger_shared::isolation::CallerIdentity;
/// use buildledger_shared::models::{Country, UserRole};
///
/// let caller = CallerIdentity::new("u1", "ahmed", UserRole::User, Country::Egypt);
/// assert_eq!(caller.authorize_path_country("egypt").unwrap(), Country::Egypt);
/// assert!(caller.authorize_path_country("libya").is_err());
/// assert!(caller.authorize_path_country("mars").is_err());
/// ```

use serde::Serialize;

use crate::auth::authorization::AuthzError;
use crate::auth::jwt::Claims;
use crate::error::StoreResult;
use crate::models::{Country, UserRole};

/// Authenticated caller
///
/// Built once per request from validated token claims. Fields are private so
/// the country cannot be reassigned after authentication.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CallerIdentity {
    user_id: String,
    username: String,
    role: UserRole,
    country: Country,
}

impl CallerIdentity {
    pub fn new(user_id: &str, username: &str, role: UserRole, country: Country) -> Self {
        Self {
            user_id: user_id.to_string(),
            username: username.to_string(),
            role,
            country,
        }
    }

    /// Identity carried by validated token claims
    pub fn from_claims(claims: &Claims) -> Self {
        Self::new(&claims.sub, &claims.username, claims.role, claims.country)
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn role(&self) -> UserRole {
        self.role
    }

    pub fn country(&self) -> Country {
        self.country
    }

    /// Validates a country URL segment and requires it to be the caller's own
    pub fn authorize_path_country(&self, segment: &str) -> Result<Country, AuthzError> {
        let requested = parse_path_country(segment)
            .map_err(|_| AuthzError::InvalidCountry(segment.to_string()))?;

        if requested != self.country {
            tracing::warn!(
                user_id = %self.user_id,
                caller = %self.country,
                requested = %requested,
                "Cross-country path access denied"
            );
            return Err(AuthzError::CountryMismatch {
                caller: self.country,
                requested,
            });
        }
        Ok(requested)
    }
}

/// Validates a country URL segment
///
/// Only checks the value is a recognised country; callers must still compare
/// it against the caller's claim.
pub fn parse_path_country(segment: &str) -> StoreResult<Country> {
    Country::parse(segment)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;

    #[test]
    fn test_parse_path_country() {
        assert_eq!(parse_path_country("libya").unwrap(), Country::Libya);
        assert_eq!(parse_path_country("Egypt").unwrap(), Country::Egypt);
        assert!(matches!(
            parse_path_country("sudan"),
            Err(StoreError::InvalidCountry(_))
        ));
    }

    #[test]
    fn test_authorize_path_country_mismatch() {
        let caller = CallerIdentity::new("u1", "ahmed", UserRole::Admin, Country::Libya);
        match caller.authorize_path_country("egypt") {
            Err(AuthzError::CountryMismatch { caller, requested }) => {
                assert_eq!(caller, Country::Libya);
                assert_eq!(requested, Country::Egypt);
            }
            other => panic!("expected mismatch, got {:?}", other),
        }
    }

    #[test]
    fn test_authorize_path_country_invalid() {
        let caller = CallerIdentity::new("u1", "ahmed", UserRole::Admin, Country::Libya);
        assert!(matches!(
            caller.authorize_path_country(""),
            Err(AuthzError::InvalidCountry(_))
        ));
    }

    #[test]
    fn test_from_claims() {
        let claims = Claims::new("u9", "sara", UserRole::Manager, Country::Egypt);
        let caller = CallerIdentity::from_claims(&claims);
        assert_eq!(caller.user_id(), "u9");
        assert_eq!(caller.username(), "sara");
        assert_eq!(caller.role(), UserRole::Manager);
        assert_eq!(caller.country(), Country::Egypt);
    }
}
