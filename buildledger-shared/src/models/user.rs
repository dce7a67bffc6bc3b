/// User model
///
/// Back-office accounts. A user belongs to exactly one branch, and usernames
/// are unique per `(username, country)`: the same username may exist in both
/// branches as two unrelated accounts.
///
/// Passwords are stored as Argon2id hashes. The stored document carries the
/// hash; anything that leaves the process uses [`UserProfile`] instead.
///
/// # Roles
///
/// - **admin**: Everything, including user management
/// - **manager**: Create, update and delete branch records
/// - **user**: Create and update branch records
///
/// # Example
///
/// ```
/// use buildledger_shared::models::UserRole;
///
/// assert!(UserRole::Admin.has_permission(&UserRole::Manager));
/// assert!(!UserRole::User.has_permission(&UserRole::Manager));
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{enum_value, new_id, Country, EntityKind, Filter, Record};
use crate::error::{StoreResult, Violations};

/// Account role
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,

    Manager,

    #[default]
    User,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Admin => "admin",
            UserRole::Manager => "manager",
            UserRole::User => "user",
        }
    }

    /// Parses a role name as carried in token claims
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "admin" => Some(UserRole::Admin),
            "manager" => Some(UserRole::Manager),
            "user" => Some(UserRole::User),
            _ => None,
        }
    }

    /// Can create, list and remove accounts
    pub fn can_manage_users(&self) -> bool {
        matches!(self, UserRole::Admin)
    }

    /// Checks if this role has at least the permission level of `required`
    ///
    /// Hierarchy: Admin > Manager > User
    pub fn has_permission(&self, required: &UserRole) -> bool {
        self.permission_level() >= required.permission_level()
    }

    fn permission_level(&self) -> u8 {
        match self {
            UserRole::Admin => 3,
            UserRole::Manager => 2,
            UserRole::User => 1,
        }
    }
}

/// Stored user account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,

    pub country: Country,

    pub username: String,

    /// Argon2id PHC string
    pub password_hash: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,

    #[serde(default)]
    pub role: UserRole,

    #[serde(default = "default_active")]
    pub active: bool,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

fn default_active() -> bool {
    true
}

impl User {
    /// Public projection without the password hash
    pub fn profile(&self) -> UserProfile {
        UserProfile {
            id: self.id.clone(),
            country: self.country,
            username: self.username.clone(),
            full_name: self.full_name.clone(),
            role: self.role,
            active: self.active,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

impl Record for User {
    const KIND: EntityKind = EntityKind::User;

    fn id(&self) -> &str {
        &self.id
    }

    fn country(&self) -> Country {
        self.country
    }
}

/// User as returned to clients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: String,
    pub country: Country,
    pub username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    pub role: UserRole,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a user
///
/// Carries the plaintext password; the store hashes it before anything is
/// persisted.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateUser {
    #[serde(default)]
    pub country: Option<Country>,

    #[validate(length(min = 3, max = 50, message = "Username must be 3-50 characters"))]
    pub username: String,

    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,

    pub full_name: Option<String>,

    #[serde(default)]
    pub role: UserRole,
}

impl CreateUser {
    /// Trims the username so length rules apply to what is stored
    pub(crate) fn normalized(mut self) -> Self {
        self.username = self.username.trim().to_string();
        self
    }

    pub(crate) fn into_record(
        self,
        country: Country,
        password_hash: String,
        now: DateTime<Utc>,
    ) -> StoreResult<User> {
        let user = User {
            id: new_id(),
            country,
            username: self.username,
            password_hash,
            full_name: self.full_name,
            role: self.role,
            active: true,
            created_at: now,
            updated_at: now,
        };

        let mut v = Violations::new();
        v.check(
            !user.username.contains(char::is_whitespace),
            "username",
            "Username must not contain whitespace",
        );
        v.into_result()?;
        Ok(user)
    }
}

/// Partial update for a user
///
/// Usernames are immutable; a new `password` is hashed by the store.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUser {
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: Option<String>,

    pub full_name: Option<String>,

    pub role: Option<UserRole>,

    pub active: Option<bool>,
}

impl UpdateUser {
    pub(crate) fn apply(
        self,
        user: &mut User,
        password_hash: Option<String>,
        now: DateTime<Utc>,
    ) -> StoreResult<()> {
        if let Some(hash) = password_hash {
            user.password_hash = hash;
        }
        if self.full_name.is_some() {
            user.full_name = self.full_name;
        }
        if let Some(role) = self.role {
            user.role = role;
        }
        if let Some(active) = self.active {
            user.active = active;
        }
        user.updated_at = now;
        Ok(())
    }
}

/// Query filter for users
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserFilter {
    pub username: Option<String>,
    pub role: Option<UserRole>,
}

impl UserFilter {
    pub fn to_filter(&self) -> Filter {
        Filter::new()
            .eq_opt("username", self.username.clone())
            .eq_opt("role", self.role.as_ref().map(enum_value))
    }
}
