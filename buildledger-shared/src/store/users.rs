use chrono::Utc;
use tracing::info;
use validator::Validate;

use super::{require_country, Store};
use crate::auth::password::{hash_password, verify_password};
use crate::error::{StoreError, StoreResult};
use crate::models::{Country, CreateUser, UpdateUser, User, UserFilter};

impl Store {
    /// Lists users; `None` spans both countries of the shared file
    pub async fn get_users(&self, country: Option<Country>, filter: &UserFilter) -> Vec<User> {
        self.collection::<User>()
            .list(country, &filter.to_filter())
            .await
    }

    pub async fn find_user(&self, country: Country, id: &str) -> Option<User> {
        self.collection::<User>().find(Some(country), id).await
    }

    /// Looks up an account by its per-country username
    pub async fn find_user_by_username(&self, country: Country, username: &str) -> Option<User> {
        let filter = UserFilter {
            username: Some(username.trim().to_string()),
            ..Default::default()
        };
        self.get_users(Some(country), &filter).await.into_iter().next()
    }

    /// Creates an account, hashing its password
    ///
    /// # Errors
    ///
    /// `Validation` when the country is missing, the input is malformed, or the
    /// username is already taken in that country. The same username in the
    /// other country is a different account and is allowed.
    pub async fn create_user(&self, input: CreateUser) -> StoreResult<User> {
        let country = require_country(input.country)?;
        let input = input.normalized();
        input.validate()?;

        let password_hash = hash_password(&input.password)?;

        let _guard = self.user_writes.lock().await;
        if self
            .find_user_by_username(country, &input.username)
            .await
            .is_some()
        {
            return Err(StoreError::validation("username", "Username already exists"));
        }

        let user = input.into_record(country, password_hash, Utc::now())?;
        self.collection::<User>().insert(&user).await?;
        info!(
            kind = "users",
            country = %country,
            id = %user.id,
            username = %user.username,
            role = user.role.as_str(),
            "Record created"
        );
        Ok(user)
    }

    pub async fn update_user(
        &self,
        id: &str,
        country: Country,
        patch: UpdateUser,
    ) -> StoreResult<Option<User>> {
        patch.validate()?;
        let password_hash = match &patch.password {
            Some(password) => Some(hash_password(password)?),
            None => None,
        };

        let now = Utc::now();
        let updated = self
            .collection::<User>()
            .modify(country, id, |user| patch.apply(user, password_hash, now))
            .await?;

        if updated.is_some() {
            info!(kind = "users", country = %country, id = %id, "Record updated");
        }
        Ok(updated)
    }

    pub async fn delete_user(&self, id: &str, country: Country) -> StoreResult<bool> {
        let removed = self.collection::<User>().remove(country, id).await?;
        if removed {
            info!(kind = "users", country = %country, id = %id, "Record deleted");
        }
        Ok(removed)
    }

    /// Checks credentials for an active account in `country`
    ///
    /// Returns `None` for an unknown username, a wrong password or an inactive
    /// account alike.
    pub async fn authenticate(
        &self,
        country: Country,
        username: &str,
        password: &str,
    ) -> StoreResult<Option<User>> {
        let Some(user) = self.find_user_by_username(country, username).await else {
            return Ok(None);
        };
        if !user.active {
            return Ok(None);
        }
        if verify_password(password, &user.password_hash)? {
            Ok(Some(user))
        } else {
            Ok(None)
        }
    }
}
