/// Startup bootstrap
///
/// Makes a fresh deployment usable: every partition of both countries exists
/// and each country has an admin account. Safe to run on every start.

use serde::{Deserialize, Serialize};
use tracing::info;

use super::Store;
use crate::error::StoreResult;
use crate::models::{Country, CreateUser, EntityKind, UserRole};

/// Default admin account created per country
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedConfig {
    pub admin_username: String,
    pub admin_password: String,
    pub admin_full_name: Option<String>,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            admin_username: "admin".to_string(),
            admin_password: "change-me-now".to_string(),
            admin_full_name: Some("Administrator".to_string()),
        }
    }
}

/// What a bootstrap run changed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub partitions_ensured: usize,
    pub admins_created: Vec<Country>,
}

/// Ensures partitions and per-country admin accounts exist
///
/// An existing account with the admin username is left untouched, whatever
/// its role or password. Running this twice creates nothing new.
pub async fn bootstrap(store: &Store, config: &SeedConfig) -> StoreResult<SeedReport> {
    let mut report = SeedReport::default();

    for country in Country::ALL {
        store.ensure_partitions(country).await?;
        report.partitions_ensured += EntityKind::ALL.len();

        if store
            .find_user_by_username(country, &config.admin_username)
            .await
            .is_some()
        {
            continue;
        }

        store
            .create_user(CreateUser {
                country: Some(country),
                username: config.admin_username.clone(),
                password: config.admin_password.clone(),
                full_name: config.admin_full_name.clone(),
                role: UserRole::Admin,
            })
            .await?;
        info!(country = %country, username = %config.admin_username, "Default admin created");
        report.admins_created.push(country);
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::FileBackend;
    use std::sync::Arc;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_bootstrap_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let store = Store::new(Arc::new(FileBackend::new(dir.path())));
        let config = SeedConfig::default();

        let first = bootstrap(&store, &config).await.unwrap();
        assert_eq!(first.admins_created, vec![Country::Egypt, Country::Libya]);
        assert!(dir.path().join("projects_egypt.json").exists());
        assert!(dir.path().join("inventory_libya.json").exists());
        assert!(dir.path().join("users.json").exists());

        let second = bootstrap(&store, &config).await.unwrap();
        assert!(second.admins_created.is_empty());

        let admins = store.get_users(None, &Default::default()).await;
        assert_eq!(admins.len(), 2);
        assert!(admins.iter().all(|u| u.role == UserRole::Admin));
    }
}
