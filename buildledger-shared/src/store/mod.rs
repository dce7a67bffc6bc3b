/// Dual-mode record store
///
/// The store offers CRUD over the seven entity kinds on top of one of two
/// backends:
///
/// - [`file::FileBackend`]: per-country JSON array files in a data directory
/// - [`remote::PgBackend`]: PostgreSQL JSONB tables
///
/// # Backend selection
///
/// The backend is chosen once by [`Store::connect`] from a
/// [`StorageModePreference`]:
///
/// ```text
/// file    -> file backend
/// remote  -> pool + migrations; failure is fatal
/// auto    -> remote if a database URL is configured and reachable,
///            otherwise file (logged)
/// ```
///
/// After that the backend only changes through [`Store::switch_backend`],
/// which logs the transition. Every operation reads the current backend, so a
/// switch takes effect for the next call.
///
/// # Operations
///
/// Per entity kind `x` (see the `projects`, `sections`, ... submodules):
///
/// - `get_xs(country, filter)` → `Vec<X>` in insertion order
/// - `find_x(country, id)` → `Option<X>`
/// - `create_x(input)` → `StoreResult<X>`; partition taken from `input.country`
/// - `update_x(id, country, patch)` → `StoreResult<Option<X>>`
/// - `delete_x(id, country)` → `StoreResult<bool>`
///
/// # Example
///
/// ```no_run
/// use buildledger_shared::models::{Country, CreateProject, ProjectFilter};
/// use buildledger_shared::store::{Store, StoreConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let store = Store::connect(StoreConfig::file("./data")).await?;
///
/// let project = store
///     .create_project(CreateProject {
///         country: Some(Country::Egypt),
///         name: "Nasr City Tower".to_string(),
///         ..Default::default()
///     })
///     .await?;
///
/// let projects = store.get_projects(Country::Egypt, &ProjectFilter::default()).await;
/// assert_eq!(projects[0].id, project.id);
/// # Ok(())
/// # }
/// ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::{Arc, RwLock};
use tracing::{error, info, warn};

use crate::db::migrations::run_migrations;
use crate::db::pool::{create_pool, DatabaseConfig};
use crate::error::{StoreError, StoreResult};
use crate::isolation::CallerIdentity;
use crate::models::{Country, EntityKind, Record};

pub mod aggregates;
pub mod backend;
pub(crate) mod collection;
pub mod employees;
pub mod file;
pub mod inventory;
pub mod payments;
pub mod projects;
pub mod remote;
pub mod scoped;
pub mod sections;
pub mod seed;
pub mod spendings;
pub mod users;

pub use backend::{DocumentBackend, StorageMode};
pub use file::FileBackend;
pub use remote::PgBackend;
pub use scoped::ScopedStore;
pub use seed::{bootstrap, SeedConfig, SeedReport};

use collection::Collection;

/// Requested backend
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageModePreference {
    /// Remote when configured and reachable, file otherwise
    #[default]
    Auto,
    File,
    Remote,
}

/// Store configuration
#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub mode: StorageModePreference,

    /// Directory for partition files (file mode)
    pub data_dir: PathBuf,

    /// Remote database; required for `remote`, optional for `auto`
    pub database: Option<DatabaseConfig>,
}

impl StoreConfig {
    /// File storage only
    pub fn file(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            mode: StorageModePreference::File,
            data_dir: data_dir.into(),
            database: None,
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            mode: StorageModePreference::Auto,
            data_dir: PathBuf::from("./data"),
            database: None,
        }
    }
}

/// Backend health as reported to operators
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreHealth {
    pub mode: StorageMode,
    pub healthy: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Record store facade
pub struct Store {
    backend: RwLock<Arc<dyn DocumentBackend>>,

    /// Serialises user creation so the (username, country) check and the
    /// insert happen together
    user_writes: tokio::sync::Mutex<()>,
}

impl Store {
    /// Wraps an already constructed backend
    pub fn new(backend: Arc<dyn DocumentBackend>) -> Self {
        Self {
            backend: RwLock::new(backend),
            user_writes: tokio::sync::Mutex::new(()),
        }
    }

    /// Selects and initialises the backend
    ///
    /// # Errors
    ///
    /// `remote` mode fails with `BackendUnavailable` when no database is
    /// configured, or with the connection/migration error when the database
    /// cannot be used. `auto` and `file` never fail here.
    pub async fn connect(config: StoreConfig) -> StoreResult<Self> {
        let backend: Arc<dyn DocumentBackend> = match config.mode {
            StorageModePreference::File => Arc::new(FileBackend::new(config.data_dir)),
            StorageModePreference::Remote => {
                let database = config.database.ok_or_else(|| {
                    StoreError::BackendUnavailable("remote storage requires a database URL".into())
                })?;
                Arc::new(connect_remote(database).await?)
            }
            StorageModePreference::Auto => match config.database {
                Some(database) if !database.url.is_empty() => {
                    match connect_remote(database).await {
                        Ok(remote) => Arc::new(remote),
                        Err(e) => {
                            warn!(
                                error = %e,
                                data_dir = %config.data_dir.display(),
                                "Remote storage unavailable, falling back to file storage"
                            );
                            Arc::new(FileBackend::new(config.data_dir))
                        }
                    }
                }
                _ => {
                    info!("No database configured, using file storage");
                    Arc::new(FileBackend::new(config.data_dir))
                }
            },
        };

        info!(mode = %backend.mode(), "Record store ready");
        Ok(Self::new(backend))
    }

    /// Active backend
    pub fn mode(&self) -> StorageMode {
        self.backend().mode()
    }

    /// Replaces the active backend
    ///
    /// In-flight operations finish on the backend they started with.
    pub fn switch_backend(&self, backend: Arc<dyn DocumentBackend>) {
        let mut current = self.backend.write().unwrap_or_else(|e| e.into_inner());
        let from = current.mode();
        let to = backend.mode();
        *current = backend;
        info!(from = %from, to = %to, "Storage backend switched");
    }

    /// Probes the active backend
    pub async fn health(&self) -> StoreHealth {
        let backend = self.backend();
        match backend.health_check().await {
            Ok(()) => StoreHealth {
                mode: backend.mode(),
                healthy: true,
                error: None,
            },
            Err(e) => {
                error!(mode = %backend.mode(), error = %e, "Storage health check failed");
                StoreHealth {
                    mode: backend.mode(),
                    healthy: false,
                    error: Some(e.to_string()),
                }
            }
        }
    }

    /// Drops cached data so the next read goes to durable storage
    pub async fn reload(&self) -> StoreResult<()> {
        self.backend().reload().await
    }

    /// Makes sure every partition of `country` exists
    pub async fn ensure_partitions(&self, country: Country) -> StoreResult<()> {
        let backend = self.backend();
        for kind in EntityKind::ALL {
            backend.ensure_partition(kind, country).await?;
        }
        Ok(())
    }

    /// View of the store bound to the caller's country
    pub fn scoped<'a>(&'a self, caller: &'a CallerIdentity) -> ScopedStore<'a> {
        ScopedStore::new(self, caller)
    }

    pub(crate) fn backend(&self) -> Arc<dyn DocumentBackend> {
        self.backend
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    pub(crate) fn collection<T: Record>(&self) -> Collection<T> {
        Collection::new(self.backend())
    }
}

async fn connect_remote(database: DatabaseConfig) -> StoreResult<PgBackend> {
    let pool = create_pool(database).await?;
    run_migrations(&pool).await?;
    Ok(PgBackend::new(pool))
}

/// Partition for a create call on a partitioned kind
pub(crate) fn require_partition(kind: EntityKind, country: Option<Country>) -> StoreResult<Country> {
    country.ok_or(StoreError::InvalidPartition { kind })
}

/// Country for a create call on a shared-file kind
pub(crate) fn require_country(country: Option<Country>) -> StoreResult<Country> {
    country.ok_or_else(|| StoreError::validation("country", "Country is required"))
}
