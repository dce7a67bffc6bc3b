/// File-backed document storage
///
/// Each partition is one JSON array file in the data directory
/// (`projects_egypt.json`, `users.json`, ...). A partition is read into memory
/// on first access and every mutation rewrites the whole file.
///
/// # Write protocol
///
/// ```text
/// lock partition
///   ├─> clone in-memory array, apply the change to the clone
///   ├─> write <file>.tmp, rename over <file>
///   └─> swap the clone in as the cached array
/// unlock
/// ```
///
/// Writers to the same partition are serialised by that partition's mutex, so
/// concurrent mutations cannot drop each other's changes. A failed flush leaves
/// both the file and the cache at their previous state.
///
/// # Load failures
///
/// A missing file is an empty partition. A file that cannot be read or parsed
/// is also treated as empty and logged at `warn!`; the next successful write
/// replaces it.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex as StdMutex};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use super::backend::{document_id, document_in_country, DocumentBackend, DocumentEdit, StorageMode};
use crate::error::{StoreError, StoreResult};
use crate::models::{Country, EntityKind, Filter};

/// `(kind, country)` for partitioned kinds, `(kind, None)` for shared files
type PartitionKey = (EntityKind, Option<Country>);

/// Cached contents of one file; `None` until first loaded
type Partition = Arc<Mutex<Option<Vec<Value>>>>;

fn partition_key(kind: EntityKind, country: Option<Country>) -> PartitionKey {
    if kind.is_partitioned() {
        (kind, country)
    } else {
        (kind, None)
    }
}

/// JSON-file backend
pub struct FileBackend {
    data_dir: PathBuf,
    partitions: StdMutex<HashMap<PartitionKey, Partition>>,
}

impl FileBackend {
    /// Creates a backend rooted at `data_dir`
    ///
    /// Nothing touches the disk until the first access; the directory is
    /// created then if missing.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        let data_dir = data_dir.into();
        info!(data_dir = %data_dir.display(), "Using file storage");
        Self {
            data_dir,
            partitions: StdMutex::new(HashMap::new()),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Path of the file holding `kind` records for `country`
    pub fn partition_path(&self, kind: EntityKind, country: Option<Country>) -> PathBuf {
        self.data_dir.join(kind.file_name(country))
    }

    fn partition(&self, key: PartitionKey) -> Partition {
        let mut partitions = self.partitions.lock().unwrap_or_else(|e| e.into_inner());
        partitions.entry(key).or_default().clone()
    }

    /// Partitions a read must visit
    fn read_keys(kind: EntityKind, country: Option<Country>) -> Vec<PartitionKey> {
        match (kind.is_partitioned(), country) {
            (true, Some(country)) => vec![(kind, Some(country))],
            (true, None) => Country::ALL.iter().map(|c| (kind, Some(*c))).collect(),
            (false, _) => vec![(kind, None)],
        }
    }

    async fn ensure_dir(&self) -> StoreResult<()> {
        tokio::fs::create_dir_all(&self.data_dir)
            .await
            .map_err(|e| StoreError::io(&self.data_dir, e))
    }

    /// Reads a partition file; any failure yields an empty array
    async fn load(&self, key: PartitionKey) -> Vec<Value> {
        let path = self.partition_path(key.0, key.1);

        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "Partition file missing, starting empty");
                return Vec::new();
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Failed to read partition, treating as empty");
                return Vec::new();
            }
        };

        match serde_json::from_slice::<Vec<Value>>(&bytes) {
            Ok(docs) => {
                debug!(path = %path.display(), count = docs.len(), "Loaded partition");
                docs
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Corrupt partition file, treating as empty");
                Vec::new()
            }
        }
    }

    /// Writes a whole partition atomically (temp file + rename)
    async fn flush(&self, key: PartitionKey, docs: &[Value]) -> StoreResult<()> {
        self.ensure_dir().await?;

        let path = self.partition_path(key.0, key.1);
        let tmp = path.with_extension("json.tmp");
        let bytes = serde_json::to_vec_pretty(docs)?;

        tokio::fs::write(&tmp, &bytes)
            .await
            .map_err(|e| StoreError::io(&tmp, e))?;
        tokio::fs::rename(&tmp, &path)
            .await
            .map_err(|e| StoreError::io(&path, e))?;

        debug!(path = %path.display(), count = docs.len(), "Flushed partition");
        Ok(())
    }

    /// Runs `change` against a copy of the partition and persists the result
    ///
    /// `change` returns `None` to signal "nothing to write".
    async fn mutate<R>(
        &self,
        key: PartitionKey,
        change: impl FnOnce(&mut Vec<Value>) -> StoreResult<Option<R>>,
    ) -> StoreResult<Option<R>> {
        let partition = self.partition(key);
        let mut guard = partition.lock().await;
        if guard.is_none() {
            *guard = Some(self.load(key).await);
        }

        let mut next = guard.clone().unwrap_or_default();
        let outcome = change(&mut next)?;
        if outcome.is_some() {
            self.flush(key, &next).await?;
            *guard = Some(next);
        }
        Ok(outcome)
    }

    async fn snapshot(&self, key: PartitionKey) -> Vec<Value> {
        let partition = self.partition(key);
        let mut guard = partition.lock().await;
        if guard.is_none() {
            *guard = Some(self.load(key).await);
        }
        guard.clone().unwrap_or_default()
    }
}

/// Position of the document with `id`, restricted to `country` in shared files
fn position(docs: &[Value], kind: EntityKind, country: Country, id: &str) -> Option<usize> {
    docs.iter().position(|doc| {
        document_id(doc) == Some(id) && (kind.is_partitioned() || document_in_country(doc, country))
    })
}

#[async_trait]
impl DocumentBackend for FileBackend {
    fn mode(&self) -> StorageMode {
        StorageMode::File
    }

    async fn list(
        &self,
        kind: EntityKind,
        country: Option<Country>,
        filter: &Filter,
    ) -> StoreResult<Vec<Value>> {
        let mut out = Vec::new();
        for key in Self::read_keys(kind, country) {
            out.extend(self.snapshot(key).await.into_iter().filter(|doc| {
                filter.matches(doc)
                    && country.map_or(true, |c| kind.is_partitioned() || document_in_country(doc, c))
            }));
        }
        Ok(out)
    }

    async fn get(
        &self,
        kind: EntityKind,
        country: Option<Country>,
        id: &str,
    ) -> StoreResult<Option<Value>> {
        let docs = self.list(kind, country, &Filter::new()).await?;
        Ok(docs.into_iter().find(|doc| document_id(doc) == Some(id)))
    }

    async fn insert(&self, kind: EntityKind, country: Country, doc: Value) -> StoreResult<()> {
        let key = partition_key(kind, Some(country));
        self.mutate(key, move |docs| {
            docs.push(doc);
            Ok(Some(()))
        })
        .await?;
        Ok(())
    }

    async fn modify(
        &self,
        kind: EntityKind,
        country: Country,
        id: &str,
        edit: DocumentEdit<'_>,
    ) -> StoreResult<Option<Value>> {
        let key = partition_key(kind, Some(country));
        self.mutate(key, |docs| {
            let Some(index) = position(docs, kind, country, id) else {
                return Ok(None);
            };
            let updated = edit(docs[index].clone())?;
            docs[index] = updated.clone();
            Ok(Some(updated))
        })
        .await
    }

    async fn remove(&self, kind: EntityKind, country: Country, id: &str) -> StoreResult<bool> {
        let key = partition_key(kind, Some(country));
        let removed = self
            .mutate(key, |docs| {
                Ok(position(docs, kind, country, id).map(|index| {
                    docs.remove(index);
                }))
            })
            .await?;
        Ok(removed.is_some())
    }

    async fn ensure_partition(&self, kind: EntityKind, country: Country) -> StoreResult<()> {
        self.ensure_dir().await?;

        let key = partition_key(kind, Some(country));
        let path = self.partition_path(key.0, key.1);
        let partition = self.partition(key);
        let _guard = partition.lock().await;

        if tokio::fs::try_exists(&path)
            .await
            .map_err(|e| StoreError::io(&path, e))?
        {
            return Ok(());
        }

        tokio::fs::write(&path, b"[]")
            .await
            .map_err(|e| StoreError::io(&path, e))?;
        info!(path = %path.display(), "Created empty partition");
        Ok(())
    }

    async fn health_check(&self) -> StoreResult<()> {
        self.ensure_dir().await?;
        let metadata = tokio::fs::metadata(&self.data_dir)
            .await
            .map_err(|e| StoreError::io(&self.data_dir, e))?;
        if metadata.permissions().readonly() {
            return Err(StoreError::BackendUnavailable(format!(
                "data directory {} is read-only",
                self.data_dir.display()
            )));
        }
        Ok(())
    }

    async fn reload(&self) -> StoreResult<()> {
        let partitions: Vec<Partition> = {
            let partitions = self.partitions.lock().unwrap_or_else(|e| e.into_inner());
            partitions.values().cloned().collect()
        };
        for partition in partitions {
            *partition.lock().await = None;
        }
        info!(data_dir = %self.data_dir.display(), "Dropped cached partitions");
        Ok(())
    }
}
