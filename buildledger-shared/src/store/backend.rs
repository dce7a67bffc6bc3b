/// Storage backend contract
///
/// Both backends store records as JSON documents keyed by entity kind and
/// country. The typed layer above ([`super::collection::Collection`]) handles
/// encoding and decoding; backends never look inside a document beyond `id`,
/// `country` and the equality predicates of a [`Filter`].
///
/// # Partition routing
///
/// ```text
/// kind.is_partitioned()  country   file mode                 remote mode
/// ---------------------  -------   ----------------------    ---------------------------
/// true                   Some(c)   <kind>_<c>.json           WHERE country = c
/// true                   None      every <kind>_*.json       (no country predicate)
/// false                  Some(c)   <kind>.json, filtered     WHERE country = c
/// false                  None      <kind>.json               (no country predicate)
/// ```
///
/// Listing with `country = None` exists for maintenance and tests; scoped
/// callers always pass a country.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use crate::error::StoreResult;
use crate::models::{Country, EntityKind, Filter};

/// Backend currently serving the store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageMode {
    /// JSON array files under the data directory
    File,

    /// PostgreSQL JSONB tables
    Remote,
}

impl StorageMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            StorageMode::File => "file",
            StorageMode::Remote => "remote",
        }
    }
}

impl fmt::Display for StorageMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// In-place document edit used by [`DocumentBackend::modify`]
///
/// Receives the stored document and returns its replacement. An error aborts
/// the edit and leaves the stored document untouched.
pub type DocumentEdit<'a> = &'a mut (dyn FnMut(Value) -> StoreResult<Value> + Send);

/// JSON document storage partitioned by entity kind and country
#[async_trait]
pub trait DocumentBackend: Send + Sync {
    /// Which backend this is
    fn mode(&self) -> StorageMode;

    /// Lists matching documents in insertion order
    async fn list(
        &self,
        kind: EntityKind,
        country: Option<Country>,
        filter: &Filter,
    ) -> StoreResult<Vec<Value>>;

    /// Fetches one document by id
    async fn get(
        &self,
        kind: EntityKind,
        country: Option<Country>,
        id: &str,
    ) -> StoreResult<Option<Value>>;

    /// Appends a new document; `doc` must carry its `id`
    async fn insert(&self, kind: EntityKind, country: Country, doc: Value) -> StoreResult<()>;

    /// Replaces a document through `edit` while holding the partition
    ///
    /// Returns the stored replacement, or `None` when no document with `id`
    /// exists in the partition.
    async fn modify(
        &self,
        kind: EntityKind,
        country: Country,
        id: &str,
        edit: DocumentEdit<'_>,
    ) -> StoreResult<Option<Value>>;

    /// Removes a document; returns whether it existed
    async fn remove(&self, kind: EntityKind, country: Country, id: &str) -> StoreResult<bool>;

    /// Makes sure the partition exists (file created, table reachable)
    async fn ensure_partition(&self, kind: EntityKind, country: Country) -> StoreResult<()>;

    /// Verifies the backend can serve requests
    async fn health_check(&self) -> StoreResult<()>;

    /// Drops any cached state so the next access reads durable storage
    async fn reload(&self) -> StoreResult<()>;
}

/// Extracts the `id` of a document
pub(crate) fn document_id(doc: &Value) -> Option<&str> {
    doc.get("id").and_then(Value::as_str)
}

/// Whether a document belongs to `country`
pub(crate) fn document_in_country(doc: &Value, country: Country) -> bool {
    doc.get("country").and_then(Value::as_str) == Some(country.as_str())
}
