/// Typed access to one entity kind
///
/// Wraps the active [`DocumentBackend`] and converts between documents and
/// records. Reads follow the store's degradation rule: a backend failure or an
/// undecodable document is logged and skipped, so a read always produces a
/// (possibly empty) answer. Writes propagate every failure.

use std::marker::PhantomData;
use std::sync::Arc;

use tracing::warn;

use super::backend::DocumentBackend;
use crate::error::StoreResult;
use crate::models::{Country, Filter, Record};

pub(crate) struct Collection<T> {
    backend: Arc<dyn DocumentBackend>,
    _record: PhantomData<fn() -> T>,
}

impl<T: Record> Collection<T> {
    pub(crate) fn new(backend: Arc<dyn DocumentBackend>) -> Self {
        Self {
            backend,
            _record: PhantomData,
        }
    }

    fn decode(doc: serde_json::Value) -> Option<T> {
        match serde_json::from_value::<T>(doc) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!(kind = %T::KIND, error = %e, "Skipping undecodable document");
                None
            }
        }
    }

    pub(crate) async fn list(&self, country: Option<Country>, filter: &Filter) -> Vec<T> {
        match self.backend.list(T::KIND, country, filter).await {
            Ok(docs) => docs.into_iter().filter_map(Self::decode).collect(),
            Err(e) => {
                warn!(
                    kind = %T::KIND,
                    country = ?country,
                    error = %e,
                    "Read failed, returning empty result"
                );
                Vec::new()
            }
        }
    }

    pub(crate) async fn find(&self, country: Option<Country>, id: &str) -> Option<T> {
        match self.backend.get(T::KIND, country, id).await {
            Ok(doc) => doc.and_then(Self::decode),
            Err(e) => {
                warn!(kind = %T::KIND, id = %id, error = %e, "Lookup failed, treating as missing");
                None
            }
        }
    }

    pub(crate) async fn insert(&self, record: &T) -> StoreResult<()> {
        let doc = serde_json::to_value(record)?;
        self.backend.insert(T::KIND, record.country(), doc).await
    }

    /// Loads, edits and stores one record under the partition lock
    ///
    /// Returns `Ok(None)` when the id does not exist in `country`.
    pub(crate) async fn modify<F>(&self, country: Country, id: &str, edit: F) -> StoreResult<Option<T>>
    where
        F: FnOnce(&mut T) -> StoreResult<()> + Send,
    {
        let mut edit = Some(edit);
        let mut apply = |doc: serde_json::Value| -> StoreResult<serde_json::Value> {
            let mut record: T = serde_json::from_value(doc)?;
            if let Some(edit) = edit.take() {
                edit(&mut record)?;
            }
            Ok(serde_json::to_value(&record)?)
        };

        let updated = self
            .backend
            .modify(T::KIND, country, id, &mut apply)
            .await?;

        match updated {
            Some(doc) => Ok(Some(serde_json::from_value(doc)?)),
            None => Ok(None),
        }
    }

    pub(crate) async fn remove(&self, country: Country, id: &str) -> StoreResult<bool> {
        self.backend.remove(T::KIND, country, id).await
    }
}
