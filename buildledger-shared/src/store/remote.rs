/// PostgreSQL-backed document storage
///
/// One table per entity kind, each row holding the record's full JSON document
/// plus its `country` as an indexed column (see the migration in
/// `migrations/`). Country scoping is always a `country = $n` predicate and
/// extra filters are a single JSONB containment test (`doc @> $n`).
///
/// Edits run in a transaction with `SELECT ... FOR UPDATE`, so concurrent
/// modifications of the same record are applied one after the other.

use async_trait::async_trait;
use serde_json::Value;
use sqlx::types::Json;
use sqlx::PgPool;
use tracing::{debug, info};

use super::backend::{document_id, DocumentBackend, DocumentEdit, StorageMode};
use crate::db::pool::health_check;
use crate::error::{StoreError, StoreResult};
use crate::models::{Country, EntityKind, Filter};

/// Remote backend over a connection pool
#[derive(Clone)]
pub struct PgBackend {
    pool: PgPool,
}

impl PgBackend {
    /// Wraps a pool whose schema is already migrated
    pub fn new(pool: PgPool) -> Self {
        info!("Using remote storage");
        Self { pool }
    }
}

/// Table holding `kind` records; names come from a closed set
fn table(kind: EntityKind) -> &'static str {
    kind.collection_name()
}

#[async_trait]
impl DocumentBackend for PgBackend {
    fn mode(&self) -> StorageMode {
        StorageMode::Remote
    }

    async fn list(
        &self,
        kind: EntityKind,
        country: Option<Country>,
        filter: &Filter,
    ) -> StoreResult<Vec<Value>> {
        let sql = format!(
            "SELECT doc FROM {} \
             WHERE ($1::text IS NULL OR country = $1) AND doc @> $2 \
             ORDER BY created_at, id",
            table(kind)
        );

        let rows: Vec<Json<Value>> = sqlx::query_scalar(&sql)
            .bind(country.map(|c| c.as_str()))
            .bind(Json(filter.to_document()))
            .fetch_all(&self.pool)
            .await?;

        debug!(kind = %kind, country = ?country, count = rows.len(), "Listed documents");
        Ok(rows.into_iter().map(|Json(doc)| doc).collect())
    }

    async fn get(
        &self,
        kind: EntityKind,
        country: Option<Country>,
        id: &str,
    ) -> StoreResult<Option<Value>> {
        let sql = format!(
            "SELECT doc FROM {} WHERE id = $1 AND ($2::text IS NULL OR country = $2)",
            table(kind)
        );

        let row: Option<Json<Value>> = sqlx::query_scalar(&sql)
            .bind(id)
            .bind(country.map(|c| c.as_str()))
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(|Json(doc)| doc))
    }

    async fn insert(&self, kind: EntityKind, country: Country, doc: Value) -> StoreResult<()> {
        let id = document_id(&doc)
            .ok_or_else(|| StoreError::validation("id", "Document has no id"))?
            .to_string();

        let sql = format!(
            "INSERT INTO {} (id, country, doc) VALUES ($1, $2, $3)",
            table(kind)
        );
        sqlx::query(&sql)
            .bind(&id)
            .bind(country.as_str())
            .bind(Json(doc))
            .execute(&self.pool)
            .await?;

        debug!(kind = %kind, country = %country, id = %id, "Inserted document");
        Ok(())
    }

    async fn modify(
        &self,
        kind: EntityKind,
        country: Country,
        id: &str,
        edit: DocumentEdit<'_>,
    ) -> StoreResult<Option<Value>> {
        let mut tx = self.pool.begin().await?;

        let select = format!(
            "SELECT doc FROM {} WHERE id = $1 AND country = $2 FOR UPDATE",
            table(kind)
        );
        let current: Option<Json<Value>> = sqlx::query_scalar(&select)
            .bind(id)
            .bind(country.as_str())
            .fetch_optional(&mut *tx)
            .await?;

        let Some(Json(current)) = current else {
            return Ok(None);
        };

        let updated = edit(current)?;

        let update = format!(
            "UPDATE {} SET doc = $3, updated_at = NOW() WHERE id = $1 AND country = $2",
            table(kind)
        );
        sqlx::query(&update)
            .bind(id)
            .bind(country.as_str())
            .bind(Json(&updated))
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        debug!(kind = %kind, country = %country, id = %id, "Updated document");
        Ok(Some(updated))
    }

    async fn remove(&self, kind: EntityKind, country: Country, id: &str) -> StoreResult<bool> {
        let sql = format!("DELETE FROM {} WHERE id = $1 AND country = $2", table(kind));
        let result = sqlx::query(&sql)
            .bind(id)
            .bind(country.as_str())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn ensure_partition(&self, kind: EntityKind, _country: Country) -> StoreResult<()> {
        // Tables come from migrations; this only proves the table is there.
        let sql = format!("SELECT COUNT(*) FROM {} WHERE FALSE", table(kind));
        let _: i64 = sqlx::query_scalar(&sql).fetch_one(&self.pool).await?;
        Ok(())
    }

    async fn health_check(&self) -> StoreResult<()> {
        health_check(&self.pool).await.map_err(StoreError::from)
    }

    async fn reload(&self) -> StoreResult<()> {
        Ok(())
    }
}
