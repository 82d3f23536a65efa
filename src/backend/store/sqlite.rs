/**
 * SQLite Document Store
 *
 * Persists every collection in a single `documents` table
 * (`collection, id, data, created_at, updated_at`) with `data` stored as JSON
 * text. Field queries use SQLite's `json_extract`.
 *
 * Merges are a compare-and-swap on the stored JSON text: the update only
 * lands if `data` is still what was read, and is retried otherwise.
 *
 * Changes are broadcast after each successful write, the same way the
 * in-memory store does it.
 */

use crate::backend::realtime::{broadcast_change, change_channel, ChangeBroadcast};
use crate::backend::store::{
    merge_data, now_millis, DocumentStore, MergeCheck, Patch, StoreError, StoreResult,
};
use crate::shared::{ChangeEvent, Document, EntityKind};
use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;

const MERGE_ATTEMPTS: usize = 32;

#[derive(sqlx::FromRow)]
struct DocumentRow {
    id: String,
    data: String,
    created_at: i64,
    updated_at: i64,
}

impl DocumentRow {
    fn into_document(self) -> StoreResult<Document> {
        Ok(Document {
            id: self.id,
            created_at: self.created_at,
            updated_at: self.updated_at,
            data: serde_json::from_str(&self.data)?,
        })
    }
}

fn into_documents(rows: Vec<DocumentRow>) -> StoreResult<Vec<Document>> {
    rows.into_iter().map(DocumentRow::into_document).collect()
}

/// Document store backed by a SQLite database
#[derive(Debug, Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
    changes: ChangeBroadcast,
}

impl SqliteStore {
    /// Connect to `database_url`, creating the file if needed, and run migrations
    ///
    /// `sqlite::memory:` URLs get a single long-lived connection so the
    /// database survives for the life of the pool.
    pub async fn connect(database_url: &str, capacity: usize) -> StoreResult<Self> {
        let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);

        let pool_options = if database_url.contains(":memory:") {
            SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(8)
        };

        tracing::info!("[Store] Connecting to SQLite database...");
        let pool = pool_options.connect_with(options).await?;
        tracing::info!("[Store] SQLite connection pool created");

        Self::from_pool(pool, change_channel(capacity)).await
    }

    /// Wrap an existing pool, running migrations first
    pub async fn from_pool(pool: SqlitePool, changes: ChangeBroadcast) -> StoreResult<Self> {
        tracing::info!("[Store] Running database migrations...");
        sqlx::migrate!().run(&pool).await?;
        tracing::info!("[Store] Database migrations completed successfully");

        Ok(Self { pool, changes })
    }

    async fn fetch(&self, kind: EntityKind, id: &str) -> StoreResult<Option<Document>> {
        self.fetch_row(kind, id)
            .await?
            .map(DocumentRow::into_document)
            .transpose()
    }

    async fn fetch_row(&self, kind: EntityKind, id: &str) -> StoreResult<Option<DocumentRow>> {
        let row = sqlx::query_as::<_, DocumentRow>(
            r#"
            SELECT id, data, created_at, updated_at
            FROM documents
            WHERE collection = ? AND id = ?
            "#,
        )
        .bind(kind.collection())
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }
}

#[async_trait]
impl DocumentStore for SqliteStore {
    async fn create(&self, kind: EntityKind, id: &str, data: serde_json::Value) -> StoreResult<Document> {
        let doc = Document::new(id, data);

        let result = sqlx::query(
            r#"
            INSERT INTO documents (collection, id, data, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(kind.collection())
        .bind(&doc.id)
        .bind(serde_json::to_string(&doc.data)?)
        .bind(doc.created_at)
        .bind(doc.updated_at)
        .execute(&self.pool)
        .await;

        if let Err(e) = result {
            let unique = e
                .as_database_error()
                .map(|db| db.is_unique_violation())
                .unwrap_or(false);
            return Err(if unique {
                StoreError::conflict(kind, id)
            } else {
                e.into()
            });
        }

        broadcast_change(&self.changes, ChangeEvent::created(kind, doc.clone()));
        Ok(doc)
    }

    async fn read(&self, kind: EntityKind, id: &str) -> StoreResult<Option<Document>> {
        self.fetch(kind, id).await
    }

    async fn read_all(&self, kind: EntityKind) -> StoreResult<Vec<Document>> {
        let rows = sqlx::query_as::<_, DocumentRow>(
            r#"
            SELECT id, data, created_at, updated_at
            FROM documents
            WHERE collection = ?
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .bind(kind.collection())
        .fetch_all(&self.pool)
        .await?;

        into_documents(rows)
    }

    async fn query(&self, kind: EntityKind, field: &str, value: &str) -> StoreResult<Vec<Document>> {
        let rows = sqlx::query_as::<_, DocumentRow>(
            r#"
            SELECT id, data, created_at, updated_at
            FROM documents
            WHERE collection = ? AND json_extract(data, ?) = ?
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .bind(kind.collection())
        .bind(format!("$.{}", field))
        .bind(value)
        .fetch_all(&self.pool)
        .await?;

        into_documents(rows)
    }

    async fn merge(&self, kind: EntityKind, id: &str, patch: Patch, check: MergeCheck) -> StoreResult<Document> {
        for _ in 0..MERGE_ATTEMPTS {
            let row = self
                .fetch_row(kind, id)
                .await?
                .ok_or_else(|| StoreError::not_found(kind, id))?;

            let current: serde_json::Value = serde_json::from_str(&row.data)?;
            let merged = merge_data(&current, patch.clone());
            check(&merged).map_err(StoreError::Invalid)?;

            let result = sqlx::query(
                r#"
                UPDATE documents
                SET data = ?, updated_at = MAX(?, created_at)
                WHERE collection = ? AND id = ? AND data = ?
                "#,
            )
            .bind(serde_json::to_string(&merged)?)
            .bind(now_millis())
            .bind(kind.collection())
            .bind(id)
            .bind(&row.data)
            .execute(&self.pool)
            .await?;

            if result.rows_affected() == 0 {
                tracing::debug!("[Store] {} {} changed under merge, retrying", kind, id);
                continue;
            }

            let doc = self
                .fetch(kind, id)
                .await?
                .ok_or_else(|| StoreError::not_found(kind, id))?;

            broadcast_change(&self.changes, ChangeEvent::updated(kind, doc.clone()));
            return Ok(doc);
        }

        Err(StoreError::Contended {
            kind,
            id: id.to_string(),
        })
    }

    async fn delete(&self, kind: EntityKind, id: &str) -> StoreResult<Document> {
        let doc = self
            .fetch(kind, id)
            .await?
            .ok_or_else(|| StoreError::not_found(kind, id))?;

        let result = sqlx::query("DELETE FROM documents WHERE collection = ? AND id = ?")
            .bind(kind.collection())
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::not_found(kind, id));
        }

        broadcast_change(&self.changes, ChangeEvent::deleted(kind, doc.clone()));
        Ok(doc)
    }

    fn changes(&self) -> &ChangeBroadcast {
        &self.changes
    }
}
