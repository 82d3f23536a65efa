//! Document Store Module
//!
//! The store is the persistence layer behind the entity services: CRUD on
//! JSON documents grouped by collection, plus change subscriptions. Every
//! successful write is broadcast as a `ChangeEvent`.
//!
//! # Implementations
//!
//! - **`memory`** - `MemoryStore`, collections held in memory
//! - **`sqlite`** - `SqliteStore`, a single `documents` table through sqlx
//!
//! Both share the realtime broadcast for change fan-out, so subscriptions
//! behave the same whichever store is configured.

/// In-memory store
pub mod memory;

/// SQLite store
pub mod sqlite;

#[cfg(test)]
pub(crate) mod testing;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use crate::backend::realtime::{spawn_subscription, ChangeBroadcast, ChangeCallback, Unsubscribe};
use crate::shared::{ChangeFilter, Document, EntityKind};
use async_trait::async_trait;
use thiserror::Error;

/// Errors raised by document stores
#[derive(Debug, Error)]
pub enum StoreError {
    /// Database driver error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Database schema migration error
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// No document with this id in the collection
    #[error("{kind} document not found: {id}")]
    NotFound { kind: EntityKind, id: String },

    /// A document with this id already exists in the collection
    #[error("{kind} document already exists: {id}")]
    Conflict { kind: EntityKind, id: String },

    /// Merged data was refused by the caller's check
    #[error("Invalid document data: {0}")]
    Invalid(String),

    /// Concurrent writers kept changing the document during a merge
    #[error("{kind} document {id} kept changing during merge")]
    Contended { kind: EntityKind, id: String },

    /// Stored data could not be (de)serialized
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A subscription task failed
    #[error("Subscription error: {0}")]
    Subscription(String),
}

impl StoreError {
    pub fn not_found(kind: EntityKind, id: impl Into<String>) -> Self {
        Self::NotFound { kind, id: id.into() }
    }

    pub fn conflict(kind: EntityKind, id: impl Into<String>) -> Self {
        Self::Conflict { kind, id: id.into() }
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Check run on merged data before it is written
pub type MergeCheck = fn(&serde_json::Value) -> Result<(), String>;

/// Field-level patch applied by `DocumentStore::merge`
pub type Patch = serde_json::Map<String, serde_json::Value>;

/// Persistence operations on collections of JSON documents
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Insert a new document; fails with `Conflict` if the id is taken
    async fn create(&self, kind: EntityKind, id: &str, data: serde_json::Value) -> StoreResult<Document>;

    /// Fetch one document, `None` if absent
    async fn read(&self, kind: EntityKind, id: &str) -> StoreResult<Option<Document>>;

    /// Fetch every document of a collection, oldest first
    async fn read_all(&self, kind: EntityKind) -> StoreResult<Vec<Document>>;

    /// Fetch documents whose top-level `data.<field>` string equals `value`
    async fn query(&self, kind: EntityKind, field: &str, value: &str) -> StoreResult<Vec<Document>>;

    /// Shallow-merge `patch` into a document's data as one atomic write
    ///
    /// `check` sees the merged data; if it refuses, nothing is written and
    /// the error is `Invalid`. Fails with `NotFound` if the document is absent.
    async fn merge(&self, kind: EntityKind, id: &str, patch: Patch, check: MergeCheck) -> StoreResult<Document>;

    /// Remove a document and return it; fails with `NotFound` if absent
    async fn delete(&self, kind: EntityKind, id: &str) -> StoreResult<Document>;

    /// Change broadcast this store writes into
    fn changes(&self) -> &ChangeBroadcast;

    /// Register a filtered change subscription
    async fn subscribe(&self, filter: ChangeFilter, callback: ChangeCallback) -> StoreResult<Unsubscribe> {
        Ok(spawn_subscription(self.changes(), filter, callback))
    }
}

/// Milliseconds since the Unix epoch
pub(crate) fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Top-level keys of `patch` overwrite those of `current`
pub(crate) fn merge_data(current: &serde_json::Value, patch: Patch) -> serde_json::Value {
    let mut data = match current {
        serde_json::Value::Object(map) => map.clone(),
        _ => serde_json::Map::new(),
    };
    data.extend(patch);
    serde_json::Value::Object(data)
}

/// Order documents oldest first, ties broken by id
pub(crate) fn sort_documents(docs: &mut [Document]) {
    docs.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_merge_data_is_shallow() {
        let current = json!({"name": "Main", "layout": {"x": 1, "y": 2}});
        let mut patch = Patch::new();
        patch.insert("layout".into(), json!({"x": 5}));
        assert_eq!(
            merge_data(&current, patch),
            json!({"name": "Main", "layout": {"x": 5}})
        );
    }
}
