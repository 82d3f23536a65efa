/**
 * In-memory Document Store
 *
 * Collections are held in a `HashMap` per collection behind a tokio
 * `RwLock`. Used when no database is configured and by tests.
 */

use crate::backend::realtime::{broadcast_change, change_channel, ChangeBroadcast};
use crate::backend::store::{
    merge_data, now_millis, sort_documents, DocumentStore, MergeCheck, Patch, StoreError, StoreResult,
};
use crate::shared::{ChangeEvent, Document, EntityKind};
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

type Collection = HashMap<String, Document>;

/// Document store kept entirely in memory
#[derive(Debug)]
pub struct MemoryStore {
    collections: RwLock<HashMap<EntityKind, Collection>>,
    changes: ChangeBroadcast,
}

impl MemoryStore {
    /// Create an empty store whose change channel holds `capacity` events
    pub fn new(capacity: usize) -> Self {
        Self::with_broadcast(change_channel(capacity))
    }

    /// Create an empty store writing into an existing change channel
    pub fn with_broadcast(changes: ChangeBroadcast) -> Self {
        Self {
            collections: RwLock::new(HashMap::new()),
            changes,
        }
    }

    /// Number of documents in a collection
    pub async fn count(&self, kind: EntityKind) -> usize {
        self.collections.read().await.get(&kind).map_or(0, |c| c.len())
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new(1024)
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn create(&self, kind: EntityKind, id: &str, data: serde_json::Value) -> StoreResult<Document> {
        let doc = {
            let mut collections = self.collections.write().await;
            let collection = collections.entry(kind).or_default();
            if collection.contains_key(id) {
                return Err(StoreError::conflict(kind, id));
            }
            let doc = Document::new(id, data);
            collection.insert(id.to_string(), doc.clone());
            doc
        };

        broadcast_change(&self.changes, ChangeEvent::created(kind, doc.clone()));
        Ok(doc)
    }

    async fn read(&self, kind: EntityKind, id: &str) -> StoreResult<Option<Document>> {
        let collections = self.collections.read().await;
        Ok(collections.get(&kind).and_then(|c| c.get(id)).cloned())
    }

    async fn read_all(&self, kind: EntityKind) -> StoreResult<Vec<Document>> {
        let mut docs: Vec<Document> = {
            let collections = self.collections.read().await;
            collections
                .get(&kind)
                .map(|c| c.values().cloned().collect())
                .unwrap_or_default()
        };
        sort_documents(&mut docs);
        Ok(docs)
    }

    async fn query(&self, kind: EntityKind, field: &str, value: &str) -> StoreResult<Vec<Document>> {
        let mut docs: Vec<Document> = {
            let collections = self.collections.read().await;
            collections
                .get(&kind)
                .map(|c| {
                    c.values()
                        .filter(|doc| doc.field_str(field) == Some(value))
                        .cloned()
                        .collect()
                })
                .unwrap_or_default()
        };
        sort_documents(&mut docs);
        Ok(docs)
    }

    async fn merge(&self, kind: EntityKind, id: &str, patch: Patch, check: MergeCheck) -> StoreResult<Document> {
        let doc = {
            let mut collections = self.collections.write().await;
            let doc = collections
                .get_mut(&kind)
                .and_then(|c| c.get_mut(id))
                .ok_or_else(|| StoreError::not_found(kind, id))?;
            let merged = merge_data(&doc.data, patch);
            check(&merged).map_err(StoreError::Invalid)?;
            doc.data = merged;
            doc.updated_at = now_millis().max(doc.created_at);
            doc.clone()
        };

        broadcast_change(&self.changes, ChangeEvent::updated(kind, doc.clone()));
        Ok(doc)
    }

    async fn delete(&self, kind: EntityKind, id: &str) -> StoreResult<Document> {
        let doc = {
            let mut collections = self.collections.write().await;
            collections
                .get_mut(&kind)
                .and_then(|c| c.remove(id))
                .ok_or_else(|| StoreError::not_found(kind, id))?
        };

        broadcast_change(&self.changes, ChangeEvent::deleted(kind, doc.clone()));
        Ok(doc)
    }

    fn changes(&self) -> &ChangeBroadcast {
        &self.changes
    }
}
