//! Stores for exercising failure paths

use crate::backend::realtime::{change_channel, ChangeBroadcast, ChangeCallback, Unsubscribe};
use crate::backend::store::{DocumentStore, MergeCheck, Patch, StoreError, StoreResult};
use crate::shared::{ChangeFilter, Document, EntityKind};
use async_trait::async_trait;

fn offline<T>() -> StoreResult<T> {
    Err(StoreError::Subscription("offline".into()))
}

/// Store whose every operation fails
pub(crate) struct BrokenStore {
    changes: ChangeBroadcast,
}

impl BrokenStore {
    pub(crate) fn new() -> Self {
        Self {
            changes: change_channel(4),
        }
    }
}

#[async_trait]
impl DocumentStore for BrokenStore {
    async fn create(&self, _: EntityKind, _: &str, _: serde_json::Value) -> StoreResult<Document> {
        offline()
    }
    async fn read(&self, _: EntityKind, _: &str) -> StoreResult<Option<Document>> {
        offline()
    }
    async fn read_all(&self, _: EntityKind) -> StoreResult<Vec<Document>> {
        offline()
    }
    async fn query(&self, _: EntityKind, _: &str, _: &str) -> StoreResult<Vec<Document>> {
        offline()
    }
    async fn merge(&self, _: EntityKind, _: &str, _: Patch, _: MergeCheck) -> StoreResult<Document> {
        offline()
    }
    async fn delete(&self, _: EntityKind, _: &str) -> StoreResult<Document> {
        offline()
    }
    fn changes(&self) -> &ChangeBroadcast {
        &self.changes
    }
    async fn subscribe(&self, _: ChangeFilter, _: ChangeCallback) -> StoreResult<Unsubscribe> {
        offline()
    }
}
