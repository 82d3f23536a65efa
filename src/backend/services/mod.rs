//! Entity Services
//!
//! One service per collection sits between the WebSocket/REST routers and the
//! document store. Services never propagate store failures: every error is
//! logged with the service's tag and turned into `None` (reads, creates,
//! subscribes) or `false` (updates, deletes).
//!
//! `EntityService<S>` is generic over the collection schema; the aliases
//! `AssetService`, `AppService`, `BoardService`, `RoomService` and
//! `UserService` name the concrete services. `CollectionService` erases the
//! schema so routers can pick a service by `EntityKind` at runtime; the
//! by-parent reads and subscriptions exist only on `BoardService` (by room)
//! and `AppService` (by board), reached through `Services`.

use crate::backend::realtime::{ChangeCallback, Unsubscribe};
use crate::backend::store::{DocumentStore, Patch, StoreError};
use crate::shared::entity::{
    validate_data, AppSchema, AssetSchema, BoardSchema, RoomSchema, UserSchema,
};
use crate::shared::{ChangeFilter, Document, EntityData, EntityKind, EntitySchema, ParentField};
use async_trait::async_trait;
use std::marker::PhantomData;
use std::sync::Arc;
use uuid::Uuid;

pub type AssetService = EntityService<AssetSchema>;
pub type AppService = EntityService<AppSchema>;
pub type BoardService = EntityService<BoardSchema>;
pub type RoomService = EntityService<RoomSchema>;
pub type UserService = EntityService<UserSchema>;

/// Generate a new document identifier
pub fn gen_id() -> String {
    Uuid::new_v4().to_string()
}

fn schema_check<S: EntitySchema>(value: &serde_json::Value) -> Result<(), String> {
    validate_data::<S>(value).map(|_| ()).map_err(|e| e.to_string())
}

/// Failure-normalizing façade over one collection of the store
pub struct EntityService<S: EntitySchema> {
    store: Arc<dyn DocumentStore>,
    _schema: PhantomData<fn() -> S>,
}

impl<S: EntitySchema> Clone for EntityService<S> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            _schema: PhantomData,
        }
    }
}

impl<S: EntitySchema> EntityService<S> {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            store,
            _schema: PhantomData,
        }
    }

    fn tag() -> &'static str {
        match S::KIND {
            EntityKind::Asset => "[AssetService]",
            EntityKind::App => "[AppService]",
            EntityKind::Board => "[BoardService]",
            EntityKind::Room => "[RoomService]",
            EntityKind::User => "[UserService]",
        }
    }

    /// Store a new document under a freshly generated id
    pub async fn create(&self, data: S) -> Option<Document> {
        let value = match serde_json::to_value(&data) {
            Ok(value) => value,
            Err(e) => {
                tracing::error!("{} Failed to serialize new document: {}", Self::tag(), e);
                return None;
            }
        };

        let id = gen_id();
        match self.store.create(S::KIND, &id, value).await {
            Ok(doc) => {
                tracing::debug!("{} Created {}", Self::tag(), doc.id);
                Some(doc)
            }
            Err(e) => {
                tracing::error!("{} Failed to create document: {}", Self::tag(), e);
                None
            }
        }
    }

    pub async fn read(&self, id: &str) -> Option<Document> {
        match self.store.read(S::KIND, id).await {
            Ok(Some(doc)) => Some(doc),
            Ok(None) => {
                tracing::debug!("{} Document not found: {}", Self::tag(), id);
                None
            }
            Err(e) => {
                tracing::error!("{} Failed to read {}: {}", Self::tag(), id, e);
                None
            }
        }
    }

    pub async fn read_all(&self) -> Option<Vec<Document>> {
        self.store
            .read_all(S::KIND)
            .await
            .map_err(|e| tracing::error!("{} Failed to read all documents: {}", Self::tag(), e))
            .ok()
    }

    /// Documents whose `data.<field>` equals `value`
    async fn query(&self, field: &str, value: &str) -> Option<Vec<Document>> {
        self.store
            .query(S::KIND, field, value)
            .await
            .map_err(|e| tracing::error!("{} Failed to query {}={}: {}", Self::tag(), field, value, e))
            .ok()
    }

    /// Shallow-merge `patch` into the stored data
    ///
    /// The merged data must still validate against the schema; otherwise the
    /// document is left untouched. The merge is atomic in the store, so
    /// concurrent updates of different fields all land.
    pub async fn update(&self, id: &str, patch: Patch) -> bool {
        match self.store.merge(S::KIND, id, patch, schema_check::<S>).await {
            Ok(_) => true,
            Err(StoreError::NotFound { .. }) => {
                tracing::debug!("{} Document not found: {}", Self::tag(), id);
                false
            }
            Err(StoreError::Invalid(reason)) => {
                tracing::warn!("{} Rejected update of {}: {}", Self::tag(), id, reason);
                false
            }
            Err(e) => {
                tracing::error!("{} Failed to update {}: {}", Self::tag(), id, e);
                false
            }
        }
    }

    pub async fn delete(&self, id: &str) -> bool {
        match self.store.delete(S::KIND, id).await {
            Ok(_) => true,
            Err(e) => {
                tracing::error!("{} Failed to delete {}: {}", Self::tag(), id, e);
                false
            }
        }
    }

    /// Subscribe to changes of a single document
    pub async fn subscribe(&self, id: &str, callback: ChangeCallback) -> Option<Unsubscribe> {
        self.subscribe_filtered(ChangeFilter::One(S::KIND, id.to_string()), callback)
            .await
    }

    /// Subscribe to every change in the collection
    pub async fn subscribe_all(&self, callback: ChangeCallback) -> Option<Unsubscribe> {
        self.subscribe_filtered(ChangeFilter::All(S::KIND), callback).await
    }

    /// Subscribe to documents whose `data.<field>` equals `value`
    async fn subscribe_by_field(
        &self,
        field: &str,
        value: &str,
        callback: ChangeCallback,
    ) -> Option<Unsubscribe> {
        let filter = ChangeFilter::Field {
            kind: S::KIND,
            field: field.to_string(),
            value: value.to_string(),
        };
        self.subscribe_filtered(filter, callback).await
    }

    async fn subscribe_filtered(&self, filter: ChangeFilter, callback: ChangeCallback) -> Option<Unsubscribe> {
        match self.store.subscribe(filter, callback).await {
            Ok(handle) => Some(handle),
            Err(e) => {
                tracing::error!("{} Failed to subscribe: {}", Self::tag(), e);
                None
            }
        }
    }
}

impl BoardService {
    pub async fn read_by_room_id(&self, room_id: &str) -> Option<Vec<Document>> {
        self.query(ParentField::Room.field(), room_id).await
    }

    pub async fn subscribe_by_room_id(&self, room_id: &str, callback: ChangeCallback) -> Option<Unsubscribe> {
        self.subscribe_by_field(ParentField::Room.field(), room_id, callback).await
    }
}

impl AppService {
    pub async fn read_by_board_id(&self, board_id: &str) -> Option<Vec<Document>> {
        self.query(ParentField::Board.field(), board_id).await
    }

    pub async fn subscribe_by_board_id(&self, board_id: &str, callback: ChangeCallback) -> Option<Unsubscribe> {
        self.subscribe_by_field(ParentField::Board.field(), board_id, callback).await
    }
}

/// Schema-independent view of an entity service
#[async_trait]
pub trait CollectionService: Send + Sync {
    fn kind(&self) -> EntityKind;
    async fn read(&self, id: &str) -> Option<Document>;
    async fn read_all(&self) -> Option<Vec<Document>>;
    async fn update(&self, id: &str, patch: Patch) -> bool;
    async fn delete(&self, id: &str) -> bool;
    async fn subscribe(&self, id: &str, callback: ChangeCallback) -> Option<Unsubscribe>;
    async fn subscribe_all(&self, callback: ChangeCallback) -> Option<Unsubscribe>;
}

#[async_trait]
impl<S: EntitySchema> CollectionService for EntityService<S> {
    fn kind(&self) -> EntityKind {
        S::KIND
    }

    async fn read(&self, id: &str) -> Option<Document> {
        EntityService::read(self, id).await
    }

    async fn read_all(&self) -> Option<Vec<Document>> {
        EntityService::read_all(self).await
    }

    async fn update(&self, id: &str, patch: Patch) -> bool {
        EntityService::update(self, id, patch).await
    }

    async fn delete(&self, id: &str) -> bool {
        EntityService::delete(self, id).await
    }

    async fn subscribe(&self, id: &str, callback: ChangeCallback) -> Option<Unsubscribe> {
        EntityService::subscribe(self, id, callback).await
    }

    async fn subscribe_all(&self, callback: ChangeCallback) -> Option<Unsubscribe> {
        EntityService::subscribe_all(self, callback).await
    }
}

/// The five entity services, sharing one store
#[derive(Clone)]
pub struct Services {
    pub assets: AssetService,
    pub apps: AppService,
    pub boards: BoardService,
    pub rooms: RoomService,
    pub users: UserService,
}

impl Services {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            assets: AssetService::new(store.clone()),
            apps: AppService::new(store.clone()),
            boards: BoardService::new(store.clone()),
            rooms: RoomService::new(store.clone()),
            users: UserService::new(store),
        }
    }

    /// Service for a collection picked at runtime
    pub fn get(&self, kind: EntityKind) -> &dyn CollectionService {
        match kind {
            EntityKind::Asset => &self.assets,
            EntityKind::App => &self.apps,
            EntityKind::Board => &self.boards,
            EntityKind::Room => &self.rooms,
            EntityKind::User => &self.users,
        }
    }

    /// Children of a parent document: boards of a room, apps of a board
    pub async fn read_by_parent(&self, parent: ParentField, parent_id: &str) -> Option<Vec<Document>> {
        match parent {
            ParentField::Room => self.boards.read_by_room_id(parent_id).await,
            ParentField::Board => self.apps.read_by_board_id(parent_id).await,
        }
    }

    /// Subscribe to the children of a parent document
    pub async fn subscribe_by_parent(
        &self,
        parent: ParentField,
        parent_id: &str,
        callback: ChangeCallback,
    ) -> Option<Unsubscribe> {
        match parent {
            ParentField::Room => self.boards.subscribe_by_room_id(parent_id, callback).await,
            ParentField::Board => self.apps.subscribe_by_board_id(parent_id, callback).await,
        }
    }

    /// Create a document in the collection the payload belongs to
    pub async fn create(&self, data: EntityData) -> Option<Document> {
        match data {
            EntityData::Asset(asset) => self.assets.create(asset).await,
            EntityData::App(app) => self.apps.create(app).await,
            EntityData::Board(board) => self.boards.create(board).await,
            EntityData::Room(room) => self.rooms.create(room).await,
            EntityData::User(user) => self.users.create(user).await,
        }
    }
}
