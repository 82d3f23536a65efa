/**
 * Entity Documents and Schemas
 *
 * This module defines the five persisted collections (assets, apps, boards,
 * rooms, users), the generic document envelope stored for each of them, and
 * the typed schema of every collection's `data` payload.
 *
 * Schema validation is plain serde deserialization into the typed schema
 * followed by a small set of field checks (`EntitySchema::validate`).
 */
use crate::shared::error::SharedError;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// One of the persisted document collections
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    #[serde(rename = "assets")]
    Asset,
    #[serde(rename = "apps")]
    App,
    #[serde(rename = "boards")]
    Board,
    #[serde(rename = "rooms")]
    Room,
    #[serde(rename = "users")]
    User,
}

impl EntityKind {
    /// Every collection, in route-table order
    pub const ALL: [EntityKind; 5] = [
        EntityKind::Asset,
        EntityKind::App,
        EntityKind::Board,
        EntityKind::Room,
        EntityKind::User,
    ];

    /// Collection name as it appears in routes (`/api/<collection>`)
    pub fn collection(&self) -> &'static str {
        match self {
            Self::Asset => "assets",
            Self::App => "apps",
            Self::Board => "boards",
            Self::Room => "rooms",
            Self::User => "users",
        }
    }

    /// Singular noun used in failure messages
    pub fn singular(&self) -> &'static str {
        match self {
            Self::Asset => "asset",
            Self::App => "app",
            Self::Board => "board",
            Self::Room => "room",
            Self::User => "user",
        }
    }

    /// Look up a collection by its route name
    pub fn from_collection(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.collection() == name)
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.collection())
    }
}

/// A persisted entity record
///
/// `data` holds the collection's schema fields as JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Document identifier (UUID v4 for documents created through a service)
    pub id: String,
    /// Creation time, milliseconds since the Unix epoch
    #[serde(rename = "_createdAt")]
    pub created_at: i64,
    /// Last update time, milliseconds since the Unix epoch
    #[serde(rename = "_updatedAt")]
    pub updated_at: i64,
    /// Schema fields
    pub data: serde_json::Value,
}

impl Document {
    /// Create a document stamped with the current time
    pub fn new(id: impl Into<String>, data: serde_json::Value) -> Self {
        let now = chrono::Utc::now().timestamp_millis();
        Self {
            id: id.into(),
            created_at: now,
            updated_at: now,
            data,
        }
    }

    /// Read a top-level string field of `data`
    pub fn field_str(&self, field: &str) -> Option<&str> {
        self.data.get(field).and_then(|v| v.as_str())
    }
}

/// Typed schema of a collection's `data` payload
pub trait EntitySchema: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// The collection this schema belongs to
    const KIND: EntityKind;

    /// Field-level checks beyond what deserialization enforces
    fn validate(&self) -> Result<(), SharedError> {
        Ok(())
    }
}

/// Deserialize and check a JSON payload against a collection schema
pub fn validate_data<S: EntitySchema>(value: &serde_json::Value) -> Result<S, SharedError> {
    let schema: S = serde_json::from_value(value.clone())
        .map_err(|e| SharedError::validation(S::KIND.collection(), e.to_string()))?;
    schema.validate()?;
    Ok(schema)
}

/// Validate a JSON payload against the schema of `kind`, returning it normalized
pub fn validate_for(kind: EntityKind, value: &serde_json::Value) -> Result<serde_json::Value, SharedError> {
    fn normalize<S: EntitySchema>(value: &serde_json::Value) -> Result<serde_json::Value, SharedError> {
        let schema = validate_data::<S>(value)?;
        Ok(serde_json::to_value(schema)?)
    }

    match kind {
        EntityKind::Asset => normalize::<AssetSchema>(value),
        EntityKind::App => normalize::<AppSchema>(value),
        EntityKind::Board => normalize::<BoardSchema>(value),
        EntityKind::Room => normalize::<RoomSchema>(value),
        EntityKind::User => normalize::<UserSchema>(value),
    }
}

/// A creation payload, already checked against its collection's schema
#[derive(Debug, Clone, PartialEq)]
pub enum EntityData {
    Asset(AssetSchema),
    App(AppSchema),
    Board(BoardSchema),
    Room(RoomSchema),
    User(UserSchema),
}

impl EntityData {
    /// Decode a request body for `kind`
    pub fn parse(kind: EntityKind, value: &serde_json::Value) -> Result<Self, SharedError> {
        Ok(match kind {
            EntityKind::Asset => Self::Asset(validate_data(value)?),
            EntityKind::App => Self::App(validate_data(value)?),
            EntityKind::Board => Self::Board(validate_data(value)?),
            EntityKind::Room => Self::Room(validate_data(value)?),
            EntityKind::User => Self::User(validate_data(value)?),
        })
    }

    pub fn kind(&self) -> EntityKind {
        match self {
            Self::Asset(_) => EntityKind::Asset,
            Self::App(_) => EntityKind::App,
            Self::Board(_) => EntityKind::Board,
            Self::Room(_) => EntityKind::Room,
            Self::User(_) => EntityKind::User,
        }
    }
}

fn require_non_empty(field: &str, value: &str) -> Result<(), SharedError> {
    if value.trim().is_empty() {
        return Err(SharedError::validation(field, "must not be empty"));
    }
    Ok(())
}

/// Uploaded file metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetSchema {
    pub file: String,
    pub owner: String,
    pub originalfilename: String,
    pub path: String,
    pub mimetype: String,
    pub size: u64,
    pub date_added: String,
}

impl EntitySchema for AssetSchema {
    const KIND: EntityKind = EntityKind::Asset;

    fn validate(&self) -> Result<(), SharedError> {
        require_non_empty("file", &self.file)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub z: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub depth: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rotation {
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
    #[serde(default)]
    pub z: f64,
}

/// A widget placed on a board
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppSchema {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub room_id: String,
    pub board_id: String,
    pub owner_id: String,
    #[serde(rename = "type")]
    pub app_type: String,
    pub position: Position,
    pub size: Size,
    #[serde(default)]
    pub rotation: Rotation,
    /// Widget-specific state, opaque to the server
    #[serde(default)]
    pub state: serde_json::Value,
}

impl EntitySchema for AppSchema {
    const KIND: EntityKind = EntityKind::App;

    fn validate(&self) -> Result<(), SharedError> {
        require_non_empty("type", &self.app_type)?;
        if self.size.width < 0.0 || self.size.height < 0.0 {
            return Err(SharedError::validation("size", "must not be negative"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardSchema {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub room_id: String,
    pub owner_id: String,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub is_private: bool,
}

impl EntitySchema for BoardSchema {
    const KIND: EntityKind = EntityKind::Board;

    fn validate(&self) -> Result<(), SharedError> {
        require_non_empty("name", &self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomSchema {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub owner_id: String,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub is_private: bool,
    #[serde(default = "default_true")]
    pub is_listed: bool,
}

fn default_true() -> bool {
    true
}

impl EntitySchema for RoomSchema {
    const KIND: EntityKind = EntityKind::Room;

    fn validate(&self) -> Result<(), SharedError> {
        require_non_empty("name", &self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSchema {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub color: String,
    #[serde(default = "default_role")]
    pub user_role: String,
    #[serde(default = "default_user_type")]
    pub user_type: String,
    #[serde(default)]
    pub profile_picture: String,
}

fn default_role() -> String {
    "user".to_string()
}

fn default_user_type() -> String {
    "client".to_string()
}

impl EntitySchema for UserSchema {
    const KIND: EntityKind = EntityKind::User;

    fn validate(&self) -> Result<(), SharedError> {
        require_non_empty("name", &self.name)?;
        if !self.email.contains('@') {
            return Err(SharedError::validation("email", "not an email address"));
        }
        Ok(())
    }
}
