//! Route parsing for `/api/<collection>` paths.
//!
//! Routes are split on `/` and matched positionally; the item id is always the
//! last segment.

use crate::shared::entity::EntityKind;
use crate::shared::error::SharedError;

/// Field a child collection is filtered on when addressed through its parent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParentField {
    /// `roomId`, used by `/api/boards/room/:roomId`
    Room,
    /// `boardId`, used by `/api/apps/board/:boardId`
    Board,
}

impl ParentField {
    /// Name of the field inside the child document's `data`
    pub fn field(&self) -> &'static str {
        match self {
            Self::Room => "roomId",
            Self::Board => "boardId",
        }
    }

    fn segment(&self) -> &'static str {
        match self {
            Self::Room => "room",
            Self::Board => "board",
        }
    }

    /// The parent link a collection supports, if any
    pub fn of(kind: EntityKind) -> Option<Self> {
        match kind {
            EntityKind::Board => Some(Self::Room),
            EntityKind::App => Some(Self::Board),
            _ => None,
        }
    }
}

/// A parsed API route
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// `/api/<collection>`
    Collection(EntityKind),
    /// `/api/<collection>/:id`
    Item(EntityKind, String),
    /// `/api/boards/room/:roomId` or `/api/apps/board/:boardId`
    ByParent {
        kind: EntityKind,
        parent: ParentField,
        parent_id: String,
    },
}

impl Route {
    /// Parse a route string; a query string, if any, is ignored
    pub fn parse(route: &str) -> Result<Self, SharedError> {
        let path = route.split('?').next().unwrap_or_default();
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        match segments.as_slice() {
            ["api", collection] => {
                let kind = Self::lookup(collection, route)?;
                Ok(Self::Collection(kind))
            }
            ["api", collection, id] => {
                let kind = Self::lookup(collection, route)?;
                Ok(Self::Item(kind, (*id).to_string()))
            }
            ["api", collection, link, parent_id] => {
                let kind = Self::lookup(collection, route)?;
                match ParentField::of(kind) {
                    Some(parent) if parent.segment() == *link => Ok(Self::ByParent {
                        kind,
                        parent,
                        parent_id: (*parent_id).to_string(),
                    }),
                    _ => Err(SharedError::route(route)),
                }
            }
            _ => Err(SharedError::route(route)),
        }
    }

    fn lookup(collection: &str, route: &str) -> Result<EntityKind, SharedError> {
        EntityKind::from_collection(collection).ok_or_else(|| SharedError::route(route))
    }
}
