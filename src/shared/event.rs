/**
 * Document Change Events
 *
 * This module defines the change notifications produced by the document
 * store. Every successful write fans out one `ChangeEvent`; open
 * subscriptions filter the stream and forward matching events to their
 * socket as the `event` field of a push envelope.
 */
use crate::shared::entity::{Document, EntityKind};
use serde::{Deserialize, Serialize};

/// Kind of write that produced an event
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum ChangeType {
    Create,
    Update,
    Delete,
}

/// A single document change
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChangeEvent {
    #[serde(rename = "type")]
    pub change_type: ChangeType,
    /// Collection the document belongs to
    pub col: EntityKind,
    /// Document after the write (before it, for deletes)
    pub doc: Document,
}

impl ChangeEvent {
    pub fn new(change_type: ChangeType, col: EntityKind, doc: Document) -> Self {
        Self {
            change_type,
            col,
            doc,
        }
    }

    pub fn created(col: EntityKind, doc: Document) -> Self {
        Self::new(ChangeType::Create, col, doc)
    }

    pub fn updated(col: EntityKind, doc: Document) -> Self {
        Self::new(ChangeType::Update, col, doc)
    }

    pub fn deleted(col: EntityKind, doc: Document) -> Self {
        Self::new(ChangeType::Delete, col, doc)
    }
}

/// Which changes a subscription wants to see
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeFilter {
    /// Every change in a collection
    All(EntityKind),
    /// Changes to one document
    One(EntityKind, String),
    /// Changes to documents whose `data.<field>` equals a value
    Field {
        kind: EntityKind,
        field: String,
        value: String,
    },
}

impl ChangeFilter {
    pub fn kind(&self) -> EntityKind {
        match self {
            Self::All(kind) | Self::One(kind, _) => *kind,
            Self::Field { kind, .. } => *kind,
        }
    }

    pub fn matches(&self, event: &ChangeEvent) -> bool {
        if event.col != self.kind() {
            return false;
        }
        match self {
            Self::All(_) => true,
            Self::One(_, id) => event.doc.id == *id,
            Self::Field { field, value, .. } => event.doc.field_str(field) == Some(value.as_str()),
        }
    }
}
