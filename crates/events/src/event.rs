//! Host change events.
//!
//! The host reports catalog changes in its own terms (catalog entry ids,
//! relation deltas, catalog keys) rather than as loaded content. These types
//! carry exactly what the host raises; resolving them to business entities is
//! the consumer's job.

use serde::{Deserialize, Serialize};

use catalogsync_core::ContentReference;

/// Named host event hooks a consumer can subscribe to.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    PriceUpdated,
    AssociationUpdating,
    RelationUpdated,
    CreatedContent,
    DeletingContent,
    MovedContent,
    PublishedContent,
}

impl EventKind {
    pub const ALL: [EventKind; 7] = [
        EventKind::PriceUpdated,
        EventKind::AssociationUpdating,
        EventKind::RelationUpdated,
        EventKind::CreatedContent,
        EventKind::DeletingContent,
        EventKind::MovedContent,
        EventKind::PublishedContent,
    ];

    /// Stable name (e.g. "catalog.relation_updated").
    pub fn as_str(self) -> &'static str {
        match self {
            EventKind::PriceUpdated => "catalog.price_updated",
            EventKind::AssociationUpdating => "catalog.association_updating",
            EventKind::RelationUpdated => "catalog.relation_updated",
            EventKind::CreatedContent => "content.created",
            EventKind::DeletingContent => "content.deleting",
            EventKind::MovedContent => "content.moved",
            EventKind::PublishedContent => "content.published",
        }
    }
}

impl core::fmt::Display for EventKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One changed association (cross-sell/up-sell link) of a catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssociationChange {
    /// Catalog entry id of the entry owning the association.
    pub parent_entry_id: i64,
    pub association_name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssociationChanged {
    pub changes: Vec<AssociationChange>,
}

/// Entry-to-entry relation delta (e.g. a variation added to a product).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryRelationChange {
    pub parent_entry_id: i64,
    pub child_entry_id: i64,
}

/// Node-to-entry relation delta (an entry linked into or out of a category).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeEntryRelationChange {
    pub node_id: i64,
    pub entry_id: i64,
}

/// Node-to-node relation delta (a category linked under another).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeRelationChange {
    pub parent_node_id: i64,
    pub child_node_id: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationChanged {
    #[serde(default)]
    pub entry_relation_changes: Vec<EntryRelationChange>,
    #[serde(default)]
    pub node_entry_relation_changes: Vec<NodeEntryRelationChange>,
    #[serde(default)]
    pub node_relation_changes: Vec<NodeRelationChange>,
}

impl RelationChanged {
    pub fn has_entry_changes(&self) -> bool {
        !self.entry_relation_changes.is_empty() || !self.node_entry_relation_changes.is_empty()
    }

    pub fn has_node_changes(&self) -> bool {
        !self.node_relation_changes.is_empty()
    }
}

/// Why content came into existence.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CreationCause {
    /// Created from scratch by an editor or import.
    New,
    /// Copy/duplicate of existing content.
    Copy,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentCreated {
    pub content_link: Option<ContentReference>,
    pub cause: CreationCause,
}

/// Raised before deletion completes, so the content is still loadable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentDeleting {
    pub content_link: Option<ContentReference>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentMoved {
    pub content_link: Option<ContentReference>,
    pub target_link: Option<ContentReference>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentPublished {
    pub content_link: Option<ContentReference>,
}

/// Host business key of a catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CatalogKey {
    pub catalog_entry_code: String,
}

impl CatalogKey {
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            catalog_entry_code: code.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceUpdated {
    pub catalog_keys: Vec<CatalogKey>,
}

/// Union of every host event the bridge reacts to.
///
/// Instances are event-scoped: constructed by the host, consumed within one
/// handler invocation, then dropped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum ChangeEvent {
    AssociationChanged(AssociationChanged),
    RelationChanged(RelationChanged),
    Created(ContentCreated),
    Deleting(ContentDeleting),
    Moved(ContentMoved),
    Published(ContentPublished),
    PriceUpdated(PriceUpdated),
}

impl ChangeEvent {
    /// The hook this event is raised on.
    pub fn kind(&self) -> EventKind {
        match self {
            ChangeEvent::AssociationChanged(_) => EventKind::AssociationUpdating,
            ChangeEvent::RelationChanged(_) => EventKind::RelationUpdated,
            ChangeEvent::Created(_) => EventKind::CreatedContent,
            ChangeEvent::Deleting(_) => EventKind::DeletingContent,
            ChangeEvent::Moved(_) => EventKind::MovedContent,
            ChangeEvent::Published(_) => EventKind::PublishedContent,
            ChangeEvent::PriceUpdated(_) => EventKind::PriceUpdated,
        }
    }

    pub fn event_type(&self) -> &'static str {
        self.kind().as_str()
    }
}
