//! Host change events and the event-source capability.

pub mod event;
pub mod handler;
pub mod in_memory_source;
pub mod source;

pub use event::{
    AssociationChange, AssociationChanged, CatalogKey, ChangeEvent, ContentCreated,
    ContentDeleting, ContentMoved, ContentPublished, CreationCause, EntryRelationChange,
    EventKind, NodeEntryRelationChange, NodeRelationChange, PriceUpdated, RelationChanged,
};
pub use handler::{EventHandler, HandlerError};
pub use in_memory_source::InMemoryEventSource;
pub use source::EventSource;
