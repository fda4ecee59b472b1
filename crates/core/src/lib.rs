//! `catalogsync-core`: catalog content model.
//!
//! This crate contains **pure** model primitives (no host or transport concerns).

pub mod content;
pub mod entity;
pub mod error;
pub mod id;

pub use content::{
    CatalogContent, EntryContent, EntryData, NodeContent, ProductContent, VariationContent,
};
pub use entity::Entity;
pub use error::CatalogError;
pub use id::{CatalogContentType, ContentIdentity, ContentReference, SubscriptionId};
