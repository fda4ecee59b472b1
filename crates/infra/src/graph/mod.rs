//! Content Graph Provider boundary.
//!
//! Everything the bridge knows about the host's catalog comes through this
//! trait: content loads, relation queries, child listings, association lists
//! and business-key conversion. All calls are synchronous and may be slow;
//! the bridge imposes no timeout or retry on them.

pub mod in_memory;

pub use in_memory::InMemoryContentGraph;

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use catalogsync_core::{CatalogContent, CatalogContentType, ContentReference, NodeContent};

/// Culture used when the caller has no preference.
pub const INVARIANT_LANGUAGE: &str = "invariant";

/// Kind of host-modeled edge between two catalog items.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationKind {
    /// parent = product, child = variation.
    ProductVariation,
    /// parent = bundle, child = bundled entry.
    BundleEntry,
    /// parent = package, child = packaged entry.
    PackageEntry,
}

/// A directed relation between two content items.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Relation {
    pub kind: RelationKind,
    pub parent: ContentReference,
    pub child: ContentReference,
}

impl Relation {
    pub fn new(kind: RelationKind, parent: ContentReference, child: ContentReference) -> Self {
        Self { kind, parent, child }
    }

    pub fn product_variation(product: ContentReference, variation: ContentReference) -> Self {
        Self::new(RelationKind::ProductVariation, product, variation)
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GraphError {
    /// The provider could not serve the request.
    #[error("content provider unavailable: {0}")]
    Unavailable(String),

    /// Content that had to exist was missing.
    #[error("content not found: {0}")]
    NotFound(ContentReference),

    /// Cached host data could not be decoded.
    #[error("corrupt cached value under '{key}': {reason}")]
    CorruptCache { key: String, reason: String },
}

/// Read access to the host's catalog content graph.
pub trait ContentGraph: Send + Sync {
    /// Load a single item. Missing or non-catalog content is `Ok(None)`.
    fn try_get(
        &self,
        reference: &ContentReference,
        language: &str,
    ) -> Result<Option<CatalogContent>, GraphError>;

    /// Batch load. Order is not guaranteed; missing references are omitted.
    fn get_items(
        &self,
        references: &[ContentReference],
        language: &str,
    ) -> Result<Vec<CatalogContent>, GraphError>;

    /// Relations of `kind` where `reference` is the child.
    fn get_parents(
        &self,
        reference: &ContentReference,
        kind: RelationKind,
    ) -> Result<Vec<Relation>, GraphError>;

    /// Relations of `kind` where `reference` is the parent.
    fn get_children_relations(
        &self,
        reference: &ContentReference,
        kind: RelationKind,
    ) -> Result<Vec<Relation>, GraphError>;

    /// Direct children (nodes and entries) of a catalog node.
    fn get_children(
        &self,
        reference: &ContentReference,
        language: &str,
    ) -> Result<Vec<CatalogContent>, GraphError>;

    /// Top-level catalog nodes.
    fn catalog_roots(&self, language: &str) -> Result<Vec<NodeContent>, GraphError>;

    /// Association targets of an entry, read through the host object cache.
    fn get_associations(
        &self,
        reference: &ContentReference,
    ) -> Result<Vec<ContentReference>, GraphError>;

    /// Convert a catalog-internal id into a content reference.
    fn reference_for_id(
        &self,
        id: i64,
        kind: CatalogContentType,
        version: u32,
    ) -> Option<ContentReference>;

    /// Convert an entry code into a content reference.
    fn reference_for_code(&self, code: &str) -> Option<ContentReference>;
}

impl<G> ContentGraph for Arc<G>
where
    G: ContentGraph + ?Sized,
{
    fn try_get(
        &self,
        reference: &ContentReference,
        language: &str,
    ) -> Result<Option<CatalogContent>, GraphError> {
        (**self).try_get(reference, language)
    }

    fn get_items(
        &self,
        references: &[ContentReference],
        language: &str,
    ) -> Result<Vec<CatalogContent>, GraphError> {
        (**self).get_items(references, language)
    }

    fn get_parents(
        &self,
        reference: &ContentReference,
        kind: RelationKind,
    ) -> Result<Vec<Relation>, GraphError> {
        (**self).get_parents(reference, kind)
    }

    fn get_children_relations(
        &self,
        reference: &ContentReference,
        kind: RelationKind,
    ) -> Result<Vec<Relation>, GraphError> {
        (**self).get_children_relations(reference, kind)
    }

    fn get_children(
        &self,
        reference: &ContentReference,
        language: &str,
    ) -> Result<Vec<CatalogContent>, GraphError> {
        (**self).get_children(reference, language)
    }

    fn catalog_roots(&self, language: &str) -> Result<Vec<NodeContent>, GraphError> {
        (**self).catalog_roots(language)
    }

    fn get_associations(
        &self,
        reference: &ContentReference,
    ) -> Result<Vec<ContentReference>, GraphError> {
        (**self).get_associations(reference)
    }

    fn reference_for_id(
        &self,
        id: i64,
        kind: CatalogContentType,
        version: u32,
    ) -> Option<ContentReference> {
        (**self).reference_for_id(id, kind, version)
    }

    fn reference_for_code(&self, code: &str) -> Option<ContentReference> {
        (**self).reference_for_code(code)
    }
}
