//! Entity resolution: host change events → affected business entities.
//!
//! The host reports changes as relation deltas and catalog keys. This module
//! turns them into the minimal set of products, entries and nodes that must
//! be re-exported. It performs no export itself and its only I/O is through
//! the [`ContentGraph`].

use tracing::{debug, warn};

use catalogsync_core::{
    CatalogContent, CatalogContentType, ContentReference, EntryContent, NodeContent,
    ProductContent,
};
use catalogsync_events::{
    AssociationChanged, ChangeEvent, ContentCreated, CreationCause, PriceUpdated, RelationChanged,
};

use crate::dedup::{ContentSet, ReferenceSet};
use crate::graph::{ContentGraph, GraphError, RelationKind};

/// Entities affected by one change event.
///
/// Only the fields relevant to the event kind are populated; each one is
/// free of duplicate identities.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedSet {
    pub products: ContentSet<ProductContent>,
    pub nodes: ContentSet<NodeContent>,
    pub entries: ContentSet<EntryContent>,
    /// Node-to-node relations changed, so the category tree must be re-sent
    /// even if none of the moved nodes could be loaded.
    pub category_tree_changed: bool,
}

impl ResolvedSet {
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
            && self.nodes.is_empty()
            && self.entries.is_empty()
            && !self.category_tree_changed
    }

    fn with_products(products: ContentSet<ProductContent>) -> Self {
        Self {
            products,
            ..Default::default()
        }
    }

    fn with_node(node: NodeContent) -> Self {
        let mut nodes = ContentSet::new();
        nodes.insert(node);
        Self {
            nodes,
            ..Default::default()
        }
    }
}

/// Resolves change events against the host content graph.
#[derive(Debug, Clone)]
pub struct EntityResolver<G> {
    graph: G,
    language: String,
}

impl<G> EntityResolver<G> {
    pub fn new(graph: G, language: impl Into<String>) -> Self {
        Self {
            graph,
            language: language.into(),
        }
    }

    pub fn graph(&self) -> &G {
        &self.graph
    }

    pub fn language(&self) -> &str {
        &self.language
    }
}

impl<G: ContentGraph> EntityResolver<G> {
    /// Resolve any event into its affected entities.
    pub fn resolve(&self, event: &ChangeEvent) -> Result<ResolvedSet, GraphError> {
        match event {
            ChangeEvent::AssociationChanged(e) => {
                Ok(ResolvedSet::with_products(self.products_for_associations(e)?))
            }
            ChangeEvent::RelationChanged(e) => Ok(ResolvedSet {
                products: self.products_for_entry_relations(e)?,
                nodes: self.nodes_for_node_relations(e)?,
                category_tree_changed: e.has_node_changes(),
                ..Default::default()
            }),
            ChangeEvent::Created(e) => self.resolve_created(e),
            ChangeEvent::Deleting(e) => self.resolve_deleting(e.content_link),
            ChangeEvent::Moved(e) => self.resolve_changed(e.content_link, "moved"),
            ChangeEvent::Published(e) => self.resolve_changed(e.content_link, "published"),
            ChangeEvent::PriceUpdated(e) => Ok(ResolvedSet::with_products(
                self.products_for_price_update(e)?,
            )),
        }
    }

    /// Products owning the changed associations. No variant-to-parent lookup.
    pub fn products_for_associations(
        &self,
        event: &AssociationChanged,
    ) -> Result<ContentSet<ProductContent>, GraphError> {
        let links: ReferenceSet = event
            .changes
            .iter()
            .filter_map(|c| self.entry_link(c.parent_entry_id))
            .collect();

        self.load_products(&links)
    }

    /// Products touched by entry-level relation changes.
    pub fn products_for_entry_relations(
        &self,
        event: &RelationChanged,
    ) -> Result<ContentSet<ProductContent>, GraphError> {
        let mut links = ReferenceSet::new();
        links.extend(
            event
                .entry_relation_changes
                .iter()
                .filter_map(|c| self.entry_link(c.parent_entry_id)),
        );
        links.extend(
            event
                .node_entry_relation_changes
                .iter()
                .filter_map(|c| self.entry_link(c.entry_id)),
        );

        self.load_products(&links)
    }

    /// Nodes whose position in the tree changed.
    pub fn nodes_for_node_relations(
        &self,
        event: &RelationChanged,
    ) -> Result<ContentSet<NodeContent>, GraphError> {
        let links: ReferenceSet = event
            .node_relation_changes
            .iter()
            .filter_map(|c| {
                self.graph
                    .reference_for_id(c.child_node_id, CatalogContentType::CatalogNode, 0)
            })
            .collect();

        Ok(self
            .load(&links)?
            .into_iter()
            .filter_map(CatalogContent::into_node)
            .collect())
    }

    /// Products to re-export when `entry` changed.
    ///
    /// A variation resolves to its parent products (ordinarily one); a
    /// product resolves to itself; any other entry kind to nothing.
    pub fn products_affected(
        &self,
        entry: &EntryContent,
    ) -> Result<ContentSet<ProductContent>, GraphError> {
        match entry {
            EntryContent::Variation(variation) => {
                let parents: ReferenceSet = self
                    .graph
                    .get_parents(&variation.content_link(), RelationKind::ProductVariation)?
                    .into_iter()
                    .map(|r| r.parent)
                    .collect();
                self.load_products(&parents)
            }
            EntryContent::Product(product) => {
                let mut products = ContentSet::new();
                products.insert(product.clone());
                Ok(products)
            }
            EntryContent::Other(_) => Ok(ContentSet::new()),
        }
    }

    /// Entries to act on when `entry` changed, widened by relation.
    pub fn entries_affected(
        &self,
        entry: &EntryContent,
        include_parent_products: bool,
        include_child_variants: bool,
    ) -> Result<ContentSet<EntryContent>, GraphError> {
        let mut links = ReferenceSet::new();

        match entry {
            EntryContent::Variation(variation) => {
                if include_parent_products {
                    links.extend(
                        self.graph
                            .get_parents(&variation.content_link(), RelationKind::ProductVariation)?
                            .into_iter()
                            .map(|r| r.parent),
                    );
                }
                links.insert(variation.content_link());
            }
            EntryContent::Product(product) => {
                if include_child_variants {
                    links.extend(
                        self.graph
                            .get_children_relations(
                                &product.content_link(),
                                RelationKind::ProductVariation,
                            )?
                            .into_iter()
                            .map(|r| r.child),
                    );
                }
                links.insert(product.content_link());
            }
            EntryContent::Other(_) => {}
        }

        Ok(self
            .load(&links)?
            .into_iter()
            .filter_map(CatalogContent::into_entry)
            .collect())
    }

    /// Products to re-export after a price change on `links`.
    ///
    /// A changed variation pulls in its parent products. A changed product
    /// pulls in the product its own parent link points at, not itself.
    pub fn products_affected_by_price_changes(
        &self,
        links: impl IntoIterator<Item = ContentReference>,
    ) -> Result<ContentSet<ProductContent>, GraphError> {
        let changed: ReferenceSet = links.into_iter().collect();
        let mut products = ContentSet::new();

        for content in self.load(&changed)? {
            match content {
                CatalogContent::Entry(EntryContent::Variation(variation)) => {
                    let parents: ReferenceSet = self
                        .graph
                        .get_parents(&variation.content_link(), RelationKind::ProductVariation)?
                        .into_iter()
                        .map(|r| r.parent)
                        .collect();
                    products.extend(self.load_products(&parents)?);
                }
                CatalogContent::Entry(EntryContent::Product(product)) => {
                    // TODO: confirm with the catalog owners whether the changed product
                    // itself should be exported; every other path exports it directly.
                    let Some(parent_link) = product.parent_link() else {
                        debug!(
                            product = %product.code(),
                            "price-updated product has no parent link"
                        );
                        continue;
                    };
                    match self
                        .graph
                        .try_get(&parent_link, &self.language)?
                        .and_then(CatalogContent::into_product)
                    {
                        Some(parent) => {
                            products.insert(parent);
                        }
                        None => warn!(
                            product = %product.code(),
                            parent = %parent_link,
                            "parent of price-updated product is not a product; skipped"
                        ),
                    }
                }
                CatalogContent::Entry(EntryContent::Other(_)) | CatalogContent::Node(_) => {}
            }
        }

        Ok(products)
    }

    fn products_for_price_update(
        &self,
        event: &PriceUpdated,
    ) -> Result<ContentSet<ProductContent>, GraphError> {
        let links = event.catalog_keys.iter().filter_map(|key| {
            let link = self.graph.reference_for_code(&key.catalog_entry_code);
            if link.is_none() {
                debug!(code = %key.catalog_entry_code, "price update for unknown entry code");
            }
            link
        });

        self.products_affected_by_price_changes(links)
    }

    fn resolve_created(&self, event: &ContentCreated) -> Result<ResolvedSet, GraphError> {
        if event.cause != CreationCause::Copy {
            debug!("created content is not a copy; ignored");
            return Ok(ResolvedSet::default());
        }

        match self.load_catalog_content(event.content_link, "created")? {
            Some(CatalogContent::Entry(entry)) => {
                Ok(ResolvedSet::with_products(self.products_affected(&entry)?))
            }
            // A fresh copy of a node has no children yet.
            Some(CatalogContent::Node(node)) => Ok(ResolvedSet::with_node(node)),
            None => Ok(ResolvedSet::default()),
        }
    }

    fn resolve_deleting(&self, link: Option<ContentReference>) -> Result<ResolvedSet, GraphError> {
        match self.load_catalog_content(link, "deleted")? {
            Some(CatalogContent::Entry(entry)) => Ok(ResolvedSet {
                entries: self.entries_affected(&entry, false, true)?,
                ..Default::default()
            }),
            Some(CatalogContent::Node(node)) => Ok(ResolvedSet::with_node(node)),
            None => Ok(ResolvedSet::default()),
        }
    }

    fn resolve_changed(
        &self,
        link: Option<ContentReference>,
        what: &'static str,
    ) -> Result<ResolvedSet, GraphError> {
        match self.load_catalog_content(link, what)? {
            Some(CatalogContent::Entry(entry)) => {
                Ok(ResolvedSet::with_products(self.products_affected(&entry)?))
            }
            Some(CatalogContent::Node(node)) => Ok(ResolvedSet::with_node(node)),
            None => Ok(ResolvedSet::default()),
        }
    }

    /// Load the content an event points at; `None` is the expected no-op.
    fn load_catalog_content(
        &self,
        link: Option<ContentReference>,
        what: &'static str,
    ) -> Result<Option<CatalogContent>, GraphError> {
        let Some(link) = link else {
            debug!("{what} content has an empty reference; ignored");
            return Ok(None);
        };

        let content = self.graph.try_get(&link, &self.language)?;
        if content.is_none() {
            debug!(content = %link, "{what} content is not a catalog item; ignored");
        }
        Ok(content)
    }

    fn entry_link(&self, entry_id: i64) -> Option<ContentReference> {
        let link = self
            .graph
            .reference_for_id(entry_id, CatalogContentType::CatalogEntry, 0);
        if link.is_none() {
            debug!(entry_id, "no content reference for catalog entry id");
        }
        link
    }

    fn load(&self, links: &ReferenceSet) -> Result<Vec<CatalogContent>, GraphError> {
        if links.is_empty() {
            return Ok(Vec::new());
        }
        self.graph.get_items(links.as_slice(), &self.language)
    }

    fn load_products(
        &self,
        links: &ReferenceSet,
    ) -> Result<ContentSet<ProductContent>, GraphError> {
        Ok(self
            .load(links)?
            .into_iter()
            .filter_map(CatalogContent::into_product)
            .collect())
    }
}
