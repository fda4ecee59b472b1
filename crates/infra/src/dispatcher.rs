//! Export dispatch: (event kind, resolved entities) → export actions.
//!
//! | Event                | Entities | Actions                                                  |
//! |----------------------|----------|----------------------------------------------------------|
//! | association updating | products | evict association cache, recommendations                 |
//! | relation updated     | products | product                                                  |
//! | relation updated     | nodes    | child products per node, then one full category export   |
//! | created (copy)       | products | product, assets, recommendations                         |
//! | created (copy)       | node     | full category export                                     |
//! | deleting             | entries  | delete products, delete assets, delete recommendations   |
//! | deleting             | node     | delete child products, full category export              |
//! | moved                | products | product                                                  |
//! | moved                | node     | child products, full category export                     |
//! | published            | products | product, assets, recommendations                         |
//! | published            | node     | full category export                                     |
//! | price updated        | products | product                                                  |
//!
//! Per-entity actions are issued once per entity. For one product the order
//! product → assets → recommendations is preserved. The first failing action
//! aborts the rest of the dispatch.

use tracing::debug;

use catalogsync_core::{ContentIdentity, Entity, EntryContent, NodeContent, ProductContent};
use catalogsync_events::EventKind;

use crate::cache::{DEFAULT_ASSOCIATION_CACHE_PREFIX, ObjectCache, association_cache_key};
use crate::export::{ExportAction, ExportError, Exporter};
use crate::resolver::ResolvedSet;

#[derive(Debug, Clone)]
pub struct ExportDispatcher<E, C> {
    exporter: E,
    cache: C,
    association_cache_prefix: String,
}

impl<E, C> ExportDispatcher<E, C> {
    pub fn new(exporter: E, cache: C) -> Self {
        Self {
            exporter,
            cache,
            association_cache_prefix: DEFAULT_ASSOCIATION_CACHE_PREFIX.to_string(),
        }
    }

    pub fn with_association_cache_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.association_cache_prefix = prefix.into();
        self
    }

    pub fn exporter(&self) -> &E {
        &self.exporter
    }
}

impl<E, C> ExportDispatcher<E, C>
where
    E: Exporter,
    C: ObjectCache,
{
    /// Issue the export actions for `resolved`. Returns how many were issued.
    pub fn dispatch(&self, kind: EventKind, resolved: ResolvedSet) -> Result<usize, ExportError> {
        let mut run = Run::new(&self.exporter);

        match kind {
            EventKind::AssociationUpdating => {
                let products = resolved.products.into_vec();
                // The host evicts association lists only after its handlers
                // return; evict now so the export reads the updated list.
                for product in &products {
                    self.cache.remove(&association_cache_key(
                        &self.association_cache_prefix,
                        product.content_link().id(),
                    ));
                }
                run.recommendations(products)?;
            }
            EventKind::RelationUpdated => {
                run.products(resolved.products.into_vec())?;
                if resolved.category_tree_changed {
                    run.child_products(resolved.nodes.into_vec())?;
                    run.full_category_export(Vec::new())?;
                }
            }
            EventKind::CreatedContent | EventKind::PublishedContent => {
                run.products_with_assets(resolved.products.into_vec())?;
                if !resolved.nodes.is_empty() {
                    run.full_category_export(Vec::new())?;
                }
            }
            EventKind::DeletingContent => {
                run.delete_entries(resolved.entries.into_vec())?;
                let nodes = resolved.nodes.into_vec();
                if !nodes.is_empty() {
                    let deleted = nodes.iter().map(Entity::id).collect();
                    for node in nodes {
                        run.issue(ExportAction::DeleteChildProducts(node))?;
                    }
                    run.full_category_export(deleted)?;
                }
            }
            EventKind::MovedContent => {
                run.products(resolved.products.into_vec())?;
                let nodes = resolved.nodes.into_vec();
                if !nodes.is_empty() {
                    run.child_products(nodes)?;
                    run.full_category_export(Vec::new())?;
                }
            }
            EventKind::PriceUpdated => {
                run.products(resolved.products.into_vec())?;
            }
        }

        debug!(event = %kind, actions = run.issued, "export dispatch complete");
        Ok(run.issued)
    }
}

/// One dispatch invocation: counts actions and guards the single full export.
struct Run<'a, E> {
    exporter: &'a E,
    issued: usize,
    category_export_started: bool,
}

impl<'a, E: Exporter> Run<'a, E> {
    fn new(exporter: &'a E) -> Self {
        Self {
            exporter,
            issued: 0,
            category_export_started: false,
        }
    }

    fn issue(&mut self, action: ExportAction) -> Result<(), ExportError> {
        self.issued += 1;
        self.exporter.execute(action)
    }

    fn products(&mut self, products: Vec<ProductContent>) -> Result<(), ExportError> {
        for product in products {
            self.issue(ExportAction::ExportProduct(product))?;
        }
        Ok(())
    }

    fn recommendations(&mut self, products: Vec<ProductContent>) -> Result<(), ExportError> {
        if products.is_empty() {
            return Ok(());
        }
        self.issue(ExportAction::ExportProductRecommendations(products))
    }

    fn products_with_assets(&mut self, products: Vec<ProductContent>) -> Result<(), ExportError> {
        if products.is_empty() {
            return Ok(());
        }
        self.products(products.clone())?;
        self.issue(ExportAction::ExportProductAssets(products.clone()))?;
        self.recommendations(products)
    }

    fn delete_entries(&mut self, entries: Vec<EntryContent>) -> Result<(), ExportError> {
        if entries.is_empty() {
            return Ok(());
        }
        self.issue(ExportAction::DeleteProducts(entries.clone()))?;
        self.issue(ExportAction::DeleteProductAssets(entries.clone()))?;
        self.issue(ExportAction::DeleteProductRecommendations(entries))
    }

    fn child_products(&mut self, nodes: Vec<NodeContent>) -> Result<(), ExportError> {
        for node in nodes {
            self.issue(ExportAction::ExportChildProducts(node))?;
        }
        Ok(())
    }

    fn full_category_export(
        &mut self,
        excluding: Vec<ContentIdentity>,
    ) -> Result<(), ExportError> {
        if self.category_export_started {
            return Ok(());
        }
        self.category_export_started = true;
        self.issue(ExportAction::StartFullCategoryExport { excluding })
    }
}
