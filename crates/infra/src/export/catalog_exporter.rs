//! Lowers export actions to remote API calls.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::debug;

use catalogsync_core::{
    CatalogContent, ContentIdentity, ContentReference, EntryContent, NodeContent, ProductContent,
};

use super::payload::{
    AssetsRequest, FolderPayload, FoldersRequest, ProductPayload, ProductsRequest,
    RecommendationsRequest, VariantPayload,
};
use super::sink::ExportSink;
use super::{ExportAction, ExportError, Exporter};
use crate::dedup::{ContentSet, ReferenceSet};
use crate::graph::{ContentGraph, RelationKind};

/// Remote endpoints, one per resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportEndpoints {
    pub products_url: String,
    pub assets_url: String,
    pub recommendations_url: String,
    pub folders_url: String,
}

/// Exporter backed by the host graph (to build payloads) and an HTTP sink.
#[derive(Debug, Clone)]
pub struct CatalogExporter<G, S> {
    graph: G,
    sink: S,
    endpoints: ExportEndpoints,
    language: String,
}

impl<G, S> CatalogExporter<G, S> {
    pub fn new(graph: G, sink: S, endpoints: ExportEndpoints, language: impl Into<String>) -> Self {
        Self {
            graph,
            sink,
            endpoints,
            language: language.into(),
        }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }
}

impl<G, S> CatalogExporter<G, S>
where
    G: ContentGraph,
    S: ExportSink,
{
    fn post<T: Serialize>(&self, payload: &T, url: &str) -> Result<(), ExportError> {
        let json = serde_json::to_value(payload)?;
        self.sink.post(&json, url)?.ensure_success(url)?;
        Ok(())
    }

    fn delete(&self, ids: Vec<String>, url: &str) -> Result<(), ExportError> {
        if ids.is_empty() {
            return Ok(());
        }
        self.sink.delete(&ids, url)?.ensure_success(url)?;
        Ok(())
    }

    fn product_payload(&self, product: &ProductContent) -> Result<ProductPayload, ExportError> {
        let links: ReferenceSet = self
            .graph
            .get_children_relations(&product.content_link(), RelationKind::ProductVariation)?
            .into_iter()
            .map(|r| r.child)
            .collect();

        let variants = if links.is_empty() {
            Vec::new()
        } else {
            self.graph
                .get_items(links.as_slice(), &self.language)?
                .into_iter()
                .filter_map(|c| match c {
                    CatalogContent::Entry(EntryContent::Variation(v)) => {
                        Some(VariantPayload::from(&v))
                    }
                    _ => None,
                })
                .collect()
        };

        Ok(ProductPayload::new(product, variants))
    }

    fn export_products(&self, products: &[ProductContent]) -> Result<(), ExportError> {
        if products.is_empty() {
            return Ok(());
        }
        let payloads = products
            .iter()
            .map(|p| self.product_payload(p))
            .collect::<Result<Vec<_>, _>>()?;

        self.post(&ProductsRequest { products: payloads }, &self.endpoints.products_url)
    }

    fn export_assets(&self, products: &[ProductContent]) -> Result<(), ExportError> {
        if products.is_empty() {
            return Ok(());
        }
        self.post(&AssetsRequest::for_products(products), &self.endpoints.assets_url)
    }

    fn export_recommendations(&self, products: &[ProductContent]) -> Result<(), ExportError> {
        if products.is_empty() {
            return Ok(());
        }

        let mut recommendations = BTreeMap::new();
        for product in products {
            let targets: ReferenceSet = self
                .graph
                .get_associations(&product.content_link())?
                .into_iter()
                .collect();

            let codes = if targets.is_empty() {
                Vec::new()
            } else {
                self.graph
                    .get_items(targets.as_slice(), &self.language)?
                    .into_iter()
                    .filter_map(CatalogContent::into_entry)
                    .map(|e| e.code().to_string())
                    .collect()
            };
            recommendations.insert(product.code().to_string(), codes);
        }

        self.post(
            &RecommendationsRequest { recommendations },
            &self.endpoints.recommendations_url,
        )
    }

    /// Every entry below `node`, through nested nodes.
    fn descendant_entries(
        &self,
        node: &NodeContent,
    ) -> Result<ContentSet<EntryContent>, ExportError> {
        let mut visited = ReferenceSet::new();
        let mut pending = vec![node.content_link];
        let mut entries = ContentSet::new();

        while let Some(link) = pending.pop() {
            if !visited.insert(link) {
                continue;
            }
            for child in self.graph.get_children(&link, &self.language)? {
                match child {
                    CatalogContent::Entry(entry) => {
                        entries.insert(entry);
                    }
                    CatalogContent::Node(child) => pending.push(child.content_link),
                }
            }
        }

        Ok(entries)
    }

    /// Folder tree below `node`. Links already in `visited` are skipped, so
    /// pre-seeding it prunes those subtrees.
    fn folder(
        &self,
        node: &NodeContent,
        visited: &mut ReferenceSet,
    ) -> Result<FolderPayload, ExportError> {
        visited.insert(node.content_link);

        let mut children = Vec::new();
        for child in self.graph.get_children(&node.content_link, &self.language)? {
            if let CatalogContent::Node(child) = child {
                if !visited.contains(&child.content_link) {
                    children.push(self.folder(&child, visited)?);
                }
            }
        }
        Ok(FolderPayload::new(node, children))
    }

    fn full_category_export(&self, excluding: &[ContentIdentity]) -> Result<(), ExportError> {
        let mut visited: ReferenceSet = excluding
            .iter()
            .filter_map(|id| ContentReference::published(id.get()).ok())
            .collect();

        let mut folders = Vec::new();
        for root in self.graph.catalog_roots(&self.language)? {
            if !visited.contains(&root.content_link) {
                folders.push(self.folder(&root, &mut visited)?);
            }
        }

        self.post(&FoldersRequest { folders }, &self.endpoints.folders_url)
    }
}

fn codes(entries: &[EntryContent]) -> Vec<String> {
    entries.iter().map(|e| e.code().to_string()).collect()
}

impl<G, S> Exporter for CatalogExporter<G, S>
where
    G: ContentGraph,
    S: ExportSink,
{
    fn execute(&self, action: ExportAction) -> Result<(), ExportError> {
        debug!(action = action.name(), "executing export action");

        match action {
            ExportAction::ExportProduct(product) => self.export_products(&[product]),
            ExportAction::ExportProductAssets(products) => self.export_assets(&products),
            ExportAction::ExportProductRecommendations(products) => {
                self.export_recommendations(&products)
            }
            ExportAction::DeleteProducts(entries) => {
                self.delete(codes(&entries), &self.endpoints.products_url)
            }
            ExportAction::DeleteProductAssets(entries) => {
                self.delete(codes(&entries), &self.endpoints.assets_url)
            }
            ExportAction::DeleteProductRecommendations(entries) => {
                self.delete(codes(&entries), &self.endpoints.recommendations_url)
            }
            ExportAction::ExportChildProducts(node) => {
                let products: Vec<ProductContent> = self
                    .descendant_entries(&node)?
                    .into_iter()
                    .filter_map(EntryContent::into_product)
                    .collect();
                debug!(node = %node.code, products = products.len(), "exporting child products");
                self.export_products(&products)
            }
            ExportAction::DeleteChildProducts(node) => {
                let entries = self.descendant_entries(&node)?.into_vec();
                debug!(node = %node.code, entries = entries.len(), "deleting child products");
                self.delete(codes(&entries), &self.endpoints.products_url)
            }
            ExportAction::StartFullCategoryExport { excluding } => {
                self.full_category_export(&excluding)
            }
        }
    }
}
