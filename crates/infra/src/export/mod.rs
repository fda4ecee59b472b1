//! Export actions and their lowering to the remote search/merchandising API.
//!
//! The dispatcher decides *what* to export as [`ExportAction`] values; an
//! [`Exporter`] decides *how*. [`CatalogExporter`] lowers actions to HTTP
//! calls through an [`ExportSink`]; [`RecordingExporter`] keeps them for
//! inspection.

pub mod catalog_exporter;
pub mod payload;
pub mod recording;
pub mod sink;

pub use catalog_exporter::{CatalogExporter, ExportEndpoints};
pub use recording::{RecordingExporter, RecordingSink, SinkCall};
pub use sink::{ExportSink, HttpExportSink, TransportStatus};

use std::sync::Arc;

use thiserror::Error;

use catalogsync_core::{ContentIdentity, EntryContent, NodeContent, ProductContent};

use crate::graph::GraphError;

/// A single export command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportAction {
    /// Create or update one product record.
    ExportProduct(ProductContent),
    ExportProductAssets(Vec<ProductContent>),
    ExportProductRecommendations(Vec<ProductContent>),
    DeleteProducts(Vec<EntryContent>),
    DeleteProductAssets(Vec<EntryContent>),
    DeleteProductRecommendations(Vec<EntryContent>),
    /// Re-export every product below a node.
    ExportChildProducts(NodeContent),
    /// Delete every entry below a node.
    DeleteChildProducts(NodeContent),
    /// Re-send the entire category tree. Nodes in `excluding` are left out
    /// with their subtrees; they are still in the graph while being deleted.
    StartFullCategoryExport { excluding: Vec<ContentIdentity> },
}

impl ExportAction {
    /// Stable name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            ExportAction::ExportProduct(_) => "export_product",
            ExportAction::ExportProductAssets(_) => "export_product_assets",
            ExportAction::ExportProductRecommendations(_) => "export_product_recommendations",
            ExportAction::DeleteProducts(_) => "delete_products",
            ExportAction::DeleteProductAssets(_) => "delete_product_assets",
            ExportAction::DeleteProductRecommendations(_) => "delete_product_recommendations",
            ExportAction::ExportChildProducts(_) => "export_child_products",
            ExportAction::DeleteChildProducts(_) => "delete_child_products",
            ExportAction::StartFullCategoryExport { .. } => "start_full_category_export",
        }
    }
}

#[derive(Debug, Error)]
pub enum ExportError {
    /// The request could not be sent or no response was received.
    #[error("transport error calling {url}: {reason}")]
    Transport { url: String, reason: String },

    /// The remote API answered with a non-success status.
    #[error("{url} answered with status {status}")]
    Status { status: u16, url: String },

    #[error("failed to serialize export payload: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("invalid endpoint url '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    /// Content needed to build the payload could not be loaded.
    #[error(transparent)]
    Graph(#[from] GraphError),
}

/// Executes export actions, one call per action, synchronously.
pub trait Exporter: Send + Sync {
    fn execute(&self, action: ExportAction) -> Result<(), ExportError>;
}

impl<E> Exporter for Arc<E>
where
    E: Exporter + ?Sized,
{
    fn execute(&self, action: ExportAction) -> Result<(), ExportError> {
        (**self).execute(action)
    }
}
