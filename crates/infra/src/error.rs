use thiserror::Error;

use crate::export::ExportError;
use crate::graph::GraphError;

/// Failure of one event handler invocation.
///
/// Either resolution failed (the host graph could not be read) or an export
/// call failed. Neither is retried; the export for that event is lost.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("entity resolution failed: {0}")]
    Graph(#[from] GraphError),

    #[error("export failed: {0}")]
    Export(#[from] ExportError),
}
