//! Catalog synchronization: host change events → remote catalog exports.
//!
//! ```text
//! host event → router → resolver (content graph) → dedup
//!            → dispatcher → exporter → sink
//! ```

pub mod bootstrap;
pub mod cache;
pub mod config;
pub mod dedup;
pub mod dispatcher;
pub mod error;
pub mod export;
pub mod graph;
pub mod resolver;
pub mod router;

#[cfg(test)]
mod fixtures;
#[cfg(test)]
mod integration_tests;

pub use bootstrap::build_http_bridge;
pub use config::{ConfigError, ExportConfig};
pub use dispatcher::ExportDispatcher;
pub use error::SyncError;
pub use export::{ExportAction, ExportError, Exporter};
pub use graph::{ContentGraph, GraphError};
pub use resolver::{EntityResolver, ResolvedSet};
pub use router::{CatalogContentEvents, RouterOptions};
