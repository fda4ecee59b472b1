//! Wiring for a host process: config → HTTP sink → exporter → router.

use std::sync::Arc;

use crate::cache::ObjectCache;
use crate::config::ExportConfig;
use crate::export::{CatalogExporter, ExportError, HttpExportSink};
use crate::graph::ContentGraph;
use crate::router::CatalogContentEvents;

pub type HttpBridge<G, C> =
    CatalogContentEvents<Arc<G>, CatalogExporter<Arc<G>, HttpExportSink>, Arc<C>>;

/// Build the production router. The caller still has to `initialize` it
/// against the host's event source.
///
/// ```no_run
/// use std::sync::Arc;
///
/// use catalogsync_events::InMemoryEventSource;
/// use catalogsync_infra::cache::InMemoryObjectCache;
/// use catalogsync_infra::graph::InMemoryContentGraph;
/// use catalogsync_infra::{ExportConfig, build_http_bridge};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// catalogsync_observability::init();
///
/// let config = ExportConfig::from_env()?;
/// let bridge = build_http_bridge(
///     &config,
///     Arc::new(InMemoryContentGraph::new()),
///     Arc::new(InMemoryObjectCache::new()),
/// )?;
///
/// let source = InMemoryEventSource::new();
/// bridge.initialize(&source);
/// # Ok(())
/// # }
/// ```
pub fn build_http_bridge<G, C>(
    config: &ExportConfig,
    graph: Arc<G>,
    cache: Arc<C>,
) -> Result<HttpBridge<G, C>, ExportError>
where
    G: ContentGraph + 'static,
    C: ObjectCache + 'static,
{
    let sink = HttpExportSink::new(config.http_timeout)?;
    let exporter = CatalogExporter::new(
        graph.clone(),
        sink,
        config.endpoints.clone(),
        config.language.clone(),
    );

    Ok(CatalogContentEvents::new(graph, cache, exporter, config.router_options()))
}
