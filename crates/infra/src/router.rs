//! Event routing: host hooks → resolve → dispatch.
//!
//! [`CatalogContentEvents`] registers one handler per host hook on
//! `initialize` and releases them on `uninitialize`. Each invocation runs to
//! completion on the raising thread; nothing is queued.

use std::sync::{Arc, Mutex};

use tracing::{debug, error, warn};

use catalogsync_core::SubscriptionId;
use catalogsync_events::{ChangeEvent, EventHandler, EventKind, EventSource, HandlerError};

use crate::cache::{DEFAULT_ASSOCIATION_CACHE_PREFIX, ObjectCache};
use crate::dispatcher::ExportDispatcher;
use crate::error::SyncError;
use crate::export::Exporter;
use crate::graph::{ContentGraph, INVARIANT_LANGUAGE};
use crate::resolver::EntityResolver;

/// Knobs shared by the resolver and dispatcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouterOptions {
    /// Culture used for every content load.
    pub language: String,
    /// Prefix of the host's association-list cache key.
    pub association_cache_prefix: String,
}

impl Default for RouterOptions {
    fn default() -> Self {
        Self {
            language: INVARIANT_LANGUAGE.to_string(),
            association_cache_prefix: DEFAULT_ASSOCIATION_CACHE_PREFIX.to_string(),
        }
    }
}

struct Pipeline<G, E, C> {
    resolver: EntityResolver<G>,
    dispatcher: ExportDispatcher<E, C>,
}

impl<G, E, C> Pipeline<G, E, C>
where
    G: ContentGraph,
    E: Exporter,
    C: ObjectCache,
{
    fn run(&self, event: &ChangeEvent) -> Result<usize, SyncError> {
        let kind = event.kind();
        debug!(event = %kind, "host event raised");

        let resolved = self.resolver.resolve(event)?;
        if resolved.is_empty() {
            debug!(event = %kind, "no catalog entities affected");
            return Ok(0);
        }

        Ok(self.dispatcher.dispatch(kind, resolved)?)
    }
}

impl<G, E, C> EventHandler for Pipeline<G, E, C>
where
    G: ContentGraph + 'static,
    E: Exporter + 'static,
    C: ObjectCache + 'static,
{
    fn name(&self) -> &'static str {
        "catalog_content_events"
    }

    fn handle(&self, event: &ChangeEvent) -> Result<(), HandlerError> {
        self.run(event).map(|_| ()).map_err(|err| {
            error!(
                event = %event.kind(),
                error = %err,
                "catalog export failed; export for this event is lost"
            );
            HandlerError::new(self.name(), event.event_type(), err)
        })
    }
}

/// Subscribes the export pipeline to the host's catalog and content events.
pub struct CatalogContentEvents<G, E, C> {
    pipeline: Arc<Pipeline<G, E, C>>,
    subscriptions: Mutex<Vec<SubscriptionId>>,
}

impl<G, E, C> core::fmt::Debug for CatalogContentEvents<G, E, C> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let count = self.subscriptions.lock().map(|s| s.len()).unwrap_or(0);
        f.debug_struct("CatalogContentEvents")
            .field("subscriptions", &count)
            .finish()
    }
}

impl<G, E, C> CatalogContentEvents<G, E, C>
where
    G: ContentGraph + 'static,
    E: Exporter + 'static,
    C: ObjectCache + 'static,
{
    pub fn new(graph: G, cache: C, exporter: E, options: RouterOptions) -> Self {
        let resolver = EntityResolver::new(graph, options.language);
        let dispatcher = ExportDispatcher::new(exporter, cache)
            .with_association_cache_prefix(options.association_cache_prefix);

        Self {
            pipeline: Arc::new(Pipeline { resolver, dispatcher }),
            subscriptions: Mutex::new(Vec::new()),
        }
    }

    pub fn exporter(&self) -> &E {
        self.pipeline.dispatcher.exporter()
    }

    pub fn is_initialized(&self) -> bool {
        self.subscriptions.lock().map(|s| !s.is_empty()).unwrap_or(false)
    }

    /// Register a handler on every hook. Calling it twice without
    /// `uninitialize` in between is a no-op.
    pub fn initialize<S>(&self, source: &S)
    where
        S: EventSource + ?Sized,
    {
        let Ok(mut subscriptions) = self.subscriptions.lock() else {
            warn!("subscription registry poisoned; not subscribing");
            return;
        };
        if !subscriptions.is_empty() {
            warn!("catalog content events already initialized");
            return;
        }

        let handler: Arc<dyn EventHandler> = self.pipeline.clone();
        for kind in EventKind::ALL {
            subscriptions.push(source.subscribe(kind, handler.clone()));
        }
        debug!(hooks = subscriptions.len(), "catalog content events initialized");
    }

    /// Release every registration taken by `initialize`.
    pub fn uninitialize<S>(&self, source: &S)
    where
        S: EventSource + ?Sized,
    {
        let Ok(mut subscriptions) = self.subscriptions.lock() else {
            warn!("subscription registry poisoned; not unsubscribing");
            return;
        };
        for id in subscriptions.drain(..) {
            if !source.unsubscribe(id) {
                warn!(subscription = %id, "subscription was not held by the event source");
            }
        }
        debug!("catalog content events uninitialized");
    }

    /// Run one event through resolve → dispatch. Returns the number of
    /// export actions issued.
    pub fn handle(&self, event: &ChangeEvent) -> Result<usize, SyncError> {
        self.pipeline.run(event)
    }
}
