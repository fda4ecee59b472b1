//! In-memory event source for tests/dev.

use std::sync::{Arc, RwLock};

use tracing::debug;

use catalogsync_core::SubscriptionId;

use crate::handler::{EventHandler, HandlerError};
use crate::source::EventSource;
use crate::{ChangeEvent, EventKind};

struct Registration {
    id: SubscriptionId,
    kind: EventKind,
    handler: Arc<dyn EventHandler>,
}

/// In-memory host broadcaster.
///
/// - No IO / no async
/// - `raise` delivers on the caller's thread, in subscription order
/// - The first handler error stops delivery and is returned to the raiser
#[derive(Default)]
pub struct InMemoryEventSource {
    registrations: RwLock<Vec<Registration>>,
}

impl InMemoryEventSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live registrations for `kind`.
    pub fn subscriber_count(&self, kind: EventKind) -> usize {
        match self.registrations.read() {
            Ok(regs) => regs.iter().filter(|r| r.kind == kind).count(),
            Err(_) => 0,
        }
    }

    /// Raise an event as the host would.
    pub fn raise(&self, event: &ChangeEvent) -> Result<(), HandlerError> {
        let kind = event.kind();

        // Snapshot so handlers may (un)subscribe while being invoked.
        let handlers: Vec<Arc<dyn EventHandler>> = match self.registrations.read() {
            Ok(regs) => regs
                .iter()
                .filter(|r| r.kind == kind)
                .map(|r| r.handler.clone())
                .collect(),
            Err(_) => return Ok(()),
        };

        debug!(event = %kind, subscribers = handlers.len(), "raising host event");

        for handler in handlers {
            handler.handle(event)?;
        }
        Ok(())
    }
}

impl core::fmt::Debug for InMemoryEventSource {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let count = self.registrations.read().map(|r| r.len()).unwrap_or(0);
        f.debug_struct("InMemoryEventSource")
            .field("registrations", &count)
            .finish()
    }
}

impl EventSource for InMemoryEventSource {
    fn subscribe(&self, kind: EventKind, handler: Arc<dyn EventHandler>) -> SubscriptionId {
        let id = SubscriptionId::new();

        // If the lock is poisoned, the id is still returned; it simply never fires.
        if let Ok(mut regs) = self.registrations.write() {
            regs.push(Registration { id, kind, handler });
        }
        id
    }

    fn unsubscribe(&self, subscription: SubscriptionId) -> bool {
        match self.registrations.write() {
            Ok(mut regs) => {
                let before = regs.len();
                regs.retain(|r| r.id != subscription);
                regs.len() != before
            }
            Err(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::{ContentPublished, PriceUpdated};

    #[derive(Default)]
    struct Recorder {
        seen: Mutex<Vec<EventKind>>,
        fail: bool,
    }

    #[derive(Debug, thiserror::Error)]
    #[error("boom")]
    struct Boom;

    impl EventHandler for Recorder {
        fn name(&self) -> &'static str {
            "recorder"
        }

        fn handle(&self, event: &ChangeEvent) -> Result<(), HandlerError> {
            self.seen.lock().unwrap().push(event.kind());
            if self.fail {
                return Err(HandlerError::new(self.name(), event.event_type(), Boom));
            }
            Ok(())
        }
    }

    fn published() -> ChangeEvent {
        ChangeEvent::Published(ContentPublished { content_link: None })
    }

    #[test]
    fn raise_only_reaches_matching_kind() {
        let source = InMemoryEventSource::new();
        let recorder = Arc::new(Recorder::default());
        source.subscribe(EventKind::PublishedContent, recorder.clone());

        source.raise(&published()).unwrap();
        source.raise(&ChangeEvent::PriceUpdated(PriceUpdated::default())).unwrap();

        assert_eq!(*recorder.seen.lock().unwrap(), vec![EventKind::PublishedContent]);
    }

    #[test]
    fn unsubscribe_stops_delivery() {
        let source = InMemoryEventSource::new();
        let recorder = Arc::new(Recorder::default());
        let id = source.subscribe(EventKind::PublishedContent, recorder.clone());

        assert!(source.unsubscribe(id));
        assert!(!source.unsubscribe(id));
        assert_eq!(source.subscriber_count(EventKind::PublishedContent), 0);

        source.raise(&published()).unwrap();
        assert!(recorder.seen.lock().unwrap().is_empty());
    }

    #[test]
    fn first_failure_is_returned_and_stops_delivery() {
        let source = InMemoryEventSource::new();
        let failing = Arc::new(Recorder { fail: true, ..Default::default() });
        let after = Arc::new(Recorder::default());
        source.subscribe(EventKind::PublishedContent, failing.clone());
        source.subscribe(EventKind::PublishedContent, after.clone());

        let err = source.raise(&published()).unwrap_err();
        assert_eq!(err.handler, "recorder");
        assert_eq!(err.event_type, "content.published");
        assert!(after.seen.lock().unwrap().is_empty());
    }
}
