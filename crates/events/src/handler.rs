use std::sync::Arc;

use thiserror::Error;

use crate::ChangeEvent;

/// Error surfaced from a subscriber back to the host's event-raising code.
///
/// Subscribers keep their own error types; the host only needs something it
/// can log, so the source error is boxed.
#[derive(Debug, Error)]
#[error("{handler} failed handling {event_type}: {source}")]
pub struct HandlerError {
    pub handler: &'static str,
    pub event_type: &'static str,
    #[source]
    pub source: Box<dyn std::error::Error + Send + Sync + 'static>,
}

impl HandlerError {
    pub fn new(
        handler: &'static str,
        event_type: &'static str,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            handler,
            event_type,
            source: Box::new(source),
        }
    }
}

/// Reacts to a single host event, synchronously, on the raising thread.
///
/// Handlers may be invoked concurrently from several host threads for
/// different events, hence `Send + Sync`.
pub trait EventHandler: Send + Sync {
    /// Name used in logs and errors.
    fn name(&self) -> &'static str;

    fn handle(&self, event: &ChangeEvent) -> Result<(), HandlerError>;
}

impl<H> EventHandler for Arc<H>
where
    H: EventHandler + ?Sized,
{
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn handle(&self, event: &ChangeEvent) -> Result<(), HandlerError> {
        (**self).handle(event)
    }
}
