//! Host event source abstraction (registration mechanics only).
//!
//! The host owns the broadcasters; a consumer registers a handler per hook
//! and keeps the returned [`SubscriptionId`] so it can release the
//! registration on shutdown. Delivery is synchronous: the host invokes each
//! handler on the thread that raised the event and runs it to completion.

use std::sync::Arc;

use catalogsync_core::SubscriptionId;

use crate::{EventHandler, EventKind};

/// Capability to (un)register handlers on the host's event hooks.
pub trait EventSource: Send + Sync {
    fn subscribe(&self, kind: EventKind, handler: Arc<dyn EventHandler>) -> SubscriptionId;

    /// Release a registration. Returns `false` if it was not held.
    fn unsubscribe(&self, subscription: SubscriptionId) -> bool;
}

impl<S> EventSource for Arc<S>
where
    S: EventSource + ?Sized,
{
    fn subscribe(&self, kind: EventKind, handler: Arc<dyn EventHandler>) -> SubscriptionId {
        (**self).subscribe(kind, handler)
    }

    fn unsubscribe(&self, subscription: SubscriptionId) -> bool {
        (**self).unsubscribe(subscription)
    }
}
