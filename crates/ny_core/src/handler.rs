//! Event handler protocol

use std::fmt;
use std::sync::{Arc, Weak};

use crate::event::Event;

/// Receiver of dispatched events
///
/// Handlers are shared between the thread that owns them and whichever thread
/// runs the dispatch loop, so state they mutate needs interior mutability.
/// Implementations usually `match` on [`Event::kind`].
pub trait EventHandler: Send + Sync {
    /// Handle `event`, returning whether it was consumed
    fn handle_event(&self, event: &Event) -> bool {
        let _ = event;
        false
    }
}

/// Non-owning reference from an event to its target handler
///
/// Dispatchers never keep a handler alive. An event whose handler has been
/// dropped is reported and discarded instead of touching freed memory.
pub type HandlerRef = Weak<dyn EventHandler>;

/// Create a [`HandlerRef`] to a shared handler
pub fn handler_ref<H: EventHandler + 'static>(handler: &Arc<H>) -> HandlerRef {
    let handler: Arc<dyn EventHandler> = handler.clone();
    Arc::downgrade(&handler)
}

/// Whether two handler references point at the same handler
pub fn same_handler(a: &HandlerRef, b: &HandlerRef) -> bool {
    a.as_ptr() as *const () == b.as_ptr() as *const ()
}

/// Adapts a closure into an [`EventHandler`]
pub struct FnHandler<F>(pub F);

impl<F> EventHandler for FnHandler<F>
where
    F: Fn(&Event) -> bool + Send + Sync,
{
    fn handle_event(&self, event: &Event) -> bool {
        (self.0)(event)
    }
}

impl<F> fmt::Debug for FnHandler<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("FnHandler")
    }
}
