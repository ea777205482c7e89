//! Synchronous event dispatch
//!
//! [`EventDispatcher`] delivers on the calling thread, inside the `dispatch`
//! call. Backends use it from native callbacks that already run on the loop
//! thread. Delivery is re-entrant: a handler may dispatch further events.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::event::{Event, EventType};

/// Anything events can be handed to
pub trait Dispatcher: Send + Sync {
    fn dispatch(&self, event: Event);
}

/// Observer invoked for every delivered event of one type
pub type EventCallback = Arc<dyn Fn(&Event) + Send + Sync>;

/// Identifies a registered callback
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CallbackId(u64);

/// Per-type observer table shared by both dispatchers
#[derive(Default)]
pub(crate) struct CallbackTable {
    next_id: AtomicU64,
    callbacks: Mutex<FxHashMap<EventType, SmallVec<[(CallbackId, EventCallback); 2]>>>,
}

impl CallbackTable {
    pub(crate) fn add(&self, event_type: EventType, callback: EventCallback) -> CallbackId {
        let id = CallbackId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.callbacks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(event_type)
            .or_default()
            .push((id, callback));
        id
    }

    pub(crate) fn remove(&self, id: CallbackId) -> bool {
        let mut callbacks = self.callbacks.lock().unwrap_or_else(PoisonError::into_inner);
        for list in callbacks.values_mut() {
            if let Some(index) = list.iter().position(|(cb_id, _)| *cb_id == id) {
                list.remove(index);
                return true;
            }
        }
        false
    }

    fn for_type(&self, event_type: EventType) -> SmallVec<[EventCallback; 2]> {
        self.callbacks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&event_type)
            .map(|list| list.iter().map(|(_, cb)| cb.clone()).collect())
            .unwrap_or_default()
    }
}

/// Deliver one event: observers first, then the target handler.
///
/// Returns whether the handler consumed the event. Events without a live
/// handler are reported and dropped.
pub(crate) fn deliver(event: &Event, callbacks: &CallbackTable) -> bool {
    let event_type = event.event_type();
    for callback in callbacks.for_type(event_type) {
        callback(event);
    }

    match &event.handler {
        Some(handler) => match handler.upgrade() {
            Some(handler) => handler.handle_event(event),
            None => {
                tracing::warn!(event_type, "event handler was dropped, discarding event");
                false
            }
        },
        None => {
            tracing::warn!(event_type, "no event handler for event");
            false
        }
    }
}

/// Delivers events immediately on the calling thread
#[derive(Default)]
pub struct EventDispatcher {
    callbacks: CallbackTable,
}

impl EventDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an observer for one event type
    pub fn on_event<F>(&self, event_type: EventType, callback: F) -> CallbackId
    where
        F: Fn(&Event) + Send + Sync + 'static,
    {
        self.callbacks.add(event_type, Arc::new(callback))
    }

    /// Unregister an observer, returns false if it was not registered
    pub fn remove_callback(&self, id: CallbackId) -> bool {
        self.callbacks.remove(id)
    }

    /// Deliver `event` now, returning whether its handler consumed it
    pub fn send(&self, event: Event) -> bool {
        deliver(&event, &self.callbacks)
    }
}

impl Dispatcher for EventDispatcher {
    fn dispatch(&self, event: Event) {
        self.send(event);
    }
}
