//! Synchronous input path from the Java UI thread
//!
//! `Activity.dispatchKeyEvent` must answer whether the app consumed a key
//! before it returns, e.g. so an unhandled back press can finish the
//! activity. The bridge translates on the calling thread and blocks until the
//! loop thread delivered the result.

use std::sync::{Mutex, MutexGuard, PoisonError};

use ny_core::{Event, HandlerRef, Result, ThreadedEventDispatcher};
use ny_platform::{Translator, WindowSettings};

use crate::event::{AndroidEvent, WindowId};
use crate::translate::AndroidTranslator;

/// Events dispatched here skip the app context, so its keyboard and mouse
/// contexts do not see them.
pub struct AndroidInputBridge {
    dispatcher: ThreadedEventDispatcher,
    translator: Mutex<AndroidTranslator>,
    handler: Mutex<Option<HandlerRef>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl AndroidInputBridge {
    /// `dispatcher` must be drained by the loop thread, usually through
    /// `AppContext::threaded_dispatch_loop`
    pub fn new(dispatcher: ThreadedEventDispatcher, window: WindowId) -> Self {
        let mut translator = AndroidTranslator::default();
        translator.register(window, &WindowSettings::default());
        Self {
            dispatcher,
            translator: Mutex::new(translator),
            handler: Mutex::new(None),
        }
    }

    pub fn set_handler(&self, handler: Option<HandlerRef>) {
        *lock(&self.handler) = handler;
    }

    /// Deliver `event` and report whether any resulting event was consumed.
    ///
    /// Blocks until delivery. Fails with `WouldDeadlock` on the loop thread.
    /// Without a handler the events still go through the dispatcher, which
    /// logs and drops them.
    pub fn dispatch(&self, event: AndroidEvent) -> Result<bool> {
        let handler = lock(&self.handler).clone();
        let mut translated = Vec::new();
        lock(&self.translator).translate(event, &mut translated);

        let mut consumed = false;
        for translated in translated {
            let event = Event {
                handler: handler.clone(),
                data: translated.data,
                kind: translated.kind,
            };
            consumed |= self.dispatcher.dispatch_sync(event)?;
        }
        tracing::trace!(consumed, "bridged android input");
        Ok(consumed)
    }
}
