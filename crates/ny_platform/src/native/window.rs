use std::collections::VecDeque;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use ny_core::{DataTypes, HandlerRef};

use super::{LoopWaker, NativeHandle};
use crate::context::{WindowContext, WindowRequest};
use crate::surface::Surface;

/// Per-window state shared between the app context and the window object
pub(crate) struct WindowSlot {
    handler: Mutex<Option<HandlerRef>>,
    droppable: Mutex<DataTypes>,
}

impl WindowSlot {
    pub(crate) fn new(handler: Option<HandlerRef>, droppable: DataTypes) -> Self {
        Self {
            handler: Mutex::new(handler),
            droppable: Mutex::new(droppable),
        }
    }

    pub(crate) fn handler(&self) -> Option<HandlerRef> {
        lock(&self.handler).clone()
    }

    pub(crate) fn set_handler(&self, handler: Option<HandlerRef>) {
        *lock(&self.handler) = handler;
    }

    pub(crate) fn droppable(&self) -> DataTypes {
        lock(&self.droppable).clone()
    }

    pub(crate) fn set_droppable(&self, types: DataTypes) {
        *lock(&self.droppable) = types;
    }
}

/// Requests made by window objects, applied by the loop on its next pump
pub(crate) struct RequestQueue<H> {
    pending: Mutex<VecDeque<(H, WindowRequest)>>,
    waker: Arc<dyn LoopWaker>,
}

impl<H> RequestQueue<H> {
    pub(crate) fn new(waker: Arc<dyn LoopWaker>) -> Self {
        Self {
            pending: Mutex::new(VecDeque::new()),
            waker,
        }
    }

    pub(crate) fn push(&self, window: H, request: WindowRequest) {
        lock(&self.pending).push_back((window, request));
        self.waker.wake();
    }

    pub(crate) fn take(&self) -> VecDeque<(H, WindowRequest)> {
        std::mem::take(&mut *lock(&self.pending))
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// [`WindowContext`] for windows created by a
/// [`NativeAppContext`](super::NativeAppContext)
///
/// Dropping it destroys the native window on the next loop iteration.
pub struct NativeWindowContext<H: NativeHandle> {
    handle: H,
    surface: Surface,
    slot: Arc<WindowSlot>,
    requests: Arc<RequestQueue<H>>,
}

impl<H: NativeHandle> NativeWindowContext<H> {
    pub(crate) fn new(
        handle: H,
        surface: Surface,
        slot: Arc<WindowSlot>,
        requests: Arc<RequestQueue<H>>,
    ) -> Self {
        Self {
            handle,
            surface,
            slot,
            requests,
        }
    }

    pub fn handle(&self) -> H {
        self.handle
    }
}

impl<H: NativeHandle> WindowContext for NativeWindowContext<H> {
    fn native_handle(&self) -> u64 {
        self.handle.to_raw()
    }

    fn request(&self, request: WindowRequest) {
        self.requests.push(self.handle, request);
    }

    fn set_event_handler(&self, handler: Option<HandlerRef>) {
        self.slot.set_handler(handler);
    }

    fn surface(&self) -> Surface {
        self.surface
    }
}

impl<H: NativeHandle> Drop for NativeWindowContext<H> {
    fn drop(&mut self) {
        self.slot.set_handler(None);
        self.requests.push(self.handle, WindowRequest::Destroy);
    }
}

impl<H: NativeHandle> fmt::Debug for NativeWindowContext<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NativeWindowContext")
            .field("handle", &self.handle)
            .field("surface", &self.surface)
            .finish()
    }
}
