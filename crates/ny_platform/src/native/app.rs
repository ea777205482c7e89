use std::collections::VecDeque;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, ThreadId};

use ny_core::{
    DataOffer, DataSource, Event, EventDispatcher, EventKind, HandlerRef, LoopControl,
    LoopInterface, LoopThunk, ThreadedEventDispatcher,
};
use rustc_hash::FxHashMap;

use super::window::{NativeWindowContext, RequestQueue, WindowSlot};
use super::{LoopWaker, NativeConnection, NativeHandle, Translated, Translator};
use crate::context::{AppContext, KeyboardContext, MouseContext, WindowContext, WindowRequest};
use crate::error::{PlatformError, Result};
use crate::input::{KeyboardState, MouseState};
use crate::settings::{SurfaceType, WindowSettings};

/// [`AppContext`] over a native connection and its translator
///
/// Owned by the thread that created it. Window creation and the dispatch
/// loops check this at runtime.
pub struct NativeAppContext<C, T>
where
    C: NativeConnection,
    T: Translator<Event = C::Event, Handle = C::Handle>,
{
    backend: &'static str,
    connection: C,
    translator: T,
    windows: FxHashMap<C::Handle, Arc<WindowSlot>>,
    requests: Arc<RequestQueue<C::Handle>>,
    refreshes: Vec<C::Handle>,
    translated: Vec<Translated<C::Handle>>,
    keyboard: KeyboardState,
    mouse: MouseState,
    dispatcher: EventDispatcher,
    handler: Option<HandlerRef>,
    owner: ThreadId,
    connected: bool,
}

impl<C, T> NativeAppContext<C, T>
where
    C: NativeConnection,
    T: Translator<Event = C::Event, Handle = C::Handle>,
{
    pub fn new(backend: &'static str, connection: C, translator: T) -> Self {
        let requests = Arc::new(RequestQueue::new(connection.waker()));
        Self {
            backend,
            connection,
            translator,
            windows: FxHashMap::default(),
            requests,
            refreshes: Vec::new(),
            translated: Vec::new(),
            keyboard: KeyboardState::new(),
            mouse: MouseState::new(),
            dispatcher: EventDispatcher::new(),
            handler: None,
            owner: thread::current().id(),
            connected: true,
        }
    }

    /// The dispatcher native events are delivered through
    ///
    /// Register `on_event` observers here.
    pub fn dispatcher(&self) -> &EventDispatcher {
        &self.dispatcher
    }

    pub fn connection(&self) -> &C {
        &self.connection
    }

    pub fn connection_mut(&mut self) -> &mut C {
        &mut self.connection
    }

    /// Number of live windows
    pub fn window_count(&self) -> usize {
        self.windows.len()
    }

    fn on_owner_thread(&self, operation: &'static str) -> bool {
        if thread::current().id() == self.owner {
            return true;
        }
        tracing::error!(backend = self.backend, operation, "called off the app context thread");
        false
    }

    /// Apply window requests, read native events and deliver them.
    /// Returns false once the connection is lost.
    fn pump(&mut self) -> bool {
        if !self.connected {
            return false;
        }

        self.apply_requests();
        if let Err(err) = self.connection.flush() {
            return self.disconnect(err);
        }

        loop {
            match self.connection.poll_event() {
                Ok(Some(event)) => {
                    let mut translated = std::mem::take(&mut self.translated);
                    self.translator.translate(event, &mut translated);
                    for event in translated.drain(..) {
                        self.route(event);
                    }
                    self.translated = translated;
                }
                Ok(None) => break,
                Err(err) => return self.disconnect(err),
            }
        }

        // Requests made by handlers during delivery go out with this pump.
        self.apply_requests();
        if let Err(err) = self.connection.flush() {
            return self.disconnect(err);
        }

        for window in std::mem::take(&mut self.refreshes) {
            self.route(Translated::window(window, EventKind::Refresh));
        }
        true
    }

    fn disconnect(&mut self, err: PlatformError) -> bool {
        tracing::warn!(backend = self.backend, error = %err, "native connection lost");
        self.connected = false;
        false
    }

    fn apply_requests(&mut self) {
        for (window, request) in self.requests.take() {
            let Some(slot) = self.windows.get(&window) else {
                tracing::debug!(window = window.to_raw(), ?request, "request for unknown window");
                continue;
            };

            match request {
                WindowRequest::Refresh => {
                    if !self.refreshes.contains(&window) {
                        self.refreshes.push(window);
                    }
                }
                WindowRequest::Destroy => {
                    self.windows.remove(&window);
                    self.refreshes.retain(|pending| *pending != window);
                    self.translator.forget(window);
                    self.keyboard.forget(Some(window.to_raw()));
                    self.mouse.forget(Some(window.to_raw()));
                    self.connection.destroy_window(window);
                    tracing::debug!(window = window.to_raw(), "destroyed window");
                }
                WindowRequest::Droppable(types) => {
                    slot.set_droppable(types.clone());
                    self.connection
                        .request(window, &WindowRequest::Droppable(types));
                }
                request => self.connection.request(window, &request),
            }
        }
    }

    fn route(&mut self, translated: Translated<C::Handle>) {
        let Translated { window, kind, data } = translated;

        let handler = match window {
            Some(window) => {
                let Some(slot) = self.windows.get(&window) else {
                    tracing::debug!(
                        window = window.to_raw(),
                        event_type = kind.event_type(),
                        "event for unknown native window"
                    );
                    return;
                };
                if !accepts_drop(&slot.droppable(), &kind) {
                    tracing::debug!(window = window.to_raw(), "window does not accept drop");
                    return;
                }
                let raw = Some(window.to_raw());
                self.keyboard.update(raw, &kind);
                self.mouse.update(raw, &kind);
                slot.handler()
            }
            None => self.handler.clone(),
        };

        self.dispatcher.send(Event {
            handler,
            data,
            kind,
        });
    }

    fn run_loop(
        &mut self,
        dispatcher: Option<&ThreadedEventDispatcher>,
        control: &LoopControl,
    ) -> bool {
        let interface = Arc::new(NativeLoop {
            waker: self.connection.waker(),
            stopped: AtomicBool::new(false),
            finished: AtomicBool::new(false),
            calls: Mutex::new(VecDeque::new()),
        });
        let _guard = match control.attach(interface.clone()) {
            Ok(guard) => guard,
            Err(err) => {
                tracing::error!(backend = self.backend, error = %err, "cannot run dispatch loop");
                return false;
            }
        };
        tracing::debug!(backend = self.backend, "dispatch loop started");

        let _binding = dispatcher.map(|dispatcher| {
            let waker = interface.waker.clone();
            dispatcher.set_wake_hook(Some(Arc::new(move || waker.wake())));
            dispatcher.bind_loop_thread()
        });

        let connected = loop {
            if interface.stopped.load(Ordering::SeqCst) {
                break true;
            }
            while let Some(thunk) = interface.next_call() {
                thunk();
            }
            if !self.pump() {
                break false;
            }
            if let Some(dispatcher) = dispatcher {
                dispatcher.process_events();
            }
            if interface.stopped.load(Ordering::SeqCst) {
                break true;
            }
            if let Err(err) = self.connection.wait(None) {
                break self.disconnect(err);
            }
        };

        if let Some(dispatcher) = dispatcher {
            dispatcher.set_wake_hook(None);
        }
        interface.finished.store(true, Ordering::SeqCst);
        tracing::debug!(backend = self.backend, connected, "dispatch loop finished");
        connected
    }
}

/// Drag-and-drop offers only reach windows that declared a shared type
fn accepts_drop(droppable: &ny_core::DataTypes, kind: &EventKind) -> bool {
    match kind {
        EventKind::DndEnter { offer, .. } | EventKind::DndDrop { offer, .. } => {
            droppable.first_shared(&offer.types()).is_some()
        }
        EventKind::DndMove { .. } | EventKind::DndLeave => !droppable.is_empty(),
        _ => true,
    }
}

impl<C, T> AppContext for NativeAppContext<C, T>
where
    C: NativeConnection,
    T: Translator<Event = C::Event, Handle = C::Handle>,
{
    fn backend_name(&self) -> &'static str {
        self.backend
    }

    fn keyboard_context(&self) -> Option<&dyn KeyboardContext> {
        if self.connection.capabilities().keyboard {
            Some(&self.keyboard)
        } else {
            None
        }
    }

    fn mouse_context(&self) -> Option<&dyn MouseContext> {
        if self.connection.capabilities().mouse {
            Some(&self.mouse)
        } else {
            None
        }
    }

    fn create_window_context(&mut self, settings: WindowSettings) -> Result<Box<dyn WindowContext>> {
        if !self.on_owner_thread("create_window_context") {
            return Err(PlatformError::WrongThread("create_window_context"));
        }
        if !self.connection.capabilities().supports(settings.surface) {
            return Err(PlatformError::Unsupported(format!(
                "{:?} surfaces on the {} backend",
                settings.surface, self.backend
            )));
        }
        if settings.surface == SurfaceType::Vulkan && settings.vulkan.instance.is_none() {
            return Err(PlatformError::WindowCreation(
                "vulkan surface requested without an instance".to_string(),
            ));
        }

        let window = self.connection.create_window(&settings)?;
        let surface = match self.connection.create_surface(window, &settings) {
            Ok(surface) => surface,
            Err(err) => {
                self.connection.destroy_window(window);
                return Err(err);
            }
        };

        self.translator.register(window, &settings);
        let slot = Arc::new(WindowSlot::new(
            settings.handler.clone(),
            settings.droppable.clone(),
        ));
        self.windows.insert(window, slot.clone());
        tracing::debug!(
            backend = self.backend,
            window = window.to_raw(),
            title = %settings.title,
            "created window"
        );

        Ok(Box::new(NativeWindowContext::new(
            window,
            surface,
            slot,
            self.requests.clone(),
        )))
    }

    fn set_event_handler(&mut self, handler: Option<HandlerRef>) {
        self.handler = handler;
    }

    fn dispatch_events(&mut self) -> bool {
        if !self.on_owner_thread("dispatch_events") {
            return false;
        }
        self.pump()
    }

    fn dispatch_loop(&mut self, control: &LoopControl) -> bool {
        if !self.on_owner_thread("dispatch_loop") {
            return false;
        }
        self.run_loop(None, control)
    }

    fn threaded_dispatch_loop(
        &mut self,
        dispatcher: &ThreadedEventDispatcher,
        control: &LoopControl,
    ) -> bool {
        if !self.on_owner_thread("threaded_dispatch_loop") {
            return false;
        }
        self.run_loop(Some(dispatcher), control)
    }

    fn set_clipboard(&mut self, source: Box<dyn DataSource>) -> bool {
        self.connection.set_clipboard(source)
    }

    fn clipboard(&mut self) -> Option<Arc<dyn DataOffer>> {
        self.connection.clipboard()
    }

    fn vulkan_extensions(&self) -> Vec<&'static str> {
        self.connection.vulkan_extensions()
    }
}

impl<C, T> fmt::Debug for NativeAppContext<C, T>
where
    C: NativeConnection,
    T: Translator<Event = C::Event, Handle = C::Handle>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NativeAppContext")
            .field("backend", &self.backend)
            .field("windows", &self.windows.len())
            .field("connected", &self.connected)
            .finish()
    }
}

/// The [`LoopInterface`] attached while a native dispatch loop runs
struct NativeLoop {
    waker: Arc<dyn LoopWaker>,
    stopped: AtomicBool,
    finished: AtomicBool,
    calls: Mutex<VecDeque<LoopThunk>>,
}

impl NativeLoop {
    fn next_call(&self) -> Option<LoopThunk> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front()
    }
}

impl LoopInterface for NativeLoop {
    fn stop(&self) -> bool {
        if self.finished.load(Ordering::SeqCst) {
            return false;
        }
        self.stopped.store(true, Ordering::SeqCst);
        self.waker.wake();
        true
    }

    fn call(&self, thunk: LoopThunk) -> bool {
        if self.finished.load(Ordering::SeqCst) || self.stopped.load(Ordering::SeqCst) {
            return false;
        }
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(thunk);
        self.waker.wake();
        true
    }
}
