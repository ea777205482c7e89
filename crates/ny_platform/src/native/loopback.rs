//! In-process native connection
//!
//! [`LoopbackConnection`] stands in for a display server. Native events are
//! fed through a [`LoopbackInjector`] from any thread, waits block on a
//! condition variable, and an optional [`Responder`] plays the compositor by
//! answering flushed requests with native events.

use std::collections::VecDeque;
use std::fmt;
use std::marker::PhantomData;
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use ny_core::{DataCallback, DataOffer, DataSource, DataType, DataTypes, DataValue};

use super::{Capabilities, LoopWaker, NativeConnection, NativeHandle};
use crate::context::WindowRequest;
use crate::error::{PlatformError, Result};
use crate::settings::{SurfaceType, WindowSettings};
use crate::surface::{BufferFormat, BufferSurface, GlSurface, Surface, VulkanSurface};

/// Answers requests the way a compositor would
pub trait Responder<E, H>: Send {
    /// Events announcing a newly created window
    fn created(&mut self, _window: H, _settings: &WindowSettings) -> Vec<E> {
        Vec::new()
    }

    /// Events resulting from a flushed request
    fn respond(&mut self, window: H, request: &WindowRequest) -> Vec<E>;
}

struct LoopbackState<E> {
    events: VecDeque<E>,
    woken: bool,
    disconnected: bool,
    log: Vec<(u64, WindowRequest)>,
}

struct LoopbackShared<E> {
    state: Mutex<LoopbackState<E>>,
    cond: Condvar,
}

impl<E> LoopbackShared<E> {
    fn lock(&self) -> MutexGuard<'_, LoopbackState<E>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Feeds a [`LoopbackConnection`] from any thread
pub struct LoopbackInjector<E> {
    shared: Arc<LoopbackShared<E>>,
}

impl<E> Clone for LoopbackInjector<E> {
    fn clone(&self) -> Self {
        Self {
            shared: self.shared.clone(),
        }
    }
}

impl<E> LoopbackInjector<E> {
    /// Queue a native event and wake the connection
    pub fn push(&self, event: E) {
        self.shared.lock().events.push_back(event);
        self.shared.cond.notify_all();
    }

    pub fn push_all(&self, events: impl IntoIterator<Item = E>) {
        self.shared.lock().events.extend(events);
        self.shared.cond.notify_all();
    }

    /// Simulate losing the display server
    pub fn disconnect(&self) {
        self.shared.lock().disconnected = true;
        self.shared.cond.notify_all();
    }

    /// Every request flushed so far, with the raw window id
    pub fn requests(&self) -> Vec<(u64, WindowRequest)> {
        self.shared.lock().log.clone()
    }

    pub fn pending(&self) -> usize {
        self.shared.lock().events.len()
    }
}

impl<E> fmt::Debug for LoopbackInjector<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoopbackInjector").finish_non_exhaustive()
    }
}

struct LoopbackWaker<E> {
    shared: Arc<LoopbackShared<E>>,
}

impl<E: Send> LoopWaker for LoopbackWaker<E> {
    fn wake(&self) {
        self.shared.lock().woken = true;
        self.shared.cond.notify_all();
    }
}

/// Clipboard offer reading straight from a local source
struct LocalOffer {
    source: Arc<dyn DataSource>,
}

impl DataOffer for LocalOffer {
    fn types(&self) -> DataTypes {
        self.source.types()
    }

    fn data(&self, ty: DataType, callback: DataCallback) {
        if self.source.types().contains(ty) {
            callback(self.source.data(ty));
        } else {
            callback(DataValue::Empty);
        }
    }
}

/// Native connection backed by an in-process queue
pub struct LoopbackConnection<E, H> {
    shared: Arc<LoopbackShared<E>>,
    capabilities: Capabilities,
    responder: Option<Box<dyn Responder<E, H>>>,
    outgoing: Vec<(H, WindowRequest)>,
    clipboard: Option<Arc<dyn DataSource>>,
    vulkan_extensions: Vec<&'static str>,
    next_window: u64,
    _handle: PhantomData<fn() -> H>,
}

impl<E, H> LoopbackConnection<E, H>
where
    E: Send + 'static,
    H: NativeHandle,
{
    /// Create a connection and the injector feeding it
    pub fn new(capabilities: Capabilities) -> (Self, LoopbackInjector<E>) {
        let shared = Arc::new(LoopbackShared {
            state: Mutex::new(LoopbackState {
                events: VecDeque::new(),
                woken: false,
                disconnected: false,
                log: Vec::new(),
            }),
            cond: Condvar::new(),
        });
        let injector = LoopbackInjector {
            shared: shared.clone(),
        };
        let connection = Self {
            shared,
            capabilities,
            responder: None,
            outgoing: Vec::new(),
            clipboard: None,
            vulkan_extensions: Vec::new(),
            next_window: 1,
            _handle: PhantomData,
        };
        (connection, injector)
    }

    pub fn with_responder(mut self, responder: impl Responder<E, H> + 'static) -> Self {
        self.responder = Some(Box::new(responder));
        self
    }

    pub fn with_vulkan_extensions(mut self, extensions: Vec<&'static str>) -> Self {
        self.vulkan_extensions = extensions;
        self
    }

    /// Window ids are handed out from `first` upwards
    pub fn with_first_window(mut self, first: u64) -> Self {
        self.next_window = first;
        self
    }

    fn queue(&self, events: Vec<E>) {
        if events.is_empty() {
            return;
        }
        self.shared.lock().events.extend(events);
        self.shared.cond.notify_all();
    }
}

impl<E, H> NativeConnection for LoopbackConnection<E, H>
where
    E: Send + 'static,
    H: NativeHandle,
{
    type Event = E;
    type Handle = H;

    fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    fn poll_event(&mut self) -> Result<Option<E>> {
        let mut state = self.shared.lock();
        match state.events.pop_front() {
            Some(event) => Ok(Some(event)),
            None if state.disconnected => Err(PlatformError::Disconnected(
                "loopback connection closed".to_string(),
            )),
            None => Ok(None),
        }
    }

    fn wait(&mut self, timeout: Option<Duration>) -> Result<()> {
        let mut state = self.shared.lock();
        while state.events.is_empty() && !state.woken && !state.disconnected {
            match timeout {
                Some(timeout) => {
                    let (guard, result) = self
                        .shared
                        .cond
                        .wait_timeout(state, timeout)
                        .unwrap_or_else(PoisonError::into_inner);
                    state = guard;
                    if result.timed_out() {
                        break;
                    }
                }
                None => {
                    state = self
                        .shared
                        .cond
                        .wait(state)
                        .unwrap_or_else(PoisonError::into_inner);
                }
            }
        }
        state.woken = false;
        Ok(())
    }

    fn waker(&self) -> Arc<dyn LoopWaker> {
        Arc::new(LoopbackWaker {
            shared: self.shared.clone(),
        })
    }

    fn create_window(&mut self, settings: &WindowSettings) -> Result<H> {
        let window = H::from_raw(self.next_window);
        self.next_window += 1;
        if let Some(responder) = self.responder.as_mut() {
            let events = responder.created(window, settings);
            self.queue(events);
        }
        Ok(window)
    }

    fn create_surface(&mut self, window: H, settings: &WindowSettings) -> Result<Surface> {
        let raw = window.to_raw();
        let surface = match settings.surface {
            SurfaceType::None => Surface::None,
            SurfaceType::Buffer => Surface::Buffer(BufferSurface {
                format: BufferFormat::default(),
                size: settings.size,
            }),
            SurfaceType::Gl => Surface::Gl(GlSurface {
                config: settings.gl.config.unwrap_or(1),
                native_window: raw,
            }),
            SurfaceType::Vulkan => {
                let instance = settings.vulkan.instance.ok_or_else(|| {
                    PlatformError::WindowCreation("missing vulkan instance".to_string())
                })?;
                Surface::Vulkan(VulkanSurface {
                    instance,
                    surface: raw,
                })
            }
        };
        Ok(surface)
    }

    fn destroy_window(&mut self, window: H) {
        self.outgoing.push((window, WindowRequest::Destroy));
    }

    fn request(&mut self, window: H, request: &WindowRequest) {
        self.outgoing.push((window, request.clone()));
    }

    fn flush(&mut self) -> Result<()> {
        if self.outgoing.is_empty() {
            return Ok(());
        }
        if self.shared.lock().disconnected {
            return Err(PlatformError::Disconnected(
                "loopback connection closed".to_string(),
            ));
        }

        let outgoing = std::mem::take(&mut self.outgoing);
        let mut responses = Vec::new();
        if let Some(responder) = self.responder.as_mut() {
            for (window, request) in &outgoing {
                responses.extend(responder.respond(*window, request));
            }
        }

        self.shared.lock().log.extend(
            outgoing
                .into_iter()
                .map(|(window, request)| (window.to_raw(), request)),
        );
        self.queue(responses);
        Ok(())
    }

    fn set_clipboard(&mut self, source: Box<dyn DataSource>) -> bool {
        self.clipboard = Some(Arc::from(source));
        true
    }

    fn clipboard(&mut self) -> Option<Arc<dyn DataOffer>> {
        self.clipboard
            .clone()
            .map(|source| Arc::new(LocalOffer { source }) as Arc<dyn DataOffer>)
    }

    fn vulkan_extensions(&self) -> Vec<&'static str> {
        self.vulkan_extensions.clone()
    }
}

impl<E, H> fmt::Debug for LoopbackConnection<E, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoopbackConnection")
            .field("capabilities", &self.capabilities)
            .field("next_window", &self.next_window)
            .finish_non_exhaustive()
    }
}
