//! Native connection plumbing shared by every backend
//!
//! A backend is split in two halves:
//!
//! - a [`NativeConnection`] that talks to the windowing system (reads native
//!   events, creates windows, forwards requests, blocks until woken)
//! - a [`Translator`] that turns native events into portable [`EventKind`]s
//!   using the backend's own lookup tables
//!
//! [`NativeAppContext`] binds the two to the dispatch core and implements
//! [`AppContext`](crate::context::AppContext) once for all backends.

mod app;
pub mod loopback;
mod window;

use std::fmt::Debug;
use std::hash::Hash;
use std::sync::Arc;
use std::time::Duration;

use ny_core::{DataOffer, DataSource, EventData, EventKind};

use crate::context::WindowRequest;
use crate::error::Result;
use crate::settings::{SurfaceType, WindowSettings};
use crate::surface::Surface;

pub use app::NativeAppContext;
pub use loopback::{LoopbackConnection, LoopbackInjector, Responder};
pub use window::NativeWindowContext;

/// Native window id (`xcb_window_t`, `HWND`, `wl_surface` id, ...)
pub trait NativeHandle: Copy + Eq + Hash + Debug + Send + Sync + 'static {
    fn to_raw(self) -> u64;
    fn from_raw(raw: u64) -> Self;
}

impl NativeHandle for u32 {
    fn to_raw(self) -> u64 {
        u64::from(self)
    }

    fn from_raw(raw: u64) -> Self {
        raw as u32
    }
}

impl NativeHandle for u64 {
    fn to_raw(self) -> u64 {
        self
    }

    fn from_raw(raw: u64) -> Self {
        raw
    }
}

/// Wakes a connection blocked in [`NativeConnection::wait`] from any thread
///
/// Wakes are sticky: a wake issued while nobody waits makes the next wait
/// return immediately.
pub trait LoopWaker: Send + Sync {
    fn wake(&self);
}

/// What a native connection can do
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Capabilities {
    pub keyboard: bool,
    pub mouse: bool,
    pub buffer: bool,
    pub gl: bool,
    pub vulkan: bool,
}

impl Capabilities {
    pub fn supports(&self, surface: SurfaceType) -> bool {
        match surface {
            SurfaceType::None => true,
            SurfaceType::Buffer => self.buffer,
            SurfaceType::Gl => self.gl,
            SurfaceType::Vulkan => self.vulkan,
        }
    }
}

/// A connection to the windowing system
pub trait NativeConnection {
    /// Native event as read from the connection
    type Event;
    type Handle: NativeHandle;

    fn capabilities(&self) -> Capabilities;

    /// Next pending native event without blocking.
    /// Fails with [`PlatformError::Disconnected`](crate::PlatformError::Disconnected)
    /// once the connection is gone.
    fn poll_event(&mut self) -> Result<Option<Self::Event>>;

    /// Block until a native event is pending, the waker fired or `timeout` passed
    fn wait(&mut self, timeout: Option<Duration>) -> Result<()>;

    fn waker(&self) -> Arc<dyn LoopWaker>;

    fn create_window(&mut self, settings: &WindowSettings) -> Result<Self::Handle>;

    /// Create the surface `settings.surface` asks for.
    /// Only called for surface types the capabilities allow.
    fn create_surface(&mut self, window: Self::Handle, settings: &WindowSettings)
        -> Result<Surface>;

    fn destroy_window(&mut self, window: Self::Handle);

    /// Buffer a request; sent on the next [`flush`](Self::flush)
    fn request(&mut self, window: Self::Handle, request: &WindowRequest);

    fn flush(&mut self) -> Result<()>;

    fn set_clipboard(&mut self, source: Box<dyn DataSource>) -> bool;

    fn clipboard(&mut self) -> Option<Arc<dyn DataOffer>>;

    fn vulkan_extensions(&self) -> Vec<&'static str>;
}

/// A portable event decoded from a native one
#[derive(Debug)]
pub struct Translated<H> {
    /// Target window, `None` for app-level events
    pub window: Option<H>,
    pub kind: EventKind,
    /// Backend payload attached to the event
    pub data: Option<Box<dyn EventData>>,
}

impl<H> Translated<H> {
    pub fn window(window: H, kind: EventKind) -> Self {
        Self {
            window: Some(window),
            kind,
            data: None,
        }
    }

    pub fn global(kind: EventKind) -> Self {
        Self {
            window: None,
            kind,
            data: None,
        }
    }

    pub fn with_data<D: EventData>(mut self, data: D) -> Self {
        self.data = Some(Box::new(data));
        self
    }
}

/// Decodes native events into portable ones
///
/// One native event may produce zero or more portable events (an X11
/// `ConfigureNotify` is both a move and a resize).
pub trait Translator {
    type Event;
    type Handle: NativeHandle;

    fn translate(&mut self, event: Self::Event, out: &mut Vec<Translated<Self::Handle>>);

    /// A window was created with `settings`
    fn register(&mut self, _window: Self::Handle, _settings: &WindowSettings) {}

    /// A window was destroyed; drop any per-window state
    fn forget(&mut self, _window: Self::Handle) {}
}
