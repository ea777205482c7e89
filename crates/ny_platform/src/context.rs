//! App and window context abstractions
//!
//! Every backend provides one [`AppContext`] per connection and one
//! [`WindowContext`] per window. Geometry and state setters are requests: the
//! backend (or the compositor behind it) may clamp, defer or refuse them, and
//! the outcome is reported later through events, not return values.

use std::sync::Arc;

use ny_core::{
    DataOffer, DataSource, DataTypes, HandlerRef, KeyboardModifiers, Keycode, LoopControl,
    MouseButton, ThreadedEventDispatcher, ToplevelState,
};

use crate::cursor::Cursor;
use crate::error::Result;
use crate::settings::WindowSettings;
use crate::surface::Surface;

/// Keyboard state as seen through delivered events
pub trait KeyboardContext {
    fn pressed(&self, key: Keycode) -> bool;
    fn modifiers(&self) -> KeyboardModifiers;
    /// Native handle of the window with keyboard focus
    fn focus(&self) -> Option<u64>;
}

/// Pointer state as seen through delivered events
pub trait MouseContext {
    /// Last known position, relative to the window under the pointer
    fn position(&self) -> (i32, i32);
    fn pressed(&self, button: MouseButton) -> bool;
    /// Native handle of the window under the pointer
    fn over(&self) -> Option<u64>;
}

/// Per-backend connection to the windowing system
pub trait AppContext {
    /// Name of the backend driving this context
    fn backend_name(&self) -> &'static str;

    /// `None` on backends without keyboard input
    fn keyboard_context(&self) -> Option<&dyn KeyboardContext>;

    /// `None` on backends without pointer input
    fn mouse_context(&self) -> Option<&dyn MouseContext>;

    /// Create a window. Must be called on the thread owning this context.
    ///
    /// Fails without affecting the context if the requested surface is not
    /// supported by this backend.
    fn create_window_context(&mut self, settings: WindowSettings) -> Result<Box<dyn WindowContext>>;

    /// Handler for events not tied to a window (e.g. selection changes)
    fn set_event_handler(&mut self, handler: Option<HandlerRef>);

    /// Deliver pending native events without blocking.
    /// Returns false once the native connection is lost.
    fn dispatch_events(&mut self) -> bool;

    /// Deliver native events until `control` is stopped.
    /// Returns false if the loop ended because the connection was lost.
    fn dispatch_loop(&mut self, control: &LoopControl) -> bool;

    /// Like [`dispatch_loop`](Self::dispatch_loop), also draining `dispatcher`.
    /// Events queued from other threads wake the native wait.
    fn threaded_dispatch_loop(
        &mut self,
        dispatcher: &ThreadedEventDispatcher,
        control: &LoopControl,
    ) -> bool;

    /// Take ownership of the system clipboard
    fn set_clipboard(&mut self, source: Box<dyn DataSource>) -> bool;

    /// Current clipboard contents, if any
    fn clipboard(&mut self) -> Option<Arc<dyn DataOffer>>;

    /// Vulkan instance extensions required to create surfaces on this backend
    fn vulkan_extensions(&self) -> Vec<&'static str>;
}

/// Asynchronous window requests forwarded to the native connection
#[derive(Clone, Debug, PartialEq)]
pub enum WindowRequest {
    Show,
    Hide,
    Refresh,
    Size((u32, u32)),
    Position((i32, i32)),
    MinSize((u32, u32)),
    MaxSize((u32, u32)),
    State(ToplevelState),
    Title(String),
    Cursor(Cursor),
    Droppable(DataTypes),
    Destroy,
}

/// Per-window backend object
pub trait WindowContext: Send {
    /// Native window id, as reported by input contexts
    fn native_handle(&self) -> u64;

    /// Queue a request for the native window
    fn request(&self, request: WindowRequest);

    /// Replace the event handler; `None` detaches it
    fn set_event_handler(&self, handler: Option<HandlerRef>);

    /// Rendering surface chosen at creation
    fn surface(&self) -> Surface;

    /// Schedule a `Refresh` event for this window
    fn refresh(&self) {
        self.request(WindowRequest::Refresh);
    }

    fn show(&self) {
        self.request(WindowRequest::Show);
    }

    fn hide(&self) {
        self.request(WindowRequest::Hide);
    }

    fn set_size(&self, size: (u32, u32)) {
        self.request(WindowRequest::Size(size));
    }

    fn set_position(&self, position: (i32, i32)) {
        self.request(WindowRequest::Position(position));
    }

    fn set_min_size(&self, size: (u32, u32)) {
        self.request(WindowRequest::MinSize(size));
    }

    fn set_max_size(&self, size: (u32, u32)) {
        self.request(WindowRequest::MaxSize(size));
    }

    fn maximize(&self) {
        self.request(WindowRequest::State(ToplevelState::Maximized));
    }

    fn minimize(&self) {
        self.request(WindowRequest::State(ToplevelState::Minimized));
    }

    fn fullscreen(&self) {
        self.request(WindowRequest::State(ToplevelState::Fullscreen));
    }

    fn normal_state(&self) {
        self.request(WindowRequest::State(ToplevelState::Normal));
    }

    fn set_title(&self, title: &str) {
        self.request(WindowRequest::Title(title.to_string()));
    }

    fn set_cursor(&self, cursor: Cursor) {
        self.request(WindowRequest::Cursor(cursor));
    }

    /// Declare which data types this window accepts from drag and drop
    fn droppable(&self, types: DataTypes) {
        self.request(WindowRequest::Droppable(types));
    }
}
