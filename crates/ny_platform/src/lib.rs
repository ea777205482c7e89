//! ny Platform Abstraction Layer
//!
//! Everything a windowing backend plugs into:
//!
//! - [`AppContext`] / [`WindowContext`]: the per-connection and per-window
//!   capability surface, plus [`KeyboardContext`] and [`MouseContext`]
//! - [`WindowSettings`] and [`PlatformConfig`], loadable from TOML
//! - [`BackendRegistry`]: explicit backend registration and `NY_BACKEND` selection
//! - [`native`]: the generic app context binding a native connection and an
//!   event translator to the dispatch core
//!
//! Backends live in extension crates (`ny_platform_x11`, `ny_platform_wayland`,
//! `ny_platform_winapi`, `ny_platform_android`). The `headless` backend ships here.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use ny_core::{Event, EventKind, FnHandler, handler_ref};
//! use ny_platform::{headless, AppContext, WindowSettings};
//!
//! let (mut app, _injector) = headless::connect();
//! let handler = Arc::new(FnHandler(|event: &Event| matches!(event.kind, EventKind::Size { .. })));
//! let window = app
//!     .create_window_context(WindowSettings::default().with_handler(handler_ref(&handler)))
//!     .unwrap();
//! window.set_size((640, 480));
//! assert!(app.dispatch_events());
//! ```

pub mod backend;
pub mod context;
pub mod cursor;
pub mod error;
#[cfg(feature = "headless")]
pub mod headless;
pub mod input;
pub mod native;
pub mod settings;
pub mod surface;

pub use backend::{Backend, BackendRegistry, NativeBackend, BACKEND_ENV};
pub use context::{AppContext, KeyboardContext, MouseContext, WindowContext, WindowRequest};
pub use cursor::Cursor;
pub use error::{PlatformError, Result};
pub use input::{KeyboardState, MouseState};
pub use native::{
    Capabilities, LoopWaker, LoopbackConnection, LoopbackInjector, NativeAppContext,
    NativeConnection, NativeHandle, NativeWindowContext, Responder, Translated, Translator,
};
pub use settings::{GlSettings, PlatformConfig, SurfaceType, VulkanSettings, WindowSettings};
pub use surface::{BufferFormat, BufferSurface, GlSurface, Surface, VulkanSurface};

/// Registry holding every backend compiled into this crate
pub fn default_registry() -> BackendRegistry {
    #[allow(unused_mut)]
    let mut registry = BackendRegistry::new();
    #[cfg(feature = "headless")]
    registry.register(headless::backend());
    registry
}
