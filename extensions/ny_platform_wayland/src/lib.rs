//! ny Wayland Platform
//!
//! Translation of Wayland listener callbacks into ny events: pointer and
//! keyboard focus tracking, scroll frames, xdg configure handling, plus the
//! button and cursor theme tables. The connection is provided at
//! registration through [`backend`].

pub mod backend;
pub mod cursor;
pub mod event;
pub mod keymap;
pub mod translate;

pub use backend::{backend, WaylandBackend};
pub use event::{Axis, SurfaceId, WaylandEvent, XdgState};
pub use translate::WaylandTranslator;
