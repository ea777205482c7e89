//! ny X11 Platform
//!
//! Translation of X11 (xcb) events into ny events, plus the keycode, button
//! and cursor tables the X11 connection needs. The connection itself is
//! provided at registration through [`backend`].

pub mod backend;
pub mod cursor;
pub mod event;
pub mod keymap;
pub mod translate;

pub use backend::{backend, X11Backend, X11Connection};
pub use event::{X11Atoms, X11Event, XWindow};
pub use translate::X11Translator;
