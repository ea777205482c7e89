//! ny Windows Platform
//!
//! Translation of window messages into ny events, with the virtual key,
//! `ToUnicode` decoding and stock cursor tables. The message pump itself is
//! provided at registration through [`backend`].

pub mod backend;
pub mod cursor;
pub mod event;
pub mod keymap;
pub mod translate;

pub use backend::{backend, WinapiBackend, WinapiConnection};
pub use event::{Hwnd, Msg, WinEvent};
pub use keymap::{KeyboardLayout, UsLayout};
pub use translate::WinapiTranslator;
