//! ny Android Platform
//!
//! Translation of NDK input events and native app glue commands into ny
//! events. Lifecycle commands without a portable counterpart become
//! [`LIFECYCLE`] custom events for the app handler. [`AndroidInputBridge`]
//! serves the UI thread paths that need an answer before returning.

pub mod backend;
pub mod bridge;
pub mod event;
pub mod keymap;
pub mod translate;

pub use backend::{backend, AndroidBackend};
pub use bridge::AndroidInputBridge;
pub use event::{AndroidEvent, AppCommand, NativeKey, Pointer, WindowId};
pub use translate::{lifecycle_event, AndroidTranslator, Lifecycle, LIFECYCLE};
