//! ny Core Runtime
//!
//! The backend-independent half of ny's windowing layer:
//!
//! - **Events**: a closed [`EventKind`] vocabulary with stable type ids,
//!   weak handler targets and cloneable backend payloads
//! - **Handlers**: the [`EventHandler`] capability every event receiver implements
//! - **Dispatch**: immediate delivery with [`EventDispatcher`] and cross-thread
//!   queued delivery with [`ThreadedEventDispatcher`]
//! - **Loop control**: [`LoopControl`], the cancellation token of a running loop
//!
//! # Example
//!
//! ```rust
//! use std::sync::atomic::{AtomicBool, Ordering};
//! use std::sync::Arc;
//!
//! use ny_core::{Dispatcher, Event, EventHandler, EventKind, ThreadedEventDispatcher};
//!
//! #[derive(Default)]
//! struct Window {
//!     closed: AtomicBool,
//! }
//!
//! impl EventHandler for Window {
//!     fn handle_event(&self, event: &Event) -> bool {
//!         if let EventKind::Close = event.kind {
//!             self.closed.store(true, Ordering::SeqCst);
//!             return true;
//!         }
//!         false
//!     }
//! }
//!
//! let window = Arc::new(Window::default());
//! let dispatcher = ThreadedEventDispatcher::new();
//! dispatcher.dispatch(Event::new(EventKind::Close).to(&window));
//! dispatcher.process_events();
//! assert!(window.closed.load(Ordering::SeqCst));
//! ```

pub mod data;
pub mod dispatcher;
pub mod error;
pub mod event;
pub mod handler;
pub mod keys;
pub mod loop_control;
pub mod threaded;

pub use data::{DataCallback, DataOffer, DataSource, DataType, DataTypes, DataValue, ImageData};
pub use dispatcher::{CallbackId, Dispatcher, EventCallback, EventDispatcher};
pub use error::{CoreError, Result};
pub use event::{event_types, CustomEvent, Event, EventData, EventKind, EventType};
pub use handler::{handler_ref, same_handler, EventHandler, FnHandler, HandlerRef};
pub use keys::{KeyboardModifiers, Keycode, MouseButton, ToplevelState};
pub use loop_control::{LoopControl, LoopGuard, LoopInterface, LoopThunk};
pub use threaded::{Completion, LoopThreadBinding, ThreadedEventDispatcher, WakeHook};
