//! Core error types

use thiserror::Error;

use crate::event::EventType;

/// Errors raised by the dispatch core
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// A loop is already attached to this `LoopControl`
    #[error("a dispatch loop is already attached to this loop control")]
    LoopAttached,

    /// The call would block the thread that has to make progress for it to return
    #[error("dispatch_sync called from the thread running the dispatch loop")]
    WouldDeadlock,

    /// The other side went away before the operation completed
    #[error("dispatcher disconnected before the event was delivered")]
    Disconnected,

    /// Custom event ids must live in the backend-private range
    #[error("event type {0} is outside the custom event range")]
    InvalidEventType(EventType),
}

/// Result type for core operations
pub type Result<T> = std::result::Result<T, CoreError>;
