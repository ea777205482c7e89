//! Platform error types

use ny_core::CoreError;
use thiserror::Error;

/// Platform-related errors
#[derive(Error, Debug)]
pub enum PlatformError {
    /// Failed to initialize a backend (e.g. could not open the display)
    #[error("Platform initialization failed: {0}")]
    InitFailed(String),

    /// No registered backend can run in this environment
    #[error("No usable backend found")]
    NoBackend,

    /// Backend not available
    #[error("Backend not available: {0}")]
    Unavailable(String),

    /// Requested configuration not supported by this backend
    #[error("Not supported: {0}")]
    Unsupported(String),

    /// Failed to create window
    #[error("Failed to create window: {0}")]
    WindowCreation(String),

    /// Called from a thread other than the one owning the app context
    #[error("{0} must be called on the thread owning the app context")]
    WrongThread(&'static str),

    /// The native connection was lost
    #[error("Native connection lost: {0}")]
    Disconnected(String),

    /// Invalid configuration file or value
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Error from the dispatch core
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Generic platform error
    #[error("Platform error: {0}")]
    Other(String),
}

/// Result type for platform operations
pub type Result<T> = std::result::Result<T, PlatformError>;
