//! Error types for the AGL layer
//!
//! This module defines the error types used throughout the abstract graphics
//! layer and its backends: configuration, surface setup, and resource creation.

use std::fmt;

/// Result type for AGL operations
pub type Result<T> = std::result::Result<T, Error>;

/// AGL errors
#[derive(Debug, Clone)]
pub enum Error {
    /// Backend-specific error (software rasterizer, fixed-function GL, ...)
    BackendError(String),

    /// Backend could not allocate a texture, list or buffer
    OutOfMemory,

    /// Invalid resource (bad pixel buffer, degenerate sector, foreign handle, ...)
    InvalidResource(String),

    /// Initialization failed (unknown backend, unsupported format, manager not set up)
    InitializationFailed(String),

    /// The display-surface collaborator could not provide the requested screen
    SurfaceUnavailable(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::BackendError(msg) => write!(f, "Backend error: {}", msg),
            Error::OutOfMemory => write!(f, "Out of graphics memory"),
            Error::InvalidResource(msg) => write!(f, "Invalid resource: {}", msg),
            Error::InitializationFailed(msg) => write!(f, "Initialization failed: {}", msg),
            Error::SurfaceUnavailable(msg) => write!(f, "Display surface unavailable: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

/// Log an ERROR message and return `Err(Error::BackendError(..))` from the current function
///
/// # Example
///
/// ```ignore
/// if layer >= count {
///     agl_bail!("agl::opengl::Texture", "layer {} out of range", layer);
/// }
/// ```
#[macro_export]
macro_rules! agl_bail {
    ($source:expr, $($arg:tt)*) => {{
        let message = format!($($arg)*);
        $crate::agl_error!($source, "{}", message);
        return Err($crate::agl::Error::BackendError(message));
    }};
}

/// Log an ERROR message and build the matching `Error::BackendError` value
///
/// Meant for `ok_or_else` / `map_err` chains.
#[macro_export]
macro_rules! agl_err {
    ($source:expr, $($arg:tt)*) => {{
        let message = format!($($arg)*);
        $crate::agl_error!($source, "{}", message);
        $crate::agl::Error::BackendError(message)
    }};
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
