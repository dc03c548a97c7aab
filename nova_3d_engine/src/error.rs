//! Error types for the Nova3D engine
//!
//! This module defines the error types used throughout the engine,
//! including device object creation, configuration, and resource management.
//!
//! Two failure classes exist:
//! - configuration errors (unknown primitive/blend kind, failed GPU object
//!   creation, failed shader link) are returned as `Err` and abort the frame
//! - lenient operations (uniform updates on unknown names, curve sampling
//!   out of range) never produce an error at all

use std::fmt;

/// Result type for Nova3D engine operations
pub type Result<T> = std::result::Result<T, Error>;

/// Nova3D engine errors
#[derive(Debug, Clone)]
pub enum Error {
    /// Backend-specific error (device object creation, shader link, etc.)
    BackendError(String),

    /// Out of GPU memory
    OutOfMemory,

    /// Invalid resource (texture, buffer, program, etc.)
    InvalidResource(String),

    /// Initialization failed (engine, device, subsystems)
    InitializationFailed(String),

    /// Programming/configuration error (unknown primitive kind, unknown
    /// blend kind, invalid engine configuration)
    InvalidConfiguration(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::BackendError(msg) => write!(f, "Backend error: {}", msg),
            Error::OutOfMemory => write!(f, "Out of GPU memory"),
            Error::InvalidResource(msg) => write!(f, "Invalid resource: {}", msg),
            Error::InitializationFailed(msg) => write!(f, "Initialization failed: {}", msg),
            Error::InvalidConfiguration(msg) => write!(f, "Invalid configuration: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

// ===== ERROR MACROS =====

/// Log an ERROR and build an `Error` value (does not return)
///
/// The default variant is `Error::BackendError`. A specific variant can be
/// selected with `Variant => "format", args...`.
///
/// # Example
///
/// ```ignore
/// let slot = map.get(name)
///     .ok_or_else(|| engine_err!("nova3d::Material", "Unknown slot '{}'", name))?;
/// ```
#[macro_export]
macro_rules! engine_err {
    ($source:expr, $variant:ident => $($arg:tt)*) => {{
        let message = format!($($arg)*);
        $crate::engine_error!($source, "{}", message);
        $crate::nova3d::Error::$variant(message)
    }};
    ($source:expr, $($arg:tt)*) => {{
        let message = format!($($arg)*);
        $crate::engine_error!($source, "{}", message);
        $crate::nova3d::Error::BackendError(message)
    }};
}

/// Log an ERROR and return early with an `Err`
///
/// # Example
///
/// ```ignore
/// if width == 0 {
///     engine_bail!("nova3d::RenderTarget", InvalidConfiguration => "Width must be > 0");
/// }
/// ```
#[macro_export]
macro_rules! engine_bail {
    ($($arg:tt)*) => {
        return Err($crate::engine_err!($($arg)*))
    };
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
