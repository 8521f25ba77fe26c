//! Error types for the Galaxy3D camera crate
//!
//! Camera setters and factories reject invalid parameters with a `Result`
//! instead of panicking, so a bad value coming from UI or scripting never
//! corrupts the matrix cache on the per-frame path.

use std::fmt;

/// Result type for Galaxy3D camera operations
pub type Result<T> = std::result::Result<T, Error>;

/// Galaxy3D camera errors
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// A camera or engine parameter is outside its valid domain
    /// (aspect ratio <= 0, near >= far, field of view outside (0, 180), ...)
    InvalidParameter(String),

    /// Engine singleton used before `Engine::initialize()`
    InitializationFailed(String),

    /// A global engine lock was poisoned by a panicking thread
    LockPoisoned(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidParameter(msg) => write!(f, "Invalid parameter: {}", msg),
            Error::InitializationFailed(msg) => write!(f, "Initialization failed: {}", msg),
            Error::LockPoisoned(msg) => write!(f, "Lock poisoned: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
