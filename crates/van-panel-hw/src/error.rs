//! Error types for the Van Panel hardware library.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur when driving relay outputs.
#[derive(Error, Debug)]
pub enum Error {
    /// Pin was never initialized by this driver.
    #[error("Unknown relay pin: {0}")]
    UnknownPin(u8),

    /// Requested backend is not compiled into this build.
    #[error("Relay backend '{0}' is not available in this build")]
    BackendUnavailable(String),

    /// Invalid backend name.
    #[error("Invalid relay backend: {0}")]
    InvalidBackend(String),

    /// GPIO access error (pin in use, permission denied, unsupported board).
    #[cfg(feature = "rpi")]
    #[error("GPIO error: {0}")]
    Gpio(#[from] rppal::gpio::Error),
}
