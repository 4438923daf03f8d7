//! Relay output module.
//!
//! Every relay sits behind the [`RelayDriver`] capability so the panel never
//! touches GPIO directly. [`RelayBank`] owns a driver for the lifetime of the
//! process and guarantees the outputs are released exactly once.

mod bank;
#[cfg(feature = "rpi")]
mod gpio;
mod simulated;

pub use bank::RelayBank;
#[cfg(feature = "rpi")]
pub use gpio::GpioRelays;
pub use simulated::{RelayProbe, SimulatedRelays};

use crate::{Error, Result};
use std::str::FromStr;

/// Digital output level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Level {
    #[default]
    Low,
    High,
}

impl Level {
    /// Level that switches a relay on or off.
    pub fn from_on(on: bool) -> Self {
        if on {
            Level::High
        } else {
            Level::Low
        }
    }

    pub fn is_high(&self) -> bool {
        *self == Level::High
    }
}

impl std::fmt::Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Level::Low => write!(f, "LOW"),
            Level::High => write!(f, "HIGH"),
        }
    }
}

/// Capability interface over a set of digital relay outputs.
pub trait RelayDriver: Send {
    /// Short backend name for logging.
    fn name(&self) -> &'static str;

    /// Configures each pin as an output and drives it LOW.
    ///
    /// Calling this again re-drives already claimed pins LOW.
    fn initialize(&mut self, pins: &[u8]) -> Result<()>;

    /// Drives the pin HIGH when `on`, LOW otherwise.
    fn set_state(&mut self, pin: u8, on: bool) -> Result<()>;

    /// Drives every known pin LOW and releases the underlying hardware.
    fn shutdown(&mut self) -> Result<()>;

    /// Last level written to the pin, `None` if the pin is unknown.
    fn level(&self, pin: u8) -> Option<Level>;
}

/// Relay backend selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RelayBackend {
    /// GPIO when built with the `rpi` feature, simulated otherwise.
    #[default]
    Auto,
    /// Raspberry Pi GPIO header.
    Gpio,
    /// Logging no-op backend for desktop builds and tests.
    Simulated,
}

impl RelayBackend {
    /// Resolves `Auto` to the concrete backend for this build.
    pub fn resolve(self) -> Self {
        match self {
            RelayBackend::Auto if cfg!(feature = "rpi") => RelayBackend::Gpio,
            RelayBackend::Auto => RelayBackend::Simulated,
            other => other,
        }
    }
}

impl FromStr for RelayBackend {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "auto" => Ok(RelayBackend::Auto),
            "gpio" | "rpi" => Ok(RelayBackend::Gpio),
            "simulated" | "mock" => Ok(RelayBackend::Simulated),
            _ => Err(Error::InvalidBackend(s.to_string())),
        }
    }
}

impl std::fmt::Display for RelayBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RelayBackend::Auto => write!(f, "auto"),
            RelayBackend::Gpio => write!(f, "gpio"),
            RelayBackend::Simulated => write!(f, "simulated"),
        }
    }
}

/// Opens a driver for the requested backend.
pub fn open_driver(backend: RelayBackend) -> Result<Box<dyn RelayDriver>> {
    match backend.resolve() {
        #[cfg(feature = "rpi")]
        RelayBackend::Gpio => Ok(Box::new(GpioRelays::new())),
        #[cfg(not(feature = "rpi"))]
        RelayBackend::Gpio => Err(Error::BackendUnavailable("gpio".to_string())),
        _ => Ok(Box::new(SimulatedRelays::new())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_from_on() {
        assert_eq!(Level::from_on(true), Level::High);
        assert_eq!(Level::from_on(false), Level::Low);
        assert!(Level::High.is_high());
        assert!(!Level::default().is_high());
    }

    #[test]
    fn test_backend_from_str() {
        assert_eq!("auto".parse::<RelayBackend>().unwrap(), RelayBackend::Auto);
        assert_eq!("GPIO".parse::<RelayBackend>().unwrap(), RelayBackend::Gpio);
        assert_eq!(
            "simulated".parse::<RelayBackend>().unwrap(),
            RelayBackend::Simulated
        );
        assert!("serial".parse::<RelayBackend>().is_err());
    }

    #[test]
    fn test_backend_resolve() {
        assert_eq!(RelayBackend::Simulated.resolve(), RelayBackend::Simulated);
        assert_eq!(RelayBackend::Gpio.resolve(), RelayBackend::Gpio);
        #[cfg(not(feature = "rpi"))]
        assert_eq!(RelayBackend::Auto.resolve(), RelayBackend::Simulated);
    }

    #[test]
    #[cfg(not(feature = "rpi"))]
    fn test_gpio_unavailable_without_feature() {
        let err = open_driver(RelayBackend::Gpio).err().unwrap();
        assert!(matches!(err, Error::BackendUnavailable(_)));
    }

    #[test]
    fn test_open_simulated() {
        let driver = open_driver(RelayBackend::Simulated).unwrap();
        assert_eq!(driver.name(), "simulated");
    }
}
