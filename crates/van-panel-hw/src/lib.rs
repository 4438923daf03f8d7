//! Van Panel Hardware Library
//!
//! Provides the relay driver abstraction used by the van accessory panel.
//! Relays are driven either through the Raspberry Pi GPIO header (feature
//! `rpi`) or through a simulated backend that only logs and records levels.

pub mod error;
pub mod relay;

pub use error::{Error, Result};
pub use relay::{
    open_driver, Level, RelayBackend, RelayBank, RelayDriver, RelayProbe, SimulatedRelays,
};

#[cfg(feature = "rpi")]
pub use relay::GpioRelays;
