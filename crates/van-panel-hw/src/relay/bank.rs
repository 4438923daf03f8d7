//! Scoped ownership of the relay outputs.

use super::{Level, RelayDriver};
use crate::Result;
use std::collections::BTreeSet;
use tracing::{info, warn};

/// Owns a [`RelayDriver`] and the pins it claimed.
///
/// Claiming initializes every pin LOW. The outputs are released exactly once,
/// either by an explicit [`RelayBank::release`] or when the bank is dropped.
pub struct RelayBank {
    driver: Box<dyn RelayDriver>,
    pins: BTreeSet<u8>,
    released: bool,
}

impl RelayBank {
    /// Initializes `pins` on `driver` and takes ownership of both.
    pub fn claim(
        mut driver: Box<dyn RelayDriver>,
        pins: impl IntoIterator<Item = u8>,
    ) -> Result<Self> {
        let pins: BTreeSet<u8> = pins.into_iter().collect();
        let list: Vec<u8> = pins.iter().copied().collect();
        driver.initialize(&list)?;
        info!("Claimed {} relay outputs via {}", list.len(), driver.name());

        Ok(Self {
            driver,
            pins,
            released: false,
        })
    }

    /// Writes a relay. Failures are logged and reported as `false`.
    pub fn set_state(&mut self, pin: u8, on: bool) -> bool {
        if self.released {
            warn!("Relay {} not written: outputs already released", pin);
            return false;
        }
        match self.driver.set_state(pin, on) {
            Ok(()) => true,
            Err(e) => {
                warn!("Relay {} write failed: {}", pin, e);
                false
            }
        }
    }

    /// Current level of a claimed pin.
    pub fn level(&self, pin: u8) -> Option<Level> {
        self.driver.level(pin)
    }

    /// Claimed pins in ascending order.
    pub fn pins(&self) -> impl Iterator<Item = u8> + '_ {
        self.pins.iter().copied()
    }

    /// Backend name of the underlying driver.
    pub fn backend(&self) -> &'static str {
        self.driver.name()
    }

    /// Returns true once the outputs have been released.
    pub fn is_released(&self) -> bool {
        self.released
    }

    /// Drives every pin LOW and releases the hardware. Runs at most once.
    pub fn release(&mut self) {
        if self.released {
            return;
        }
        self.released = true;
        if let Err(e) = self.driver.shutdown() {
            warn!("Relay shutdown failed: {}", e);
        }
    }
}

impl Drop for RelayBank {
    fn drop(&mut self) {
        self.release();
    }
}
