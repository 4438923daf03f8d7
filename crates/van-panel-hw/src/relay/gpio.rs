//! Relay outputs on the Raspberry Pi GPIO header via rppal.

use super::{Level, RelayDriver};
use crate::{Error, Result};
use rppal::gpio::{Gpio, OutputPin};
use std::collections::BTreeMap;
use tracing::{debug, info};

/// GPIO-backed relay driver.
///
/// Pin numbers are BCM numbers. Outputs reset to their original mode when
/// released.
#[derive(Default)]
pub struct GpioRelays {
    gpio: Option<Gpio>,
    outputs: BTreeMap<u8, OutputPin>,
}

impl GpioRelays {
    /// Creates a driver. The GPIO peripheral is opened on `initialize`.
    pub fn new() -> Self {
        Self::default()
    }
}

impl RelayDriver for GpioRelays {
    fn name(&self) -> &'static str {
        "gpio"
    }

    fn initialize(&mut self, pins: &[u8]) -> Result<()> {
        let gpio = match self.gpio.take() {
            Some(gpio) => gpio,
            None => Gpio::new()?,
        };

        for &pin in pins {
            if let Some(output) = self.outputs.get_mut(&pin) {
                output.set_low();
                continue;
            }
            let mut output = gpio.get(pin)?.into_output_low();
            output.set_reset_on_drop(true);
            self.outputs.insert(pin, output);
            debug!("Claimed GPIO {} as relay output", pin);
        }

        self.gpio = Some(gpio);
        info!("GPIO relays initialized: {:?}", pins);
        Ok(())
    }

    fn set_state(&mut self, pin: u8, on: bool) -> Result<()> {
        let output = self.outputs.get_mut(&pin).ok_or(Error::UnknownPin(pin))?;
        if on {
            output.set_high();
        } else {
            output.set_low();
        }
        debug!("GPIO {} -> {}", pin, Level::from_on(on));
        Ok(())
    }

    fn shutdown(&mut self) -> Result<()> {
        for (pin, output) in self.outputs.iter_mut() {
            output.set_low();
            debug!("GPIO {} -> LOW", pin);
        }
        let pins: Vec<u8> = self.outputs.keys().copied().collect();
        self.outputs.clear();
        self.gpio = None;
        info!("GPIO relays released: {:?}", pins);
        Ok(())
    }

    fn level(&self, pin: u8) -> Option<Level> {
        self.outputs
            .get(&pin)
            .map(|output| Level::from_on(output.is_set_high()))
    }
}
