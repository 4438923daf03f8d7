//! Toggle control view model.
//!
//! One control per accessory. Activation flips the boolean and writes the
//! relay in the same call; there is no pending state.

use tracing::info;
use van_panel_hw::RelayBank;

use crate::registry::Accessory;

/// On/off state of one accessory button.
#[derive(Debug, Clone)]
pub struct ToggleControl {
    accessory: Accessory,
    is_on: bool,
}

impl ToggleControl {
    /// Creates a control in the OFF state.
    pub fn new(accessory: Accessory) -> Self {
        Self {
            accessory,
            is_on: false,
        }
    }

    pub fn accessory(&self) -> &Accessory {
        &self.accessory
    }

    pub fn is_on(&self) -> bool {
        self.is_on
    }

    /// Flips the state and drives the relay to match. Returns the new state.
    ///
    /// The state flips even when the relay write fails.
    pub fn activate(&mut self, relays: &mut RelayBank) -> bool {
        self.is_on = !self.is_on;
        let applied = relays.set_state(self.accessory.pin, self.is_on);
        info!(
            "{} switched {}{}",
            self.accessory.name,
            if self.is_on { "on" } else { "off" },
            if applied { "" } else { " (relay not written)" }
        );
        self.is_on
    }

    /// Activates only if the requested state differs. Returns true if it toggled.
    pub fn set(&mut self, on: bool, relays: &mut RelayBank) -> bool {
        if self.is_on == on {
            return false;
        }
        self.activate(relays);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use van_panel_hw::{Level, RelayProbe, SimulatedRelays};

    fn relays(pins: &[u8]) -> (RelayBank, RelayProbe) {
        let driver = SimulatedRelays::new();
        let probe = driver.probe();
        let bank = RelayBank::claim(Box::new(driver), pins.iter().copied()).unwrap();
        (bank, probe)
    }

    #[test]
    fn test_lights_scenario() {
        let (mut bank, _probe) = relays(&[17]);
        let mut lights = ToggleControl::new(Accessory::new("Lights", "light.png", 17));

        assert!(!lights.is_on());
        assert_eq!(bank.level(17), Some(Level::Low));

        assert!(lights.activate(&mut bank));
        assert_eq!(bank.level(17), Some(Level::High));

        assert!(!lights.activate(&mut bank));
        assert_eq!(bank.level(17), Some(Level::Low));
    }

    #[test]
    fn test_state_matches_relay_after_every_activation() {
        let (mut bank, probe) = relays(&[22]);
        let mut pump = ToggleControl::new(Accessory::new("Water Pump", "pump.png", 22));
        for _ in 0..7 {
            let on = pump.activate(&mut bank);
            assert_eq!(bank.level(22), Some(Level::from_on(on)));
        }
        assert!(pump.is_on());
        assert_eq!(probe.count(22, Level::High), 4);
    }

    #[test]
    fn test_unwired_pin_still_flips() {
        let (mut bank, _probe) = relays(&[17]);
        let mut fan = ToggleControl::new(Accessory::new("Fan", "fan.png", 25));
        assert!(fan.activate(&mut bank));
        assert!(fan.is_on());
        assert_eq!(bank.level(25), None);
    }

    #[test]
    fn test_set_only_toggles_on_change() {
        let (mut bank, probe) = relays(&[24]);
        let mut heater = ToggleControl::new(Accessory::new("Heater", "heater.png", 24));
        assert!(!heater.set(false, &mut bank));
        assert!(heater.set(true, &mut bank));
        assert!(!heater.set(true, &mut bank));
        assert!(heater.is_on());
        assert_eq!(probe.count(24, Level::High), 1);
    }
}
