//! Simulated relay outputs for desktop builds and tests.

use super::{Level, RelayDriver};
use crate::{Error, Result};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, info};

#[derive(Debug, Default)]
struct SimState {
    levels: BTreeMap<u8, Level>,
    writes: Vec<(u8, Level)>,
    shutdowns: usize,
}

/// Read-only view of a [`SimulatedRelays`] that outlives the driver.
#[derive(Debug, Clone)]
pub struct RelayProbe {
    state: Arc<Mutex<SimState>>,
}

impl RelayProbe {
    fn lock(&self) -> MutexGuard<'_, SimState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Last level written to the pin, `None` if never initialized.
    pub fn level(&self, pin: u8) -> Option<Level> {
        self.lock().levels.get(&pin).copied()
    }

    /// Every write in order, including initialization and shutdown.
    pub fn writes(&self) -> Vec<(u8, Level)> {
        self.lock().writes.clone()
    }

    /// Number of writes of `level` to `pin`.
    pub fn count(&self, pin: u8, level: Level) -> usize {
        self.lock()
            .writes
            .iter()
            .filter(|(p, l)| *p == pin && *l == level)
            .count()
    }

    /// Number of times the driver was shut down.
    pub fn shutdowns(&self) -> usize {
        self.lock().shutdowns
    }
}

/// Relay driver that only logs and records levels.
#[derive(Debug, Default)]
pub struct SimulatedRelays {
    state: Arc<Mutex<SimState>>,
}

impl SimulatedRelays {
    /// Creates a simulated driver with no pins.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a probe sharing this driver's state.
    pub fn probe(&self) -> RelayProbe {
        RelayProbe {
            state: Arc::clone(&self.state),
        }
    }

    fn lock(&self) -> MutexGuard<'_, SimState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn write(state: &mut SimState, pin: u8, level: Level) {
        state.levels.insert(pin, level);
        state.writes.push((pin, level));
    }
}

impl RelayDriver for SimulatedRelays {
    fn name(&self) -> &'static str {
        "simulated"
    }

    fn initialize(&mut self, pins: &[u8]) -> Result<()> {
        let mut state = self.lock();
        for &pin in pins {
            Self::write(&mut state, pin, Level::Low);
        }
        info!("Simulated relays initialized: {:?}", pins);
        Ok(())
    }

    fn set_state(&mut self, pin: u8, on: bool) -> Result<()> {
        let mut state = self.lock();
        if !state.levels.contains_key(&pin) {
            return Err(Error::UnknownPin(pin));
        }
        let level = Level::from_on(on);
        Self::write(&mut state, pin, level);
        debug!("Simulated relay {} -> {}", pin, level);
        Ok(())
    }

    fn shutdown(&mut self) -> Result<()> {
        let mut state = self.lock();
        let pins: Vec<u8> = state.levels.keys().copied().collect();
        for &pin in &pins {
            state.writes.push((pin, Level::Low));
        }
        state.levels.clear();
        state.shutdowns += 1;
        info!("Simulated relays released: {:?}", pins);
        Ok(())
    }

    fn level(&self, pin: u8) -> Option<Level> {
        self.lock().levels.get(&pin).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initialize_drives_low() {
        let mut relays = SimulatedRelays::new();
        relays.initialize(&[17, 27]).unwrap();
        assert_eq!(relays.level(17), Some(Level::Low));
        assert_eq!(relays.level(27), Some(Level::Low));
        assert_eq!(relays.level(22), None);
    }

    #[test]
    fn test_initialize_is_idempotent() {
        let mut relays = SimulatedRelays::new();
        relays.initialize(&[17]).unwrap();
        relays.set_state(17, true).unwrap();
        relays.initialize(&[17]).unwrap();
        assert_eq!(relays.level(17), Some(Level::Low));
    }

    #[test]
    fn test_set_state() {
        let mut relays = SimulatedRelays::new();
        relays.initialize(&[17]).unwrap();
        relays.set_state(17, true).unwrap();
        assert_eq!(relays.level(17), Some(Level::High));
        relays.set_state(17, false).unwrap();
        assert_eq!(relays.level(17), Some(Level::Low));
    }

    #[test]
    fn test_unknown_pin() {
        let mut relays = SimulatedRelays::new();
        relays.initialize(&[17]).unwrap();
        assert!(matches!(
            relays.set_state(4, true),
            Err(Error::UnknownPin(4))
        ));
    }

    #[test]
    fn test_shutdown_forgets_pins() {
        let mut relays = SimulatedRelays::new();
        let probe = relays.probe();
        relays.initialize(&[17, 27]).unwrap();
        relays.set_state(27, true).unwrap();
        relays.shutdown().unwrap();

        assert_eq!(relays.level(17), None);
        assert_eq!(probe.writes().last(), Some(&(27, Level::Low)));
        assert_eq!(probe.shutdowns(), 1);
        assert!(relays.set_state(17, true).is_err());
    }
}
