//! Panel model: toggle controls, their layout and the visible screen.

use anyhow::{anyhow, Result};
use serde::Serialize;
use tracing::debug;
use van_panel_hw::RelayBank;

use crate::layout::{Column, Hit, PanelLayout, SettingsLayout};
use crate::navigation::{Navigator, Screen};
use crate::registry::AccessoryRegistry;
use crate::toggle::ToggleControl;

/// Snapshot of one accessory for the web API and D-Bus.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct AccessoryStatus {
    pub index: usize,
    pub name: String,
    pub pin: u8,
    pub on: bool,
}

/// Result of a touch on the screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TouchOutcome {
    Toggled { index: usize, on: bool },
    Navigated(Screen),
}

/// The whole panel: one toggle per registered accessory.
#[derive(Debug, Clone)]
pub struct Panel {
    toggles: Vec<ToggleControl>,
    layout: PanelLayout,
    settings_layout: SettingsLayout,
    navigator: Navigator,
}

impl Panel {
    /// Builds the panel with every toggle OFF, showing the main screen.
    pub fn new(registry: &AccessoryRegistry, width: u32, height: u32) -> Self {
        let toggles: Vec<ToggleControl> = registry
            .iter()
            .cloned()
            .map(ToggleControl::new)
            .collect();
        let layout = PanelLayout::compute(toggles.len(), width, height);
        debug!(
            "Panel layout: {} rows, spacing {:.3}, left {:?}, right {:?}",
            layout.rows(),
            layout.spacing(),
            layout.column(Column::Left),
            layout.column(Column::Right)
        );
        Self {
            toggles,
            layout,
            settings_layout: SettingsLayout::compute(width, height),
            navigator: Navigator::new(),
        }
    }

    pub fn toggles(&self) -> &[ToggleControl] {
        &self.toggles
    }

    pub fn len(&self) -> usize {
        self.toggles.len()
    }

    pub fn layout(&self) -> &PanelLayout {
        &self.layout
    }

    pub fn settings_layout(&self) -> &SettingsLayout {
        &self.settings_layout
    }

    pub fn screen(&self) -> Screen {
        self.navigator.current()
    }

    pub fn show(&mut self, screen: Screen) {
        self.navigator.show(screen);
    }

    /// Finds a toggle by accessory name (case-insensitive).
    pub fn position(&self, name: &str) -> Option<usize> {
        self.toggles
            .iter()
            .position(|t| t.accessory().name.eq_ignore_ascii_case(name.trim()))
    }

    fn toggle_mut(&mut self, index: usize) -> Result<&mut ToggleControl> {
        let count = self.toggles.len();
        self.toggles
            .get_mut(index)
            .ok_or_else(|| anyhow!("No accessory at index {} ({} configured)", index, count))
    }

    /// Activates a toggle. Returns its new state.
    pub fn activate(&mut self, index: usize, relays: &mut RelayBank) -> Result<bool> {
        Ok(self.toggle_mut(index)?.activate(relays))
    }

    /// Switches a toggle to `on`. Returns true if the state changed.
    pub fn set(&mut self, index: usize, on: bool, relays: &mut RelayBank) -> Result<bool> {
        Ok(self.toggle_mut(index)?.set(on, relays))
    }

    /// Handles a touch at screen coordinates on the visible screen.
    pub fn touch(&mut self, x: f32, y: f32, relays: &mut RelayBank) -> Option<TouchOutcome> {
        let hit = match self.screen() {
            Screen::Main => self.layout.hit_test(x, y),
            Screen::Settings => self.settings_layout.hit_test(x, y),
        }?;

        match hit {
            Hit::Toggle(index) => {
                let on = self.toggles[index].activate(relays);
                Some(TouchOutcome::Toggled { index, on })
            }
            Hit::Settings => {
                self.navigator.goto_settings();
                Some(TouchOutcome::Navigated(Screen::Settings))
            }
            Hit::Back => {
                self.navigator.go_back();
                Some(TouchOutcome::Navigated(Screen::Main))
            }
        }
    }

    /// Status of every accessory in panel order.
    pub fn statuses(&self) -> Vec<AccessoryStatus> {
        self.toggles
            .iter()
            .enumerate()
            .map(|(index, toggle)| AccessoryStatus {
                index,
                name: toggle.accessory().name.clone(),
                pin: toggle.accessory().pin,
                on: toggle.is_on(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use van_panel_hw::{Level, RelayProbe, SimulatedRelays};

    fn setup() -> (Panel, RelayBank, RelayProbe) {
        let config = Config::default();
        let registry =
            AccessoryRegistry::from_config(&config.accessories, &config.display).unwrap();
        let driver = SimulatedRelays::new();
        let probe = driver.probe();
        let relays = RelayBank::claim(Box::new(driver), registry.pins()).unwrap();
        (Panel::new(&registry, 1024, 600), relays, probe)
    }

    fn center_of(panel: &Panel, index: usize) -> (f32, f32) {
        let rect = panel.layout().slot(index).unwrap().rect;
        (rect.x + rect.width / 2.0, rect.y + rect.height / 2.0)
    }

    #[test]
    fn test_initial_state() {
        let (panel, relays, _probe) = setup();
        assert_eq!(panel.len(), 8);
        assert_eq!(panel.screen(), Screen::Main);
        for status in panel.statuses() {
            assert!(!status.on);
            assert_eq!(relays.level(status.pin), Some(Level::Low));
        }
    }

    #[test]
    fn test_toggles_are_independent() {
        let (mut panel, mut relays, _probe) = setup();
        assert!(panel.activate(3, &mut relays).unwrap());

        for status in panel.statuses() {
            let expected = status.index == 3;
            assert_eq!(status.on, expected, "{}", status.name);
            assert_eq!(relays.level(status.pin), Some(Level::from_on(expected)));
        }
    }

    #[test]
    fn test_unknown_index() {
        let (mut panel, mut relays, _probe) = setup();
        assert!(panel.activate(8, &mut relays).is_err());
        assert!(panel.set(42, true, &mut relays).is_err());
    }

    #[test]
    fn test_touch_toggle() {
        let (mut panel, mut relays, _probe) = setup();
        let (x, y) = center_of(&panel, 6);
        assert_eq!(
            panel.touch(x, y, &mut relays),
            Some(TouchOutcome::Toggled { index: 6, on: true })
        );
        assert_eq!(relays.level(5), Some(Level::High));
        assert_eq!(panel.touch(2.0, 2.0, &mut relays), None);
    }

    #[test]
    fn test_navigation_keeps_toggle_state() {
        let (mut panel, mut relays, _probe) = setup();
        panel.activate(0, &mut relays).unwrap();
        panel.activate(5, &mut relays).unwrap();
        let before = panel.statuses();

        let settings = panel.layout().settings_button();
        assert_eq!(
            panel.touch(settings.x + 5.0, settings.y + 5.0, &mut relays),
            Some(TouchOutcome::Navigated(Screen::Settings))
        );

        // Toggle areas are inert while settings is shown
        let (x, y) = center_of(&panel, 0);
        assert_eq!(panel.touch(x, y, &mut relays), None);

        let back = panel.settings_layout().back_button();
        assert_eq!(
            panel.touch(back.x + 5.0, back.y + 5.0, &mut relays),
            Some(TouchOutcome::Navigated(Screen::Main))
        );
        assert_eq!(panel.statuses(), before);
    }

    #[test]
    fn test_shutdown_drives_every_pin_low_once() {
        let (mut panel, mut relays, probe) = setup();
        panel.activate(0, &mut relays).unwrap();
        panel.activate(1, &mut relays).unwrap();
        panel.activate(1, &mut relays).unwrap();
        let pins: Vec<u8> = relays.pins().collect();
        let writes_before = probe.writes().len();

        relays.release();
        drop(relays);

        let shutdown_writes = &probe.writes()[writes_before..];
        assert_eq!(shutdown_writes.len(), pins.len());
        for pin in pins {
            assert_eq!(
                shutdown_writes
                    .iter()
                    .filter(|(p, l)| *p == pin && *l == Level::Low)
                    .count(),
                1
            );
        }
    }

    #[test]
    fn test_empty_panel() {
        let registry = AccessoryRegistry::new(Vec::new()).unwrap();
        let mut relays =
            RelayBank::claim(Box::new(SimulatedRelays::new()), registry.pins()).unwrap();
        let mut panel = Panel::new(&registry, 1024, 600);
        assert!(panel.statuses().is_empty());
        let settings = panel.layout().settings_button();
        assert_eq!(
            panel.touch(settings.x + 1.0, settings.y + 1.0, &mut relays),
            Some(TouchOutcome::Navigated(Screen::Settings))
        );
    }

    #[test]
    fn test_position_by_name() {
        let (panel, _relays, _probe) = setup();
        assert_eq!(panel.position("usb ports"), Some(7));
        assert_eq!(panel.position("Awning"), None);
    }
}
