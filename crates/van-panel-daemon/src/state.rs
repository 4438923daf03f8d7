//! Application state management.

use anyhow::{anyhow, Result};
use std::sync::{Mutex, RwLock};
use tracing::{debug, info};
use van_panel_hw::RelayBank;

use crate::navigation::Screen;
use crate::panel::{AccessoryStatus, Panel, TouchOutcome};
use crate::rendering::{Assets, Canvas};
use crate::screens::{self, Theme};

/// Shared application state.
///
/// Lock order is panel, then relays, then canvas.
pub struct AppState {
    /// Toggle state, layout and visible screen
    panel: Mutex<Panel>,

    /// Claimed relay outputs
    relays: Mutex<RelayBank>,

    /// Last rendered frame
    canvas: RwLock<Canvas>,

    /// Decoded images
    assets: Assets,

    theme: Theme,

    /// Name of the relay driver in use
    backend: &'static str,
}

impl AppState {
    /// Creates the state and renders the first frame.
    pub fn new(panel: Panel, relays: RelayBank, canvas: Canvas, assets: Assets) -> Self {
        let backend = relays.backend();
        let state = Self {
            panel: Mutex::new(panel),
            relays: Mutex::new(relays),
            canvas: RwLock::new(canvas),
            assets,
            theme: Theme::default(),
            backend,
        };
        state.redraw(&state.panel.lock().unwrap());
        state
    }

    /// Renders the visible screen of `panel` into the canvas.
    fn redraw(&self, panel: &Panel) {
        let view = screens::create_view(panel.screen());
        let mut canvas = self.canvas.write().unwrap();
        view.render(&mut canvas, panel, &self.assets, &self.theme);
        debug!("Rendered {} screen", view.screen());
    }

    /// Status of every accessory in panel order.
    pub fn accessories(&self) -> Vec<AccessoryStatus> {
        self.panel.lock().unwrap().statuses()
    }

    pub fn accessory_count(&self) -> usize {
        self.panel.lock().unwrap().len()
    }

    /// Name of the relay driver in use.
    pub fn backend(&self) -> &'static str {
        self.backend
    }

    /// Activates the toggle at `index`. Returns its updated status.
    pub fn toggle(&self, index: usize) -> Result<AccessoryStatus> {
        let mut panel = self.panel.lock().unwrap();
        {
            let mut relays = self.relays.lock().unwrap();
            panel.activate(index, &mut relays)?;
        }
        self.redraw(&panel);
        panel
            .statuses()
            .into_iter()
            .nth(index)
            .ok_or_else(|| anyhow!("No accessory at index {}", index))
    }

    /// Activates the toggle for the named accessory. Returns its new state.
    pub fn toggle_by_name(&self, name: &str) -> Result<bool> {
        let index = self.index_of(name)?;
        Ok(self.toggle(index)?.on)
    }

    /// Switches the named accessory on or off. Returns true if its state
    /// changed.
    pub fn set_accessory(&self, name: &str, on: bool) -> Result<bool> {
        let index = self.index_of(name)?;
        let mut panel = self.panel.lock().unwrap();
        let changed = {
            let mut relays = self.relays.lock().unwrap();
            panel.set(index, on, &mut relays)?
        };
        if changed {
            self.redraw(&panel);
        }
        Ok(changed)
    }

    fn index_of(&self, name: &str) -> Result<usize> {
        self.panel
            .lock()
            .unwrap()
            .position(name)
            .ok_or_else(|| anyhow!("Unknown accessory: {}", name))
    }

    /// Handles a touch at display coordinates.
    pub fn touch(&self, x: f32, y: f32) -> Option<TouchOutcome> {
        let mut panel = self.panel.lock().unwrap();
        let outcome = {
            let mut relays = self.relays.lock().unwrap();
            panel.touch(x, y, &mut relays)
        };
        if outcome.is_some() {
            self.redraw(&panel);
        }
        debug!("Touch at ({}, {}): {:?}", x, y, outcome);
        outcome
    }

    /// Gets the visible screen.
    pub fn screen(&self) -> Screen {
        self.panel.lock().unwrap().screen()
    }

    /// Shows a screen.
    pub fn set_screen(&self, screen: Screen) {
        let mut panel = self.panel.lock().unwrap();
        panel.show(screen);
        self.redraw(&panel);
    }

    /// Returns the current frame as PNG data.
    pub fn get_screen_png(&self) -> Result<Vec<u8>> {
        self.canvas.read().unwrap().to_png()
    }

    /// Display dimensions in pixels.
    pub fn dimensions(&self) -> (u32, u32) {
        self.canvas.read().unwrap().dimensions()
    }

    /// Drives every relay low and releases the outputs.
    pub fn shutdown(&self) {
        let mut relays = self.relays.lock().unwrap();
        if !relays.is_released() {
            info!("Releasing relay outputs");
            relays.release();
        }
    }
}
