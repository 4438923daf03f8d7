//! Screen renderers.
//!
//! Each screen draws the panel model onto a canvas. Screens hold no state of
//! their own, so switching between them never touches toggle state.

mod main_screen;
mod settings;

pub use main_screen::MainScreen;
pub use settings::SettingsScreen;

use crate::navigation::Screen;
use crate::panel::Panel;
use crate::rendering::{Assets, Canvas};

/// Colours and font sizes shared by the screens.
#[derive(Debug, Clone, Copy)]
pub struct Theme {
    /// Screen fill when no background image is available - RGB888
    pub background: u32,
    /// Accessory and settings labels - RGB888
    pub label: u32,
    /// Toggle border when OFF (smalt blue) - RGB888
    pub border_off: u32,
    /// Toggle border when ON - RGB888
    pub border_on: u32,
    /// Opacity of the ON border
    pub border_on_alpha: f32,
    /// Plain text on the settings screen - RGB888
    pub text: u32,
    /// Back button fill - RGB888
    pub button: u32,
    pub label_size: f32,
    pub settings_label_size: f32,
    pub title_size: f32,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            background: 0x000000,
            label: 0x479DB1,
            border_off: 0x50748C,
            border_on: 0x00FF00,
            border_on_alpha: 0.3,
            text: 0xFFFFFF,
            button: 0x58585A,
            label_size: 30.0,
            settings_label_size: 20.0,
            title_size: 24.0,
        }
    }
}

impl Theme {
    /// Border colour and opacity for a toggle state.
    pub fn border(&self, on: bool) -> (u32, f32) {
        if on {
            (self.border_on, self.border_on_alpha)
        } else {
            (self.border_off, 1.0)
        }
    }
}

/// Trait for screen renderers.
pub trait ScreenView: Send + Sync {
    /// Screen this view draws.
    fn screen(&self) -> Screen;

    /// Renders the screen onto the canvas.
    fn render(&self, canvas: &mut Canvas, panel: &Panel, assets: &Assets, theme: &Theme);
}

/// Creates the renderer for a screen.
pub fn create_view(screen: Screen) -> Box<dyn ScreenView> {
    match screen {
        Screen::Main => Box::new(MainScreen::new()),
        Screen::Settings => Box::new(SettingsScreen::new()),
    }
}
