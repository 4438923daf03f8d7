//! Settings placeholder screen with a back button.

use super::{ScreenView, Theme};
use crate::navigation::Screen;
use crate::panel::Panel;
use crate::rendering::{Assets, Canvas};

const TITLE: &str = "Settings Screen - Under Construction";

/// Placeholder until settings exist.
pub struct SettingsScreen;

impl SettingsScreen {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SettingsScreen {
    fn default() -> Self {
        Self::new()
    }
}

impl ScreenView for SettingsScreen {
    fn screen(&self) -> Screen {
        Screen::Settings
    }

    fn render(&self, canvas: &mut Canvas, panel: &Panel, _assets: &Assets, theme: &Theme) {
        let layout = panel.settings_layout();

        canvas.set_background(theme.background);
        canvas.clear();
        canvas.draw_text_centered(&layout.title(), TITLE, theme.title_size, theme.text);

        let back = layout.back_button();
        canvas.fill(&back, theme.button);
        canvas.draw_text_centered(&back, "Back", theme.settings_label_size, theme.text);
    }
}
