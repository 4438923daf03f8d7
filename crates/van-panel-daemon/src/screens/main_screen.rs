//! Main screen: background, accessory toggles and the settings button.
//!
//! Toggle button (200x120):
//! ```text
//! +----------------------+
//! |                      |
//! |        [icon]        |  70%
//! |                      |
//! |        Lights        |  30%
//! +----------------------+
//! ```

use super::{ScreenView, Theme};
use crate::layout::Rect;
use crate::navigation::Screen;
use crate::panel::Panel;
use crate::rendering::{Assets, Canvas, ImageFit};
use crate::toggle::ToggleControl;

/// Gap between icon and label inside a toggle.
const TOGGLE_GAP: f32 = 5.0;
/// Share of the toggle height taken by the icon.
const ICON_SHARE: f32 = 0.7;
/// Border thickness in pixels.
const BORDER: u32 = 2;

/// Settings button icon size and gap to the label.
const COG_SIZE: f32 = 40.0;
const COG_GAP: f32 = 10.0;

/// The accessory toggle panel.
pub struct MainScreen;

impl MainScreen {
    pub fn new() -> Self {
        Self
    }

    fn render_toggle(
        canvas: &mut Canvas,
        rect: &Rect,
        toggle: &ToggleControl,
        assets: &Assets,
        theme: &Theme,
    ) {
        // Content sits inside the border
        let b = BORDER as f32;
        let inner = Rect::new(
            rect.x + b,
            rect.y + b,
            rect.width - 2.0 * b,
            rect.height - 2.0 * b - TOGGLE_GAP,
        );
        let (icon_area, label_area) = inner.split_top(ICON_SHARE);
        let label_area = Rect::new(
            label_area.x,
            label_area.y + TOGGLE_GAP,
            label_area.width,
            label_area.height,
        );

        match assets.icon(&toggle.accessory().icon) {
            Some(icon) => canvas.draw_image(icon, &icon_area, ImageFit::Contain),
            None => canvas.draw_placeholder(&icon_area),
        }

        canvas.draw_text_centered(
            &label_area,
            &toggle.accessory().name,
            theme.label_size,
            theme.label,
        );

        let (color, alpha) = theme.border(toggle.is_on());
        canvas.stroke_rect(rect, BORDER, color, alpha);
    }

    fn render_settings_button(canvas: &mut Canvas, rect: &Rect, assets: &Assets, theme: &Theme) {
        let cog = Rect::new(
            rect.x,
            rect.y + (rect.height - COG_SIZE) / 2.0,
            COG_SIZE,
            COG_SIZE,
        );
        match assets.settings_icon() {
            Some(icon) => canvas.draw_image(icon, &cog, ImageFit::Contain),
            None => canvas.draw_placeholder(&cog),
        }

        let size = theme.settings_label_size;
        let x = cog.right() + COG_GAP;
        let y = rect.y + (rect.height - size) / 2.0;
        canvas.draw_text(
            x.round() as i32,
            y.round() as i32,
            "Settings",
            size,
            theme.label,
        );
    }
}

impl Default for MainScreen {
    fn default() -> Self {
        Self::new()
    }
}

impl ScreenView for MainScreen {
    fn screen(&self) -> Screen {
        Screen::Main
    }

    fn render(&self, canvas: &mut Canvas, panel: &Panel, assets: &Assets, theme: &Theme) {
        let (width, height) = canvas.dimensions();

        canvas.set_background(theme.background);
        canvas.clear();
        if let Some(background) = assets.background() {
            let full = Rect::new(0.0, 0.0, width as f32, height as f32);
            canvas.draw_image(background, &full, ImageFit::Stretch);
        }

        for (index, toggle) in panel.toggles().iter().enumerate() {
            if let Some(slot) = panel.layout().slot(index) {
                Self::render_toggle(canvas, &slot.rect, toggle, assets, theme);
            }
        }

        Self::render_settings_button(canvas, &panel.layout().settings_button(), assets, theme);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{Accessory, AccessoryRegistry};
    use crate::rendering::TextRenderer;
    use tiny_skia::{Color, Pixmap};
    use van_panel_hw::{RelayBank, SimulatedRelays};

    fn setup(count: usize) -> (Panel, RelayBank, Canvas) {
        let accessories = (0..count)
            .map(|i| {
                Accessory::new(
                    &format!("Relay {}", i),
                    format!("icon{}.png", i),
                    i as u8 + 2,
                )
            })
            .collect();
        let registry = AccessoryRegistry::new(accessories).unwrap();
        let relays = RelayBank::claim(Box::new(SimulatedRelays::new()), registry.pins()).unwrap();
        let canvas = Canvas::new(1024, 600, TextRenderer::disabled()).unwrap();
        (Panel::new(&registry, 1024, 600), relays, canvas)
    }

    /// A pixel on the top border of a toggle.
    fn border_pixel(panel: &Panel, index: usize) -> (u32, u32) {
        let rect = panel.layout().slot(index).unwrap().rect;
        ((rect.x.round() + 50.0) as u32, rect.y.round() as u32)
    }

    #[test]
    fn test_border_reflects_state() {
        let (mut panel, mut relays, mut canvas) = setup(4);
        let theme = Theme::default();
        let assets = Assets::empty();

        MainScreen::new().render(&mut canvas, &panel, &assets, &theme);
        let (x, y) = border_pixel(&panel, 1);
        assert_eq!(canvas.pixel(x, y), Some((0x50, 0x74, 0x8C)));

        panel.activate(1, &mut relays).unwrap();
        MainScreen::new().render(&mut canvas, &panel, &assets, &theme);
        let (r, g, b) = canvas.pixel(x, y).unwrap();
        assert_eq!((r, b), (0, 0));
        assert!(g > 50 && g < 100);

        // Neighbour untouched
        let (x, y) = border_pixel(&panel, 0);
        assert_eq!(canvas.pixel(x, y), Some((0x50, 0x74, 0x8C)));
    }

    #[test]
    fn test_missing_icon_draws_placeholder() {
        let (panel, _relays, mut canvas) = setup(1);
        MainScreen::new().render(&mut canvas, &panel, &Assets::empty(), &Theme::default());

        let rect = panel.layout().slot(0).unwrap().rect;
        let (x, y) = ((rect.x + 20.0) as u32, (rect.y + 60.0) as u32);
        assert_eq!(canvas.pixel(x, y), Some((0x44, 0x44, 0x44)));
    }

    #[test]
    fn test_icon_is_drawn() {
        let (panel, _relays, mut canvas) = setup(1);
        let mut icon = Pixmap::new(10, 10).unwrap();
        icon.fill(Color::from_rgba8(255, 255, 0, 255));
        let mut assets = Assets::empty();
        assets.insert_icon("icon0.png", icon);

        MainScreen::new().render(&mut canvas, &panel, &assets, &Theme::default());

        let rect = panel.layout().slot(0).unwrap().rect;
        let (x, y) = ((rect.x + 100.0) as u32, (rect.y + 40.0) as u32);
        assert_eq!(canvas.pixel(x, y), Some((255, 255, 0)));
    }

    #[test]
    fn test_empty_panel_renders() {
        let (panel, _relays, mut canvas) = setup(0);
        MainScreen::new().render(&mut canvas, &panel, &Assets::empty(), &Theme::default());
        assert_eq!(canvas.pixel(10, 10), Some((0, 0, 0)));
    }
}
