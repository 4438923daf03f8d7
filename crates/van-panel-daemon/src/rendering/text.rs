//! Text rendering using fontdue.

use fontdue::{Font, FontSettings};
use std::path::Path;
use tiny_skia::Pixmap;
use tracing::{info, warn};

/// Text renderer using fontdue for rasterization.
///
/// Without a font every draw call is skipped and widths are zero.
pub struct TextRenderer {
    font: Option<Font>,
}

impl TextRenderer {
    /// Loads a TrueType font from disk.
    pub fn load(path: &Path) -> Self {
        let font = match std::fs::read(path) {
            Ok(bytes) => match Font::from_bytes(bytes, FontSettings::default()) {
                Ok(font) => {
                    info!("Loaded font {}", path.display());
                    Some(font)
                }
                Err(e) => {
                    warn!("Failed to parse font {}: {}", path.display(), e);
                    None
                }
            },
            Err(e) => {
                warn!("Font {} unavailable: {}. Labels disabled.", path.display(), e);
                None
            }
        };
        Self { font }
    }

    /// Creates a renderer that draws nothing.
    pub fn disabled() -> Self {
        Self { font: None }
    }

    /// Draws text onto a pixmap at the specified position.
    ///
    /// # Arguments
    /// * `pixmap` - The pixmap to draw onto
    /// * `x` - X position (left edge of text)
    /// * `y` - Y position (top edge of text)
    /// * `text` - The text to render
    /// * `size` - Font size in pixels
    /// * `color` - RGB888 color (0xRRGGBB)
    pub fn draw_text(
        &self,
        pixmap: &mut Pixmap,
        x: i32,
        y: i32,
        text: &str,
        size: f32,
        color: u32,
    ) {
        let Some(font) = &self.font else {
            return;
        };

        let r = ((color >> 16) & 0xFF) as u8;
        let g = ((color >> 8) & 0xFF) as u8;
        let b = (color & 0xFF) as u8;

        let mut cursor_x = x;

        for ch in text.chars() {
            let (metrics, bitmap) = font.rasterize(ch, size);

            for glyph_y in 0..metrics.height {
                for glyph_x in 0..metrics.width {
                    let coverage = bitmap[glyph_y * metrics.width + glyph_x];
                    if coverage == 0 {
                        continue;
                    }
                    let px = cursor_x + metrics.xmin + glyph_x as i32;
                    let py =
                        y + (size as i32 - metrics.ymin - metrics.height as i32) + glyph_y as i32;

                    if px < 0
                        || py < 0
                        || px as u32 >= pixmap.width()
                        || py as u32 >= pixmap.height()
                    {
                        continue;
                    }

                    let idx = (py as u32 * pixmap.width() + px as u32) as usize * 4;
                    let data = pixmap.data_mut();

                    // Alpha blend the glyph over an opaque background
                    let alpha = coverage as f32 / 255.0;
                    let inv_alpha = 1.0 - alpha;

                    data[idx] = (r as f32 * alpha + data[idx] as f32 * inv_alpha) as u8;
                    data[idx + 1] = (g as f32 * alpha + data[idx + 1] as f32 * inv_alpha) as u8;
                    data[idx + 2] = (b as f32 * alpha + data[idx + 2] as f32 * inv_alpha) as u8;
                    data[idx + 3] = 255;
                }
            }

            cursor_x += metrics.advance_width as i32;
        }
    }

    /// Returns the width of text when rendered at the specified size.
    pub fn text_width(&self, text: &str, size: f32) -> i32 {
        let Some(font) = &self.font else {
            return 0;
        };
        text.chars()
            .map(|ch| font.metrics(ch, size).advance_width as i32)
            .sum()
    }
}
