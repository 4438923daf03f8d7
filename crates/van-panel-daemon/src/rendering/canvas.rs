//! Canvas for rendering screens to an RGBA pixmap.

use anyhow::{Context, Result};
use tiny_skia::{
    Color, FilterQuality, Paint, PathBuilder, Pixmap, PixmapPaint, Rect as SkRect, Stroke,
    Transform,
};

use super::text::TextRenderer;
use crate::layout::Rect;

/// How an image is scaled into its target rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFit {
    /// Keep aspect ratio, centred inside the rectangle.
    Contain,
    /// Fill the rectangle, ignoring aspect ratio.
    Stretch,
}

/// Converts an RGB888 color and opacity to a tiny-skia color.
fn color(rgb: u32, alpha: f32) -> Color {
    let r = ((rgb >> 16) & 0xFF) as u8;
    let g = ((rgb >> 8) & 0xFF) as u8;
    let b = (rgb & 0xFF) as u8;
    let a = (alpha.clamp(0.0, 1.0) * 255.0).round() as u8;
    Color::from_rgba8(r, g, b, a)
}

fn paint(rgb: u32, alpha: f32) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color(color(rgb, alpha));
    paint
}

/// Canvas for rendering.
pub struct Canvas {
    width: u32,
    height: u32,
    pixmap: Pixmap,
    background_color: u32,
    text_renderer: TextRenderer,
}

impl Canvas {
    /// Creates a new canvas.
    pub fn new(width: u32, height: u32, text_renderer: TextRenderer) -> Result<Self> {
        let pixmap = Pixmap::new(width, height)
            .with_context(|| format!("Invalid canvas size {}x{}", width, height))?;

        Ok(Self {
            width,
            height,
            pixmap,
            background_color: 0x000000,
            text_renderer,
        })
    }

    /// Returns the canvas dimensions.
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Sets the background color.
    pub fn set_background(&mut self, color: u32) {
        self.background_color = color;
    }

    /// Clears the canvas to the background color.
    pub fn clear(&mut self) {
        self.pixmap.fill(color(self.background_color, 1.0));
    }

    /// Draws a filled rectangle.
    pub fn fill_rect(&mut self, x: i32, y: i32, width: u32, height: u32, color: u32) {
        self.fill_rect_alpha(x, y, width, height, color, 1.0);
    }

    fn fill_rect_alpha(&mut self, x: i32, y: i32, width: u32, height: u32, rgb: u32, alpha: f32) {
        if let Some(rect) = SkRect::from_xywh(x as f32, y as f32, width as f32, height as f32) {
            self.pixmap
                .fill_rect(rect, &paint(rgb, alpha), Transform::identity(), None);
        }
    }

    /// Fills a layout rectangle, snapped to whole pixels.
    pub fn fill(&mut self, rect: &Rect, color: u32) {
        let (x, y, w, h) = snap(rect);
        self.fill_rect(x, y, w, h, color);
    }

    /// Draws a rectangle outline of `thickness` pixels inside `rect`.
    pub fn stroke_rect(&mut self, rect: &Rect, thickness: u32, rgb: u32, alpha: f32) {
        let (x, y, w, h) = snap(rect);
        let t = thickness.min(w / 2).min(h / 2);
        if t == 0 {
            return;
        }

        // Top and bottom span the full width, sides fill the gap between them
        self.fill_rect_alpha(x, y, w, t, rgb, alpha);
        self.fill_rect_alpha(x, y + (h - t) as i32, w, t, rgb, alpha);
        self.fill_rect_alpha(x, y + t as i32, t, h - 2 * t, rgb, alpha);
        self.fill_rect_alpha(x + (w - t) as i32, y + t as i32, t, h - 2 * t, rgb, alpha);
    }

    /// Draws a straight line.
    pub fn draw_line(&mut self, from: (f32, f32), to: (f32, f32), width: f32, rgb: u32) {
        let mut pb = PathBuilder::new();
        pb.move_to(from.0, from.1);
        pb.line_to(to.0, to.1);
        if let Some(path) = pb.finish() {
            let stroke = Stroke {
                width,
                ..Stroke::default()
            };
            self.pixmap.stroke_path(
                &path,
                &paint(rgb, 1.0),
                &stroke,
                Transform::identity(),
                None,
            );
        }
    }

    /// Draws an image scaled into `rect`.
    pub fn draw_image(&mut self, image: &Pixmap, rect: &Rect, fit: ImageFit) {
        let iw = image.width() as f32;
        let ih = image.height() as f32;

        let (sx, sy, tx, ty) = match fit {
            ImageFit::Stretch => (rect.width / iw, rect.height / ih, rect.x, rect.y),
            ImageFit::Contain => {
                let scale = (rect.width / iw).min(rect.height / ih);
                (
                    scale,
                    scale,
                    rect.x + (rect.width - iw * scale) / 2.0,
                    rect.y + (rect.height - ih * scale) / 2.0,
                )
            }
        };

        let paint = PixmapPaint {
            quality: FilterQuality::Bilinear,
            ..PixmapPaint::default()
        };
        self.pixmap.draw_pixmap(
            0,
            0,
            image.as_ref(),
            &paint,
            Transform::from_row(sx, 0.0, 0.0, sy, tx, ty),
            None,
        );
    }

    /// Draws the missing-image placeholder: a grey box with a red cross.
    pub fn draw_placeholder(&mut self, rect: &Rect) {
        const FILL: u32 = 0x444444;
        const CROSS: u32 = 0xCC3333;

        self.fill(rect, FILL);
        self.stroke_rect(rect, 1, CROSS, 1.0);
        self.draw_line((rect.x, rect.y), (rect.right(), rect.bottom()), 2.0, CROSS);
        self.draw_line((rect.right(), rect.y), (rect.x, rect.bottom()), 2.0, CROSS);
    }

    /// Draws text at the specified position.
    ///
    /// # Arguments
    /// * `x` - X position (left edge of text)
    /// * `y` - Y position (top edge of text)
    /// * `text` - The text to render
    /// * `size` - Font size in pixels
    /// * `color` - RGB888 color (0xRRGGBB)
    pub fn draw_text(&mut self, x: i32, y: i32, text: &str, size: f32, color: u32) {
        self.text_renderer
            .draw_text(&mut self.pixmap, x, y, text, size, color);
    }

    /// Draws text centred in a rectangle.
    pub fn draw_text_centered(&mut self, rect: &Rect, text: &str, size: f32, color: u32) {
        let width = self.text_width(text, size) as f32;
        let x = rect.x + (rect.width - width) / 2.0;
        let y = rect.y + (rect.height - size) / 2.0;
        self.draw_text(x.round() as i32, y.round() as i32, text, size, color);
    }

    /// Returns the width of text when rendered at the specified size.
    pub fn text_width(&self, text: &str, size: f32) -> i32 {
        self.text_renderer.text_width(text, size)
    }

    /// Returns the straight RGB color of a pixel.
    pub fn pixel(&self, x: u32, y: u32) -> Option<(u8, u8, u8)> {
        self.pixmap.pixel(x, y).map(|p| {
            let c = p.demultiply();
            (c.red(), c.green(), c.blue())
        })
    }

    /// Returns the raw RGBA pixels.
    pub fn pixels(&self) -> &[u8] {
        self.pixmap.data()
    }

    /// Encodes the canvas as PNG.
    pub fn to_png(&self) -> Result<Vec<u8>> {
        let mut png_data = Vec::new();
        {
            let mut encoder = png::Encoder::new(&mut png_data, self.width, self.height);
            encoder.set_color(png::ColorType::Rgba);
            encoder.set_depth(png::BitDepth::Eight);
            let mut writer = encoder.write_header()?;
            writer.write_image_data(self.pixels())?;
        }
        Ok(png_data)
    }
}

/// Rounds a layout rectangle to whole pixels.
fn snap(rect: &Rect) -> (i32, i32, u32, u32) {
    let x = rect.x.round() as i32;
    let y = rect.y.round() as i32;
    let w = rect.width.round().max(0.0) as u32;
    let h = rect.height.round().max(0.0) as u32;
    (x, y, w, h)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn canvas() -> Canvas {
        let mut canvas = Canvas::new(320, 200, TextRenderer::disabled()).unwrap();
        canvas.clear();
        canvas
    }

    #[test]
    fn test_canvas_creation() {
        let canvas = canvas();
        assert_eq!(canvas.dimensions(), (320, 200));
        assert_eq!(canvas.pixel(0, 0), Some((0, 0, 0)));
        assert_eq!(canvas.pixel(320, 0), None);
    }

    #[test]
    fn test_invalid_size() {
        assert!(Canvas::new(0, 0, TextRenderer::disabled()).is_err());
    }

    #[test]
    fn test_stroke_rect_leaves_inside_untouched() {
        let mut canvas = canvas();
        let rect = Rect::new(10.0, 10.0, 100.0, 50.0);
        canvas.stroke_rect(&rect, 2, 0x50748C, 1.0);

        assert_eq!(canvas.pixel(10, 10), Some((0x50, 0x74, 0x8C)));
        assert_eq!(canvas.pixel(11, 30), Some((0x50, 0x74, 0x8C)));
        assert_eq!(canvas.pixel(109, 59), Some((0x50, 0x74, 0x8C)));
        assert_eq!(canvas.pixel(50, 30), Some((0, 0, 0)));
    }

    #[test]
    fn test_draw_image_stretch() {
        let mut canvas = canvas();
        let mut image = Pixmap::new(2, 2).unwrap();
        image.fill(Color::from_rgba8(0, 0, 255, 255));
        canvas.draw_image(&image, &Rect::new(0.0, 0.0, 320.0, 200.0), ImageFit::Stretch);
        assert_eq!(canvas.pixel(160, 100), Some((0, 0, 255)));
    }

    #[test]
    fn test_placeholder() {
        let mut canvas = canvas();
        canvas.draw_placeholder(&Rect::new(0.0, 0.0, 100.0, 100.0));
        assert_eq!(canvas.pixel(50, 20), Some((0x44, 0x44, 0x44)));
    }

    #[test]
    fn test_png_signature() {
        let png = canvas().to_png().unwrap();
        assert_eq!(&png[..8], &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]);
    }
}
