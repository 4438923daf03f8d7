//! Rendering module: canvas, text and image assets.

mod assets;
mod canvas;
mod text;

pub use assets::Assets;
pub use canvas::{Canvas, ImageFit};
pub use text::TextRenderer;
