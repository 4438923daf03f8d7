//! Image assets decoded once at start-up.

use anyhow::{Context, Result};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tiny_skia::{ColorU8, Pixmap};
use tracing::{debug, warn};

use crate::config::DisplayConfig;
use crate::registry::AccessoryRegistry;

/// Decoded background, settings icon and accessory icons.
///
/// Assets that fail to load are absent; screens draw a placeholder instead.
#[derive(Default)]
pub struct Assets {
    background: Option<Pixmap>,
    settings_icon: Option<Pixmap>,
    icons: HashMap<PathBuf, Pixmap>,
}

impl Assets {
    /// Creates an empty asset set.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Loads every asset referenced by the display config and registry.
    pub fn load(display: &DisplayConfig, registry: &AccessoryRegistry) -> Self {
        let mut icons = HashMap::new();
        for accessory in registry.iter() {
            if icons.contains_key(&accessory.icon) {
                continue;
            }
            if let Some(icon) = load_or_warn(&accessory.icon) {
                icons.insert(accessory.icon.clone(), icon);
            }
        }

        Self {
            background: load_or_warn(&display.resolve(&display.background)),
            settings_icon: load_or_warn(&display.resolve(&display.settings_icon)),
            icons,
        }
    }

    pub fn background(&self) -> Option<&Pixmap> {
        self.background.as_ref()
    }

    pub fn settings_icon(&self) -> Option<&Pixmap> {
        self.settings_icon.as_ref()
    }

    pub fn icon(&self, path: &Path) -> Option<&Pixmap> {
        self.icons.get(path)
    }

    #[cfg(test)]
    pub fn insert_icon(&mut self, path: impl Into<PathBuf>, icon: Pixmap) {
        self.icons.insert(path.into(), icon);
    }
}

fn load_or_warn(path: &Path) -> Option<Pixmap> {
    match decode(path) {
        Ok(pixmap) => {
            debug!(
                "Loaded {} ({}x{})",
                path.display(),
                pixmap.width(),
                pixmap.height()
            );
            Some(pixmap)
        }
        Err(e) => {
            warn!("{:#}. Drawing placeholder.", e);
            None
        }
    }
}

/// Decodes an image file into a premultiplied pixmap.
pub fn decode(path: &Path) -> Result<Pixmap> {
    let image = image::open(path)
        .with_context(|| format!("Failed to load image {}", path.display()))?
        .to_rgba8();

    let mut pixmap = Pixmap::new(image.width(), image.height())
        .with_context(|| format!("Image {} is empty", path.display()))?;

    for (dst, src) in pixmap.pixels_mut().iter_mut().zip(image.pixels()) {
        let [r, g, b, a] = src.0;
        *dst = ColorU8::from_rgba(r, g, b, a).premultiply();
    }

    Ok(pixmap)
}
