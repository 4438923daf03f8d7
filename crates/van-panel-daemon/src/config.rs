//! Configuration management.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use van_panel_hw::RelayBackend;

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Display configuration
    #[serde(default)]
    pub display: DisplayConfig,

    /// Relay backend configuration
    #[serde(default)]
    pub relay: RelayConfig,

    /// Web touch surface configuration
    #[serde(default)]
    pub web: WebConfig,

    /// D-Bus configuration
    #[serde(default)]
    pub dbus: DbusConfig,

    /// Accessories in panel order
    #[serde(default = "default_accessories", rename = "accessory")]
    pub accessories: Vec<AccessoryConfig>,
}

/// Display surface and asset configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DisplayConfig {
    /// Screen width in pixels
    #[serde(default = "default_width")]
    pub width: u32,

    /// Screen height in pixels
    #[serde(default = "default_height")]
    pub height: u32,

    /// TrueType font used for labels
    #[serde(default = "default_font")]
    pub font: PathBuf,

    /// Directory that relative asset paths are resolved against
    #[serde(default = "default_assets")]
    pub assets: PathBuf,

    /// Full-screen background image
    #[serde(default = "default_background")]
    pub background: PathBuf,

    /// Icon shown on the settings button
    #[serde(default = "default_settings_icon")]
    pub settings_icon: PathBuf,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            font: default_font(),
            assets: default_assets(),
            background: default_background(),
            settings_icon: default_settings_icon(),
        }
    }
}

impl DisplayConfig {
    /// Resolves an asset path against the assets directory.
    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.assets.join(path)
        }
    }
}

/// Relay backend configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RelayConfig {
    /// "auto", "gpio" or "simulated"
    #[serde(default = "default_backend")]
    pub backend: String,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            backend: default_backend(),
        }
    }
}

impl RelayConfig {
    /// Parses the configured backend name.
    pub fn backend(&self) -> Result<RelayBackend> {
        self.backend
            .parse()
            .with_context(|| format!("Invalid relay backend '{}'", self.backend))
    }
}

/// Web touch surface configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WebConfig {
    /// Serve the touch surface
    #[serde(default = "default_web_enable")]
    pub enable: bool,

    /// Listen address (e.g., "127.0.0.1:8787")
    #[serde(default = "default_listen")]
    pub listen: String,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            enable: default_web_enable(),
            listen: default_listen(),
        }
    }
}

/// D-Bus bus selection.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DbusBusType {
    /// Try session bus first, fall back to system bus.
    #[default]
    Auto,
    Session,
    System,
}

/// D-Bus configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct DbusConfig {
    #[serde(default)]
    pub bus: DbusBusType,
}

/// One accessory as written in the configuration file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct AccessoryConfig {
    /// Label shown on the button
    pub name: String,

    /// Icon path, relative to the assets directory
    pub icon: PathBuf,

    /// BCM pin number of the relay
    pub pin: u8,
}

impl AccessoryConfig {
    fn new(name: &str, icon: &str, pin: u8) -> Self {
        Self {
            name: name.to_string(),
            icon: PathBuf::from(icon),
            pin,
        }
    }
}

// Default value functions
/// Reference touchscreen is 1024x600.
fn default_width() -> u32 {
    1024
}

fn default_height() -> u32 {
    600
}

fn default_font() -> PathBuf {
    PathBuf::from("/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf")
}

fn default_assets() -> PathBuf {
    PathBuf::from("assets")
}

fn default_background() -> PathBuf {
    PathBuf::from("logo.png")
}

fn default_settings_icon() -> PathBuf {
    PathBuf::from("icons/cogs.png")
}

fn default_backend() -> String {
    "auto".to_string()
}

fn default_web_enable() -> bool {
    true
}

fn default_listen() -> String {
    "127.0.0.1:8787".to_string()
}

fn default_accessories() -> Vec<AccessoryConfig> {
    vec![
        AccessoryConfig::new("Lights", "icons/light.png", 17),
        AccessoryConfig::new("Exterior Lights", "icons/outside_lights.png", 27),
        AccessoryConfig::new("Water Pump", "icons/water_pump.png", 22),
        AccessoryConfig::new("Fridge", "icons/fridge.png", 23),
        AccessoryConfig::new("Heater", "icons/heater.png", 24),
        AccessoryConfig::new("Fan", "icons/fan.png", 25),
        AccessoryConfig::new("Inverter", "icons/inverter.png", 5),
        AccessoryConfig::new("USB Ports", "icons/usb.png", 6),
    ]
}

impl Config {
    /// Loads configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content =
            std::fs::read_to_string(path.as_ref()).context("Failed to read configuration file")?;
        Self::parse(&content)
    }

    /// Parses configuration from a TOML string.
    pub fn parse(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content).context("Failed to parse configuration")?;
        Ok(config)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            display: DisplayConfig::default(),
            relay: RelayConfig::default(),
            web: WebConfig::default(),
            dbus: DbusConfig::default(),
            accessories: default_accessories(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.display.width, 1024);
        assert_eq!(config.display.height, 600);
        assert_eq!(config.accessories.len(), 8);
        assert_eq!(config.accessories[0].name, "Lights");
        assert_eq!(config.accessories[0].pin, 17);
        assert_eq!(config.relay.backend().unwrap(), RelayBackend::Auto);
    }

    #[test]
    fn test_empty_file_uses_defaults() {
        let config = Config::parse("").unwrap();
        assert_eq!(config.accessories.len(), 8);
        assert_eq!(config.dbus.bus, DbusBusType::Auto);
        assert!(config.web.enable);
    }

    #[test]
    fn test_parse_accessories() {
        let config = Config::parse(
            r#"
            [display]
            width = 800
            height = 480
            assets = "/opt/van/assets"

            [relay]
            backend = "simulated"

            [dbus]
            bus = "system"

            [[accessory]]
            name = "Lights"
            icon = "icons/light.png"
            pin = 17

            [[accessory]]
            name = "Fan"
            icon = "/usr/share/van/fan.png"
            pin = 25
            "#,
        )
        .unwrap();

        assert_eq!(config.display.width, 800);
        assert_eq!(config.relay.backend().unwrap(), RelayBackend::Simulated);
        assert_eq!(config.dbus.bus, DbusBusType::System);
        assert_eq!(config.accessories.len(), 2);
        assert_eq!(config.accessories[1].pin, 25);
        assert_eq!(
            config.display.resolve(&config.accessories[0].icon),
            PathBuf::from("/opt/van/assets/icons/light.png")
        );
        assert_eq!(
            config.display.resolve(&config.accessories[1].icon),
            PathBuf::from("/usr/share/van/fan.png")
        );
    }

    #[test]
    fn test_invalid_backend() {
        let config = Config::parse("[relay]\nbackend = \"serial\"\n").unwrap();
        assert!(config.relay.backend().is_err());
    }

    #[test]
    fn test_bad_pin_rejected() {
        let result = Config::parse(
            r#"
            [[accessory]]
            name = "Lights"
            icon = "icons/light.png"
            pin = 300
            "#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_misspelt_table_rejected() {
        let result = Config::parse(
            r#"
            [[accessories]]
            name = "Lights"
            icon = "icons/light.png"
            pin = 17
            "#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_unknown_key_rejected() {
        assert!(Config::parse("[web]\nport = 8080\n").is_err());

        let result = Config::parse(
            r#"
            [[accessory]]
            name = "Fan"
            icons = "fan.png"
            pin = 25
            "#,
        );
        assert!(result.is_err());
    }
}
