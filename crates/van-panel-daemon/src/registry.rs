//! Accessory registry.
//!
//! The ordered list of accessories the panel controls. Built once from
//! configuration and never modified afterwards.

use anyhow::{bail, Result};
use std::collections::HashSet;
use std::path::PathBuf;

use crate::config::{AccessoryConfig, DisplayConfig};

/// A vehicle accessory switched by one relay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Accessory {
    pub name: String,
    pub icon: PathBuf,
    pub pin: u8,
}

impl Accessory {
    pub fn new(name: &str, icon: impl Into<PathBuf>, pin: u8) -> Self {
        Self {
            name: name.to_string(),
            icon: icon.into(),
            pin,
        }
    }
}

/// Ordered, validated set of accessories.
#[derive(Debug, Clone, Default)]
pub struct AccessoryRegistry {
    accessories: Vec<Accessory>,
}

impl AccessoryRegistry {
    /// Validates and wraps an accessory list.
    ///
    /// Names must be non-empty and every pin may drive only one accessory.
    pub fn new(accessories: Vec<Accessory>) -> Result<Self> {
        let mut pins = HashSet::new();
        for accessory in &accessories {
            if accessory.name.trim().is_empty() {
                bail!("Accessory on pin {} has an empty name", accessory.pin);
            }
            if !pins.insert(accessory.pin) {
                bail!(
                    "Pin {} is assigned to more than one accessory (second: '{}')",
                    accessory.pin,
                    accessory.name
                );
            }
        }
        Ok(Self { accessories })
    }

    /// Builds the registry from configuration, resolving icon paths.
    pub fn from_config(entries: &[AccessoryConfig], display: &DisplayConfig) -> Result<Self> {
        let accessories = entries
            .iter()
            .map(|entry| Accessory::new(&entry.name, display.resolve(&entry.icon), entry.pin))
            .collect();
        Self::new(accessories)
    }

    pub fn len(&self) -> usize {
        self.accessories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accessories.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Accessory> {
        self.accessories.iter()
    }

    /// Relay pins in registry order.
    pub fn pins(&self) -> Vec<u8> {
        self.accessories.iter().map(|a| a.pin).collect()
    }
}
