//! Screen navigation between the panel and the settings placeholder.

use anyhow::{anyhow, Result};
use std::str::FromStr;
use tracing::debug;

/// Named screens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Screen {
    /// Accessory toggle panel.
    #[default]
    Main,
    /// Settings placeholder.
    Settings,
}

impl FromStr for Screen {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "main" => Ok(Screen::Main),
            "settings" => Ok(Screen::Settings),
            _ => Err(anyhow!("Unknown screen: {}", s)),
        }
    }
}

impl std::fmt::Display for Screen {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Screen::Main => write!(f, "main"),
            Screen::Settings => write!(f, "settings"),
        }
    }
}

/// Tracks the visible screen.
#[derive(Debug, Clone, Default)]
pub struct Navigator {
    current: Screen,
}

impl Navigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Screen {
        self.current
    }

    /// Shows a screen by name or value.
    pub fn show(&mut self, screen: Screen) {
        if self.current != screen {
            debug!("Screen {} -> {}", self.current, screen);
            self.current = screen;
        }
    }

    /// Settings button on the main screen.
    pub fn goto_settings(&mut self) {
        self.show(Screen::Settings);
    }

    /// Back button on the settings screen.
    pub fn go_back(&mut self) {
        self.show(Screen::Main);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_on_main() {
        assert_eq!(Navigator::new().current(), Screen::Main);
    }

    #[test]
    fn test_round_trip() {
        let mut nav = Navigator::new();
        nav.goto_settings();
        assert_eq!(nav.current(), Screen::Settings);
        nav.go_back();
        assert_eq!(nav.current(), Screen::Main);
    }

    #[test]
    fn test_screen_names() {
        assert_eq!("main".parse::<Screen>().unwrap(), Screen::Main);
        assert_eq!("Settings".parse::<Screen>().unwrap(), Screen::Settings);
        assert!("about".parse::<Screen>().is_err());
        assert_eq!(Screen::Settings.to_string(), "settings");
    }
}
