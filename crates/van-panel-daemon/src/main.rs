//! Van Panel Daemon
//!
//! Drives accessory relays from a touchscreen panel served over HTTP, with a
//! D-Bus interface for scripted control.

mod config;
mod dbus;
mod layout;
mod navigation;
mod panel;
mod registry;
mod rendering;
mod screens;
mod signals;
mod state;
mod toggle;
mod web;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use van_panel_hw::RelayBank;

use config::Config;
use panel::Panel;
use registry::AccessoryRegistry;
use rendering::{Assets, Canvas, TextRenderer};
use signals::ShutdownSignals;
use state::AppState;

const DEFAULT_CONFIG: &str = "config/default.toml";

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Setup logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    // Installed before the relays are claimed
    let mut signals = ShutdownSignals::install()?;

    let config = load_config()?;

    let registry = AccessoryRegistry::from_config(&config.accessories, &config.display)
        .context("Invalid accessory configuration")?;
    if registry.is_empty() {
        warn!("No accessories configured");
    } else {
        info!("Configured {} accessories", registry.len());
    }

    // Relays come up LOW before anything is drawn
    let backend = config.relay.backend()?;
    let driver = van_panel_hw::open_driver(backend).context("Failed to open relay driver")?;
    let relays =
        RelayBank::claim(driver, registry.pins()).context("Failed to claim relay outputs")?;

    let (width, height) = (config.display.width, config.display.height);
    let text = TextRenderer::load(&config.display.font);
    let canvas = Canvas::new(width, height, text).context("Failed to create canvas")?;
    let assets = Assets::load(&config.display, &registry);
    let panel = Panel::new(&registry, width, height);

    let state = Arc::new(AppState::new(panel, relays, canvas, assets));

    let (shutdown_tx, mut shutdown_rx) = tokio::sync::mpsc::channel::<()>(1);

    // Keep a sender alive so the channel stays open if D-Bus fails
    let _shutdown_tx_keepalive = shutdown_tx.clone();

    let _dbus_connection =
        match dbus::run_dbus_server(state.clone(), shutdown_tx, config.dbus.bus).await {
            Ok(conn) => {
                info!("D-Bus service started");
                Some(conn)
            }
            Err(e) => {
                warn!(
                    "Failed to start D-Bus service: {}. Continuing without D-Bus.",
                    e
                );
                None
            }
        };

    let result = if config.web.enable {
        let app = web::create_router(state.clone());
        let addr: SocketAddr = config
            .web
            .listen
            .parse()
            .context("Invalid listen address")?;
        let listener = TcpListener::bind(addr)
            .await
            .with_context(|| format!("Failed to bind {}", addr))?;
        info!("Touch surface listening on http://{}", addr);

        tokio::select! {
            result = axum::serve(listener, app) => {
                result.context("Web server failed")
            }
            _ = shutdown_rx.recv() => {
                info!("Shutdown requested via D-Bus");
                Ok(())
            }
            name = signals.recv() => {
                info!("Received {}, shutting down", name);
                Ok(())
            }
        }
    } else {
        info!("Web server disabled");
        tokio::select! {
            _ = shutdown_rx.recv() => {
                info!("Shutdown requested via D-Bus");
            }
            name = signals.recv() => {
                info!("Received {}, shutting down", name);
            }
        }
        Ok(())
    };

    state.shutdown();
    result
}

/// Loads the file named on the command line, then the default path, then
/// built-in defaults.
fn load_config() -> Result<Config> {
    if let Some(path) = std::env::args().nth(1) {
        let config = Config::load(&path)
            .with_context(|| format!("Failed to load configuration from {}", path))?;
        info!("Loaded configuration from: {}", path);
        return Ok(config);
    }

    if Path::new(DEFAULT_CONFIG).exists() {
        let config = Config::load(DEFAULT_CONFIG).context("Failed to load configuration")?;
        info!("Loaded configuration from: {}", DEFAULT_CONFIG);
        return Ok(config);
    }

    info!("No configuration file, using built-in defaults");
    Ok(Config::default())
}
