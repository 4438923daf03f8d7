//! D-Bus interface implementation using zbus.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use zbus::{interface, Connection};

use crate::config::DbusBusType;
use crate::navigation::Screen;
use crate::state::AppState;

/// Object path of the daemon interface.
pub const OBJECT_PATH: &str = "/org/vanpanel/Daemon";
/// Well-known bus name.
pub const BUS_NAME: &str = "org.vanpanel.Daemon";

/// D-Bus interface implementation for the van panel daemon.
pub struct Daemon1Interface {
    state: Arc<AppState>,
    shutdown_tx: mpsc::Sender<()>,
}

impl Daemon1Interface {
    /// Creates a new D-Bus interface.
    pub fn new(state: Arc<AppState>, shutdown_tx: mpsc::Sender<()>) -> Self {
        Self { state, shutdown_tx }
    }
}

#[interface(name = "org.vanpanel.Daemon1")]
impl Daemon1Interface {
    /// Lists accessories as (name, pin, on).
    fn list_accessories(&self) -> Vec<(String, u8, bool)> {
        self.state
            .accessories()
            .into_iter()
            .map(|a| (a.name, a.pin, a.on))
            .collect()
    }

    /// Toggles the accessory at `index`. Returns its new state.
    fn toggle(&self, index: u32) -> zbus::fdo::Result<bool> {
        let status = self
            .state
            .toggle(index as usize)
            .map_err(|e| zbus::fdo::Error::InvalidArgs(e.to_string()))?;

        debug!("D-Bus: Toggle({}) -> {}", index, status.on);
        Ok(status.on)
    }

    /// Toggles an accessory by name. Returns its new state.
    fn toggle_by_name(&self, name: &str) -> zbus::fdo::Result<bool> {
        let on = self
            .state
            .toggle_by_name(name)
            .map_err(|e| zbus::fdo::Error::InvalidArgs(e.to_string()))?;

        debug!("D-Bus: ToggleByName({}) -> {}", name, on);
        Ok(on)
    }

    /// Switches an accessory on or off. Returns true if its state changed.
    fn set_accessory(&self, name: &str, on: bool) -> zbus::fdo::Result<bool> {
        let changed = self
            .state
            .set_accessory(name, on)
            .map_err(|e| zbus::fdo::Error::InvalidArgs(e.to_string()))?;

        debug!("D-Bus: SetAccessory({}, {}) -> {}", name, on, changed);
        Ok(changed)
    }

    /// Gets the visible screen name.
    fn get_screen(&self) -> String {
        self.state.screen().to_string()
    }

    /// Shows a screen by name.
    fn set_screen(&self, screen: &str) -> zbus::fdo::Result<()> {
        let screen: Screen = screen
            .parse()
            .map_err(|_| zbus::fdo::Error::InvalidArgs(format!("Unknown screen: {}", screen)))?;

        self.state.set_screen(screen);
        debug!("D-Bus: SetScreen({})", screen);
        Ok(())
    }

    /// Returns the current screen as PNG data.
    fn get_screen_png(&self) -> zbus::fdo::Result<Vec<u8>> {
        self.state
            .get_screen_png()
            .map_err(|e| zbus::fdo::Error::Failed(e.to_string()))
    }

    /// Shuts down the daemon.
    async fn quit(&self) -> zbus::fdo::Result<()> {
        info!("D-Bus: Quit requested");
        self.shutdown_tx
            .send(())
            .await
            .map_err(|e| zbus::fdo::Error::Failed(e.to_string()))?;
        Ok(())
    }

    // Properties

    /// Visible screen name.
    #[zbus(property)]
    fn screen(&self) -> String {
        self.state.screen().to_string()
    }

    /// Number of configured accessories.
    #[zbus(property)]
    fn accessory_count(&self) -> u32 {
        self.state.accessory_count() as u32
    }

    /// Relay driver in use.
    #[zbus(property)]
    fn relay_backend(&self) -> String {
        self.state.backend().to_string()
    }
}

/// Connects to the appropriate D-Bus bus based on configuration.
async fn connect_to_bus(bus_type: DbusBusType) -> anyhow::Result<(Connection, &'static str)> {
    match bus_type {
        DbusBusType::Session => {
            let conn = Connection::session()
                .await
                .map_err(|e| anyhow::anyhow!("Failed to connect to session bus: {}", e))?;
            Ok((conn, "session"))
        }
        DbusBusType::System => {
            let conn = Connection::system()
                .await
                .map_err(|e| anyhow::anyhow!("Failed to connect to system bus: {}", e))?;
            Ok((conn, "system"))
        }
        DbusBusType::Auto => match Connection::session().await {
            Ok(conn) => Ok((conn, "session")),
            Err(session_err) => {
                // Headless vans usually run without a session bus
                warn!(
                    "Session bus unavailable ({}), trying system bus",
                    session_err
                );
                let conn = Connection::system().await.map_err(|system_err| {
                    anyhow::anyhow!(
                        "Failed to connect to any D-Bus: session={}, system={}",
                        session_err,
                        system_err
                    )
                })?;
                Ok((conn, "system"))
            }
        },
    }
}

/// Registers the daemon interface and requests the bus name.
pub async fn run_dbus_server(
    state: Arc<AppState>,
    shutdown_tx: mpsc::Sender<()>,
    bus_type: DbusBusType,
) -> anyhow::Result<Connection> {
    let interface = Daemon1Interface::new(state, shutdown_tx);

    let (connection, bus) = connect_to_bus(bus_type).await?;

    connection
        .object_server()
        .at(OBJECT_PATH, interface)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to register object: {}", e))?;

    connection
        .request_name(BUS_NAME)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to request bus name: {}", e))?;

    info!("D-Bus service registered at {} on {} bus", BUS_NAME, bus);
    Ok(connection)
}
