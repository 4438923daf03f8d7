//! D-Bus client library for communicating with the van panel daemon.

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::debug;
use zbus::{names::BusName, proxy, Connection};

/// Well-known bus name of the daemon.
pub const SERVICE_NAME: &str = "org.vanpanel.Daemon";

/// D-Bus bus type selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BusType {
    /// Session bus (user session).
    Session,
    /// System bus (system-wide).
    System,
    /// Try session first, fall back to system.
    #[default]
    Auto,
}

/// D-Bus proxy for the van panel daemon.
#[proxy(
    interface = "org.vanpanel.Daemon1",
    default_service = "org.vanpanel.Daemon",
    default_path = "/org/vanpanel/Daemon"
)]
trait Daemon1 {
    /// Lists accessories as (name, pin, on).
    fn list_accessories(&self) -> zbus::Result<Vec<(String, u8, bool)>>;

    /// Toggles the accessory at `index`.
    fn toggle(&self, index: u32) -> zbus::Result<bool>;

    /// Toggles an accessory by name.
    fn toggle_by_name(&self, name: &str) -> zbus::Result<bool>;

    /// Switches an accessory on or off.
    fn set_accessory(&self, name: &str, on: bool) -> zbus::Result<bool>;

    /// Gets the visible screen name.
    fn get_screen(&self) -> zbus::Result<String>;

    /// Shows a screen by name.
    fn set_screen(&self, screen: &str) -> zbus::Result<()>;

    /// Returns the current screen as PNG data.
    fn get_screen_png(&self) -> zbus::Result<Vec<u8>>;

    /// Shuts down the daemon.
    fn quit(&self) -> zbus::Result<()>;

    /// Number of configured accessories.
    #[zbus(property)]
    fn accessory_count(&self) -> zbus::Result<u32>;

    /// Relay driver in use.
    #[zbus(property)]
    fn relay_backend(&self) -> zbus::Result<String>;
}

/// One accessory as reported by the daemon.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Accessory {
    pub name: String,
    pub pin: u8,
    pub on: bool,
}

impl From<(String, u8, bool)> for Accessory {
    fn from((name, pin, on): (String, u8, bool)) -> Self {
        Self { name, pin, on }
    }
}

/// D-Bus client wrapper for the daemon.
pub struct DaemonClient {
    proxy: Daemon1Proxy<'static>,
}

impl DaemonClient {
    /// Connects with auto bus detection.
    pub async fn connect() -> Result<Self> {
        Self::connect_with_bus(BusType::Auto).await
    }

    /// Connects on the given bus.
    pub async fn connect_with_bus(bus_type: BusType) -> Result<Self> {
        let connection = match bus_type {
            BusType::Session => {
                debug!("Connecting to session bus");
                Connection::session()
                    .await
                    .context("Failed to connect to session bus")?
            }
            BusType::System => {
                debug!("Connecting to system bus");
                Connection::system()
                    .await
                    .context("Failed to connect to system bus")?
            }
            BusType::Auto => Self::find_daemon().await?,
        };

        let proxy = Daemon1Proxy::new(&connection)
            .await
            .context("Failed to create D-Bus proxy")?;

        Ok(Self { proxy })
    }

    /// Picks the bus the daemon is registered on, session first.
    async fn find_daemon() -> Result<Connection> {
        match Connection::session().await {
            Ok(conn) if Self::service_exists(&conn).await => {
                debug!("Found daemon on session bus");
                Ok(conn)
            }
            _ => {
                debug!("Daemon not on session bus, trying system bus");
                let conn = Connection::system()
                    .await
                    .context("Failed to connect to system bus")?;
                if Self::service_exists(&conn).await {
                    debug!("Found daemon on system bus");
                    Ok(conn)
                } else {
                    anyhow::bail!(
                        "Daemon service not found on session or system bus. Is vanpaneld running?"
                    )
                }
            }
        }
    }

    async fn service_exists(conn: &Connection) -> bool {
        use zbus::fdo::DBusProxy;
        let Ok(name) = BusName::try_from(SERVICE_NAME) else {
            return false;
        };
        match DBusProxy::new(conn).await {
            Ok(dbus_proxy) => dbus_proxy.name_has_owner(name).await.unwrap_or(false),
            Err(_) => false,
        }
    }

    /// Lists every accessory in panel order.
    pub async fn list_accessories(&self) -> Result<Vec<Accessory>> {
        let accessories = self
            .proxy
            .list_accessories()
            .await
            .context("Failed to list accessories via D-Bus")?;
        Ok(accessories.into_iter().map(Accessory::from).collect())
    }

    /// Toggles the accessory at `index`. Returns its new state.
    pub async fn toggle(&self, index: u32) -> Result<bool> {
        self.proxy
            .toggle(index)
            .await
            .context("Failed to toggle accessory via D-Bus")
    }

    /// Toggles an accessory by name. Returns its new state.
    pub async fn toggle_by_name(&self, name: &str) -> Result<bool> {
        self.proxy
            .toggle_by_name(name)
            .await
            .with_context(|| format!("Failed to toggle {} via D-Bus", name))
    }

    /// Switches an accessory on or off. Returns true if it changed.
    pub async fn set_accessory(&self, name: &str, on: bool) -> Result<bool> {
        self.proxy
            .set_accessory(name, on)
            .await
            .with_context(|| format!("Failed to switch {} via D-Bus", name))
    }

    /// Gets the visible screen name.
    pub async fn get_screen(&self) -> Result<String> {
        self.proxy
            .get_screen()
            .await
            .context("Failed to get screen via D-Bus")
    }

    /// Shows a screen by name.
    pub async fn set_screen(&self, screen: &str) -> Result<()> {
        self.proxy
            .set_screen(screen)
            .await
            .context("Failed to set screen via D-Bus")
    }

    /// Gets the screen as PNG data.
    pub async fn get_screen_png(&self) -> Result<Vec<u8>> {
        self.proxy
            .get_screen_png()
            .await
            .context("Failed to get screen PNG via D-Bus")
    }

    /// Number of configured accessories.
    pub async fn accessory_count(&self) -> Result<u32> {
        self.proxy
            .accessory_count()
            .await
            .context("Failed to get accessory count via D-Bus")
    }

    /// Relay driver the daemon is using.
    pub async fn relay_backend(&self) -> Result<String> {
        self.proxy
            .relay_backend()
            .await
            .context("Failed to get relay backend via D-Bus")
    }

    /// Shuts down the daemon.
    pub async fn quit(&self) -> Result<()> {
        self.proxy
            .quit()
            .await
            .context("Failed to quit daemon via D-Bus")
    }
}
