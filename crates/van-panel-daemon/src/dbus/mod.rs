//! D-Bus interface for the van panel daemon.
//!
//! Provides the `org.vanpanel.Daemon1` interface on the session or system bus.

mod interface;

pub use interface::run_dbus_server;
