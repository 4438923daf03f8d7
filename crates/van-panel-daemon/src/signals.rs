//! Unix signals that end the daemon.

use anyhow::{Context, Result};
use tokio::signal::unix::{signal, Signal, SignalKind};

/// Handlers for every signal that would otherwise terminate the process
/// without releasing the relays.
pub struct ShutdownSignals {
    sigterm: Signal,
    sigint: Signal,
    sighup: Signal,
    sigquit: Signal,
}

impl ShutdownSignals {
    /// Installs the handlers. Must run inside the tokio runtime.
    pub fn install() -> Result<Self> {
        Ok(Self {
            sigterm: signal(SignalKind::terminate()).context("Failed to handle SIGTERM")?,
            sigint: signal(SignalKind::interrupt()).context("Failed to handle SIGINT")?,
            sighup: signal(SignalKind::hangup()).context("Failed to handle SIGHUP")?,
            sigquit: signal(SignalKind::quit()).context("Failed to handle SIGQUIT")?,
        })
    }

    /// Waits for the next signal and returns its name.
    pub async fn recv(&mut self) -> &'static str {
        tokio::select! {
            _ = self.sigterm.recv() => "SIGTERM",
            _ = self.sigint.recv() => "SIGINT",
            _ = self.sighup.recv() => "SIGHUP",
            _ = self.sigquit.recv() => "SIGQUIT",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_hangup_is_caught() {
        let mut signals = ShutdownSignals::install().unwrap();

        let status = std::process::Command::new("kill")
            .args(["-HUP", &std::process::id().to_string()])
            .status()
            .unwrap();
        assert!(status.success());

        let name = tokio::time::timeout(Duration::from_secs(5), signals.recv())
            .await
            .unwrap();
        assert_eq!(name, "SIGHUP");
    }
}
