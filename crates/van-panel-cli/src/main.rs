//! Van Panel Control Tool
//!
//! CLI for switching accessories through the van panel daemon over D-Bus.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;
use van_panel_client::{BusType, DaemonClient};

#[derive(Clone, Copy, Debug, Default, clap::ValueEnum)]
enum CliBusType {
    /// Try session bus first, fall back to system bus
    #[default]
    Auto,
    /// Use session bus (for user services)
    Session,
    /// Use system bus (for system services)
    System,
}

impl From<CliBusType> for BusType {
    fn from(bus: CliBusType) -> Self {
        match bus {
            CliBusType::Auto => BusType::Auto,
            CliBusType::Session => BusType::Session,
            CliBusType::System => BusType::System,
        }
    }
}

#[derive(Parser)]
#[command(name = "vanpanelctl")]
#[command(about = "Control tool for the van accessory panel")]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// D-Bus bus type to use
    #[arg(long, default_value = "auto", value_enum)]
    bus: CliBusType,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List accessories and their state
    List {
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Toggle an accessory
    Toggle {
        /// Accessory name (case-insensitive)
        name: String,
    },
    /// Switch an accessory on
    On {
        /// Accessory name (case-insensitive)
        name: String,
    },
    /// Switch an accessory off
    Off {
        /// Accessory name (case-insensitive)
        name: String,
    },
    /// Set or show the visible screen
    Screen {
        /// Screen name: main, settings (omit to show current)
        name: Option<String>,
    },
    /// Save a screenshot of the panel
    Screenshot {
        /// Output file path (default: screenshot.png)
        #[arg(default_value = "screenshot.png")]
        output: String,
    },
    /// Daemon control commands
    Daemon {
        #[command(subcommand)]
        action: DaemonCommands,
    },
}

#[derive(Subcommand)]
enum DaemonCommands {
    /// Check if daemon is running
    Status,
    /// Request daemon shutdown
    Quit,
}

fn on_off(on: bool) -> &'static str {
    if on {
        "ON"
    } else {
        "OFF"
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let client = DaemonClient::connect_with_bus(cli.bus.into())
        .await
        .context("Failed to connect to daemon. Is vanpaneld running?")?;

    match cli.command {
        Commands::List { json } => handle_list(json, &client).await,
        Commands::Toggle { name } => {
            let on = client.toggle_by_name(&name).await?;
            println!("{}: {}", name, on_off(on));
            Ok(())
        }
        Commands::On { name } => handle_switch(&name, true, &client).await,
        Commands::Off { name } => handle_switch(&name, false, &client).await,
        Commands::Screen { name } => handle_screen(name, &client).await,
        Commands::Screenshot { output } => handle_screenshot(&output, &client).await,
        Commands::Daemon { action } => handle_daemon(action, &client).await,
    }
}

async fn handle_list(json: bool, client: &DaemonClient) -> Result<()> {
    let accessories = client.list_accessories().await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&accessories)?);
        return Ok(());
    }

    if accessories.is_empty() {
        println!("No accessories configured");
        return Ok(());
    }
    for (index, accessory) in accessories.iter().enumerate() {
        println!(
            "  {:>2}  {:<20} GPIO {:>2}  {}",
            index,
            accessory.name,
            accessory.pin,
            on_off(accessory.on)
        );
    }
    Ok(())
}

async fn handle_switch(name: &str, on: bool, client: &DaemonClient) -> Result<()> {
    let changed = client.set_accessory(name, on).await?;
    if changed {
        println!("{}: {}", name, on_off(on));
    } else {
        println!("{} already {}", name, on_off(on));
    }
    Ok(())
}

async fn handle_screen(name: Option<String>, client: &DaemonClient) -> Result<()> {
    if let Some(name) = name {
        client.set_screen(&name).await?;
        println!("Screen set to: {}", name);
    } else {
        let current = client.get_screen().await?;
        println!("Current screen: {}", current);
    }
    Ok(())
}

async fn handle_daemon(action: DaemonCommands, client: &DaemonClient) -> Result<()> {
    match action {
        DaemonCommands::Status => {
            let count = client.accessory_count().await?;
            let backend = client.relay_backend().await?;
            println!("Daemon: running");
            println!("Accessories: {}", count);
            println!("Relay backend: {}", backend);
        }
        DaemonCommands::Quit => {
            client.quit().await?;
            println!("Shutdown request sent to daemon");
        }
    }

    Ok(())
}

async fn handle_screenshot(output: &str, client: &DaemonClient) -> Result<()> {
    let png_data = client.get_screen_png().await?;
    debug!("Received {} bytes of PNG data", png_data.len());
    std::fs::write(output, &png_data).context("Failed to write screenshot file")?;
    println!("Screenshot saved to: {}", output);
    Ok(())
}
