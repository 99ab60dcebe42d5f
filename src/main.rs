mod app;
mod backend;
mod config;
mod logging;
mod models;
mod persistence;
mod store;
mod tui;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::warn;
use uuid::Uuid;

use app::run_tui;
use config::keybindings::user_config_path;
use config::{load_keybindings, Settings};
use persistence::{config_dir, load_config, GlobalConfig, Storage};
use store::FleetStore;

#[derive(Parser)]
#[command(name = "dronedeck")]
#[command(version = "0.1.0")]
#[command(about = "Terminal dashboard for managing a fleet of networked drones")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Base URL of the drone control backend
    #[arg(long, global = true, env = "DRONEDECK_BACKEND_URL")]
    backend_url: Option<String>,

    /// Seconds between backend health checks
    #[arg(long, global = true, env = "DRONEDECK_HEALTH_INTERVAL")]
    health_interval: Option<u64>,

    /// Fleet state file (defaults to fleet.json in the config directory)
    #[arg(long, global = true)]
    state_file: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a drone to the fleet by network address
    Add {
        /// Network address of the drone, e.g. 192.168.10.1
        address: String,
    },
    /// List all drones in the fleet
    List,
    /// Remove a drone by id
    Remove {
        /// Drone id as shown by `list`
        id: Uuid,
    },
}

fn open_storage(state_file: Option<PathBuf>) -> Result<Storage> {
    match state_file {
        Some(path) => Ok(Storage::new(path)),
        None => Storage::default_location(),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.command.is_some() {
        logging::init_stderr()?;
    } else {
        logging::init_file(&config_dir()?.join(logging::LOG_FILE_NAME))?;
    }

    let file_config = load_config().unwrap_or_else(|e| {
        warn!("using default configuration: {:#}", e);
        GlobalConfig::default()
    });
    let settings = Settings::resolve(file_config, cli.backend_url, cli.health_interval);
    let storage = open_storage(cli.state_file)?;

    match cli.command {
        Some(Commands::Add { address }) => {
            let address = address.trim().to_string();
            if address.is_empty() {
                bail!("drone address must not be empty");
            }
            let mut fleet = FleetStore::open(storage);
            let id = fleet.add_drone(address.clone());
            println!("Added drone {} ({})", address, id);
        }
        Some(Commands::List) => {
            let fleet = FleetStore::open(storage);
            if fleet.is_empty() {
                println!("No drones. Add one with `dronedeck add <ADDRESS>`.");
            }
            for drone in fleet.drones() {
                println!(
                    "{}  {:<16} battery {:>4}  last contact {}",
                    drone.id,
                    drone.address,
                    drone.battery_display(),
                    drone.last_contact_display()
                );
            }
        }
        Some(Commands::Remove { id }) => {
            let mut fleet = FleetStore::open(storage);
            if !fleet.contains(id) {
                bail!("no drone with id {}", id);
            }
            fleet.remove_drone(id);
            println!("Removed drone {}", id);
        }
        None => {
            let keybindings = load_keybindings(&user_config_path(&config_dir()?));
            run_tui(settings, storage, keybindings).await?;
        }
    }

    Ok(())
}
