use crate::models::Drone;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_BACKEND_URL: &str = "http://127.0.0.1:8000";
pub const DEFAULT_HEALTH_INTERVAL_SECS: u64 = 60;
pub const DEFAULT_ADDRESS_PREFIX: &str = "192.168.10.";

/// On-disk record for the fleet. The drone list lives under the `drones` key.
#[derive(Debug, Serialize, Deserialize)]
pub struct PersistedState {
    #[serde(default)]
    pub drones: Vec<Drone>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalConfig {
    #[serde(default = "default_backend_url")]
    pub backend_url: String,
    #[serde(default = "default_health_interval_secs")]
    pub health_interval_secs: u64,
    #[serde(default = "default_address_prefix")]
    pub address_prefix: String,
}

fn default_backend_url() -> String {
    DEFAULT_BACKEND_URL.to_string()
}

fn default_health_interval_secs() -> u64 {
    DEFAULT_HEALTH_INTERVAL_SECS
}

fn default_address_prefix() -> String {
    DEFAULT_ADDRESS_PREFIX.to_string()
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            backend_url: default_backend_url(),
            health_interval_secs: default_health_interval_secs(),
            address_prefix: default_address_prefix(),
        }
    }
}

/// Directory holding state, config, keybindings and the log file
pub fn config_dir() -> Result<PathBuf> {
    let config_dir = dirs::config_dir()
        .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?
        .join("dronedeck");

    if !config_dir.exists() {
        fs::create_dir_all(&config_dir)
            .with_context(|| format!("creating {}", config_dir.display()))?;
    }

    Ok(config_dir)
}

/// Durable mirror of the drone list
#[derive(Debug, Clone)]
pub struct Storage {
    path: PathBuf,
}

impl Storage {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn default_location() -> Result<Self> {
        Ok(Self::new(config_dir()?.join("fleet.json")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the stored drone list. A missing file is an empty fleet.
    pub fn load(&self) -> Result<Vec<Drone>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let contents = fs::read_to_string(&self.path)
            .with_context(|| format!("reading {}", self.path.display()))?;
        let state: PersistedState = serde_json::from_str(&contents)
            .with_context(|| format!("parsing {}", self.path.display()))?;

        Ok(state.drones)
    }

    pub fn save(&self, drones: &[Drone]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let state = PersistedState {
            drones: drones.to_vec(),
        };

        let contents = serde_json::to_string_pretty(&state)?;
        fs::write(&self.path, contents)
            .with_context(|| format!("writing {}", self.path.display()))?;

        Ok(())
    }
}

fn global_config_path() -> Result<PathBuf> {
    Ok(config_dir()?.join("config.json"))
}

pub fn load_config() -> Result<GlobalConfig> {
    let path = global_config_path()?;
    load_config_from(&path)
}

pub fn load_config_from(path: &Path) -> Result<GlobalConfig> {
    if !path.exists() {
        return Ok(GlobalConfig::default());
    }

    let contents = fs::read_to_string(path)?;
    let config: GlobalConfig = serde_json::from_str(&contents)
        .with_context(|| format!("parsing {}", path.display()))?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FlightStatus;
    use tempfile::TempDir;

    fn storage_in(dir: &TempDir) -> Storage {
        Storage::new(dir.path().join("fleet.json"))
    }

    #[test]
    fn test_missing_file_is_empty_fleet() {
        let dir = TempDir::new().unwrap();
        let storage = storage_in(&dir);

        assert!(storage.load().unwrap().is_empty());
    }

    #[test]
    fn test_round_trip_keeps_null_fields() {
        let dir = TempDir::new().unwrap();
        let storage = storage_in(&dir);

        let fresh = Drone::new("10.0.0.1".to_string());
        let mut flown = Drone::new("10.0.0.2".to_string());
        flown.battery_level = Some(42);
        flown.connected = true;
        flown.flight_status = FlightStatus::Airborne;
        flown.touch();

        let drones = vec![fresh, flown];
        storage.save(&drones).unwrap();

        let contents = fs::read_to_string(storage.path()).unwrap();
        assert!(contents.contains("\"drones\""));
        assert!(contents.contains("\"battery_level\": null"));
        assert!(contents.contains("\"last_contact_at\": null"));

        assert_eq!(storage.load().unwrap(), drones);
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let storage = storage_in(&dir);
        fs::write(storage.path(), "{ not json").unwrap();

        assert!(storage.load().is_err());
    }

    #[test]
    fn test_save_creates_parent_directory() {
        let dir = TempDir::new().unwrap();
        let storage = Storage::new(dir.path().join("nested").join("fleet.json"));

        storage.save(&[Drone::new("10.0.0.1".to_string())]).unwrap();
        assert_eq!(storage.load().unwrap().len(), 1);
    }

    #[test]
    fn test_config_defaults_fill_missing_fields() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{ "backend_url": "http://10.0.0.9:9000" }"#).unwrap();

        let config = load_config_from(&path).unwrap();
        assert_eq!(config.backend_url, "http://10.0.0.9:9000");
        assert_eq!(config.health_interval_secs, DEFAULT_HEALTH_INTERVAL_SECS);
        assert_eq!(config.address_prefix, DEFAULT_ADDRESS_PREFIX);
    }

    #[test]
    fn test_missing_config_is_default() {
        let dir = TempDir::new().unwrap();
        let config = load_config_from(&dir.path().join("config.json")).unwrap();
        assert_eq!(config, GlobalConfig::default());
    }
}
