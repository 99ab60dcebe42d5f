use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Flight state as last acknowledged by the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum FlightStatus {
    #[default]
    Grounded,
    Airborne,
}

impl FlightStatus {
    pub fn label(&self) -> &'static str {
        match self {
            FlightStatus::Grounded => "Grounded",
            FlightStatus::Airborne => "Airborne",
        }
    }
}

/// Battery colour band shown next to the percentage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatteryBand {
    Unknown,
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Drone {
    pub id: Uuid,
    pub address: String,
    /// Percentage from the last battery check, `None` until one succeeds
    #[serde(default)]
    pub battery_level: Option<u8>,
    #[serde(default)]
    pub flight_status: FlightStatus,
    #[serde(default)]
    pub connected: bool,
    /// Last time a successful operation targeted this drone
    #[serde(default)]
    pub last_contact_at: Option<DateTime<Utc>>,
}

impl Drone {
    pub fn new(address: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            address,
            battery_level: None,
            flight_status: FlightStatus::default(),
            connected: false,
            last_contact_at: None,
        }
    }

    /// Update last_contact_at to now
    pub fn touch(&mut self) {
        self.last_contact_at = Some(Utc::now());
    }

    pub fn is_airborne(&self) -> bool {
        self.flight_status == FlightStatus::Airborne
    }

    pub fn battery_band(&self) -> BatteryBand {
        match self.battery_level {
            None => BatteryBand::Unknown,
            Some(level) if level > 70 => BatteryBand::High,
            Some(level) if level > 30 => BatteryBand::Medium,
            Some(_) => BatteryBand::Low,
        }
    }

    pub fn battery_display(&self) -> String {
        match self.battery_level {
            Some(level) => format!("{}%", level),
            None => "--%".to_string(),
        }
    }

    /// Format last_contact_at as a human-readable relative time string
    pub fn last_contact_display(&self) -> String {
        match self.last_contact_at {
            Some(ts) => {
                let duration = Utc::now().signed_duration_since(ts);

                if duration.num_seconds() < 60 {
                    "just now".to_string()
                } else if duration.num_minutes() < 60 {
                    format!("{}m ago", duration.num_minutes())
                } else if duration.num_hours() < 24 {
                    format!("{}h ago", duration.num_hours())
                } else if duration.num_days() == 1 {
                    "yesterday".to_string()
                } else if duration.num_days() < 7 {
                    format!("{}d ago", duration.num_days())
                } else {
                    ts.format("%b %d").to_string()
                }
            }
            None => "never".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_new_drone_defaults() {
        let drone = Drone::new("10.0.0.5".to_string());

        assert_eq!(drone.address, "10.0.0.5");
        assert_eq!(drone.flight_status, FlightStatus::Grounded);
        assert!(!drone.connected);
        assert!(drone.battery_level.is_none());
        assert!(drone.last_contact_at.is_none());
    }

    #[test]
    fn test_battery_bands() {
        let mut drone = Drone::new("10.0.0.5".to_string());
        assert_eq!(drone.battery_band(), BatteryBand::Unknown);
        assert_eq!(drone.battery_display(), "--%");

        drone.battery_level = Some(71);
        assert_eq!(drone.battery_band(), BatteryBand::High);
        drone.battery_level = Some(70);
        assert_eq!(drone.battery_band(), BatteryBand::Medium);
        drone.battery_level = Some(31);
        assert_eq!(drone.battery_band(), BatteryBand::Medium);
        drone.battery_level = Some(30);
        assert_eq!(drone.battery_band(), BatteryBand::Low);
        assert_eq!(drone.battery_display(), "30%");
    }

    #[test]
    fn test_last_contact_display() {
        let mut drone = Drone::new("10.0.0.5".to_string());
        assert_eq!(drone.last_contact_display(), "never");

        drone.touch();
        assert_eq!(drone.last_contact_display(), "just now");

        drone.last_contact_at = Some(Utc::now() - Duration::minutes(5));
        assert_eq!(drone.last_contact_display(), "5m ago");

        drone.last_contact_at = Some(Utc::now() - Duration::hours(3));
        assert_eq!(drone.last_contact_display(), "3h ago");
    }

    #[test]
    fn test_flight_status_serializes_lowercase() {
        let json = serde_json::to_string(&FlightStatus::Airborne).unwrap();
        assert_eq!(json, "\"airborne\"");
    }
}
