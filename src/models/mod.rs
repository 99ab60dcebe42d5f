mod command;
mod drone;

pub use command::DroneCommand;
pub use drone::{BatteryBand, Drone, FlightStatus};
