use serde::{Deserialize, Serialize};

/// Directional or trick command relayed to every connected drone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DroneCommand {
    Forward,
    Backward,
    Left,
    Right,
    Flip,
}

impl DroneCommand {
    pub fn all() -> &'static [DroneCommand] {
        &[
            DroneCommand::Forward,
            DroneCommand::Backward,
            DroneCommand::Left,
            DroneCommand::Right,
            DroneCommand::Flip,
        ]
    }

    /// Wire token sent in the `command` field
    pub fn as_str(&self) -> &'static str {
        match self {
            DroneCommand::Forward => "forward",
            DroneCommand::Backward => "backward",
            DroneCommand::Left => "left",
            DroneCommand::Right => "right",
            DroneCommand::Flip => "flip",
        }
    }

    pub fn key_hint(&self) -> &'static str {
        match self {
            DroneCommand::Forward => "↑",
            DroneCommand::Backward => "↓",
            DroneCommand::Left => "←",
            DroneCommand::Right => "→",
            DroneCommand::Flip => "F",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            DroneCommand::Forward => "Move forward",
            DroneCommand::Backward => "Move backward",
            DroneCommand::Left => "Move left",
            DroneCommand::Right => "Move right",
            DroneCommand::Flip => "Do a flip",
        }
    }
}

impl std::fmt::Display for DroneCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_tokens_match_serde() {
        for command in DroneCommand::all() {
            let json = serde_json::to_string(command).unwrap();
            assert_eq!(json, format!("\"{}\"", command.as_str()));
        }
    }
}
