use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Default keybindings embedded at compile time
const DEFAULT_KEYBINDINGS: &str = include_str!("defaults.toml");

/// A key combination (key code + modifiers)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyCombo {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeyCombo {
    pub fn new(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self { code, modifiers }
    }

    /// Combo for an incoming key event. Shift is dropped for printable
    /// characters since it is already reflected in the character itself.
    pub fn from_event(key: &KeyEvent) -> Self {
        let mut modifiers = key.modifiers;
        if matches!(key.code, KeyCode::Char(_)) {
            modifiers.remove(KeyModifiers::SHIFT);
        }
        Self::new(key.code, modifiers)
    }

    /// Parse a key string like "Ctrl-c", "Space", "Enter", "?"
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        if s == "-" {
            return Some(Self::new(KeyCode::Char('-'), KeyModifiers::NONE));
        }

        let mut modifiers = KeyModifiers::NONE;
        let mut parts: Vec<&str> = s.split('-').collect();
        let key_str = parts.pop()?;

        for modifier in parts {
            match modifier.to_lowercase().as_str() {
                "ctrl" => modifiers |= KeyModifiers::CONTROL,
                "alt" | "opt" => modifiers |= KeyModifiers::ALT,
                "shift" => modifiers |= KeyModifiers::SHIFT,
                _ => return None,
            }
        }

        let code = parse_key_code(key_str)?;
        Some(Self::new(code, modifiers))
    }

    /// Convert to display string for UI
    pub fn display(&self) -> String {
        let mut parts = Vec::new();

        if self.modifiers.contains(KeyModifiers::CONTROL) {
            parts.push("Ctrl".to_string());
        }
        if self.modifiers.contains(KeyModifiers::ALT) {
            parts.push("Alt".to_string());
        }
        if self.modifiers.contains(KeyModifiers::SHIFT) {
            parts.push("Shift".to_string());
        }
        parts.push(key_code_display(&self.code));

        parts.join("-")
    }
}

fn parse_key_code(s: &str) -> Option<KeyCode> {
    let mut chars = s.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        return Some(KeyCode::Char(c));
    }

    match s.to_lowercase().as_str() {
        "enter" | "return" => Some(KeyCode::Enter),
        "esc" | "escape" => Some(KeyCode::Esc),
        "tab" => Some(KeyCode::Tab),
        "backspace" => Some(KeyCode::Backspace),
        "delete" | "del" => Some(KeyCode::Delete),
        "home" => Some(KeyCode::Home),
        "end" => Some(KeyCode::End),
        "pageup" => Some(KeyCode::PageUp),
        "pagedown" => Some(KeyCode::PageDown),
        "space" => Some(KeyCode::Char(' ')),
        f if f.starts_with('f') => f[1..].parse().ok().filter(|n| (1..=12).contains(n)).map(KeyCode::F),
        _ => None,
    }
}

fn key_code_display(code: &KeyCode) -> String {
    match code {
        KeyCode::Char(' ') => "Space".to_string(),
        KeyCode::Char(c) => c.to_string(),
        KeyCode::Enter => "Enter".to_string(),
        KeyCode::Esc => "Esc".to_string(),
        KeyCode::Tab => "Tab".to_string(),
        KeyCode::Backspace => "Backspace".to_string(),
        KeyCode::Delete => "Delete".to_string(),
        KeyCode::Home => "Home".to_string(),
        KeyCode::End => "End".to_string(),
        KeyCode::PageUp => "PageUp".to_string(),
        KeyCode::PageDown => "PageDown".to_string(),
        KeyCode::F(n) => format!("F{}", n),
        _ => "?".to_string(),
    }
}

/// Rebindable dashboard actions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BoundAction {
    Quit,
    Help,
    MoveUp,
    MoveDown,
    ToggleSelect,
    AddDrone,
    RemoveDrone,
    ConnectSelected,
    DisconnectAll,
    CheckBattery,
    Takeoff,
    Land,
    ScanConnect,
}

impl BoundAction {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "quit" => Some(Self::Quit),
            "help" => Some(Self::Help),
            "move_up" => Some(Self::MoveUp),
            "move_down" => Some(Self::MoveDown),
            "toggle_select" => Some(Self::ToggleSelect),
            "add_drone" => Some(Self::AddDrone),
            "remove_drone" => Some(Self::RemoveDrone),
            "connect_selected" => Some(Self::ConnectSelected),
            "disconnect_all" => Some(Self::DisconnectAll),
            "check_battery" => Some(Self::CheckBattery),
            "takeoff" => Some(Self::Takeoff),
            "land" => Some(Self::Land),
            "scan_connect" => Some(Self::ScanConnect),
            _ => None,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Quit => "Quit",
            Self::Help => "Toggle this help",
            Self::MoveUp => "Previous drone",
            Self::MoveDown => "Next drone",
            Self::ToggleSelect => "Select / deselect drone",
            Self::AddDrone => "Add drone by address",
            Self::RemoveDrone => "Remove drone (press twice)",
            Self::ConnectSelected => "Connect selected drones",
            Self::DisconnectAll => "Disconnect all drones",
            Self::CheckBattery => "Check battery levels",
            Self::Takeoff => "Take off all",
            Self::Land => "Land all",
            Self::ScanConnect => "Scan network and connect",
        }
    }
}

/// Raw TOML structure for keybindings
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct KeybindingsToml {
    #[serde(default)]
    pub fleet: HashMap<String, String>,
}

/// Parsed keybinding configuration with KeyCombo lookups
#[derive(Debug, Clone)]
pub struct KeybindingConfig {
    pub fleet: HashMap<KeyCombo, BoundAction>,
}

impl Default for KeybindingConfig {
    fn default() -> Self {
        Self::from_toml(DEFAULT_KEYBINDINGS).unwrap_or_else(|| Self {
            fleet: HashMap::new(),
        })
    }
}

impl KeybindingConfig {
    pub fn from_toml(content: &str) -> Option<Self> {
        let raw: KeybindingsToml = match toml::from_str(content) {
            Ok(raw) => raw,
            Err(e) => {
                warn!("invalid keybindings: {}", e);
                return None;
            }
        };

        let fleet = raw
            .fleet
            .iter()
            .filter_map(|(key, name)| {
                let combo = KeyCombo::parse(key);
                let action = BoundAction::from_name(name);
                if combo.is_none() || action.is_none() {
                    warn!(key = %key, action = %name, "ignoring unknown keybinding");
                }
                Some((combo?, action?))
            })
            .collect();

        Some(Self { fleet })
    }

    pub fn action_for(&self, key: &KeyEvent) -> Option<BoundAction> {
        self.fleet.get(&KeyCombo::from_event(key)).copied()
    }

    /// Display strings for every key bound to `action`, sorted for stable output
    pub fn keys_for(&self, action: BoundAction) -> Vec<String> {
        let mut keys: Vec<String> = self
            .fleet
            .iter()
            .filter(|(_, a)| **a == action)
            .map(|(combo, _)| combo.display())
            .collect();
        keys.sort();
        keys
    }

    /// First key bound to `action`, for compact hints
    pub fn hint(&self, action: BoundAction) -> String {
        self.keys_for(action)
            .into_iter()
            .next()
            .unwrap_or_else(|| "-".to_string())
    }
}

/// Load keybindings from user config, falling back to defaults
pub fn load_keybindings(path: &Path) -> KeybindingConfig {
    if !path.exists() {
        if let Some(parent) = path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        let _ = std::fs::write(path, DEFAULT_KEYBINDINGS);
        return KeybindingConfig::default();
    }

    std::fs::read_to_string(path)
        .ok()
        .and_then(|content| KeybindingConfig::from_toml(&content))
        .unwrap_or_default()
}

/// Get the path to user's keybindings config file
pub fn user_config_path(config_dir: &Path) -> PathBuf {
    config_dir.join("keybindings.toml")
}
