pub mod keybindings;
mod settings;

pub use keybindings::{load_keybindings, KeybindingConfig};
pub use settings::Settings;
