use crate::app::{AppState, InputMode};
use crate::config::KeybindingConfig;
use crate::tui::components::{controls_bar, fleet_list, header, help_popup, status_bar};
use ratatui::{
    layout::{Constraint, Direction, Layout},
    Frame,
};

pub fn draw(frame: &mut Frame, state: &AppState, keybindings: &KeybindingConfig) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(3),    // Fleet
            Constraint::Length(1), // Controls
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    header::render(frame, chunks[0], state);
    fleet_list::render(frame, chunks[1], state);
    controls_bar::render(frame, chunks[2], state, keybindings);
    status_bar::render(frame, chunks[3], state);

    if state.ui.input_mode == InputMode::Help {
        help_popup::render(frame, keybindings);
    }
}
