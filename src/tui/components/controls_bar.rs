use crate::app::AppState;
use crate::config::keybindings::BoundAction;
use crate::config::KeybindingConfig;
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

/// One-line key hints; actions whose preconditions fail are dimmed
pub fn render(frame: &mut Frame, area: Rect, state: &AppState, keybindings: &KeybindingConfig) {
    let can_fly = state.can_command_fleet();
    let has_drone = state.highlighted_drone_id().is_some();

    let hints = [
        (BoundAction::AddDrone, "add", true),
        (BoundAction::ToggleSelect, "select", has_drone),
        (BoundAction::RemoveDrone, "del", has_drone),
        (BoundAction::ScanConnect, "scan", true),
        (BoundAction::ConnectSelected, "connect", state.can_connect_selected()),
        (BoundAction::DisconnectAll, "disconnect", can_fly),
        (BoundAction::CheckBattery, "battery", can_fly),
        (BoundAction::Takeoff, "takeoff", can_fly),
        (BoundAction::Land, "land", can_fly),
        (BoundAction::Help, "help", true),
    ];

    let mut spans = vec![Span::raw(" ")];
    for (action, label, enabled) in hints {
        let (key_style, label_style) = if enabled {
            (Style::default().fg(Color::Cyan), Style::default().fg(Color::Gray))
        } else {
            (
                Style::default().fg(Color::Rgb(60, 60, 60)),
                Style::default().fg(Color::Rgb(60, 60, 60)),
            )
        };
        spans.push(Span::styled(keybindings.hint(action), key_style));
        spans.push(Span::styled(format!(":{}  ", label), label_style));
    }

    let fly_style = if can_fly {
        Style::default().fg(Color::Magenta)
    } else {
        Style::default().fg(Color::Rgb(60, 60, 60))
    };
    spans.push(Span::styled("←↑↓→ f:fly", fly_style));

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
