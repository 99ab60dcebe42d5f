use crate::config::keybindings::BoundAction;
use crate::config::KeybindingConfig;
use crate::models::DroneCommand;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

const FLEET_ACTIONS: [BoundAction; 13] = [
    BoundAction::MoveDown,
    BoundAction::MoveUp,
    BoundAction::ToggleSelect,
    BoundAction::AddDrone,
    BoundAction::RemoveDrone,
    BoundAction::ScanConnect,
    BoundAction::ConnectSelected,
    BoundAction::DisconnectAll,
    BoundAction::CheckBattery,
    BoundAction::Takeoff,
    BoundAction::Land,
    BoundAction::Help,
    BoundAction::Quit,
];

fn section(title: &str) -> Line<'static> {
    Line::from(Span::styled(
        title.to_string(),
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
    ))
}

fn entry(keys: String, description: &str) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("  {:<12}", keys), Style::default().fg(Color::Cyan)),
        Span::raw(description.to_string()),
    ])
}

pub fn render(frame: &mut Frame, keybindings: &KeybindingConfig) {
    let area = centered_rect(60, 80, frame.area());
    frame.render_widget(Clear, area);

    let mut lines = vec![
        Line::from(Span::styled(
            "Dronedeck - Drone Fleet Dashboard",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        section("Fleet"),
    ];
    for action in FLEET_ACTIONS {
        lines.push(entry(keybindings.keys_for(action).join("/"), action.description()));
    }

    lines.push(Line::from(""));
    lines.push(section("Keyboard Controls (connected drones only)"));
    for command in DroneCommand::all() {
        lines.push(entry(command.key_hint().to_string(), command.description()));
    }

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));

    let paragraph = Paragraph::new(lines)
        .block(block)
        .alignment(Alignment::Left);

    frame.render_widget(paragraph, area);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
