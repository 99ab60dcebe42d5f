use crate::app::AppState;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

pub fn render(frame: &mut Frame, area: Rect, state: &AppState) {
    let total = state.fleet.len();
    let connected = state.fleet.connected_count();
    let selected = state.fleet.selected_ids().len();

    let mut spans = vec![
        Span::styled(
            " Drone Fleet ",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ),
        Span::styled(format!(" Total: {} ", total), Style::default().fg(Color::Gray)),
        Span::styled(
            format!(" Connected: {}/{} ", connected, total),
            Style::default().fg(if connected > 0 { Color::Green } else { Color::DarkGray }),
        ),
        Span::styled(format!(" Selected: {} ", selected), Style::default().fg(Color::Gray)),
    ];

    if state.status.is_busy() {
        spans.push(Span::styled(
            format!("  {} Processing...", state.spinner_char()),
            Style::default().fg(Color::Blue),
        ));
    }
    if state.status.error().is_some() {
        spans.push(Span::styled(
            "  ● Error",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));

    frame.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
}
