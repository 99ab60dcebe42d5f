use crate::app::{AppState, InputMode};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

fn badge(text: &str, bg: Color) -> Span<'static> {
    Span::styled(
        format!(" {} ", text),
        Style::default()
            .fg(Color::Black)
            .bg(bg)
            .add_modifier(Modifier::BOLD),
    )
}

pub fn render(frame: &mut Frame, area: Rect, state: &AppState) {
    let spans = if let Some((_, address)) = &state.ui.pending_delete {
        vec![
            badge("DELETE?", Color::Red),
            Span::raw(" "),
            Span::styled(
                format!("Remove drone {}?", address),
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                "  press d again to confirm, any other key to cancel",
                Style::default().fg(Color::Gray),
            ),
        ]
    } else {
        match state.ui.input_mode {
            InputMode::AddDrone => vec![
                badge("ADD DRONE", Color::Green),
                Span::raw(" "),
                Span::styled(
                    format!("{}_", state.ui.input_buffer),
                    Style::default().fg(Color::White),
                ),
                Span::styled(
                    "  Enter to add, Esc to cancel",
                    Style::default().fg(Color::Gray),
                ),
            ],
            InputMode::Help => vec![
                badge("HELP", Color::Yellow),
                Span::styled(" Press Esc or ? to close", Style::default().fg(Color::Gray)),
            ],
            InputMode::Normal => match state.status.error() {
                Some(message) => vec![
                    badge("ERROR", Color::Red),
                    Span::raw(" "),
                    Span::styled(message.to_string(), Style::default().fg(Color::Red)),
                ],
                None if state.status.is_busy() => vec![
                    badge("BUSY", Color::Blue),
                    Span::styled(
                        format!(" {} request(s) in flight", state.status.in_flight()),
                        Style::default().fg(Color::Gray),
                    ),
                ],
                None => vec![
                    badge("READY", Color::Green),
                    Span::styled(" q to quit", Style::default().fg(Color::Gray)),
                ],
            },
        }
    };

    let paragraph = Paragraph::new(Line::from(spans))
        .style(Style::default().bg(Color::DarkGray).fg(Color::White));
    frame.render_widget(paragraph, area);
}
