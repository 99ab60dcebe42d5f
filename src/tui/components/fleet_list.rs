use crate::app::AppState;
use crate::models::{BatteryBand, Drone};
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

pub fn render(frame: &mut Frame, area: Rect, state: &AppState) {
    let title = format!(" Drones ({}) ", state.fleet.len());
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    if state.fleet.is_empty() {
        let hint = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(
                "No drones yet. Press a to add one by address or s to scan the network.",
                Style::default().fg(Color::DarkGray),
            )),
        ])
        .alignment(Alignment::Center)
        .block(block);
        frame.render_widget(hint, area);
        return;
    }

    let items: Vec<ListItem> = state
        .fleet
        .drones()
        .iter()
        .enumerate()
        .map(|(idx, drone)| drone_item(state, idx, drone))
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().bg(Color::Rgb(40, 50, 60)));

    let mut list_state = ListState::default();
    list_state.select(Some(state.ui.highlighted_idx));

    frame.render_stateful_widget(list, area, &mut list_state);
}

fn drone_item<'a>(state: &AppState, idx: usize, drone: &Drone) -> ListItem<'a> {
    let is_highlighted = idx == state.ui.highlighted_idx;
    let is_selected = state.fleet.is_selected(drone.id);

    let prefix = if is_highlighted { "> " } else { "  " };
    let checkbox = if is_selected { "[x] " } else { "[ ] " };

    let address_style = if is_highlighted {
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::White)
    };

    let (link, link_style) = if drone.connected {
        ("● online ", Style::default().fg(Color::Green))
    } else {
        ("○ offline", Style::default().fg(Color::Red))
    };

    let battery_style = match drone.battery_band() {
        BatteryBand::High => Style::default().fg(Color::Green),
        BatteryBand::Medium => Style::default().fg(Color::Yellow),
        BatteryBand::Low => Style::default().fg(Color::Red),
        BatteryBand::Unknown => Style::default().fg(Color::DarkGray),
    };

    let flight_style = if drone.is_airborne() {
        Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Gray)
    };

    ListItem::new(Line::from(vec![
        Span::styled(prefix.to_string(), address_style),
        Span::styled(checkbox.to_string(), Style::default().fg(Color::Yellow)),
        Span::styled(format!("{:<18}", drone.address), address_style),
        Span::styled(format!("{}  ", link), link_style),
        Span::styled(format!("bat {:>4}  ", drone.battery_display()), battery_style),
        Span::styled(format!("{:<9} ", drone.flight_status.label()), flight_style),
        Span::styled(
            format!("last contact {}", drone.last_contact_display()),
            Style::default().fg(Color::DarkGray),
        ),
    ]))
}
