use crate::app::{Action, AppState, InputMode, Operation};
use crate::config::keybindings::BoundAction;
use crate::config::KeybindingConfig;
use crate::models::DroneCommand;
use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::time::Duration;
use tokio::sync::mpsc;

/// Internal event type for terminal events
enum TerminalEvent {
    Key(KeyEvent),
    Tick,
}

pub struct EventHandler {
    action_tx: mpsc::UnboundedSender<Action>,
    action_rx: mpsc::UnboundedReceiver<Action>,
    terminal_rx: mpsc::UnboundedReceiver<TerminalEvent>,
    keybindings: KeybindingConfig,
}

impl EventHandler {
    pub fn new(keybindings: KeybindingConfig) -> Self {
        let (action_tx, action_rx) = mpsc::unbounded_channel();
        let (terminal_tx, terminal_rx) = mpsc::unbounded_channel();

        // Spawn dedicated thread for terminal events
        std::thread::spawn(move || {
            let poll_timeout = Duration::from_millis(100);
            loop {
                let event = if event::poll(poll_timeout).unwrap_or(false) {
                    match event::read() {
                        Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => {
                            TerminalEvent::Key(key)
                        }
                        _ => TerminalEvent::Tick,
                    }
                } else {
                    TerminalEvent::Tick
                };

                if terminal_tx.send(event).is_err() {
                    break; // Channel closed, exit thread
                }
            }
        });

        Self {
            action_tx,
            action_rx,
            terminal_rx,
            keybindings,
        }
    }

    /// Sender for backend completions and monitor reports
    pub fn action_sender(&self) -> mpsc::UnboundedSender<Action> {
        self.action_tx.clone()
    }

    pub fn keybindings(&self) -> &KeybindingConfig {
        &self.keybindings
    }

    pub async fn next(&mut self, state: &AppState) -> Result<Action> {
        tokio::select! {
            biased; // Keyboard input first

            Some(event) = self.terminal_rx.recv() => {
                Ok(match event {
                    TerminalEvent::Key(key) => handle_key_event(key, state, &self.keybindings),
                    TerminalEvent::Tick => Action::Tick,
                })
            }
            Some(action) = self.action_rx.recv() => Ok(action),
            else => Ok(Action::Quit),
        }
    }
}

/// Arrow keys and `f` steer every connected drone. Not rebindable.
fn flight_command(key: &KeyEvent) -> Option<DroneCommand> {
    if key
        .modifiers
        .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
    {
        return None;
    }
    match key.code {
        KeyCode::Up => Some(DroneCommand::Forward),
        KeyCode::Down => Some(DroneCommand::Backward),
        KeyCode::Left => Some(DroneCommand::Left),
        KeyCode::Right => Some(DroneCommand::Right),
        KeyCode::Char('f') | KeyCode::Char('F') => Some(DroneCommand::Flip),
        _ => None,
    }
}

/// Map a key press to an action. Keys whose preconditions are not met map to
/// `Tick` so that nothing is sent.
pub fn handle_key_event(key: KeyEvent, state: &AppState, keybindings: &KeybindingConfig) -> Action {
    match state.ui.input_mode {
        InputMode::Help => {
            return match key.code {
                KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('?') | KeyCode::Enter => {
                    Action::ExitMode
                }
                _ => Action::Tick,
            };
        }
        InputMode::AddDrone => {
            return match key.code {
                KeyCode::Esc => Action::ExitMode,
                KeyCode::Enter => {
                    if state.ui.input_buffer.is_empty() {
                        Action::ExitMode
                    } else {
                        Action::AddDrone(state.ui.input_buffer.clone())
                    }
                }
                KeyCode::Backspace => Action::InputBackspace,
                KeyCode::Char(c)
                    if !key.modifiers.contains(KeyModifiers::CONTROL)
                        && !key.modifiers.contains(KeyModifiers::ALT) =>
                {
                    Action::InputChar(c)
                }
                _ => Action::Tick,
            };
        }
        InputMode::Normal => {}
    }

    let bound = keybindings.action_for(&key);

    // Second delete press confirms, any other key cancels
    if state.ui.pending_delete.is_some() {
        return if bound == Some(BoundAction::RemoveDrone) {
            Action::ConfirmRemoveDrone
        } else {
            Action::CancelPendingDelete
        };
    }

    if let Some(command) = flight_command(&key) {
        return if state.can_command_fleet() {
            Action::Dispatch(Operation::Command(command))
        } else {
            Action::Tick
        };
    }

    match bound {
        Some(bound) => bound_action(bound, state),
        None => Action::Tick,
    }
}

fn bound_action(bound: BoundAction, state: &AppState) -> Action {
    let gated = |ready: bool, operation: Operation| {
        if ready {
            Action::Dispatch(operation)
        } else {
            Action::Tick
        }
    };

    match bound {
        BoundAction::Quit => Action::Quit,
        BoundAction::Help => Action::EnterHelpMode,
        BoundAction::MoveUp => Action::MoveUp,
        BoundAction::MoveDown => Action::MoveDown,
        BoundAction::AddDrone => Action::EnterAddDroneMode,
        BoundAction::ToggleSelect => state
            .highlighted_drone_id()
            .map(Action::ToggleSelected)
            .unwrap_or(Action::Tick),
        BoundAction::RemoveDrone => state
            .fleet
            .drones()
            .get(state.ui.highlighted_idx)
            .map(|d| Action::InitiateRemoveDrone(d.id, d.address.clone()))
            .unwrap_or(Action::Tick),
        BoundAction::ConnectSelected => {
            gated(state.can_connect_selected(), Operation::ConnectSelected)
        }
        BoundAction::DisconnectAll => gated(state.can_command_fleet(), Operation::DisconnectAll),
        BoundAction::CheckBattery => gated(state.can_command_fleet(), Operation::CheckBattery),
        BoundAction::Takeoff => gated(state.can_command_fleet(), Operation::TakeOffAll),
        BoundAction::Land => gated(state.can_command_fleet(), Operation::LandAll),
        BoundAction::ScanConnect => Action::Dispatch(Operation::ScanAndConnect),
    }
}
