use super::dispatcher::Dispatcher;
use super::{Action, AppState, InputMode};
use anyhow::Result;
use tracing::info;

pub fn process_action(state: &mut AppState, action: Action, dispatcher: &Dispatcher) -> Result<()> {
    match action {
        Action::Quit => {
            state.should_quit = true;
        }
        Action::Tick => {
            state.tick_animation();
        }

        Action::MoveUp => state.select_prev(),
        Action::MoveDown => state.select_next(),

        Action::EnterAddDroneMode => {
            state.ui.input_mode = InputMode::AddDrone;
            state.ui.input_buffer = state.ui.address_prefix.clone();
        }
        Action::InputChar(c) => {
            state.ui.input_buffer.push(c);
        }
        Action::InputBackspace => {
            state.ui.input_buffer.pop();
        }
        Action::AddDrone(address) => {
            let id = state.fleet.add_drone(address.clone());
            info!(%id, %address, "drone added");
            state.ui.input_mode = InputMode::Normal;
            state.ui.input_buffer.clear();
            state.ui.highlighted_idx = state.fleet.len().saturating_sub(1);
        }
        Action::ToggleSelected(id) => {
            state.fleet.toggle_selected(id);
        }

        Action::InitiateRemoveDrone(id, address) => {
            state.ui.pending_delete = Some((id, address));
        }
        Action::ConfirmRemoveDrone => {
            if let Some((id, address)) = state.ui.pending_delete.take() {
                state.fleet.remove_drone(id);
                state.clamp_highlight();
                info!(%id, %address, "drone removed");
            }
        }
        Action::CancelPendingDelete => {
            state.ui.pending_delete = None;
        }

        Action::Dispatch(operation) => dispatcher.dispatch(state, operation),
        Action::OperationFinished(outcome) => dispatcher.finish(state, outcome),
        Action::HealthCheckFailed(message) => state.status.report(message),

        Action::EnterHelpMode => {
            state.ui.input_mode = InputMode::Help;
        }
        Action::ExitMode => {
            state.ui.input_mode = InputMode::Normal;
            state.ui.input_buffer.clear();
        }
    }

    Ok(())
}
