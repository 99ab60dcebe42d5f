use super::dispatcher::{Operation, Outcome};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    // Navigation
    MoveUp,
    MoveDown,

    // Fleet editing
    EnterAddDroneMode,
    AddDrone(String),
    ToggleSelected(Uuid),
    InitiateRemoveDrone(Uuid, String), // (id, address) - first 'd' press
    ConfirmRemoveDrone,                // second 'd' press
    CancelPendingDelete,

    // Input handling
    InputChar(char),
    InputBackspace,

    // Backend round trips
    Dispatch(Operation),
    OperationFinished(Outcome),
    HealthCheckFailed(String),

    // UI modes
    EnterHelpMode,
    ExitMode,

    // App control
    Quit,
    Tick,
}
