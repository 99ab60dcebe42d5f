use crate::store::FleetStore;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    #[default]
    Normal,
    AddDrone,
    Help,
}

/// Busy/error indicator shared by the dispatcher and the health monitor.
///
/// Busy is tracked as a count of operations still waiting on the backend, so
/// one completion cannot clear the indicator while another request is out.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OperationStatus {
    in_flight: usize,
    last_error: Option<String>,
}

impl OperationStatus {
    pub fn is_busy(&self) -> bool {
        self.in_flight > 0
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    pub fn error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// An operation was sent; clears the previous error
    pub fn begin(&mut self) {
        self.in_flight += 1;
        self.last_error = None;
    }

    pub fn complete(&mut self) {
        self.in_flight = self.in_flight.saturating_sub(1);
    }

    pub fn fail(&mut self, message: String) {
        self.complete();
        self.last_error = Some(message);
    }

    /// Record an error without touching the busy count
    pub fn report(&mut self, message: String) {
        self.last_error = Some(message);
    }
}

pub struct UiState {
    pub input_mode: InputMode,
    pub highlighted_idx: usize,
    pub input_buffer: String,
    pub pending_delete: Option<(Uuid, String)>,
    /// Prefilled into the add-drone input
    pub address_prefix: String,
}

impl UiState {
    pub fn new(address_prefix: String) -> Self {
        Self {
            input_mode: InputMode::Normal,
            highlighted_idx: 0,
            input_buffer: String::new(),
            pending_delete: None,
            address_prefix,
        }
    }
}

pub struct AppState {
    pub fleet: FleetStore,
    pub status: OperationStatus,
    pub ui: UiState,
    pub animation_frame: usize,
    pub should_quit: bool,
}

impl AppState {
    pub fn new(fleet: FleetStore, address_prefix: String) -> Self {
        Self {
            fleet,
            status: OperationStatus::default(),
            ui: UiState::new(address_prefix),
            animation_frame: 0,
            should_quit: false,
        }
    }

    pub fn highlighted_drone_id(&self) -> Option<Uuid> {
        self.fleet.drones().get(self.ui.highlighted_idx).map(|d| d.id)
    }

    pub fn select_prev(&mut self) {
        self.ui.highlighted_idx = self.ui.highlighted_idx.saturating_sub(1);
    }

    pub fn select_next(&mut self) {
        if self.ui.highlighted_idx + 1 < self.fleet.len() {
            self.ui.highlighted_idx += 1;
        }
    }

    /// Keep the highlight inside the list after removals
    pub fn clamp_highlight(&mut self) {
        let len = self.fleet.len();
        if len == 0 {
            self.ui.highlighted_idx = 0;
        } else if self.ui.highlighted_idx >= len {
            self.ui.highlighted_idx = len - 1;
        }
    }

    /// Flight, battery and disconnect actions need at least one connected drone
    pub fn can_command_fleet(&self) -> bool {
        self.fleet.any_connected()
    }

    pub fn can_connect_selected(&self) -> bool {
        !self.fleet.is_empty() && self.fleet.has_selection()
    }

    pub fn tick_animation(&mut self) {
        self.animation_frame = self.animation_frame.wrapping_add(1);
    }

    pub fn spinner_char(&self) -> char {
        const SPINNER: [char; 10] = ['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];
        SPINNER[(self.animation_frame / 2) % SPINNER.len()]
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(FleetStore::in_memory(), String::new())
    }
}
