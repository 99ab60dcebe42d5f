mod action;
pub mod dispatcher;
mod handler;
pub mod health;
mod runtime;
mod state;

pub use action::Action;
pub use dispatcher::{Dispatcher, Operation};
pub use runtime::run_tui;
pub use state::{AppState, InputMode};
