use crate::app::{AppState, Dispatcher};
use crate::backend::{FleetBackend, HttpBackend};
use crate::config::{KeybindingConfig, Settings};
use crate::persistence::Storage;
use crate::store::FleetStore;
use crate::tui;
use crate::tui::event::EventHandler;
use anyhow::Result;
use std::sync::Arc;
use tracing::info;

use super::handler::process_action;
use super::health::spawn_health_monitor;

pub async fn run_tui(settings: Settings, storage: Storage, keybindings: KeybindingConfig) -> Result<()> {
    // Restore the fleet before touching the terminal so load warnings land in the log
    let fleet = FleetStore::open(storage);
    let mut state = AppState::new(fleet, settings.address_prefix.clone());
    let http = HttpBackend::new(&settings.backend_url);
    info!(
        backend = %http.base_url(),
        drones = state.fleet.len(),
        "starting dashboard"
    );

    // Initialize terminal
    let mut terminal = tui::init()?;

    let mut events = EventHandler::new(keybindings);
    let action_tx = events.action_sender();

    let backend: Arc<dyn FleetBackend> = Arc::new(http);
    let dispatcher = Dispatcher::new(Arc::clone(&backend), action_tx.clone());
    let monitor = spawn_health_monitor(backend, settings.health_interval, action_tx);

    let result = run_main_loop(&mut terminal, &mut state, &mut events, &dispatcher).await;

    monitor.abort();
    tui::restore()?;
    info!("dashboard closed");

    result
}

async fn run_main_loop(
    terminal: &mut tui::Terminal,
    state: &mut AppState,
    events: &mut EventHandler,
    dispatcher: &Dispatcher,
) -> Result<()> {
    loop {
        terminal.draw(|frame| tui::ui::draw(frame, state, events.keybindings()))?;

        let action = events.next(state).await?;
        process_action(state, action, dispatcher)?;

        if state.should_quit {
            break;
        }
    }

    Ok(())
}
