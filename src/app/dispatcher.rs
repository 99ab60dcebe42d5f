//! Command dispatcher.
//!
//! Each operation marks the shared status busy, sends one backend request from
//! a spawned task and reports back through the action channel. The UI loop
//! then calls [`Dispatcher::finish`], which applies the store mutation only if
//! the request succeeded. Nothing is retried, queued or cancelled.

use super::{Action, AppState};
use crate::backend::{BackendError, FleetBackend};
use crate::models::DroneCommand;
use std::collections::{HashMap, HashSet};
use std::future::Future;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{info, warn};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    ConnectSelected,
    DisconnectAll,
    CheckBattery,
    TakeOffAll,
    LandAll,
    Command(DroneCommand),
    ScanAndConnect,
}

impl Operation {
    pub fn label(&self) -> String {
        match self {
            Operation::ConnectSelected => "connect".to_string(),
            Operation::DisconnectAll => "disconnect".to_string(),
            Operation::CheckBattery => "check battery".to_string(),
            Operation::TakeOffAll => "take off".to_string(),
            Operation::LandAll => "land".to_string(),
            Operation::Command(command) => format!("execute command: {}", command),
            Operation::ScanAndConnect => "scan and connect".to_string(),
        }
    }

    /// Message shown to the operator when the request fails
    pub fn failure_message(&self) -> String {
        format!("Failed to {}", self.label())
    }
}

/// Result of one backend round trip, folded back into the store by the UI loop
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Connected(HashSet<Uuid>),
    Disconnected,
    BatteryLevels(HashMap<String, u8>),
    TookOff,
    Landed,
    CommandSent(DroneCommand),
    /// First half of scan-and-connect
    Scanned(Vec<String>),
    Failed(Operation),
}

pub struct Dispatcher {
    backend: Arc<dyn FleetBackend>,
    action_tx: mpsc::UnboundedSender<Action>,
}

impl Dispatcher {
    pub fn new(backend: Arc<dyn FleetBackend>, action_tx: mpsc::UnboundedSender<Action>) -> Self {
        Self { backend, action_tx }
    }

    pub fn dispatch(&self, state: &mut AppState, operation: Operation) {
        state.status.begin();
        info!(operation = %operation.label(), "dispatching");

        let backend = Arc::clone(&self.backend);
        match operation {
            Operation::ConnectSelected => {
                // Targets are fixed now; later selection edits do not affect this request.
                let targets = state.fleet.selected_ids().clone();
                let addresses = state.fleet.addresses_for(&targets);
                self.spawn_connect(operation, addresses, targets);
            }
            Operation::DisconnectAll => self.spawn(operation, async move {
                backend.disconnect().await.map(|_| Outcome::Disconnected)
            }),
            Operation::CheckBattery => self.spawn(operation, async move {
                backend.battery_levels().await.map(Outcome::BatteryLevels)
            }),
            Operation::TakeOffAll => self.spawn(operation, async move {
                backend.takeoff().await.map(|_| Outcome::TookOff)
            }),
            Operation::LandAll => self.spawn(operation, async move {
                backend.land().await.map(|_| Outcome::Landed)
            }),
            Operation::Command(command) => self.spawn(operation, async move {
                backend
                    .send_command(command)
                    .await
                    .map(|_| Outcome::CommandSent(command))
            }),
            Operation::ScanAndConnect => self.spawn(operation, async move {
                backend.scan().await.map(Outcome::Scanned)
            }),
        }
    }

    /// Fold a finished request into the state
    pub fn finish(&self, state: &mut AppState, outcome: Outcome) {
        match outcome {
            Outcome::Connected(targets) => state.fleet.apply_connect_result(&targets),
            Outcome::Disconnected => state.fleet.apply_disconnect_all(),
            Outcome::BatteryLevels(levels) => state.fleet.apply_battery_levels(&levels),
            Outcome::TookOff => state.fleet.apply_takeoff(),
            Outcome::Landed => state.fleet.apply_land(),
            Outcome::CommandSent(command) => {
                info!(%command, "command acknowledged");
            }
            Outcome::Scanned(found) => {
                let addresses = dedup_in_order(found);
                let targets = state.fleet.merge_discovered(&addresses);
                info!(discovered = addresses.len(), "scan finished, connecting");
                // The scan's in-flight slot carries over to the connect half.
                self.spawn_connect(Operation::ScanAndConnect, addresses, targets);
                return;
            }
            Outcome::Failed(operation) => {
                state.status.fail(operation.failure_message());
                return;
            }
        }
        state.status.complete();
    }

    fn spawn_connect(&self, operation: Operation, addresses: Vec<String>, targets: HashSet<Uuid>) {
        let backend = Arc::clone(&self.backend);
        self.spawn(operation, async move {
            backend
                .connect(&addresses)
                .await
                .map(|_| Outcome::Connected(targets))
        });
    }

    fn spawn<F>(&self, operation: Operation, request: F)
    where
        F: Future<Output = Result<Outcome, BackendError>> + Send + 'static,
    {
        let action_tx = self.action_tx.clone();
        tokio::spawn(async move {
            let outcome = match request.await {
                Ok(outcome) => outcome,
                Err(e) => {
                    warn!(operation = %operation.label(), "backend request failed: {}", e);
                    Outcome::Failed(operation)
                }
            };
            let _ = action_tx.send(Action::OperationFinished(outcome));
        });
    }
}

fn dedup_in_order(addresses: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    addresses
        .into_iter()
        .filter(|a| seen.insert(a.clone()))
        .collect()
}
