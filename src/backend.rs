//! HTTP client for the flight-control backend.

use crate::models::DroneCommand;
use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use thiserror::Error;
use tracing::{debug, warn};

pub const HEALTH_CHECK: &str = "/health_check";
pub const CONNECT: &str = "/connect";
pub const DISCONNECT: &str = "/disconnect";
pub const GET_BATTERY: &str = "/get_battery";
pub const TAKEOFF: &str = "/takeoff";
pub const LAND: &str = "/land";
pub const COMMAND: &str = "/command";
pub const SCAN: &str = "/scan";

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("request to {endpoint} failed: {source}")]
    Transport {
        endpoint: &'static str,
        #[source]
        source: reqwest::Error,
    },
    #[error("{endpoint} returned {status}")]
    Status {
        endpoint: &'static str,
        status: StatusCode,
    },
    #[error("could not decode {endpoint} response: {source}")]
    Decode {
        endpoint: &'static str,
        #[source]
        source: reqwest::Error,
    },
}

/// Calls the dashboard makes against the backend. Any non-2xx answer is an error.
#[async_trait]
pub trait FleetBackend: Send + Sync {
    async fn health_check(&self) -> Result<(), BackendError>;

    async fn connect(&self, addresses: &[String]) -> Result<(), BackendError>;

    async fn disconnect(&self) -> Result<(), BackendError>;

    /// Battery percentage keyed by drone address
    async fn battery_levels(&self) -> Result<HashMap<String, u8>, BackendError>;

    async fn takeoff(&self) -> Result<(), BackendError>;

    async fn land(&self) -> Result<(), BackendError>;

    async fn send_command(&self, command: DroneCommand) -> Result<(), BackendError>;

    /// Addresses of drones currently reachable on the network
    async fn scan(&self) -> Result<Vec<String>, BackendError>;
}

#[derive(Serialize)]
struct ConnectRequest<'a> {
    addresses: &'a [String],
}

#[derive(Serialize)]
struct CommandRequest {
    command: DroneCommand,
}

pub struct HttpBackend {
    client: Client,
    base_url: String,
}

impl HttpBackend {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }

    async fn get(&self, endpoint: &'static str) -> Result<Response, BackendError> {
        debug!("GET {}", endpoint);
        let response = self
            .client
            .get(self.url(endpoint))
            .send()
            .await
            .map_err(|source| BackendError::Transport { endpoint, source })?;
        check_status(endpoint, response)
    }

    async fn post<T: Serialize + ?Sized>(
        &self,
        endpoint: &'static str,
        body: &T,
    ) -> Result<Response, BackendError> {
        debug!("POST {}", endpoint);
        let response = self
            .client
            .post(self.url(endpoint))
            .json(body)
            .send()
            .await
            .map_err(|source| BackendError::Transport { endpoint, source })?;
        check_status(endpoint, response)
    }
}

fn check_status(endpoint: &'static str, response: Response) -> Result<Response, BackendError> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(BackendError::Status { endpoint, status })
    }
}

/// Battery entries are read per drone: any finite number is rounded and
/// clamped to 0..=100, anything else (including `null`) means unknown.
fn battery_percent(value: &Value) -> Option<u8> {
    let level = value.as_f64().filter(|l| l.is_finite())?;
    Some(level.round().clamp(0.0, 100.0) as u8)
}

#[async_trait]
impl FleetBackend for HttpBackend {
    async fn health_check(&self) -> Result<(), BackendError> {
        self.get(HEALTH_CHECK).await.map(|_| ())
    }

    async fn connect(&self, addresses: &[String]) -> Result<(), BackendError> {
        self.post(CONNECT, &ConnectRequest { addresses })
            .await
            .map(|_| ())
    }

    async fn disconnect(&self) -> Result<(), BackendError> {
        self.get(DISCONNECT).await.map(|_| ())
    }

    async fn battery_levels(&self) -> Result<HashMap<String, u8>, BackendError> {
        let raw: HashMap<String, Value> = self
            .get(GET_BATTERY)
            .await?
            .json()
            .await
            .map_err(|source| BackendError::Decode {
                endpoint: GET_BATTERY,
                source,
            })?;

        Ok(raw
            .into_iter()
            .filter_map(|(address, value)| {
                let level = battery_percent(&value);
                if level.is_none() && !value.is_null() {
                    warn!(%address, %value, "ignoring unreadable battery level");
                }
                Some((address, level?))
            })
            .collect())
    }

    async fn takeoff(&self) -> Result<(), BackendError> {
        self.get(TAKEOFF).await.map(|_| ())
    }

    async fn land(&self) -> Result<(), BackendError> {
        self.get(LAND).await.map(|_| ())
    }

    async fn send_command(&self, command: DroneCommand) -> Result<(), BackendError> {
        self.post(COMMAND, &CommandRequest { command })
            .await
            .map(|_| ())
    }

    async fn scan(&self) -> Result<Vec<String>, BackendError> {
        self.get(SCAN)
            .await?
            .json()
            .await
            .map_err(|source| BackendError::Decode {
                endpoint: SCAN,
                source,
            })
    }
}
