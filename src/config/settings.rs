use crate::persistence::GlobalConfig;
use std::time::Duration;

/// Upper bound for the health check period (one day)
pub const MAX_HEALTH_INTERVAL_SECS: u64 = 24 * 60 * 60;

/// Effective runtime settings after layering CLI/env over the config file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub backend_url: String,
    pub health_interval: Duration,
    pub address_prefix: String,
}

impl Settings {
    /// Flags (or their env vars) win over the config file.
    pub fn resolve(
        file: GlobalConfig,
        backend_url: Option<String>,
        health_interval_secs: Option<u64>,
    ) -> Self {
        let backend_url = backend_url
            .filter(|url| !url.trim().is_empty())
            .unwrap_or(file.backend_url);
        let secs = health_interval_secs
            .unwrap_or(file.health_interval_secs)
            .clamp(1, MAX_HEALTH_INTERVAL_SECS);

        Self {
            backend_url: backend_url.trim().trim_end_matches('/').to_string(),
            health_interval: Duration::from_secs(secs),
            address_prefix: file.address_prefix,
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self::resolve(GlobalConfig::default(), None, None)
    }
}
