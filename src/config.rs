//! Relay configuration, read from the environment once at startup and
//! immutable afterwards.

use std::env;

use crate::providers::{ProviderConfig, ProviderKind};

/// Process-wide relay configuration.
#[derive(Debug, Clone)]
pub struct RelayConfig {
    /// Providers in selection priority order.
    pub providers: Vec<ProviderConfig>,
    /// CORS allow-list; empty means any origin.
    pub allowed_origins: Vec<String>,
    /// Upstream round-trip timeout in seconds.
    pub upstream_timeout_secs: u64,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            providers: ProviderKind::ALL
                .iter()
                .map(|&kind| ProviderConfig::new(kind, ""))
                .collect(),
            allowed_origins: Vec::new(),
            upstream_timeout_secs: 30,
        }
    }
}

impl RelayConfig {
    /// Read credentials and relay settings from the process environment.
    ///
    /// Absent credentials are valid; with none configured every request is
    /// served by the demo responder.
    pub fn from_env() -> Self {
        let providers = ProviderKind::ALL
            .iter()
            .map(|&kind| {
                let credential = env::var(kind.env_key()).unwrap_or_default();
                let endpoint = env::var(kind.endpoint_env_key())
                    .unwrap_or_else(|_| kind.endpoint().to_string());
                ProviderConfig { kind, credential, endpoint }
            })
            .collect();

        let allowed_origins = env::var("RELAY_ALLOWED_ORIGINS")
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect();

        let upstream_timeout_secs = env::var("RELAY_UPSTREAM_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(30);

        Self { providers, allowed_origins, upstream_timeout_secs }
    }
}
