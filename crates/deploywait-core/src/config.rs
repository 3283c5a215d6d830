//! Configuration for the wait pipeline.
//!
//! Settings are read from `deploywait.toml` in the working directory and from
//! `INPUT_`-prefixed environment variables (the convention CI runners use for
//! step inputs), with the environment taking precedence.

use figment::providers::{Env, Format, Toml};
use figment::Figment;
use secrecy::SecretString;
use serde::Deserialize;
use std::time::Duration;

use crate::error::WaitError;

/// Budget for the deploy record to appear, in seconds.
pub const CREATION_BUDGET_SECS: u64 = 300;

/// Budget for the deploy to reach a terminal state, in seconds.
pub const READINESS_BUDGET_SECS: u64 = 900;

/// Default budget for the reachability probe, in seconds. Overridable via the
/// `max_ready_timeout` input.
pub const DEFAULT_MAX_READY_TIMEOUT_SECS: u64 = 60;

/// Budget for the single-attempt probe of the previous deploy on the
/// no-content-change path, in seconds.
pub const FALLBACK_PROBE_BUDGET_SECS: u64 = 3;

/// Seconds between deploy-listing polls.
pub const CREATION_POLL_INTERVAL_SECS: u64 = 15;

/// Seconds between readiness polls.
pub const READINESS_POLL_INTERVAL_SECS: u64 = 30;

/// Seconds per reachability retry slot.
pub const PROBE_RETRY_INTERVAL_SECS: u64 = 3;

/// Default deploy API base URL.
pub const DEFAULT_API_BASE: &str = "https://api.netlify.com/api/v1";

/// Default domain preview hostnames are published under.
pub const DEFAULT_PREVIEW_DOMAIN: &str = "netlify.app";

/// Environment variables consulted for the API credential, in order.
const TOKEN_VARS: [&str; 2] = ["NETLIFY_AUTH_TOKEN", "INPUT_ACCESS_TOKEN"];

/// Wait pipeline configuration.
///
/// An empty `site_id` means the setting was never provided; callers must
/// [`validate`](Self::validate) before using the config.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WaitConfig {
    /// Site whose deploys are watched. Required.
    pub site_id: String,
    /// Reachability budget in seconds.
    pub max_ready_timeout: u64,
    /// Deploy API base URL.
    pub api_base: String,
    /// Domain preview hostnames are published under.
    pub preview_domain: String,
}

impl Default for WaitConfig {
    fn default() -> Self {
        Self {
            site_id: String::new(),
            max_ready_timeout: DEFAULT_MAX_READY_TIMEOUT_SECS,
            api_base: DEFAULT_API_BASE.to_owned(),
            preview_domain: DEFAULT_PREVIEW_DOMAIN.to_owned(),
        }
    }
}

impl WaitConfig {
    /// Load configuration from files and environment.
    ///
    /// Sources are merged in order (later overrides earlier):
    /// 1. Default values
    /// 2. `deploywait.toml` in the current directory
    /// 3. Environment variables prefixed with `INPUT_`
    pub fn load() -> Result<Self, WaitError> {
        Figment::new()
            .merge(Toml::file("deploywait.toml"))
            .merge(Env::prefixed("INPUT_"))
            .extract()
            .map_err(|e| WaitError::MissingConfig(e.to_string()))
    }

    /// Check the settings that have no usable default.
    pub fn validate(&self) -> Result<(), WaitError> {
        if self.site_id.is_empty() {
            return Err(WaitError::MissingConfig("site_id".to_owned()));
        }
        Ok(())
    }

    /// The reachability budget as a [`Duration`].
    pub fn reachability_budget(&self) -> Duration {
        Duration::from_secs(self.max_ready_timeout)
    }
}

/// Read the API credential from the environment.
pub fn load_token() -> Result<SecretString, WaitError> {
    for var in TOKEN_VARS {
        if let Ok(value) = std::env::var(var) {
            if !value.is_empty() {
                return Ok(SecretString::from(value));
            }
        }
    }
    Err(WaitError::MissingConfig(
        "access token (set NETLIFY_AUTH_TOKEN)".to_owned(),
    ))
}
