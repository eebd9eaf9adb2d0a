use anyhow::{ensure, Context, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;

use crate::relay::{reference_endpoints, EndpointCandidate};

const DEFAULT_COMMUNITY_HOST: &str = "community.fostergreatness.co";

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub circle_api_key: String,
    #[serde(default)]
    pub circle_community_id: Option<String>,
    pub circle_community_host: String,
    pub port: u16,
    pub relay_timeout_secs: u64,
    pub frontend_dir: String,
    #[serde(default)]
    pub cors_allowed_origins: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Self::load(config::Environment::default())
    }

    /// Load from an explicit variable map instead of the process environment.
    pub fn from_vars(vars: HashMap<String, String>) -> Result<Self> {
        Self::load(config::Environment::default().source(Some(vars)))
    }

    fn load(env: config::Environment) -> Result<Self> {
        let config: AppConfig = config::Config::builder()
            .set_default("circle_community_host", DEFAULT_COMMUNITY_HOST)?
            .set_default("port", 3000_i64)?
            .set_default("relay_timeout_secs", 10_i64)?
            .set_default("frontend_dir", "frontend/dist")?
            .add_source(env)
            .build()
            .context("Failed to read configuration")?
            .try_deserialize()
            .context("CIRCLE_API_KEY must be set and PORT/RELAY_TIMEOUT_SECS must be valid numbers")?;

        ensure!(
            !config.circle_api_key.trim().is_empty(),
            "CIRCLE_API_KEY must not be empty"
        );
        ensure!(
            !config.circle_community_host.trim().is_empty(),
            "CIRCLE_COMMUNITY_HOST must not be empty"
        );
        ensure!(
            config.relay_timeout_secs > 0,
            "RELAY_TIMEOUT_SECS must be greater than zero"
        );

        Ok(config)
    }

    pub fn relay_timeout(&self) -> Duration {
        Duration::from_secs(self.relay_timeout_secs)
    }

    /// Upstream candidates in the order the relay tries them.
    pub fn endpoints(&self) -> Vec<EndpointCandidate> {
        reference_endpoints(self.circle_api_key.trim(), self.circle_community_host.trim())
    }
}
