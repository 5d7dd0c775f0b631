//! Orchestrator configuration.
//!
//! Hierarchical loading with later sources overriding earlier:
//! 1. Default values from code
//! 2. Configuration file named by the `CONFIG_PATH` environment variable
//! 3. `CNS_*` environment variables (`CNS_HOST`, `CNS_PORT`, `CNS_USERNAME`,
//!    `CNS_PASSWORD`, ...)
//!
//! Command-line flags are applied on top by the binary, then `validate()`
//! runs once all overrides are in.

use std::env;
use std::fmt::Debug;

use cns_client::StoreError;
use config::Config;
use config::Environment;
use config::File;
use serde::Deserialize;
use serde::Serialize;

use crate::Result;
use crate::constants::DEFAULT_DEBOUNCE_MS;
use crate::constants::DEFAULT_HOST;
use crate::constants::DEFAULT_NAMESPACE;
use crate::constants::DEFAULT_PORT;

#[derive(Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct OrchestratorConfig {
    /// Store host.
    pub host: String,
    /// Store port.
    pub port: u16,
    /// Store auth username; authentication is skipped when empty.
    pub username: String,
    /// Store auth password.
    pub password: String,
    /// Watched namespace root.
    pub namespace: String,
    /// Quiet window for coalescing rebuilds, in milliseconds.
    pub debounce_ms: u64,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            username: String::new(),
            password: String::new(),
            namespace: DEFAULT_NAMESPACE.to_string(),
            debounce_ms: DEFAULT_DEBOUNCE_MS,
        }
    }
}

impl Debug for OrchestratorConfig {
    // Credentials stay out of logs.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrchestratorConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("namespace", &self.namespace)
            .field("debounce_ms", &self.debounce_ms)
            .finish()
    }
}

impl OrchestratorConfig {
    /// Loads configuration from hierarchical sources without validation.
    /// Callers apply their own overrides and then call
    /// [`validate()`](Self::validate).
    pub fn load() -> Result<Self> {
        let mut builder = Config::builder().add_source(Config::try_from(&Self::default())?);

        if let Ok(config_path) = env::var("CONFIG_PATH") {
            builder = builder.add_source(File::with_name(&config_path).required(true));
        }

        builder = builder.add_source(
            Environment::with_prefix("CNS")
                .ignore_empty(true)
                .try_parsing(true),
        );

        let config: Self = builder.build()?.try_deserialize()?;
        Ok(config)
    }

    /// Validates the merged configuration and returns it.
    ///
    /// # Errors
    /// [`StoreError::NotConfigured`] for an empty host, port 0, or an empty
    /// namespace.
    pub fn validate(self) -> Result<Self> {
        if self.host.is_empty() {
            return Err(StoreError::NotConfigured("host".into()).into());
        }
        if self.port == 0 {
            return Err(StoreError::NotConfigured("port".into()).into());
        }
        if self.namespace.is_empty() {
            return Err(StoreError::NotConfigured("namespace".into()).into());
        }
        Ok(self)
    }
}
