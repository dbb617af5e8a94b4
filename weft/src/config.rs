//! Runtime configuration.
//!
//! The deployment mode toggle and the bounded resolve timeout are supplied by
//! the embedder, never computed by the pipeline itself.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::{ResolveError, ResolveResult};

/// Path resolution strategy selector.
///
/// `Production` assumes a flattened deployment where every component's assets
/// sit alongside one shared root. `Development` assumes the original nested
/// file hierarchy is preserved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeploymentMode {
    Production,
    Development,
}

/// Configuration for a weft runtime instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WeftConfig {
    /// Which path resolution strategy components use for their styles.
    pub mode: DeploymentMode,

    /// Fully-qualified base URL of the host document; the context every
    /// non-local reference is resolved against.
    pub document_base: String,

    /// Bounded wait for a single style resolution operation, in milliseconds.
    /// Expiry fails that waiter without cancelling the underlying retrieval.
    pub resolve_timeout_ms: u64,
}

impl Default for WeftConfig {
    fn default() -> Self {
        Self {
            mode: DeploymentMode::Production,
            document_base: "http://localhost/".to_string(),
            resolve_timeout_ms: 10_000,
        }
    }
}

impl WeftConfig {
    /// Parse a configuration from TOML text.
    pub fn from_toml_str(text: &str) -> ResolveResult<Self> {
        toml::from_str(text).map_err(|e| ResolveError::Internal(format!("invalid config: {}", e)))
    }

    /// The resolve timeout as a `Duration`.
    pub fn resolve_timeout(&self) -> Duration {
        Duration::from_millis(self.resolve_timeout_ms)
    }
}
