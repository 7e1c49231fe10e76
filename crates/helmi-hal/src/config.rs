//! Endpoint configuration for Helmi hardware runs.

use crate::backend::BackendConfig;
use crate::error::{HalError, HalResult};

/// Environment variable holding the Cortex endpoint of the Helmi device.
pub const HELMI_CORTEX_URL: &str = "HELMI_CORTEX_URL";

/// Resolved endpoint for Helmi hardware runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HelmiConfig {
    /// Cortex endpoint URL.
    pub cortex_url: String,
}

impl HelmiConfig {
    /// Create a configuration from an already-resolved endpoint.
    pub fn new(cortex_url: impl Into<String>) -> HalResult<Self> {
        Self::from_value(Some(cortex_url.into()))
    }

    /// Resolve the endpoint from `HELMI_CORTEX_URL`.
    ///
    /// A missing or blank variable is a configuration error. There is no
    /// fallback here; substituting a simulator is the caller's decision.
    pub fn from_env() -> HalResult<Self> {
        Self::from_value(std::env::var(HELMI_CORTEX_URL).ok())
    }

    fn from_value(value: Option<String>) -> HalResult<Self> {
        match value.map(|v| v.trim().to_string()) {
            Some(url) if !url.is_empty() => Ok(Self { cortex_url: url }),
            _ => Err(HalError::Configuration(format!(
                "Environment variable {HELMI_CORTEX_URL} is not set"
            ))),
        }
    }

    /// Backend configuration pointing at this endpoint.
    pub fn backend_config(&self) -> BackendConfig {
        BackendConfig::new("helmi").with_endpoint(&self.cortex_url)
    }
}
