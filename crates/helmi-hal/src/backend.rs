//! Backend trait and configuration.
//!
//! The [`Backend`] trait is the single seam between experiment code and
//! whatever actually runs circuits:
//!
//! ```text
//!   capabilities() ──→ execute()        one circuit, one histogram
//!    (sync, &ref)  └─→ execute_batch()  many circuits, indexed histograms
//! ```
//!
//! Everything behind the seam (transpilation, routing, queueing, polling,
//! authentication) belongs to the backend. Callers never retry; a failed
//! call is reported as an error value, never as a partial histogram.

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use helmi_ir::Circuit;

use crate::capability::Capabilities;
use crate::error::{HalError, HalResult};
use crate::result::Counts;

/// Configuration for a backend instance.
#[derive(Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Name of the backend.
    pub name: String,
    /// API endpoint URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    /// Authentication token.
    #[serde(skip_serializing)]
    pub token: Option<String>,
    /// Additional configuration.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl BackendConfig {
    /// Create a new backend configuration.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            endpoint: None,
            token: None,
            extra: serde_json::Map::new(),
        }
    }

    /// Set the endpoint URL.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Set the authentication token.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Add extra configuration.
    pub fn with_extra(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }

    /// Read an unsigned integer from the extra table.
    pub fn extra_u64(&self, key: &str) -> Option<u64> {
        self.extra.get(key).and_then(serde_json::Value::as_u64)
    }

    /// Read a float from the extra table.
    pub fn extra_f64(&self, key: &str) -> Option<f64> {
        self.extra.get(key).and_then(serde_json::Value::as_f64)
    }
}

impl fmt::Debug for BackendConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BackendConfig")
            .field("name", &self.name)
            .field("endpoint", &self.endpoint)
            .field("token", &"[REDACTED]")
            .field("extra", &self.extra)
            .finish()
    }
}

/// One histogram out of a batch submission.
///
/// Backends may return batch items in any order; `index` is the position of
/// the originating circuit in the submitted slice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchItem {
    /// Index of the circuit in the submitted batch.
    pub index: usize,
    /// Histogram for that circuit.
    pub counts: Counts,
}

impl BatchItem {
    /// Create a batch item.
    pub fn new(index: usize, counts: Counts) -> Self {
        Self { index, counts }
    }
}

/// Trait for circuit-execution backends.
///
/// # Contract
///
/// - `capabilities()` MUST be synchronous and infallible, cached at
///   construction time.
/// - `execute()` blocks (awaits) until the histogram is available. The
///   histogram's keys have one character per measured classical bit.
/// - `execute_batch()` is optional; backends that advertise
///   `capabilities().supports_batch` MUST override it. When a single circuit
///   of the batch fails, report it as [`HalError::BatchItem`] so the caller
///   learns which one.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Get the name of this backend.
    fn name(&self) -> &str;

    /// Get the capabilities of this backend.
    fn capabilities(&self) -> &Capabilities;

    /// Execute one circuit and return its measurement histogram.
    async fn execute(&self, circuit: &Circuit, shots: u32) -> HalResult<Counts>;

    /// Execute several circuits as one logical submission.
    async fn execute_batch(&self, circuits: &[Circuit], shots: u32) -> HalResult<Vec<BatchItem>> {
        let _ = (circuits, shots);
        Err(HalError::Unsupported(format!(
            "backend '{}' does not accept batch submissions",
            self.name()
        )))
    }
}

/// Trait for creating backends from configuration.
pub trait BackendFactory: Backend + Sized {
    /// Create a backend from configuration.
    fn from_config(config: BackendConfig) -> HalResult<Self>;
}

/// Check a request against backend limits.
///
/// Shared by backend implementations so that every backend rejects the same
/// requests with the same error kinds.
pub fn check_request(caps: &Capabilities, circuit: &Circuit, shots: u32) -> HalResult<()> {
    if shots == 0 {
        return Err(HalError::InvalidShots("shots must be positive".into()));
    }
    if shots > caps.max_shots {
        return Err(HalError::InvalidShots(format!(
            "{shots} shots requested but '{}' allows at most {}",
            caps.name, caps.max_shots
        )));
    }
    if circuit.num_qubits() > caps.num_qubits as usize {
        return Err(HalError::CircuitTooLarge(format!(
            "Circuit '{}' has {} qubits but '{}' only has {}",
            circuit.name(),
            circuit.num_qubits(),
            caps.name,
            caps.num_qubits
        )));
    }
    for inst in circuit.instructions() {
        if let Some(gate) = inst.as_gate() {
            if gate.num_qubits() == 2 {
                let (a, b) = (inst.qubits[0].0, inst.qubits[1].0);
                if !caps.topology.is_connected(a, b) {
                    return Err(HalError::InvalidCircuit(format!(
                        "{} between {} and {} is not on the coupling map of '{}'",
                        gate.name(),
                        inst.qubits[0].label(),
                        inst.qubits[1].label(),
                        caps.name
                    )));
                }
            }
        }
    }
    Ok(())
}
