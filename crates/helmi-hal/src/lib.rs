//! Helmi Hardware Abstraction Layer
//!
//! The seam between experiment code and whatever executes circuits: a local
//! simulator, a noisy stand-in for the device, or the device itself behind
//! its Cortex endpoint.
//!
//! # Overview
//!
//! - [`Backend`]: `execute` one circuit, optionally `execute_batch` several
//! - [`Capabilities`]: qubit count, coupling map, shot limit, batch support
//! - [`Counts`]: the measurement histogram every backend returns
//! - [`HelmiConfig`]: `HELMI_CORTEX_URL` resolution for hardware runs
//! - [`BackendRegistry`]: name-based construction for front ends
//!
//! # Implementing a Backend
//!
//! ```ignore
//! use helmi_hal::{Backend, Capabilities, Counts, HalResult, check_request};
//! use helmi_ir::Circuit;
//! use async_trait::async_trait;
//!
//! struct MyBackend {
//!     capabilities: Capabilities,
//! }
//!
//! #[async_trait]
//! impl Backend for MyBackend {
//!     fn name(&self) -> &str { "my_backend" }
//!
//!     fn capabilities(&self) -> &Capabilities {
//!         &self.capabilities
//!     }
//!
//!     async fn execute(&self, circuit: &Circuit, shots: u32) -> HalResult<Counts> {
//!         check_request(&self.capabilities, circuit, shots)?;
//!         // Run the circuit somewhere
//!         # todo!()
//!     }
//! }
//! ```

pub mod backend;
pub mod capability;
pub mod config;
pub mod error;
pub mod registry;
pub mod result;

pub use backend::{Backend, BackendConfig, BackendFactory, BatchItem, check_request};
pub use capability::{Capabilities, Topology, TopologyKind};
pub use config::{HELMI_CORTEX_URL, HelmiConfig};
pub use error::{HalError, HalResult};
pub use registry::BackendRegistry;
pub use result::Counts;
