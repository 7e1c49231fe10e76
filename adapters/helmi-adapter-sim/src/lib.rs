//! Local simulator backend for Helmi experiments.
//!
//! Two profiles share one statevector engine:
//!
//! - `simulator`: ideal, all-to-all, up to 20 qubits.
//! - `fake-helmi`: Helmi's 5-qubit star around `QB3`, its shot limit, and a
//!   readout error on every measured bit.
//!
//! # Example
//!
//! ```ignore
//! use helmi_adapter_sim::SimulatorBackend;
//! use helmi_hal::Backend;
//! use helmi_ir::Circuit;
//!
//! let backend = SimulatorBackend::with_seed(1);
//! let counts = backend.execute(&Circuit::bell()?, 1000).await?;
//! ```

mod noise;
mod simulator;
mod statevector;

pub use noise::ReadoutNoise;
pub use simulator::SimulatorBackend;
