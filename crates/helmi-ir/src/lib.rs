//! Helmi circuit descriptions
//!
//! A deliberately small circuit representation: a named register of physical
//! qubits, a handful of gates, and measurements into classical bits. It is
//! what the experiment runner hands to a backend; nothing here decomposes,
//! transpiles or routes.
//!
//! # Example
//!
//! ```
//! use helmi_ir::Circuit;
//!
//! let mut circuit = Circuit::with_size("bell", 2, 0);
//! circuit.h(0).unwrap().cx(0, 1).unwrap();
//! circuit.measure_all().unwrap();
//!
//! assert_eq!(circuit.num_clbits(), 2);
//! ```

pub mod circuit;
pub mod error;
pub mod gate;
pub mod instruction;
pub mod library;
pub mod qubit;

pub use circuit::Circuit;
pub use error::{IrError, IrResult};
pub use gate::Gate;
pub use instruction::{Instruction, InstructionKind};
pub use library::{HELMI_CENTER, HELMI_QUBITS};
pub use qubit::{ClbitId, QubitId};
