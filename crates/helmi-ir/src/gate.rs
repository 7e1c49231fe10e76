//! Gate set used by the experiment circuits.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A gate the experiment families need.
///
/// `Prx` and `Cz` are Helmi's native gates; the others are the textbook gates
/// the scripts are written in.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Gate {
    /// Hadamard.
    H,
    /// Pauli-X.
    X,
    /// Pauli-Z.
    Z,
    /// Phase gate `diag(1, e^{i·θ})`.
    Phase(f64),
    /// Phased X rotation `PRX(θ, φ) = RZ(φ)·RX(θ)·RZ(-φ)`.
    Prx(f64, f64),
    /// Controlled-X, control first.
    Cx,
    /// Controlled-Z.
    Cz,
}

impl Gate {
    /// Lower-case gate name as used in OpenQASM.
    pub fn name(&self) -> &'static str {
        match self {
            Gate::H => "h",
            Gate::X => "x",
            Gate::Z => "z",
            Gate::Phase(_) => "p",
            Gate::Prx(_, _) => "prx",
            Gate::Cx => "cx",
            Gate::Cz => "cz",
        }
    }

    /// Number of qubits the gate acts on.
    pub fn num_qubits(&self) -> u32 {
        match self {
            Gate::Cx | Gate::Cz => 2,
            _ => 1,
        }
    }
}

impl fmt::Display for Gate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Gate::Phase(theta) => write!(f, "p({theta})"),
            Gate::Prx(theta, phi) => write!(f, "prx({theta}, {phi})"),
            other => write!(f, "{}", other.name()),
        }
    }
}
