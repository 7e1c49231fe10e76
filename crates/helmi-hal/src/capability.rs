//! Backend capabilities.

use serde::{Deserialize, Serialize};

/// Hardware capabilities of a backend.
///
/// Capabilities are cached at construction; the runner reads them to decide
/// between batch and sequential submission, the oracle reads the topology to
/// place its ancilla.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Capabilities {
    /// Name of the backend.
    pub name: String,
    /// Number of qubits available.
    pub num_qubits: u32,
    /// Native gates (OpenQASM 3 naming convention).
    pub native_gates: Vec<String>,
    /// Qubit connectivity topology. All edges are bidirectional.
    pub topology: Topology,
    /// Maximum number of shots per execution.
    pub max_shots: u32,
    /// Whether this is a simulator (`true`) or real hardware (`false`).
    pub is_simulator: bool,
    /// Whether the backend accepts several circuits in one submission.
    pub supports_batch: bool,
}

impl Capabilities {
    /// Create capabilities for an all-to-all simulator.
    pub fn simulator(num_qubits: u32) -> Self {
        Self {
            name: "simulator".into(),
            num_qubits,
            native_gates: ["h", "x", "z", "p", "prx", "cx", "cz"]
                .map(String::from)
                .to_vec(),
            topology: Topology::full(num_qubits),
            max_shots: 100_000,
            is_simulator: true,
            supports_batch: true,
        }
    }

    /// Create capabilities for the 5-qubit Helmi device.
    ///
    /// Star coupling map centred on `QB3`, native `prx` and `cz`.
    pub fn helmi() -> Self {
        Self {
            name: "helmi".into(),
            num_qubits: 5,
            native_gates: ["prx", "cz"].map(String::from).to_vec(),
            topology: Topology::star(5, 2),
            max_shots: 20_000,
            is_simulator: false,
            supports_batch: true,
        }
    }

    /// Set the batch-submission flag.
    pub fn with_batch_support(mut self, supports_batch: bool) -> Self {
        self.supports_batch = supports_batch;
        self
    }

    /// Rename the capability record.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}

/// Qubit connectivity topology.
///
/// All edges are bidirectional: if `(a, b)` is listed, both `a → b`
/// and `b → a` are valid two-qubit interactions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Topology {
    /// Kind of topology.
    pub kind: TopologyKind,
    /// Coupling edges (pairs of connected qubits). Bidirectional.
    pub edges: Vec<(u32, u32)>,
}

impl Topology {
    /// Create a star topology around `center`.
    pub fn star(n: u32, center: u32) -> Self {
        let edges: Vec<_> = (0..n).filter(|&i| i != center).map(|i| (center, i)).collect();
        Self {
            kind: TopologyKind::Star { center },
            edges,
        }
    }

    /// Create a fully connected topology.
    pub fn full(n: u32) -> Self {
        let mut edges = vec![];
        for i in 0..n {
            for j in (i + 1)..n {
                edges.push((i, j));
            }
        }
        Self {
            kind: TopologyKind::FullyConnected,
            edges,
        }
    }

    /// Check if two qubits are connected.
    pub fn is_connected(&self, q1: u32, q2: u32) -> bool {
        self.edges
            .iter()
            .any(|&(a, b)| (a == q1 && b == q2) || (a == q2 && b == q1))
    }

    /// Centre qubit of a star topology.
    pub fn center(&self) -> Option<u32> {
        match self.kind {
            TopologyKind::Star { center } => Some(center),
            _ => None,
        }
    }
}

/// Kind of qubit topology.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[non_exhaustive]
pub enum TopologyKind {
    /// Fully connected (all-to-all).
    FullyConnected,
    /// Star with one central qubit.
    Star {
        /// The central qubit.
        center: u32,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_helmi_star() {
        let caps = Capabilities::helmi();
        assert_eq!(caps.num_qubits, 5);
        assert_eq!(caps.topology.center(), Some(2));
        assert!(caps.topology.is_connected(0, 2));
        assert!(caps.topology.is_connected(2, 4));
        assert!(!caps.topology.is_connected(0, 1));
        assert_eq!(caps.topology.edges.len(), 4);
    }

    #[test]
    fn test_simulator_full() {
        let caps = Capabilities::simulator(4);
        assert!(caps.is_simulator);
        assert_eq!(caps.topology.edges.len(), 6);
        assert_eq!(caps.topology.center(), None);
        assert!(!caps.with_batch_support(false).supports_batch);
    }
}
