//! High-level circuit builder API.

use serde::{Deserialize, Serialize};

use crate::error::{IrError, IrResult};
use crate::gate::Gate;
use crate::instruction::Instruction;
use crate::qubit::{ClbitId, QubitId};

/// A quantum circuit on a fixed physical register.
///
/// Qubit indices are physical: a circuit built for Helmi addresses `QB1`..`QB5`
/// as qubits 0..4 directly. Layout and routing happen before a circuit is
/// built, never inside this crate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Circuit {
    /// Name of the circuit.
    name: String,
    /// Number of qubits in the register.
    num_qubits: u32,
    /// Number of classical bits.
    num_clbits: u32,
    /// Instructions in program order.
    instructions: Vec<Instruction>,
}

impl Circuit {
    /// Create a circuit with a given number of qubits and classical bits.
    pub fn with_size(name: impl Into<String>, num_qubits: u32, num_clbits: u32) -> Self {
        Self {
            name: name.into(),
            num_qubits,
            num_clbits,
            instructions: vec![],
        }
    }

    /// Get the circuit name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the number of qubits.
    pub fn num_qubits(&self) -> usize {
        self.num_qubits as usize
    }

    /// Get the number of classical bits.
    pub fn num_clbits(&self) -> usize {
        self.num_clbits as usize
    }

    /// Instructions in program order.
    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    /// Number of two-qubit gates.
    pub fn num_two_qubit_gates(&self) -> usize {
        self.instructions
            .iter()
            .filter_map(Instruction::as_gate)
            .filter(|gate| gate.num_qubits() == 2)
            .count()
    }

    /// `(qubit, clbit)` pairs of every measurement, in program order.
    pub fn measurements(&self) -> Vec<(QubitId, ClbitId)> {
        self.instructions
            .iter()
            .filter(|inst| inst.is_measure())
            .map(|inst| (inst.qubits[0], inst.clbits[0]))
            .collect()
    }

    /// Append a gate after checking its operands.
    pub fn apply(&mut self, gate: Gate, qubits: &[QubitId]) -> IrResult<&mut Self> {
        let expected = gate.num_qubits();
        if qubits.len() != expected as usize {
            return Err(IrError::QubitCountMismatch {
                gate_name: gate.name().to_string(),
                expected,
                got: qubits.len() as u32,
            });
        }
        for (i, &qubit) in qubits.iter().enumerate() {
            self.check_qubit(qubit, Some(gate.name()))?;
            if qubits[..i].contains(&qubit) {
                return Err(IrError::DuplicateQubit {
                    qubit,
                    gate_name: Some(gate.name().to_string()),
                });
            }
        }
        self.instructions
            .push(Instruction::gate(gate, qubits.iter().copied()));
        Ok(self)
    }

    // =========================================================================
    // Gates
    // =========================================================================

    /// Apply Hadamard gate.
    pub fn h(&mut self, qubit: u32) -> IrResult<&mut Self> {
        self.apply(Gate::H, &[QubitId(qubit)])
    }

    /// Apply Pauli-X gate.
    pub fn x(&mut self, qubit: u32) -> IrResult<&mut Self> {
        self.apply(Gate::X, &[QubitId(qubit)])
    }

    /// Apply Pauli-Z gate.
    pub fn z(&mut self, qubit: u32) -> IrResult<&mut Self> {
        self.apply(Gate::Z, &[QubitId(qubit)])
    }

    /// Apply a phase gate.
    pub fn phase(&mut self, theta: f64, qubit: u32) -> IrResult<&mut Self> {
        self.apply(Gate::Phase(theta), &[QubitId(qubit)])
    }

    /// Apply CNOT gate.
    pub fn cx(&mut self, control: u32, target: u32) -> IrResult<&mut Self> {
        self.apply(Gate::Cx, &[QubitId(control), QubitId(target)])
    }

    // =========================================================================
    // Non-unitary operations
    // =========================================================================

    /// Measure a qubit into a classical bit.
    pub fn measure(&mut self, qubit: u32, clbit: u32) -> IrResult<&mut Self> {
        let qubit = QubitId(qubit);
        let clbit = ClbitId(clbit);
        self.check_qubit(qubit, Some("measure"))?;
        if clbit.0 >= self.num_clbits {
            return Err(IrError::ClbitNotFound { clbit });
        }
        self.instructions.push(Instruction::measure(qubit, clbit));
        Ok(self)
    }

    /// Add one classical bit per qubit and measure qubit `i` into the `i`-th
    /// new bit.
    pub fn measure_all(&mut self) -> IrResult<&mut Self> {
        let base = self.num_clbits;
        self.num_clbits += self.num_qubits;
        for q in 0..self.num_qubits {
            self.measure(q, base + q)?;
        }
        Ok(self)
    }

    fn check_qubit(&self, qubit: QubitId, gate_name: Option<&str>) -> IrResult<()> {
        if qubit.0 >= self.num_qubits {
            return Err(IrError::QubitNotFound {
                qubit,
                gate_name: gate_name.map(str::to_string),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_chains() {
        let mut circuit = Circuit::with_size("bell", 2, 0);
        circuit.h(0).unwrap().cx(0, 1).unwrap();
        circuit.measure_all().unwrap();

        assert_eq!(circuit.num_qubits(), 2);
        assert_eq!(circuit.num_clbits(), 2);
        assert_eq!(circuit.instructions().len(), 4);
        assert_eq!(circuit.num_two_qubit_gates(), 1);
        assert_eq!(
            circuit.measurements(),
            vec![(QubitId(0), ClbitId(0)), (QubitId(1), ClbitId(1))]
        );
    }

    #[test]
    fn test_qubit_out_of_range() {
        let mut circuit = Circuit::with_size("small", 2, 0);
        let err = circuit.h(5).unwrap_err();
        assert!(matches!(err, IrError::QubitNotFound { qubit: QubitId(5), .. }));
    }

    #[test]
    fn test_duplicate_qubit() {
        let mut circuit = Circuit::with_size("dup", 2, 0);
        let err = circuit.cx(1, 1).unwrap_err();
        assert!(matches!(err, IrError::DuplicateQubit { .. }));
        assert!(err.to_string().contains("cx"));
    }

    #[test]
    fn test_measure_requires_clbit() {
        let mut circuit = Circuit::with_size("m", 1, 0);
        assert!(matches!(
            circuit.measure(0, 0),
            Err(IrError::ClbitNotFound { .. })
        ));
    }

    #[test]
    fn test_serde_roundtrip_preserves_circuit() {
        let mut circuit = Circuit::with_size("probe", 2, 0);
        circuit.h(0).unwrap().phase(0.25, 1).unwrap();
        circuit.measure_all().unwrap();

        let json = serde_json::to_string(&circuit).unwrap();
        let back: Circuit = serde_json::from_str(&json).unwrap();
        assert_eq!(back, circuit);
    }
}
