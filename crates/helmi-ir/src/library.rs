//! Circuits for the experiment families run against Helmi.
//!
//! Every builder returns a circuit that is already placed on physical qubits.
//! Measured classical bit `i` becomes character `i` of the outcome bitstring.

use std::f64::consts::PI;

use crate::circuit::Circuit;
use crate::error::{IrError, IrResult};

/// Number of qubits on the Helmi device.
pub const HELMI_QUBITS: u32 = 5;

/// Index of `QB3`, the centre of Helmi's star topology.
pub const HELMI_CENTER: u32 = 2;

impl Circuit {
    /// Two-qubit Bell state `(|00⟩ + |11⟩)/√2`.
    pub fn bell() -> IrResult<Self> {
        Self::bell_pair(2, 0, 1)
    }

    /// Bell pair on a larger register.
    ///
    /// `control` is measured into clbit 0, `target` into clbit 1; the other
    /// qubits stay idle.
    pub fn bell_pair(num_qubits: u32, control: u32, target: u32) -> IrResult<Self> {
        let mut circuit = Self::with_size(
            format!("bell_q{}_q{}", control, target),
            num_qubits,
            2,
        );
        circuit.h(control)?.cx(control, target)?;
        circuit.measure(control, 0)?.measure(target, 1)?;
        Ok(circuit)
    }

    /// `n`-qubit GHZ state prepared as a CNOT chain from qubit 0.
    pub fn ghz(n: u32) -> IrResult<Self> {
        if n < 2 {
            return Err(IrError::InvalidRequest(format!(
                "GHZ state needs at least 2 qubits, got {n}"
            )));
        }
        let mut circuit = Self::with_size(format!("ghz_{n}"), n, 0);
        circuit.h(0)?;
        for q in 1..n {
            circuit.cx(q - 1, q)?;
        }
        circuit.measure_all()?;
        Ok(circuit)
    }

    /// GHZ state fanned out from a centre qubit, matching a star coupling map.
    pub fn ghz_star(num_qubits: u32, center: u32) -> IrResult<Self> {
        if num_qubits < 2 {
            return Err(IrError::InvalidRequest(format!(
                "GHZ state needs at least 2 qubits, got {num_qubits}"
            )));
        }
        let mut circuit = Self::with_size(format!("ghz_star_{num_qubits}"), num_qubits, 0);
        circuit.h(center)?;
        for q in (0..num_qubits).filter(|&q| q != center) {
            circuit.cx(center, q)?;
        }
        circuit.measure_all()?;
        Ok(circuit)
    }

    /// Bernstein–Vazirani circuit for a hidden bit string.
    ///
    /// Data qubit `i` is controlled by `secret[i]` and measured into clbit `i`;
    /// the ancilla sits on qubit `secret.len()` and is not measured. A
    /// noiseless run therefore reads back exactly `secret`.
    pub fn bernstein_vazirani(secret: &[bool]) -> IrResult<Self> {
        Self::bernstein_vazirani_with_ancilla(secret, secret.len() as u32)
    }

    /// Bernstein–Vazirani circuit with the ancilla on a chosen qubit.
    ///
    /// The register has `secret.len() + 1` qubits. The data qubits are the
    /// remaining indices in ascending order; the `k`-th of them carries
    /// `secret[k]` and is measured into clbit `k`. Putting the ancilla on the
    /// centre of a star coupling map lets every oracle CNOT run natively.
    pub fn bernstein_vazirani_with_ancilla(secret: &[bool], ancilla: u32) -> IrResult<Self> {
        if secret.is_empty() {
            return Err(IrError::InvalidRequest(
                "Bernstein-Vazirani needs at least one secret bit".into(),
            ));
        }
        let dim = secret.len() as u32;
        if ancilla > dim {
            return Err(IrError::InvalidRequest(format!(
                "ancilla {ancilla} outside a register of {} qubits",
                dim + 1
            )));
        }
        let data: Vec<u32> = (0..=dim).filter(|&q| q != ancilla).collect();
        let mut circuit = Self::with_size(format!("bernstein_vazirani_{dim}"), dim + 1, dim);

        // Ancilla in |−⟩
        circuit.h(ancilla)?.z(ancilla)?;
        for &q in &data {
            circuit.h(q)?;
        }
        for (&q, _) in data.iter().zip(secret).filter(|(_, bit)| **bit) {
            circuit.cx(q, ancilla)?;
        }
        for &q in &data {
            circuit.h(q)?;
        }
        for (c, &q) in data.iter().enumerate() {
            circuit.measure(q, c as u32)?;
        }
        Ok(circuit)
    }

    /// Flip each listed qubit with X and measure it.
    ///
    /// `qubits[i]` is measured into clbit `i`.
    pub fn qubit_flip(num_qubits: u32, qubits: &[u32]) -> IrResult<Self> {
        if qubits.is_empty() {
            return Err(IrError::InvalidRequest("no qubits to flip".into()));
        }
        let name = if qubits.len() == 1 {
            format!("flip_q{}", qubits[0])
        } else {
            "flip_all".to_string()
        };
        let mut circuit = Self::with_size(name, num_qubits, qubits.len() as u32);
        for (i, &q) in qubits.iter().enumerate() {
            if qubits[..i].contains(&q) {
                return Err(IrError::DuplicateQubit {
                    qubit: q.into(),
                    gate_name: Some("x".into()),
                });
            }
            circuit.x(q)?;
        }
        for (c, &q) in qubits.iter().enumerate() {
            circuit.measure(q, c as u32)?;
        }
        Ok(circuit)
    }

    /// Phase probe used for parameter sweeps.
    ///
    /// `H(a) CX(a,b) Z(a)^θ Z(b)^θ CX(a,b) H(a)`, then `a` is measured into
    /// clbit 0 and `b` into clbit 1. `Z^θ` is the phase gate with angle `π·θ`.
    pub fn phase_probe(num_qubits: u32, a: u32, b: u32, theta: f64) -> IrResult<Self> {
        let mut circuit = Self::with_size(format!("phase_probe_{theta}"), num_qubits, 2);
        circuit.h(a)?.cx(a, b)?;
        circuit.phase(PI * theta, a)?.phase(PI * theta, b)?;
        circuit.cx(a, b)?.h(a)?;
        circuit.measure(a, 0)?.measure(b, 1)?;
        Ok(circuit)
    }
}
