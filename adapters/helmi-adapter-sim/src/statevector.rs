//! Statevector simulation engine.

use num_complex::Complex64;

use helmi_hal::{HalError, HalResult};
use helmi_ir::{Circuit, Gate, Instruction, InstructionKind};

/// Probabilities below this are treated as exact zeros when sampling.
const PROBABILITY_FLOOR: f64 = 1e-12;

/// A statevector representing a quantum state.
///
/// Basis index bit `q` is the value of qubit `q`.
pub struct Statevector {
    /// The state amplitudes (2^n complex numbers).
    amplitudes: Vec<Complex64>,
    /// Number of qubits.
    num_qubits: usize,
}

impl Statevector {
    /// Create a new statevector initialized to |0...0⟩.
    pub fn new(num_qubits: usize) -> Self {
        let size = 1 << num_qubits;
        let mut amplitudes = vec![Complex64::new(0.0, 0.0); size];
        amplitudes[0] = Complex64::new(1.0, 0.0);
        Self {
            amplitudes,
            num_qubits,
        }
    }

    /// Run every unitary instruction of a circuit from |0...0⟩.
    ///
    /// Measurements must be terminal: a gate touching an already measured
    /// qubit is rejected.
    pub fn from_circuit(circuit: &Circuit) -> HalResult<Self> {
        let mut sv = Self::new(circuit.num_qubits());
        let mut measured = vec![false; circuit.num_qubits()];
        for inst in circuit.instructions() {
            match &inst.kind {
                InstructionKind::Measure => measured[inst.qubits[0].0 as usize] = true,
                InstructionKind::Gate(_) => {
                    if let Some(q) = inst.qubits.iter().find(|q| measured[q.0 as usize]) {
                        return Err(HalError::Unsupported(format!(
                            "mid-circuit measurement on {} in '{}'",
                            q.label(),
                            circuit.name()
                        )));
                    }
                    sv.apply(inst);
                }
            }
        }
        Ok(sv)
    }

    /// Apply an instruction to the statevector.
    pub fn apply(&mut self, instruction: &Instruction) {
        if let InstructionKind::Gate(gate) = &instruction.kind {
            let qubits: Vec<_> = instruction.qubits.iter().map(|q| q.0 as usize).collect();
            self.apply_gate(gate, &qubits);
        }
    }

    fn apply_gate(&mut self, gate: &Gate, qubits: &[usize]) {
        match *gate {
            Gate::H => self.apply_h(qubits[0]),
            Gate::X => self.apply_x(qubits[0]),
            Gate::Z => self.apply_z(qubits[0]),
            Gate::Phase(theta) => self.apply_phase(qubits[0], theta),
            Gate::Prx(theta, phi) => self.apply_prx(qubits[0], theta, phi),
            Gate::Cx => self.apply_cx(qubits[0], qubits[1]),
            Gate::Cz => self.apply_cz(qubits[0], qubits[1]),
        }
    }

    // =========================================================================
    // Single-qubit gate implementations
    // =========================================================================

    fn apply_x(&mut self, qubit: usize) {
        let mask = 1 << qubit;
        for i in 0..(1 << self.num_qubits) {
            if i & mask == 0 {
                let j = i | mask;
                self.amplitudes.swap(i, j);
            }
        }
    }

    fn apply_z(&mut self, qubit: usize) {
        let mask = 1 << qubit;
        for i in 0..(1 << self.num_qubits) {
            if i & mask != 0 {
                self.amplitudes[i] = -self.amplitudes[i];
            }
        }
    }

    fn apply_h(&mut self, qubit: usize) {
        let mask = 1 << qubit;
        let sqrt2_inv = 1.0 / 2.0_f64.sqrt();
        for i in 0..(1 << self.num_qubits) {
            if i & mask == 0 {
                let j = i | mask;
                let a = self.amplitudes[i];
                let b = self.amplitudes[j];
                self.amplitudes[i] = sqrt2_inv * (a + b);
                self.amplitudes[j] = sqrt2_inv * (a - b);
            }
        }
    }

    fn apply_phase(&mut self, qubit: usize, theta: f64) {
        let mask = 1 << qubit;
        let phase = Complex64::from_polar(1.0, theta);
        for i in 0..(1 << self.num_qubits) {
            if i & mask != 0 {
                self.amplitudes[i] *= phase;
            }
        }
    }

    fn apply_rx(&mut self, qubit: usize, theta: f64) {
        let mask = 1 << qubit;
        let cos = Complex64::new((theta / 2.0).cos(), 0.0);
        let isin = Complex64::new(0.0, -(theta / 2.0).sin());
        for i in 0..(1 << self.num_qubits) {
            if i & mask == 0 {
                let j = i | mask;
                let a = self.amplitudes[i];
                let b = self.amplitudes[j];
                self.amplitudes[i] = cos * a + isin * b;
                self.amplitudes[j] = isin * a + cos * b;
            }
        }
    }

    fn apply_rz(&mut self, qubit: usize, theta: f64) {
        let mask = 1 << qubit;
        let phase_0 = Complex64::from_polar(1.0, -theta / 2.0);
        let phase_1 = Complex64::from_polar(1.0, theta / 2.0);
        for i in 0..(1 << self.num_qubits) {
            if i & mask == 0 {
                self.amplitudes[i] *= phase_0;
            } else {
                self.amplitudes[i] *= phase_1;
            }
        }
    }

    fn apply_prx(&mut self, qubit: usize, theta: f64, phi: f64) {
        // PRX(θ, φ) = RZ(φ) · RX(θ) · RZ(-φ)
        self.apply_rz(qubit, -phi);
        self.apply_rx(qubit, theta);
        self.apply_rz(qubit, phi);
    }

    // =========================================================================
    // Two-qubit gate implementations
    // =========================================================================

    fn apply_cx(&mut self, control: usize, target: usize) {
        let ctrl_mask = 1 << control;
        let tgt_mask = 1 << target;
        for i in 0..(1 << self.num_qubits) {
            if (i & ctrl_mask != 0) && (i & tgt_mask == 0) {
                let j = i | tgt_mask;
                self.amplitudes.swap(i, j);
            }
        }
    }

    fn apply_cz(&mut self, control: usize, target: usize) {
        let ctrl_mask = 1 << control;
        let tgt_mask = 1 << target;
        for i in 0..(1 << self.num_qubits) {
            if (i & ctrl_mask != 0) && (i & tgt_mask != 0) {
                self.amplitudes[i] = -self.amplitudes[i];
            }
        }
    }

    // =========================================================================
    // Measurement
    // =========================================================================

    /// Cumulative distribution over basis states, with numerical dust removed.
    pub fn cumulative_probabilities(&self) -> Vec<f64> {
        let probs: Vec<f64> = self
            .amplitudes
            .iter()
            .map(|amp| {
                let p = amp.norm_sqr();
                if p < PROBABILITY_FLOOR { 0.0 } else { p }
            })
            .collect();
        let total: f64 = probs.iter().sum();
        let mut cumulative = 0.0;
        probs
            .iter()
            .map(|p| {
                cumulative += p / total;
                cumulative
            })
            .collect()
    }

    /// Pick the basis state for a uniform draw `r` in `[0, 1)`.
    pub fn sample_index(cumulative: &[f64], r: f64) -> usize {
        cumulative
            .partition_point(|&c| c <= r)
            .min(cumulative.len() - 1)
    }
}

/// Read the measured classical bits out of a basis index.
///
/// Unmeasured classical bits read `0`.
pub fn outcome_bits(index: usize, measurements: &[(usize, usize)], num_clbits: usize) -> Vec<bool> {
    let mut bits = vec![false; num_clbits];
    for &(qubit, clbit) in measurements {
        bits[clbit] = index & (1 << qubit) != 0;
    }
    bits
}

/// Render classical bits as a bitstring, clbit 0 first.
pub fn bitstring(bits: &[bool]) -> String {
    bits.iter().map(|&b| if b { '1' } else { '0' }).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use helmi_ir::QubitId;
    use std::f64::consts::PI;

    fn approx_eq(a: Complex64, b: Complex64) -> bool {
        (a - b).norm() < 1e-10
    }

    #[test]
    fn test_initial_state() {
        let sv = Statevector::new(2);
        assert!(approx_eq(sv.amplitudes[0], Complex64::new(1.0, 0.0)));
        assert!(approx_eq(sv.amplitudes[3], Complex64::new(0.0, 0.0)));
    }

    #[test]
    fn test_bell_state() {
        let mut sv = Statevector::new(2);
        sv.apply_h(0);
        sv.apply_cx(0, 1);

        let sqrt2_inv = 1.0 / 2.0_f64.sqrt();
        assert!(approx_eq(sv.amplitudes[0], Complex64::new(sqrt2_inv, 0.0)));
        assert!(approx_eq(sv.amplitudes[1], Complex64::new(0.0, 0.0)));
        assert!(approx_eq(sv.amplitudes[2], Complex64::new(0.0, 0.0)));
        assert!(approx_eq(sv.amplitudes[3], Complex64::new(sqrt2_inv, 0.0)));
    }

    #[test]
    fn test_prx_pi_flips() {
        let mut sv = Statevector::new(1);
        sv.apply_prx(0, PI, 0.0);
        assert!((sv.amplitudes[1].norm_sqr() - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_native_cz_bell_from_circuit() {
        // CX(0, 1) = H(1) CZ(0, 1) H(1)
        let mut circuit = Circuit::with_size("native_bell", 2, 0);
        circuit.h(0).unwrap().h(1).unwrap();
        circuit.apply(Gate::Cz, &[QubitId(0), QubitId(1)]).unwrap();
        circuit.h(1).unwrap();

        let sv = Statevector::from_circuit(&circuit).unwrap();
        assert!((sv.amplitudes[0].norm_sqr() - 0.5).abs() < 1e-10);
        assert!((sv.amplitudes[3].norm_sqr() - 0.5).abs() < 1e-10);
    }

    #[test]
    fn test_phase_probe_at_zero_returns_home() {
        let circuit = Circuit::phase_probe(2, 0, 1, 0.0).unwrap();
        let sv = Statevector::from_circuit(&circuit).unwrap();
        assert!((sv.amplitudes[0].norm_sqr() - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_bernstein_vazirani_is_deterministic() {
        let secret = [true, false, true, true];
        let circuit = Circuit::bernstein_vazirani(&secret).unwrap();
        let sv = Statevector::from_circuit(&circuit).unwrap();
        let cumulative = sv.cumulative_probabilities();

        let measurements: Vec<_> = circuit
            .measurements()
            .iter()
            .map(|(q, c)| (q.0 as usize, c.0 as usize))
            .collect();
        for r in [0.0, 0.3, 0.7, 0.999_999] {
            let index = Statevector::sample_index(&cumulative, r);
            let bits = outcome_bits(index, &measurements, 4);
            assert_eq!(bitstring(&bits), "1011");
        }
    }

    #[test]
    fn test_mid_circuit_measurement_rejected() {
        let mut circuit = Circuit::with_size("mid", 1, 1);
        circuit.measure(0, 0).unwrap().x(0).unwrap();
        assert!(matches!(
            Statevector::from_circuit(&circuit),
            Err(HalError::Unsupported(_))
        ));
    }

    #[test]
    fn test_sample_index_bounds() {
        let cumulative = [0.5, 0.5, 1.0];
        assert_eq!(Statevector::sample_index(&cumulative, 0.0), 0);
        assert_eq!(Statevector::sample_index(&cumulative, 0.5), 2);
        assert_eq!(Statevector::sample_index(&cumulative, 0.9999), 2);
    }
}
