//! Bernstein–Vazirani oracle with classical and quantum query paths.
//!
//! The oracle hides an integer `s` of `dim` bits. A classical query with
//! input `x` answers `x · s mod 2`; recovering `s` that way takes `dim`
//! queries. A quantum query runs the Bernstein–Vazirani circuit once per
//! batch of shots, and on a noiseless backend every shot reads `s`.

use std::sync::Arc;

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use helmi_hal::{Backend, Counts};
use helmi_ir::Circuit;

use crate::error::{EvalError, EvalResult};
use crate::metrics::success_probability;

/// Widest oracle accepted.
pub const MAX_ORACLE_BITS: u32 = 16;

/// Default oracle width, matching the 4 data qubits of Helmi.
pub const DEFAULT_ORACLE_BITS: u32 = 4;

/// Most frequent outcome of a histogram.
///
/// Ties go to the lexicographically smallest bitstring.
pub fn most_frequent_outcome(histogram: &Counts) -> EvalResult<(String, u64)> {
    histogram
        .most_frequent()
        .map(|(bits, count)| (bits.to_string(), count))
        .ok_or_else(|| EvalError::InvalidArgument("histogram is empty".into()))
}

/// One row of a repeated quantum run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OracleRun {
    /// 1-based run number.
    pub run: usize,
    /// Most frequent outcome, read as an integer.
    pub guess: u32,
    /// Most frequent outcome as a bitstring.
    pub guess_bitstring: String,
    /// Shots that landed on the guess.
    pub count: u64,
    /// Fraction of shots that landed on the secret.
    pub success_probability: f64,
    /// Quantum calls made so far, this run included.
    pub quantum_calls: u64,
}

/// A Bernstein–Vazirani oracle over a fixed secret.
pub struct OracleSimulator {
    secret: u32,
    dim: u32,
    backend: Option<Arc<dyn Backend>>,
    classical_calls: u64,
    quantum_calls: u64,
}

impl OracleSimulator {
    /// Create an oracle hiding `secret` in `dim` bits.
    pub fn new(secret: u32, dim: u32) -> EvalResult<Self> {
        if !(1..=MAX_ORACLE_BITS).contains(&dim) {
            return Err(EvalError::InvalidArgument(format!(
                "oracle width must be 1..={MAX_ORACLE_BITS}, got {dim}"
            )));
        }
        if u64::from(secret) >= 1u64 << dim {
            return Err(EvalError::InvalidArgument(format!(
                "secret {secret} does not fit in {dim} bits (max {})",
                (1u64 << dim) - 1
            )));
        }
        Ok(Self {
            secret,
            dim,
            backend: None,
            classical_calls: 0,
            quantum_calls: 0,
        })
    }

    /// Create an oracle with a uniformly drawn secret.
    pub fn with_random_secret<R: Rng + ?Sized>(dim: u32, rng: &mut R) -> EvalResult<Self> {
        if !(1..=MAX_ORACLE_BITS).contains(&dim) {
            return Err(EvalError::InvalidArgument(format!(
                "oracle width must be 1..={MAX_ORACLE_BITS}, got {dim}"
            )));
        }
        Self::new(rng.gen_range(0..(1u32 << dim)), dim)
    }

    /// Attach the backend quantum queries run on.
    pub fn with_backend(mut self, backend: Arc<dyn Backend>) -> Self {
        self.backend = Some(backend);
        self
    }

    /// The hidden value.
    pub fn secret(&self) -> u32 {
        self.secret
    }

    /// Oracle width in bits.
    pub fn dim(&self) -> u32 {
        self.dim
    }

    /// Secret bits, most significant first.
    pub fn secret_bits(&self) -> Vec<bool> {
        (0..self.dim)
            .map(|k| (self.secret >> (self.dim - 1 - k)) & 1 == 1)
            .collect()
    }

    /// Secret as a zero-padded bitstring, most significant bit first.
    pub fn secret_bitstring(&self) -> String {
        format!("{:0width$b}", self.secret, width = self.dim as usize)
    }

    /// Classical queries made so far.
    pub fn classical_calls(&self) -> u64 {
        self.classical_calls
    }

    /// Quantum queries made so far.
    pub fn quantum_calls(&self) -> u64 {
        self.quantum_calls
    }

    /// Answer `x · s mod 2`.
    pub fn classical_query(&mut self, input: &[bool]) -> EvalResult<bool> {
        if input.len() != self.dim as usize {
            return Err(EvalError::InvalidArgument(format!(
                "oracle query has {} bits, expected {}",
                input.len(),
                self.dim
            )));
        }
        self.classical_calls += 1;
        let parity = input
            .iter()
            .zip(self.secret_bits())
            .filter(|&(&x, s)| x && s)
            .count()
            % 2;
        Ok(parity == 1)
    }

    /// Recover the secret with one classical query per basis vector.
    pub fn recover_secret_classically(&mut self) -> EvalResult<u32> {
        let dim = self.dim as usize;
        let mut secret = 0u32;
        for i in 0..dim {
            let mut e_i = vec![false; dim];
            e_i[i] = true;
            secret = (secret << 1) | u32::from(self.classical_query(&e_i)?);
        }
        Ok(secret)
    }

    /// The circuit a quantum query runs on the attached backend.
    ///
    /// The ancilla sits on the centre of a star coupling map when the
    /// backend has one and the register reaches it, otherwise on qubit
    /// `dim`. Classical bit `k` always reads secret bit `k`.
    pub fn circuit(&self) -> EvalResult<Circuit> {
        let bits = self.secret_bits();
        let center = self
            .backend
            .as_ref()
            .and_then(|b| b.capabilities().topology.center())
            .filter(|&c| c <= self.dim);
        let circuit = match center {
            Some(ancilla) => Circuit::bernstein_vazirani_with_ancilla(&bits, ancilla)?,
            None => Circuit::bernstein_vazirani(&bits)?,
        };
        Ok(circuit)
    }

    /// Run the Bernstein–Vazirani circuit and return its histogram.
    #[instrument(skip(self), fields(dim = self.dim))]
    pub async fn quantum_query(&mut self, shots: u32) -> EvalResult<Counts> {
        if shots == 0 {
            return Err(EvalError::InvalidArgument("shots must be positive".into()));
        }
        let backend = self.backend.clone().ok_or_else(|| {
            EvalError::Configuration("no backend attached to the oracle".into())
        })?;
        let circuit = self.circuit()?;

        self.quantum_calls += 1;
        debug!(
            "Quantum query {} on '{}' with {} shots",
            self.quantum_calls,
            backend.name(),
            shots
        );
        backend
            .execute(&circuit, shots)
            .await
            .map_err(|e| EvalError::backend(0, e))
    }

    /// Query `repeats` times and score each histogram.
    pub async fn repeated_run(&mut self, repeats: usize, shots: u32) -> EvalResult<Vec<OracleRun>> {
        if repeats == 0 {
            return Err(EvalError::InvalidArgument("repeats must be positive".into()));
        }
        let secret = self.secret_bitstring();
        let mut runs = Vec::with_capacity(repeats);
        for run in 1..=repeats {
            let counts = self.quantum_query(shots).await?;
            let (guess_bitstring, count) = most_frequent_outcome(&counts)?;
            let guess = u32::from_str_radix(&guess_bitstring, 2).map_err(|e| {
                EvalError::InvalidArgument(format!("outcome '{guess_bitstring}': {e}"))
            })?;
            runs.push(OracleRun {
                run,
                guess,
                guess_bitstring,
                count,
                success_probability: success_probability(&counts, u64::from(shots), &secret)?,
                quantum_calls: self.quantum_calls,
            });
        }
        Ok(runs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_secret_bits_big_endian() {
        let oracle = OracleSimulator::new(11, 4).unwrap();
        assert_eq!(oracle.secret_bits(), vec![true, false, true, true]);
        assert_eq!(oracle.secret_bitstring(), "1011");
    }

    #[test]
    fn test_new_validates() {
        assert!(OracleSimulator::new(16, 4).is_err());
        assert!(OracleSimulator::new(0, 0).is_err());
        assert!(OracleSimulator::new(0, 17).is_err());
        assert!(OracleSimulator::new(65_535, 16).is_ok());
    }

    #[test]
    fn test_classical_query() {
        let mut oracle = OracleSimulator::new(11, 4).unwrap();
        assert!(oracle.classical_query(&[true, false, false, false]).unwrap());
        assert!(!oracle.classical_query(&[false, true, false, false]).unwrap());
        // 1011 · 1010 = 1 + 1 = 0 mod 2
        assert!(!oracle.classical_query(&[true, false, true, false]).unwrap());
        assert_eq!(oracle.classical_calls(), 3);

        assert!(matches!(
            oracle.classical_query(&[true]),
            Err(EvalError::InvalidArgument(_))
        ));
        assert_eq!(oracle.classical_calls(), 3);
    }

    #[test]
    fn test_recover_secret_classically() {
        for secret in 0..16 {
            let mut oracle = OracleSimulator::new(secret, 4).unwrap();
            assert_eq!(oracle.recover_secret_classically().unwrap(), secret);
            assert_eq!(oracle.classical_calls(), 4);
        }
    }

    #[test]
    fn test_random_secret_in_range() {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..32 {
            let oracle = OracleSimulator::with_random_secret(4, &mut rng).unwrap();
            assert!(oracle.secret() < 16);
        }
    }

    #[test]
    fn test_most_frequent_outcome() {
        let counts = Counts::from_pairs([("1011", 990), ("0011", 10)]);
        assert_eq!(
            most_frequent_outcome(&counts).unwrap(),
            ("1011".to_string(), 990)
        );
        let tie = Counts::from_pairs([("10", 5), ("01", 5)]);
        assert_eq!(most_frequent_outcome(&tie).unwrap().0, "01");
        assert!(most_frequent_outcome(&Counts::new()).is_err());
    }

    #[tokio::test]
    async fn test_quantum_query_needs_backend() {
        let mut oracle = OracleSimulator::new(3, 4).unwrap();
        assert!(matches!(
            oracle.quantum_query(100).await,
            Err(EvalError::Configuration(_))
        ));
        assert_eq!(oracle.quantum_calls(), 0);
    }
}
