//! Target probability distributions over measurement outcomes.

use serde::{Deserialize, Serialize};

use crate::error::{EvalError, EvalResult};

/// Tolerance on the total probability mass of a target.
const SUM_TOLERANCE: f64 = 1e-9;

/// Render a canonical outcome index as a bitstring of `width` characters.
///
/// The bitstring is the index in big-endian binary, so index 1 of width 2
/// is `"01"`.
pub fn outcome_bitstring(index: usize, width: usize) -> String {
    format!("{index:0width$b}")
}

/// Parse a bitstring into its canonical outcome index.
pub fn outcome_index(bitstring: &str) -> EvalResult<usize> {
    if bitstring.is_empty() || !is_binary(bitstring) {
        return Err(EvalError::InvalidArgument(format!(
            "'{bitstring}' is not a bitstring"
        )));
    }
    usize::from_str_radix(bitstring, 2)
        .map_err(|e| EvalError::InvalidArgument(format!("bitstring '{bitstring}': {e}")))
}

pub(crate) fn is_binary(s: &str) -> bool {
    s.bytes().all(|b| b == b'0' || b == b'1')
}

/// A probability distribution over `2^n` outcomes in canonical order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetDistribution {
    num_bits: usize,
    probabilities: Vec<f64>,
}

impl TargetDistribution {
    /// Create a target from probabilities in canonical order.
    ///
    /// The length must be a power of two of at least 2, every entry finite
    /// and non-negative, and the total within `1e-9` of one.
    pub fn new(probabilities: Vec<f64>) -> EvalResult<Self> {
        let len = probabilities.len();
        if len < 2 || !len.is_power_of_two() {
            return Err(EvalError::InvalidArgument(format!(
                "target needs a power-of-two length of at least 2, got {len}"
            )));
        }
        if let Some(p) = probabilities.iter().find(|p| !p.is_finite() || **p < 0.0) {
            return Err(EvalError::InvalidArgument(format!(
                "target probabilities must be finite and non-negative, got {p}"
            )));
        }
        let total: f64 = probabilities.iter().sum();
        if (total - 1.0).abs() > SUM_TOLERANCE {
            return Err(EvalError::InvalidArgument(format!(
                "target probabilities sum to {total}, not 1"
            )));
        }
        Ok(Self {
            num_bits: len.trailing_zeros() as usize,
            probabilities,
        })
    }

    /// `(|00⟩ + |11⟩)/√2`: `[0.5, 0, 0, 0.5]`.
    pub fn bell() -> Self {
        Self {
            num_bits: 2,
            probabilities: vec![0.5, 0.0, 0.0, 0.5],
        }
    }

    /// Half the mass on all-zeros, half on all-ones.
    pub fn ghz(num_bits: usize) -> EvalResult<Self> {
        if !(2..=20).contains(&num_bits) {
            return Err(EvalError::InvalidArgument(format!(
                "GHZ target needs 2..=20 bits, got {num_bits}"
            )));
        }
        let mut probabilities = vec![0.0; 1 << num_bits];
        probabilities[0] = 0.5;
        probabilities[(1 << num_bits) - 1] = 0.5;
        Ok(Self {
            num_bits,
            probabilities,
        })
    }

    /// All mass on one outcome.
    pub fn basis_state(bitstring: &str) -> EvalResult<Self> {
        let index = outcome_index(bitstring)?;
        let num_bits = bitstring.len().max(1);
        if num_bits > 20 {
            return Err(EvalError::InvalidArgument(format!(
                "basis target of {num_bits} bits is too wide"
            )));
        }
        let mut probabilities = vec![0.0; 1 << num_bits];
        probabilities[index] = 1.0;
        Self::new(probabilities)
    }

    /// Number of classical bits per outcome.
    pub fn num_bits(&self) -> usize {
        self.num_bits
    }

    /// Probabilities in canonical order.
    pub fn probabilities(&self) -> &[f64] {
        &self.probabilities
    }

    /// Number of outcomes (`2^num_bits`).
    pub fn len(&self) -> usize {
        self.probabilities.len()
    }

    /// Always false; a target has at least two outcomes.
    pub fn is_empty(&self) -> bool {
        self.probabilities.is_empty()
    }

    /// Probability of one outcome; zero for bitstrings of another width.
    pub fn probability(&self, bitstring: &str) -> f64 {
        if bitstring.len() != self.num_bits {
            return 0.0;
        }
        outcome_index(bitstring).map_or(0.0, |i| self.probabilities[i])
    }
}
