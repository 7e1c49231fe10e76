//! Readout noise for the fake-Helmi profile.

use rand::Rng;
use serde::{Deserialize, Serialize};

use helmi_hal::{HalError, HalResult};

/// Symmetric-or-not readout error applied independently to every
/// measured classical bit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReadoutNoise {
    /// Probability that a `0` is read as `1`.
    pub p01: f64,
    /// Probability that a `1` is read as `0`.
    pub p10: f64,
}

impl ReadoutNoise {
    /// Default readout error of the fake-Helmi profile.
    pub const HELMI_DEFAULT: f64 = 0.02;

    /// Create a readout error model.
    pub fn new(p01: f64, p10: f64) -> HalResult<Self> {
        for (name, p) in [("p01", p01), ("p10", p10)] {
            if !(0.0..=1.0).contains(&p) {
                return Err(HalError::Configuration(format!(
                    "readout error {name} must be in [0, 1], got {p}"
                )));
            }
        }
        Ok(Self { p01, p10 })
    }

    /// Same error rate in both directions.
    pub fn symmetric(p: f64) -> HalResult<Self> {
        Self::new(p, p)
    }

    /// Flip each bit with its direction-dependent probability.
    pub fn corrupt<R: Rng + ?Sized>(&self, bits: &mut [bool], rng: &mut R) {
        for bit in bits.iter_mut() {
            let p = if *bit { self.p10 } else { self.p01 };
            if p > 0.0 && rng.gen_bool(p) {
                *bit = !*bit;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_rejects_out_of_range() {
        assert!(ReadoutNoise::new(-0.1, 0.0).is_err());
        assert!(ReadoutNoise::symmetric(1.5).is_err());
    }

    #[test]
    fn test_zero_noise_is_identity() {
        let noise = ReadoutNoise::symmetric(0.0).unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        let mut bits = vec![true, false, true];
        noise.corrupt(&mut bits, &mut rng);
        assert_eq!(bits, vec![true, false, true]);
    }

    #[test]
    fn test_certain_noise_flips_everything() {
        let noise = ReadoutNoise::symmetric(1.0).unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        let mut bits = vec![true, false];
        noise.corrupt(&mut bits, &mut rng);
        assert_eq!(bits, vec![false, true]);
    }
}
