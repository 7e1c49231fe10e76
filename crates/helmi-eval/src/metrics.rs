//! Histogram metrics: fidelity, iterative trace distance, success rates.
//!
//! Every metric takes the histogram, the shot count it is normalised by and
//! the reference it is scored against. Outcomes missing from the histogram
//! count as zero. `shots == 0`, non-binary keys and keys whose width differs
//! from the target are rejected with [`EvalError::InvalidArgument`].

use std::collections::BTreeSet;

use helmi_hal::Counts;

use crate::distribution::{TargetDistribution, is_binary, outcome_bitstring};
use crate::error::{EvalError, EvalResult};

/// Bhattacharyya fidelity `Σ_i sqrt(p_i · t_i)` over the full outcome space.
///
/// `1.0` when the observed frequencies equal the target, `0.0` on disjoint
/// supports.
pub fn fidelity(histogram: &Counts, shots: u64, target: &TargetDistribution) -> EvalResult<f64> {
    check_histogram(histogram, shots, Some(target.num_bits()))?;
    Ok(target
        .probabilities()
        .iter()
        .enumerate()
        .map(|(i, &t)| (frequency(histogram, shots, i, target.num_bits()) * t).sqrt())
        .sum())
}

/// Distance accumulated as `d = (d + |p_i - t_i|) / 2` over outcomes in
/// canonical order.
///
/// Earlier terms are attenuated by every later halving, so this is not the
/// textbook `½ Σ|p_i - t_i|`. Existing result sets were produced with this
/// recurrence and stay comparable only if it is kept as is.
pub fn trace_distance_iterative(
    histogram: &Counts,
    shots: u64,
    target: &TargetDistribution,
) -> EvalResult<f64> {
    check_histogram(histogram, shots, Some(target.num_bits()))?;
    let mut distance = 0.0;
    for (i, &t) in target.probabilities().iter().enumerate() {
        distance += (frequency(histogram, shots, i, target.num_bits()) - t).abs();
        distance *= 0.5;
    }
    Ok(distance)
}

/// Fraction of shots that landed on `desired`.
pub fn success_probability(histogram: &Counts, shots: u64, desired: &str) -> EvalResult<f64> {
    check_outcome(desired)?;
    check_histogram(histogram, shots, Some(desired.len()))?;
    Ok(ratio(histogram.get(desired), shots))
}

/// Fraction of shots that landed on any of `outcomes`.
///
/// Duplicate outcomes are counted once.
pub fn population(histogram: &Counts, shots: u64, outcomes: &[&str]) -> EvalResult<f64> {
    let outcomes: BTreeSet<&str> = outcomes.iter().copied().collect();
    let mut width = None;
    for outcome in &outcomes {
        check_outcome(outcome)?;
        if width.is_some_and(|w| w != outcome.len()) {
            return Err(EvalError::InvalidArgument(
                "outcomes have different widths".into(),
            ));
        }
        width = Some(outcome.len());
    }
    check_histogram(histogram, shots, width)?;
    let hits: u64 = outcomes.iter().map(|o| histogram.get(o)).sum();
    Ok(ratio(hits, shots))
}

/// Success rate of a qubit-flip experiment: `1 - P(initial_state)`.
pub fn flip_success_probability(
    histogram: &Counts,
    shots: u64,
    initial_state: &str,
) -> EvalResult<f64> {
    Ok(1.0 - success_probability(histogram, shots, initial_state)?)
}

#[allow(clippy::cast_precision_loss)]
fn ratio(count: u64, shots: u64) -> f64 {
    count as f64 / shots as f64
}

fn frequency(histogram: &Counts, shots: u64, index: usize, width: usize) -> f64 {
    ratio(histogram.get(&outcome_bitstring(index, width)), shots)
}

fn check_outcome(outcome: &str) -> EvalResult<()> {
    if outcome.is_empty() || !is_binary(outcome) {
        return Err(EvalError::InvalidArgument(format!(
            "'{outcome}' is not a bitstring"
        )));
    }
    Ok(())
}

fn check_histogram(histogram: &Counts, shots: u64, width: Option<usize>) -> EvalResult<()> {
    if shots == 0 {
        return Err(EvalError::InvalidArgument("shots must be positive".into()));
    }
    let recorded = histogram.total_shots();
    if recorded > shots {
        return Err(EvalError::InvalidArgument(format!(
            "histogram holds {recorded} shots but only {shots} were requested"
        )));
    }
    for (key, _) in histogram.iter() {
        if !is_binary(key) {
            return Err(EvalError::InvalidArgument(format!(
                "histogram key '{key}' is not a bitstring"
            )));
        }
        if let Some(width) = width {
            if key.len() != width {
                return Err(EvalError::InvalidArgument(format!(
                    "histogram key '{key}' has {} bits, expected {width}",
                    key.len()
                )));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bell_counts() -> Counts {
        Counts::from_pairs([("00", 480), ("11", 520)])
    }

    #[test]
    fn test_bell_fidelity() {
        let f = fidelity(&bell_counts(), 1000, &TargetDistribution::bell()).unwrap();
        let expected = (0.48_f64 * 0.5).sqrt() + (0.52_f64 * 0.5).sqrt();
        assert!((f - expected).abs() < 1e-12);
        assert!((f - 0.9998).abs() < 1e-4);
    }

    #[test]
    fn test_fidelity_extremes() {
        let exact = Counts::from_pairs([("00", 500), ("11", 500)]);
        let f = fidelity(&exact, 1000, &TargetDistribution::bell()).unwrap();
        assert!((f - 1.0).abs() < 1e-12);

        let disjoint = Counts::from_pairs([("01", 600), ("10", 400)]);
        let f = fidelity(&disjoint, 1000, &TargetDistribution::bell()).unwrap();
        assert_eq!(f, 0.0);
    }

    #[test]
    fn test_trace_distance_follows_recurrence() {
        // p = [.48, 0, 0, .52], t = [.5, 0, 0, .5]
        // d: .01 -> .005 -> .0025 -> (.0025 + .02) / 2
        let d = trace_distance_iterative(&bell_counts(), 1000, &TargetDistribution::bell())
            .unwrap();
        assert!((d - 0.01125).abs() < 1e-12);

        // The textbook value would be 0.02.
        assert!((d - 0.02).abs() > 1e-3);
    }

    #[test]
    fn test_trace_distance_is_order_dependent() {
        let early = Counts::from_pairs([("00", 1000)]);
        let late = Counts::from_pairs([("11", 1000)]);
        let uniform = TargetDistribution::new(vec![0.25; 4]).unwrap();
        let d_early = trace_distance_iterative(&early, 1000, &uniform).unwrap();
        let d_late = trace_distance_iterative(&late, 1000, &uniform).unwrap();
        assert!(d_late > d_early);
    }

    #[test]
    fn test_success_probability() {
        let counts = Counts::from_pairs([("1011", 1000)]);
        assert_eq!(success_probability(&counts, 1000, "1011").unwrap(), 1.0);
        assert_eq!(success_probability(&counts, 1000, "0000").unwrap(), 0.0);
    }

    #[test]
    fn test_population_and_flip() {
        let counts = Counts::from_pairs([("00", 450), ("11", 450), ("01", 100)]);
        let p = population(&counts, 1000, &["00", "11", "00"]).unwrap();
        assert!((p - 0.9).abs() < 1e-12);

        let flip = Counts::from_pairs([("1", 970), ("0", 30)]);
        let s = flip_success_probability(&flip, 1000, "0").unwrap();
        assert!((s - 0.97).abs() < 1e-12);
    }

    #[test]
    fn test_rejects_bad_input() {
        let counts = bell_counts();
        let bell = TargetDistribution::bell();
        assert!(matches!(
            fidelity(&counts, 0, &bell),
            Err(EvalError::InvalidArgument(_))
        ));
        assert!(fidelity(&counts, 999, &bell).is_err());
        assert!(fidelity(&counts, 1000, &TargetDistribution::ghz(3).unwrap()).is_err());
        assert!(success_probability(&counts, 1000, "0x").is_err());
        assert!(population(&counts, 1000, &["00", "1"]).is_err());

        let junk = Counts::from_pairs([("ab", 1)]);
        assert!(trace_distance_iterative(&junk, 1, &bell).is_err());
    }
}
