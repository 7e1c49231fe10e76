//! Parameter sweep of the phase-probe circuit.

use std::f64::consts::PI;

use anyhow::{Result, bail};
use console::style;

use helmi_eval::{Experiment, TargetDistribution};
use helmi_ir::{Circuit, HELMI_CENTER, HELMI_QUBITS};

use super::common::{
    Session, print_backend, print_counts, print_header, print_json, print_scores, spinner,
};

/// `points` evenly spaced values from `start` to `stop`, both included.
pub fn linspace(start: f64, stop: f64, points: usize) -> Vec<f64> {
    match points {
        0 => vec![],
        1 => vec![start],
        n => {
            let step = (stop - start) / (n - 1) as f64;
            (0..n).map(|i| start + step * i as f64).collect()
        }
    }
}

/// Ideal outcome distribution of the probe at `theta`.
///
/// The probe returns QB1 to `|0⟩` with probability `cos²(πθ)` and leaves QB3
/// in `|0⟩`, so only `"00"` and `"10"` carry weight.
pub fn probe_target(theta: f64) -> Result<TargetDistribution> {
    let stay = (PI * theta).cos().powi(2);
    Ok(TargetDistribution::new(vec![stay, 0.0, 1.0 - stay, 0.0])?)
}

/// One scored probe per sweep point.
pub fn experiments(thetas: &[f64]) -> Result<Vec<Experiment>> {
    thetas
        .iter()
        .map(|&theta| {
            let circuit = Circuit::phase_probe(HELMI_QUBITS, 0, HELMI_CENTER, theta)?;
            Ok(Experiment::new(circuit).with_target(probe_target(theta)?))
        })
        .collect()
}

/// Execute the sweep command.
pub async fn execute(
    session: &Session,
    points: usize,
    start: f64,
    stop: f64,
    shots: u32,
) -> Result<()> {
    if points == 0 {
        bail!("--points must be at least 1");
    }
    let thetas = linspace(start, stop, points);
    let experiments = experiments(&thetas)?;
    let runner = session.runner(shots)?;

    let progress = spinner(format!("Sweeping theta over {points} points"), session.json)?;
    let results = runner.run_sweep(&experiments, shots, 1).await?;
    progress.finish_and_clear();

    if session.json {
        return print_json(&results);
    }

    print_backend(session);
    print_header("Phase sweep");
    for (theta, result) in thetas.iter().zip(&results) {
        println!("\n  theta = {}", style(format!("{theta:.3}")).bold());
        print_counts(result.counts(), shots);
        print_scores(result);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linspace() {
        assert_eq!(linspace(0.0, 0.5, 3), vec![0.0, 0.25, 0.5]);
        assert_eq!(linspace(0.2, 0.9, 1), vec![0.2]);
        assert!(linspace(0.0, 1.0, 0).is_empty());
    }

    #[test]
    fn test_probe_target_endpoints() {
        let home = probe_target(0.0).unwrap();
        assert_eq!(home.probability("00"), 1.0);

        let flipped = probe_target(0.5).unwrap();
        assert!((flipped.probability("10") - 1.0).abs() < 1e-12);
    }
}
