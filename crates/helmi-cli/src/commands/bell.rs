//! Bell pairs between QB3 and every other Helmi qubit.

use anyhow::Result;
use console::style;

use helmi_eval::metrics::population;
use helmi_eval::{Experiment, TargetDistribution};
use helmi_ir::{Circuit, HELMI_CENTER, HELMI_QUBITS};

use super::common::{
    Session, print_backend, print_counts, print_header, print_json, print_scores, spinner,
};

/// Qubits paired with the centre, in script order.
pub const OUTER_QUBITS: [u32; 4] = [0, 1, 3, 4];

/// Both CNOT directions for every outer qubit.
pub fn experiments() -> Result<Vec<Experiment>> {
    let mut experiments = Vec::with_capacity(2 * OUTER_QUBITS.len());
    for qb in OUTER_QUBITS {
        for (control, target) in [(qb, HELMI_CENTER), (HELMI_CENTER, qb)] {
            let circuit = Circuit::bell_pair(HELMI_QUBITS, control, target)?;
            experiments.push(Experiment::new(circuit).with_target(TargetDistribution::bell()));
        }
    }
    Ok(experiments)
}

/// Execute the bell command.
pub async fn execute(session: &Session, shots: u32) -> Result<()> {
    let experiments = experiments()?;
    let runner = session.runner(shots)?;

    if !session.json {
        print_backend(session);
        print_header("Preparing Bell states");
    }
    let progress = spinner(
        format!("Running {} Bell circuits", experiments.len()),
        session.json,
    )?;
    let results = runner.run_sweep(&experiments, shots, 1).await?;
    progress.finish_and_clear();

    if session.json {
        return print_json(&results);
    }

    for (experiment, result) in experiments.iter().zip(&results) {
        let measured = experiment.circuit().measurements();
        let (control, target) = (measured[0].0, measured[1].0);
        println!(
            "\n  {} {} {}",
            style(control.label()).bold(),
            style("→").dim(),
            style(target.label()).bold()
        );
        print_counts(result.counts(), shots);
        let correlated = population(result.counts(), u64::from(shots), &["00", "11"])?;
        println!(
            "    |00⟩ or |11⟩: {}",
            style(format!("{:.2}%", correlated * 100.0)).green()
        );
        print_scores(result);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_experiments_cover_both_directions() {
        let experiments = experiments().unwrap();
        assert_eq!(experiments.len(), 8);
        let names: Vec<_> = experiments.iter().map(|e| e.circuit().name()).collect();
        assert_eq!(names[0], "bell_q0_q2");
        assert_eq!(names[1], "bell_q2_q0");
        assert!(experiments.iter().all(|e| e.target().is_some()));
    }
}
