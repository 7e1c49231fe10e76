//! Bell pairs on the star, then the 5-qubit GHZ state around QB3.

use anyhow::Result;
use console::style;

use helmi_eval::{Experiment, TargetDistribution};
use helmi_ir::{Circuit, HELMI_CENTER, HELMI_QUBITS};

use super::bell::OUTER_QUBITS;
use super::common::{Session, print_backend, print_header, print_json, print_scores, spinner};

/// The four QB3 Bell pairs followed by GHZ-5.
pub fn experiments() -> Result<Vec<Experiment>> {
    let mut experiments = Vec::with_capacity(OUTER_QUBITS.len() + 1);
    for qb in OUTER_QUBITS {
        let circuit = Circuit::bell_pair(HELMI_QUBITS, qb, HELMI_CENTER)?;
        experiments.push(Experiment::new(circuit).with_target(TargetDistribution::bell()));
    }
    let ghz = Circuit::ghz_star(HELMI_QUBITS, HELMI_CENTER)?;
    experiments.push(
        Experiment::new(ghz).with_target(TargetDistribution::ghz(HELMI_QUBITS as usize)?),
    );
    Ok(experiments)
}

/// Execute the ghz command.
pub async fn execute(session: &Session, shots: u32) -> Result<()> {
    let experiments = experiments()?;
    let runner = session.runner(shots)?;

    let progress = spinner("Preparing Bell and GHZ-5 states", session.json)?;
    let results = runner.run_sweep(&experiments, shots, 1).await?;
    progress.finish_and_clear();

    if session.json {
        return print_json(&results);
    }

    print_backend(session);
    let (ghz, bells) = results
        .split_last()
        .ok_or_else(|| anyhow::anyhow!("sweep returned no results"))?;

    print_header("Preparing a Bell state");
    for (qb, result) in OUTER_QUBITS.iter().zip(bells) {
        println!("\n  {} and QB3", style(format!("QB{}", qb + 1)).bold());
        print_scores(result);
    }

    print_header("Preparing a GHZ-5 state");
    print_scores(ghz);
    Ok(())
}
