//! Qubit flips: X on one or all Helmi qubits, scored by how often they read 1.

use anyhow::{Result, bail};
use clap::ValueEnum;
use console::style;

use helmi_eval::metrics::flip_success_probability;
use helmi_eval::{Experiment, ExperimentResult};
use helmi_ir::{Circuit, HELMI_QUBITS, QubitId};

use super::common::{Session, print_backend, print_header, print_json, spinner};

/// Which flips to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FlipOption {
    /// Flip each qubit on its own.
    One,
    /// Flip all qubits at once.
    All,
    /// Both of the above.
    Both,
    /// Flip the qubit given with `--qubit`.
    Qubit,
}

/// Circuits for a flip option.
pub fn experiments(option: FlipOption, qubit: Option<u32>) -> Result<Vec<Experiment>> {
    let single = |q: u32| -> Result<Experiment> {
        Ok(Experiment::new(Circuit::qubit_flip(HELMI_QUBITS, &[q])?).with_desired_outcome("1"))
    };
    let all = || -> Result<Experiment> {
        let qubits: Vec<u32> = (0..HELMI_QUBITS).collect();
        Ok(Experiment::new(Circuit::qubit_flip(HELMI_QUBITS, &qubits)?)
            .with_desired_outcome("1".repeat(HELMI_QUBITS as usize)))
    };

    match option {
        FlipOption::One => (0..HELMI_QUBITS).map(single).collect(),
        FlipOption::All => Ok(vec![all()?]),
        FlipOption::Both => {
            let mut experiments: Vec<_> = (0..HELMI_QUBITS).map(single).collect::<Result<_>>()?;
            experiments.push(all()?);
            Ok(experiments)
        }
        FlipOption::Qubit => match qubit {
            Some(q) if q < HELMI_QUBITS => Ok(vec![single(q)?]),
            Some(q) => bail!("--qubit must be 0..{}, got {q}", HELMI_QUBITS - 1),
            None => bail!("--option qubit needs --qubit"),
        },
    }
}

/// Execute the flip command.
///
/// Passing `--qubit` alone selects the single-qubit option.
pub async fn execute(
    session: &Session,
    option: FlipOption,
    qubit: Option<u32>,
    shots: u32,
) -> Result<()> {
    let option = if qubit.is_some() {
        FlipOption::Qubit
    } else {
        option
    };
    let experiments = experiments(option, qubit)?;
    let runner = session.runner(shots)?;

    let progress = spinner("Flipping qubits", session.json)?;
    let results = runner.run_sweep(&experiments, shots, 1).await?;
    progress.finish_and_clear();

    if session.json {
        return print_json(&results);
    }

    print_backend(session);
    print_header("Qubit flips");
    for (experiment, result) in experiments.iter().zip(&results) {
        let flipped: Vec<QubitId> = experiment
            .circuit()
            .measurements()
            .iter()
            .map(|(q, _)| *q)
            .collect();
        let label = if flipped.len() == 1 {
            flipped[0].label()
        } else {
            "All qubits".to_string()
        };
        println!("  {:<11} -> success rate {}", label, style(rate(result, shots)?).green());
    }
    Ok(())
}

fn rate(result: &ExperimentResult, shots: u32) -> Result<String> {
    let width = result.counts().width().unwrap_or(1);
    let success = if width == 1 {
        flip_success_probability(result.counts(), u64::from(shots), "0")?
    } else {
        result.success_probability().unwrap_or_default()
    };
    Ok(format!("{:.3} %", success * 100.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flip_options() {
        assert_eq!(experiments(FlipOption::One, None).unwrap().len(), 5);
        assert_eq!(experiments(FlipOption::All, None).unwrap().len(), 1);
        assert_eq!(experiments(FlipOption::Both, None).unwrap().len(), 6);

        let one = experiments(FlipOption::Qubit, Some(3)).unwrap();
        assert_eq!(one[0].circuit().name(), "flip_q3");

        assert!(experiments(FlipOption::Qubit, None).is_err());
        assert!(experiments(FlipOption::Qubit, Some(5)).is_err());
    }

    #[test]
    fn test_all_flip_desires_ones() {
        let all = experiments(FlipOption::All, None).unwrap();
        assert_eq!(all[0].desired_outcome(), Some("11111"));
    }
}
