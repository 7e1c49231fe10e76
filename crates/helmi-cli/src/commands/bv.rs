//! Bernstein–Vazirani: recover a hidden 4-bit number in one quantum query.

use anyhow::{Result, bail};
use clap::ValueEnum;
use console::style;
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Serialize;

use helmi_eval::{DEFAULT_ORACLE_BITS, OracleRun, OracleSimulator};

use super::common::{Session, print_backend, print_header, print_json, spinner};

/// Shots of a single run.
pub const SINGLE_RUN_SHOTS: u32 = 10_000;
/// Shots of each repeated run.
pub const REPEATED_RUN_SHOTS: u32 = 1_000;

/// Run mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum BvOption {
    /// One quantum run.
    Single,
    /// Several quantum runs, one table row each.
    Repeated,
}

#[derive(Serialize)]
struct Report<'a> {
    secret: u32,
    secret_bitstring: String,
    classical_recovery: u32,
    classical_calls: u64,
    runs: &'a [OracleRun],
}

/// Execute the bv command.
pub async fn execute(
    session: &Session,
    number: Option<u32>,
    option: BvOption,
    repeats: usize,
    shots: Option<u32>,
) -> Result<()> {
    let limit = 1u32 << DEFAULT_ORACLE_BITS;
    let oracle = match number {
        Some(n) if n >= limit => {
            bail!("Secret must be a {DEFAULT_ORACLE_BITS}-bit number, less than {limit}; got {n}")
        }
        Some(n) => OracleSimulator::new(n, DEFAULT_ORACLE_BITS)?,
        None => {
            let mut rng = session
                .seed
                .map_or_else(StdRng::from_entropy, StdRng::seed_from_u64);
            OracleSimulator::with_random_secret(DEFAULT_ORACLE_BITS, &mut rng)?
        }
    };
    let mut oracle = oracle.with_backend(session.backend.clone());

    let (repeats, shots) = match option {
        BvOption::Single => (1, shots.unwrap_or(SINGLE_RUN_SHOTS)),
        BvOption::Repeated => (repeats, shots.unwrap_or(REPEATED_RUN_SHOTS)),
    };

    if !session.json {
        print_backend(session);
        print_header("Initialization");
        match number {
            Some(n) => println!(
                "The hidden oracle number is s = {n}. In general it is not disclosed to the testing party."
            ),
            None => println!("The hidden oracle number was chosen randomly and will not be disclosed."),
        }
        println!("The oracle is now initialized with the secret oracle index.");
    }

    let progress = spinner(format!("Querying the oracle {repeats} time(s)"), session.json)?;
    let runs = oracle.repeated_run(repeats, shots).await?;
    progress.finish_and_clear();

    // Classical baseline: one query per basis vector.
    let mut baseline = OracleSimulator::new(oracle.secret(), oracle.dim())?;
    let classical_recovery = baseline.recover_secret_classically()?;

    if session.json {
        return print_json(&Report {
            secret: oracle.secret(),
            secret_bitstring: oracle.secret_bitstring(),
            classical_recovery,
            classical_calls: baseline.classical_calls(),
            runs: &runs,
        });
    }

    match option {
        BvOption::Single => {
            let run = &runs[0];
            print_header("Single run");
            println!(
                "Success chance: {}",
                style(format!("{:.2}%", run.success_probability * 100.0)).green()
            );
            println!("Result: {}", run.guess);
            println!("Binary: {}", run.guess_bitstring);
            println!("Secret number: {}", oracle.secret());
            println!(
                "Guessed outcome is s = {} (binary number {}) found in {} shots out of 1 repeats.",
                run.guess, run.guess_bitstring, run.count
            );
            println!("Quantum oracle was called {} time(s).", oracle.quantum_calls());
        }
        BvOption::Repeated => {
            print_header("Repeated run");
            println!(
                "{}",
                style(format!(
                    "{:<5}{:>10}{:>10}{:>10}{:>10}{:>10}",
                    "Run", "Success", "Result", "Binary", "Secret", "qcalls"
                ))
                .bold()
            );
            for run in &runs {
                println!(
                    "{:<5}{:>10}{:>10}{:>10}{:>10}{:>10}",
                    run.run,
                    format!("{:.2}%", run.success_probability * 100.0),
                    run.guess,
                    run.guess_bitstring,
                    oracle.secret(),
                    run.quantum_calls
                );
            }
        }
    }
    println!(
        "Classically the secret takes {} oracle calls ({}).",
        baseline.classical_calls(),
        classical_recovery
    );
    Ok(())
}
