//! Two Bell variants submitted as one batch.

use anyhow::Result;
use console::style;
use serde::Serialize;

use helmi_hal::Counts;
use helmi_ir::{Circuit, HELMI_CENTER, HELMI_QUBITS};

use super::common::{Session, print_backend, print_counts, print_header, print_json, spinner};

#[derive(Serialize)]
struct BatchEntry<'a> {
    label: &'a str,
    counts: &'a Counts,
}

/// `H(a) CX(a,b)` and `H(a) CX(b,a)` on QB1 and QB3.
pub fn circuits() -> Result<Vec<Circuit>> {
    let forward = Circuit::bell_pair(HELMI_QUBITS, 0, HELMI_CENTER)?;

    let mut reversed = Circuit::with_size("bell_reversed_cnot", HELMI_QUBITS, 2);
    reversed
        .h(0)?
        .cx(HELMI_CENTER, 0)?
        .measure(0, 0)?
        .measure(HELMI_CENTER, 1)?;

    Ok(vec![forward, reversed])
}

/// Execute the batch command.
pub async fn execute(session: &Session, shots: u32) -> Result<()> {
    let circuits = circuits()?;
    let runner = session.runner(shots)?;

    let progress = spinner(format!("Submitting {} circuits", circuits.len()), session.json)?;
    let histograms = runner.run_batch(&circuits, shots).await?;
    progress.finish_and_clear();

    if session.json {
        let entries: Vec<_> = circuits
            .iter()
            .zip(&histograms)
            .map(|(circuit, counts)| BatchEntry {
                label: circuit.name(),
                counts,
            })
            .collect();
        return print_json(&entries);
    }

    print_backend(session);
    print_header("Batch submission");
    for (circuit, counts) in circuits.iter().zip(&histograms) {
        println!("\n  {}", style(circuit.name()).bold());
        print_counts(counts, shots);
    }
    Ok(())
}
