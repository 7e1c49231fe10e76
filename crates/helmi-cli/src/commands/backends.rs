//! Backends command implementation.

use anyhow::Result;
use console::style;

use helmi_hal::{Backend, Capabilities, HELMI_CORTEX_URL};

use super::common::{BackendKind, create_backend};

fn print_capabilities(caps: &Capabilities) {
    println!("    Qubits: {}", caps.num_qubits);
    println!("    Max shots: {}", caps.max_shots);
    println!("    Gates: {}", caps.native_gates.join(", "));
    match caps.topology.center() {
        Some(center) => println!("    Topology: star around QB{}", center + 1),
        None => println!("    Topology: all-to-all"),
    }
    println!("    Batch: {}", if caps.supports_batch { "yes" } else { "no" });
}

/// Execute the backends command.
pub fn execute() -> Result<()> {
    println!("{} Available backends:\n", style("Helmi").cyan().bold());

    for kind in [BackendKind::Simulator, BackendKind::FakeHelmi] {
        let backend = create_backend(kind, None)?;
        println!("  {} {} (local)", style("●").green(), style(backend.name()).bold());
        print_capabilities(backend.capabilities());
        println!();
    }

    let endpoint = std::env::var(HELMI_CORTEX_URL).ok().filter(|v| !v.trim().is_empty());
    println!(
        "  {} {} ({})",
        style("○").yellow(),
        style(BackendKind::Helmi.name()).bold(),
        match &endpoint {
            Some(url) => format!("endpoint {url}, submission client not built in"),
            None => format!("{HELMI_CORTEX_URL} not set"),
        }
    );
    print_capabilities(&Capabilities::helmi());
    Ok(())
}
