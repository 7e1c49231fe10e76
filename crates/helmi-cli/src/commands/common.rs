//! Shared helpers for CLI commands.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::ValueEnum;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use tracing::info;

use helmi_adapter_sim::SimulatorBackend;
use helmi_eval::{ExperimentResult, ExperimentRunner, RunnerConfig};
use helmi_hal::{Backend, BackendConfig, BackendRegistry, Counts, HalError, HelmiConfig};

/// Backends selectable with `--backend`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum BackendKind {
    /// Ideal statevector simulator.
    Simulator,
    /// Noisy simulator with Helmi's star topology.
    FakeHelmi,
    /// The Helmi device behind `HELMI_CORTEX_URL`.
    Helmi,
}

impl BackendKind {
    /// Registry name of this backend.
    pub fn name(self) -> &'static str {
        match self {
            BackendKind::Simulator => "simulator",
            BackendKind::FakeHelmi => "fake-helmi",
            BackendKind::Helmi => "helmi",
        }
    }
}

/// Everything a subcommand needs to run.
pub struct Session {
    /// Backend every circuit is executed on.
    pub backend: Arc<dyn Backend>,
    /// Print machine-readable JSON instead of tables.
    pub json: bool,
    /// Seed for oracle secrets and sampling.
    pub seed: Option<u64>,
}

impl Session {
    /// Runner over this session's backend.
    pub fn runner(&self, shots: u32) -> Result<ExperimentRunner> {
        let config = RunnerConfig {
            shots,
            repetitions: 1,
        };
        Ok(ExperimentRunner::new(self.backend.clone(), config)?)
    }
}

/// Registry of every backend the CLI knows.
pub fn backend_registry() -> BackendRegistry {
    let mut registry = BackendRegistry::new();
    registry.register::<SimulatorBackend>(BackendKind::Simulator.name());
    registry.register::<SimulatorBackend>(BackendKind::FakeHelmi.name());
    registry.register_factory(BackendKind::Helmi.name(), |config: BackendConfig| {
        let endpoint = config.endpoint.unwrap_or_default();
        Err(HalError::BackendUnavailable(format!(
            "Helmi at {endpoint} needs the vendor submission client, which this build does not include. \
             Use --backend fake-helmi to run against the simulated device"
        )))
    });
    registry
}

/// Build the backend selected on the command line.
pub fn create_backend(kind: BackendKind, seed: Option<u64>) -> Result<Arc<dyn Backend>> {
    let mut config = match kind {
        BackendKind::Helmi => HelmiConfig::from_env()
            .context("Helmi runs need the Cortex endpoint. Are you on a Helmi-enabled node?")?
            .backend_config(),
        other => BackendConfig::new(other.name()),
    };
    if let Some(seed) = seed {
        config = config.with_extra("seed", serde_json::json!(seed));
    }
    info!("Creating backend '{}'", kind.name());
    backend_registry()
        .create(kind.name(), config)
        .with_context(|| format!("Failed to create backend '{}'", kind.name()))
}

/// Spinner shown while circuits are executing.
pub fn spinner(message: impl Into<String>, hidden: bool) -> Result<ProgressBar> {
    if hidden {
        return Ok(ProgressBar::hidden());
    }
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}")?);
    spinner.set_message(message.into());
    spinner.enable_steady_tick(Duration::from_millis(100));
    Ok(spinner)
}

/// Print a section header.
pub fn print_header(title: &str) {
    println!("\n{}", style(format!("=== {} ===", title.to_uppercase())).cyan().bold());
}

/// Print a histogram with one bar per outcome.
#[allow(clippy::cast_precision_loss)]
pub fn print_counts(counts: &Counts, shots: u32) {
    let sorted = counts.sorted();
    for (bitstring, count) in sorted.iter().take(16) {
        let prob = *count as f64 / f64::from(shots) * 100.0;
        let bar_len = (prob / 2.0).round() as usize;
        let bar: String = "█".repeat(bar_len);
        println!(
            "    {}: {:>6} ({:>6.2}%) {}",
            style(bitstring).cyan(),
            count,
            prob,
            style(bar).green()
        );
    }
    if sorted.len() > 16 {
        println!("    ... and {} more outcomes", sorted.len() - 16);
    }
}

/// Print fidelity and distance of a scored result.
pub fn print_scores(result: &ExperimentResult) {
    if let Some(fidelity) = result.fidelity() {
        println!("    Fidelity = {}", style(format!("{fidelity:.3}")).yellow());
    }
    if let Some(distance) = result.trace_distance() {
        println!(
            "    Distance from target = {}",
            style(format!("{distance:.3}")).yellow()
        );
    }
}

/// Print any serialisable value as pretty JSON.
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Announce which backend a command runs on.
pub fn print_backend(session: &Session) {
    let caps = session.backend.capabilities();
    println!(
        "{} Running on {} ({} qubits{})",
        style("→").cyan().bold(),
        style(session.backend.name()).yellow(),
        caps.num_qubits,
        if caps.is_simulator { ", simulated" } else { "" }
    );
}
