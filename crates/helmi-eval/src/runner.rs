//! Experiment runner: sequential sweeps and batch submission.
//!
//! ```text
//!   run_sweep(experiments, shots, reps)
//!     for experiment i (input order)
//!       for repetition r
//!         backend.execute ──→ Counts ──→ ExperimentResult{i, r}
//!
//!   run_batch(circuits, shots)
//!     supports_batch?  yes ─→ execute_batch ─→ place items by index
//!                      no  ─→ execute, one circuit at a time
//! ```
//!
//! Submissions never overlap and are never retried. The first failure stops
//! the run and is reported with the index of the circuit that caused it.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use helmi_hal::{Backend, BatchItem, Counts, HalError};
use helmi_ir::Circuit;

use crate::distribution::TargetDistribution;
use crate::error::{EvalError, EvalResult};
use crate::metrics::{fidelity, success_probability, trace_distance_iterative};

/// Explicit runner configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunnerConfig {
    /// Shots per execution.
    pub shots: u32,
    /// Executions per experiment in a sweep.
    pub repetitions: u32,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            shots: 1000,
            repetitions: 1,
        }
    }
}

impl RunnerConfig {
    fn validate(shots: u32, repetitions: u32) -> EvalResult<()> {
        if shots == 0 {
            return Err(EvalError::InvalidArgument("shots must be positive".into()));
        }
        if repetitions == 0 {
            return Err(EvalError::InvalidArgument(
                "repetitions must be positive".into(),
            ));
        }
        Ok(())
    }
}

/// A circuit plus what its histogram is scored against.
#[derive(Debug, Clone)]
pub struct Experiment {
    circuit: Circuit,
    target: Option<TargetDistribution>,
    desired_outcome: Option<String>,
}

impl Experiment {
    /// An experiment that only collects a histogram.
    pub fn new(circuit: Circuit) -> Self {
        Self {
            circuit,
            target: None,
            desired_outcome: None,
        }
    }

    /// Score fidelity and trace distance against `target`.
    pub fn with_target(mut self, target: TargetDistribution) -> Self {
        self.target = Some(target);
        self
    }

    /// Score the fraction of shots landing on `outcome`.
    pub fn with_desired_outcome(mut self, outcome: impl Into<String>) -> Self {
        self.desired_outcome = Some(outcome.into());
        self
    }

    /// The circuit to execute.
    pub fn circuit(&self) -> &Circuit {
        &self.circuit
    }

    /// Target distribution, if any.
    pub fn target(&self) -> Option<&TargetDistribution> {
        self.target.as_ref()
    }

    /// Desired outcome, if any.
    pub fn desired_outcome(&self) -> Option<&str> {
        self.desired_outcome.as_deref()
    }

    fn check(&self, index: usize) -> EvalResult<()> {
        let width = self.circuit.num_clbits();
        if let Some(target) = &self.target {
            if target.num_bits() != width {
                return Err(EvalError::InvalidArgument(format!(
                    "experiment {index} ('{}') measures {width} bits but its target has {}",
                    self.circuit.name(),
                    target.num_bits()
                )));
            }
        }
        if let Some(outcome) = &self.desired_outcome {
            if outcome.len() != width {
                return Err(EvalError::InvalidArgument(format!(
                    "experiment {index} ('{}') measures {width} bits but desires '{outcome}'",
                    self.circuit.name()
                )));
            }
        }
        Ok(())
    }
}

/// Metrics of one completed execution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperimentResult {
    label: String,
    index: usize,
    repetition: u32,
    counts: Counts,
    shots: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    fidelity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    trace_distance: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    success_probability: Option<f64>,
}

impl ExperimentResult {
    /// Score a histogram against an experiment's references.
    pub fn evaluate(
        experiment: &Experiment,
        index: usize,
        repetition: u32,
        counts: Counts,
        shots: u32,
    ) -> EvalResult<Self> {
        let total = u64::from(shots);
        let in_context = |e: EvalError| match e {
            EvalError::InvalidArgument(msg) => EvalError::InvalidArgument(format!(
                "experiment {index} ('{}'): {msg}",
                experiment.circuit().name()
            )),
            other => other,
        };
        let (fidelity, trace_distance) = match experiment.target() {
            Some(target) => (
                Some(fidelity(&counts, total, target).map_err(in_context)?),
                Some(trace_distance_iterative(&counts, total, target).map_err(in_context)?),
            ),
            None => (None, None),
        };
        let success_probability = experiment
            .desired_outcome()
            .map(|outcome| success_probability(&counts, total, outcome))
            .transpose()
            .map_err(in_context)?;
        Ok(Self {
            label: experiment.circuit().name().to_string(),
            index,
            repetition,
            counts,
            shots,
            fidelity,
            trace_distance,
            success_probability,
        })
    }

    /// Circuit name.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Position of the experiment in the sweep input.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Repetition number, starting at 0.
    pub fn repetition(&self) -> u32 {
        self.repetition
    }

    /// The histogram this result was derived from.
    pub fn counts(&self) -> &Counts {
        &self.counts
    }

    /// Shots requested.
    pub fn shots(&self) -> u32 {
        self.shots
    }

    /// Fidelity against the target.
    pub fn fidelity(&self) -> Option<f64> {
        self.fidelity
    }

    /// Iterative trace distance against the target.
    pub fn trace_distance(&self) -> Option<f64> {
        self.trace_distance
    }

    /// Fraction of shots on the desired outcome.
    pub fn success_probability(&self) -> Option<f64> {
        self.success_probability
    }
}

/// Drives circuits through one backend.
pub struct ExperimentRunner {
    backend: Arc<dyn Backend>,
    config: RunnerConfig,
}

impl ExperimentRunner {
    /// Create a runner; the configuration is validated up front.
    pub fn new(backend: Arc<dyn Backend>, config: RunnerConfig) -> EvalResult<Self> {
        RunnerConfig::validate(config.shots, config.repetitions)?;
        Ok(Self { backend, config })
    }

    /// The backend circuits run on.
    pub fn backend(&self) -> &Arc<dyn Backend> {
        &self.backend
    }

    /// The configuration this runner was built with.
    pub fn config(&self) -> RunnerConfig {
        self.config
    }

    /// Sweep with the configured shots and repetitions.
    pub async fn run(&self, experiments: &[Experiment]) -> EvalResult<Vec<ExperimentResult>> {
        self.run_sweep(experiments, self.config.shots, self.config.repetitions)
            .await
    }

    /// Execute every experiment `repetitions` times, one submission at a time.
    ///
    /// Results come back experiment-major: all repetitions of experiment 0,
    /// then experiment 1, and so on.
    #[instrument(skip(self, experiments), fields(backend = self.backend.name()))]
    pub async fn run_sweep(
        &self,
        experiments: &[Experiment],
        shots: u32,
        repetitions: u32,
    ) -> EvalResult<Vec<ExperimentResult>> {
        RunnerConfig::validate(shots, repetitions)?;
        for (index, experiment) in experiments.iter().enumerate() {
            experiment.check(index)?;
        }
        info!(
            "Running sweep of {} experiments x {} repetitions",
            experiments.len(),
            repetitions
        );

        let mut results = Vec::with_capacity(experiments.len() * repetitions as usize);
        for (index, experiment) in experiments.iter().enumerate() {
            for repetition in 0..repetitions {
                let counts = self.execute_one(index, experiment.circuit(), shots).await?;
                results.push(ExperimentResult::evaluate(
                    experiment, index, repetition, counts, shots,
                )?);
            }
        }
        Ok(results)
    }

    /// Execute circuits as one logical batch; histograms follow input order.
    ///
    /// Falls back to sequential execution when the backend does not accept
    /// batches.
    #[instrument(skip(self, circuits), fields(backend = self.backend.name()))]
    pub async fn run_batch(&self, circuits: &[Circuit], shots: u32) -> EvalResult<Vec<Counts>> {
        RunnerConfig::validate(shots, 1)?;
        if circuits.is_empty() {
            return Ok(vec![]);
        }

        if !self.backend.capabilities().supports_batch {
            info!(
                "Backend has no batch support; running {} circuits sequentially",
                circuits.len()
            );
            let mut histograms = Vec::with_capacity(circuits.len());
            for (index, circuit) in circuits.iter().enumerate() {
                histograms.push(self.execute_one(index, circuit, shots).await?);
            }
            return Ok(histograms);
        }

        info!("Submitting batch of {} circuits", circuits.len());
        let items = self
            .backend
            .execute_batch(circuits, shots)
            .await
            .map_err(EvalError::batch)?;
        place_batch_items(items, circuits.len())
    }

    async fn execute_one(&self, index: usize, circuit: &Circuit, shots: u32) -> EvalResult<Counts> {
        debug!("Executing circuit {} ('{}')", index, circuit.name());
        self.backend
            .execute(circuit, shots)
            .await
            .map_err(|e| EvalError::backend(index, e))
    }
}

/// Order batch items by the index of their originating circuit.
fn place_batch_items(items: Vec<BatchItem>, expected: usize) -> EvalResult<Vec<Counts>> {
    let mut slots: Vec<Option<Counts>> = vec![None; expected];
    for item in items {
        let index = item.index;
        let slot = slots.get_mut(index).ok_or_else(|| {
            EvalError::backend(
                index,
                HalError::Backend(format!(
                    "batch answered circuit {index} but only {expected} were submitted"
                )),
            )
        })?;
        if slot.replace(item.counts).is_some() {
            return Err(EvalError::backend(
                index,
                HalError::Backend(format!("batch answered circuit {index} twice")),
            ));
        }
    }
    slots
        .into_iter()
        .enumerate()
        .map(|(index, slot)| {
            slot.ok_or_else(|| {
                EvalError::backend(
                    index,
                    HalError::Backend(format!("batch returned no histogram for circuit {index}")),
                )
            })
        })
        .collect()
}
