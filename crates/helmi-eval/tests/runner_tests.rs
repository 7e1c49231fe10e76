//! Runner behaviour against scripted backends.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use helmi_eval::{EvalError, Experiment, ExperimentRunner, RunnerConfig, TargetDistribution};
use helmi_hal::{Backend, BatchItem, Capabilities, Counts, HalError, HalResult};
use helmi_adapter_sim::SimulatorBackend;
use helmi_ir::Circuit;

/// Answers every circuit with all shots on one outcome derived from its name,
/// after a delay that shrinks with the submission count.
struct ScriptedBackend {
    caps: Capabilities,
    calls: AtomicUsize,
    fail_on: Option<String>,
}

impl ScriptedBackend {
    fn new(supports_batch: bool) -> Self {
        Self {
            caps: Capabilities::simulator(5).with_batch_support(supports_batch),
            calls: AtomicUsize::new(0),
            fail_on: None,
        }
    }

    fn failing_on(mut self, name: &str) -> Self {
        self.fail_on = Some(name.to_string());
        self
    }

    fn answer(circuit: &Circuit, shots: u32) -> Counts {
        // flip_qN measures one bit; everything else two.
        let key = if circuit.num_clbits() == 1 { "1" } else { "11" };
        let mut counts = Counts::new();
        counts.insert(key, u64::from(shots));
        counts
    }
}

#[async_trait]
impl Backend for ScriptedBackend {
    fn name(&self) -> &str {
        "scripted"
    }

    fn capabilities(&self) -> &Capabilities {
        &self.caps
    }

    async fn execute(&self, circuit: &Circuit, shots: u32) -> HalResult<Counts> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst) as u64;
        tokio::time::sleep(Duration::from_millis(50u64.saturating_sub(n * 10))).await;
        if self.fail_on.as_deref() == Some(circuit.name()) {
            return Err(HalError::JobFailed(format!("{} rejected", circuit.name())));
        }
        Ok(Self::answer(circuit, shots))
    }

    async fn execute_batch(&self, circuits: &[Circuit], shots: u32) -> HalResult<Vec<BatchItem>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(index) = circuits
            .iter()
            .position(|c| self.fail_on.as_deref() == Some(c.name()))
        {
            return Err(HalError::batch_item(
                index,
                HalError::JobFailed(format!("{} rejected", circuits[index].name())),
            ));
        }
        // Completion order is the reverse of submission order.
        Ok(circuits
            .iter()
            .enumerate()
            .rev()
            .map(|(i, c)| BatchItem::new(i, Self::answer(c, shots)))
            .collect())
    }
}

fn flip_experiments(n: u32) -> Vec<Experiment> {
    (0..n)
        .map(|q| {
            Experiment::new(Circuit::qubit_flip(5, &[q]).unwrap()).with_desired_outcome("1")
        })
        .collect()
}

#[tokio::test(start_paused = true)]
async fn test_sweep_preserves_input_order() {
    let backend = Arc::new(ScriptedBackend::new(false));
    let runner = ExperimentRunner::new(backend.clone(), RunnerConfig::default()).unwrap();

    let results = runner.run_sweep(&flip_experiments(5), 100, 1).await.unwrap();

    assert_eq!(results.len(), 5);
    for (i, result) in results.iter().enumerate() {
        assert_eq!(result.index(), i);
        assert_eq!(result.label(), format!("flip_q{i}"));
        assert_eq!(result.success_probability(), Some(1.0));
    }
    assert_eq!(backend.calls.load(Ordering::SeqCst), 5);
}

#[tokio::test(start_paused = true)]
async fn test_sweep_is_experiment_major() {
    let backend = Arc::new(ScriptedBackend::new(false));
    let config = RunnerConfig {
        shots: 10,
        repetitions: 3,
    };
    let runner = ExperimentRunner::new(backend, config).unwrap();

    let results = runner.run(&flip_experiments(2)).await.unwrap();
    let order: Vec<_> = results.iter().map(|r| (r.index(), r.repetition())).collect();
    assert_eq!(order, vec![(0, 0), (0, 1), (0, 2), (1, 0), (1, 1), (1, 2)]);
}

#[tokio::test(start_paused = true)]
async fn test_sweep_scores_targets() {
    let backend = Arc::new(ScriptedBackend::new(false));
    let runner = ExperimentRunner::new(backend, RunnerConfig::default()).unwrap();
    let experiment = Experiment::new(Circuit::bell().unwrap()).with_target(TargetDistribution::bell());

    let results = runner.run_sweep(&[experiment], 1000, 1).await.unwrap();
    let fidelity = results[0].fidelity().unwrap();
    assert!((fidelity - 0.5_f64.sqrt()).abs() < 1e-12);
    // [0,0,0,1] vs [.5,0,0,.5]: .25 -> .125 -> .0625 -> .28125
    assert!((results[0].trace_distance().unwrap() - 0.28125).abs() < 1e-12);
}

#[tokio::test(start_paused = true)]
async fn test_sweep_failure_carries_index() {
    let backend = Arc::new(ScriptedBackend::new(false).failing_on("flip_q3"));
    let runner = ExperimentRunner::new(backend.clone(), RunnerConfig::default()).unwrap();

    let err = runner.run_sweep(&flip_experiments(5), 100, 1).await.unwrap_err();
    match err {
        EvalError::BackendFailure { index, source } => {
            assert_eq!(index, 3);
            assert!(matches!(source, HalError::JobFailed(_)));
        }
        other => panic!("unexpected error: {other}"),
    }
    // No retry, no further submissions.
    assert_eq!(backend.calls.load(Ordering::SeqCst), 4);
}

#[tokio::test]
async fn test_sweep_rejects_zero_shots_and_repetitions() {
    let backend = Arc::new(ScriptedBackend::new(false));
    let runner = ExperimentRunner::new(backend.clone(), RunnerConfig::default()).unwrap();
    assert!(matches!(
        runner.run_sweep(&flip_experiments(1), 0, 1).await,
        Err(EvalError::InvalidArgument(_))
    ));
    assert!(matches!(
        runner.run_sweep(&flip_experiments(1), 10, 0).await,
        Err(EvalError::InvalidArgument(_))
    ));
    assert_eq!(backend.calls.load(Ordering::SeqCst), 0);

    let bad = RunnerConfig {
        shots: 0,
        repetitions: 1,
    };
    assert!(ExperimentRunner::new(backend, bad).is_err());
}

#[tokio::test]
async fn test_batch_reorders_responses() {
    let backend = Arc::new(ScriptedBackend::new(true));
    let runner = ExperimentRunner::new(backend.clone(), RunnerConfig::default()).unwrap();
    let circuits = vec![
        Circuit::qubit_flip(5, &[0]).unwrap(),
        Circuit::bell_pair(5, 0, 2).unwrap(),
        Circuit::qubit_flip(5, &[4]).unwrap(),
    ];

    let histograms = runner.run_batch(&circuits, 64).await.unwrap();

    assert_eq!(histograms.len(), 3);
    assert_eq!(histograms[0].get("1"), 64);
    assert_eq!(histograms[1].get("11"), 64);
    assert_eq!(histograms[2].get("1"), 64);
    assert_eq!(backend.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn test_batch_falls_back_to_sequential() {
    let backend = Arc::new(ScriptedBackend::new(false));
    let runner = ExperimentRunner::new(backend.clone(), RunnerConfig::default()).unwrap();
    let circuits = vec![Circuit::bell().unwrap(), Circuit::qubit_flip(2, &[1]).unwrap()];

    let histograms = runner.run_batch(&circuits, 8).await.unwrap();

    assert_eq!(histograms[0].get("11"), 8);
    assert_eq!(histograms[1].get("1"), 8);
    assert_eq!(backend.calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_batch_failure_carries_circuit_index() {
    let backend = Arc::new(ScriptedBackend::new(true).failing_on("flip_q2"));
    let runner = ExperimentRunner::new(backend.clone(), RunnerConfig::default()).unwrap();
    let circuits: Vec<_> = (0..4)
        .map(|q| Circuit::qubit_flip(5, &[q]).unwrap())
        .collect();

    match runner.run_batch(&circuits, 16).await.unwrap_err() {
        EvalError::BackendFailure { index, source } => {
            assert_eq!(index, 2);
            assert!(matches!(source, HalError::JobFailed(_)));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(backend.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_fake_helmi_batch_reports_off_star_circuit() {
    let backend = Arc::new(SimulatorBackend::fake_helmi(Some(11)));
    let runner = ExperimentRunner::new(backend, RunnerConfig::default()).unwrap();
    let circuits = vec![
        Circuit::bell_pair(5, 0, 2).unwrap(),
        Circuit::bell_pair(5, 1, 2).unwrap(),
        Circuit::bell_pair(5, 0, 1).unwrap(),
    ];

    match runner.run_batch(&circuits, 100).await.unwrap_err() {
        EvalError::BackendFailure { index, source } => {
            assert_eq!(index, 2);
            assert!(matches!(source, HalError::InvalidCircuit(_)));
        }
        other => panic!("unexpected error: {other}"),
    }
}
