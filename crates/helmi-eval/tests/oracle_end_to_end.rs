//! Bernstein–Vazirani against the local simulator.

use std::sync::Arc;

use helmi_adapter_sim::SimulatorBackend;
use helmi_eval::{EvalError, OracleSimulator, metrics, most_frequent_outcome};
use helmi_hal::Backend;

#[tokio::test]
async fn test_secret_eleven_noiseless() {
    let backend: Arc<dyn Backend> = Arc::new(SimulatorBackend::with_seed(1));
    let mut oracle = OracleSimulator::new(11, 4).unwrap().with_backend(backend);

    let counts = oracle.quantum_query(1000).await.unwrap();

    assert_eq!(counts.get("1011"), 1000);
    assert_eq!(
        most_frequent_outcome(&counts).unwrap(),
        ("1011".to_string(), 1000)
    );
    assert_eq!(
        metrics::success_probability(&counts, 1000, "1011").unwrap(),
        1.0
    );
    assert_eq!(oracle.quantum_calls(), 1);
    assert_eq!(oracle.classical_calls(), 0);
}

#[tokio::test]
async fn test_every_secret_on_fake_helmi_star() {
    let backend: Arc<dyn Backend> = Arc::new(SimulatorBackend::fake_helmi(Some(21)));
    for secret in 0..16 {
        let mut oracle = OracleSimulator::new(secret, 4)
            .unwrap()
            .with_backend(backend.clone());
        // Ancilla lands on QB3 so every oracle CNOT is on the star.
        let counts = oracle.quantum_query(2000).await.unwrap();
        let (guess, _) = most_frequent_outcome(&counts).unwrap();
        assert_eq!(guess, oracle.secret_bitstring());
    }
}

#[tokio::test]
async fn test_repeated_run_counts_calls() {
    let backend: Arc<dyn Backend> = Arc::new(SimulatorBackend::with_seed(2));
    let mut oracle = OracleSimulator::new(6, 4).unwrap().with_backend(backend);

    let runs = oracle.repeated_run(5, 1000).await.unwrap();

    assert_eq!(runs.len(), 5);
    for (i, run) in runs.iter().enumerate() {
        assert_eq!(run.run, i + 1);
        assert_eq!(run.guess, 6);
        assert_eq!(run.guess_bitstring, "0110");
        assert_eq!(run.count, 1000);
        assert_eq!(run.success_probability, 1.0);
        assert_eq!(run.quantum_calls, i as u64 + 1);
    }
}

#[tokio::test]
async fn test_backend_rejection_is_a_backend_failure() {
    // 30 000 shots is over the fake device's limit.
    let backend: Arc<dyn Backend> = Arc::new(SimulatorBackend::fake_helmi(Some(0)));
    let mut oracle = OracleSimulator::new(1, 4).unwrap().with_backend(backend);

    let err = oracle.quantum_query(30_000).await.unwrap_err();
    assert!(matches!(err, EvalError::BackendFailure { index: 0, .. }));
    assert_eq!(oracle.quantum_calls(), 1);
}
