//! Simulator backend implementation.

use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Mutex;
use std::time::Instant;
use tracing::{debug, instrument};

use helmi_hal::{
    Backend, BackendConfig, BackendFactory, BatchItem, Capabilities, Counts, HalError, HalResult,
    check_request,
};
use helmi_ir::Circuit;

use crate::noise::ReadoutNoise;
use crate::statevector::{Statevector, bitstring, outcome_bits};

/// Default register size of the ideal simulator.
const DEFAULT_MAX_QUBITS: u32 = 20;

/// Widest register `from_config` accepts.
const MAX_SUPPORTED_QUBITS: u32 = 24;

/// Local simulator backend.
///
/// Simulates each circuit once as a statevector and samples every shot from
/// the final distribution. The `fake-helmi` profile adds Helmi's star
/// coupling map, shot limit and a readout error on top.
pub struct SimulatorBackend {
    /// Backend configuration.
    config: BackendConfig,
    /// Cached capabilities.
    capabilities: Capabilities,
    /// Sampling source; seeded for reproducible runs.
    rng: Mutex<StdRng>,
    /// Readout error, if any.
    noise: Option<ReadoutNoise>,
}

impl SimulatorBackend {
    /// Create an ideal simulator with default settings.
    pub fn new() -> Self {
        Self::build(
            BackendConfig::new("simulator"),
            Capabilities::simulator(DEFAULT_MAX_QUBITS),
            StdRng::from_entropy(),
            None,
        )
    }

    /// Create an ideal simulator with a fixed sampling seed.
    pub fn with_seed(seed: u64) -> Self {
        Self::build(
            BackendConfig::new("simulator"),
            Capabilities::simulator(DEFAULT_MAX_QUBITS),
            StdRng::seed_from_u64(seed),
            None,
        )
    }

    /// Create a simulator with custom max qubits.
    pub fn with_max_qubits(max_qubits: u32) -> Self {
        Self::build(
            BackendConfig::new("simulator"),
            Capabilities::simulator(max_qubits),
            StdRng::from_entropy(),
            None,
        )
    }

    /// Create a noisy stand-in for the Helmi device.
    pub fn fake_helmi(seed: Option<u64>) -> Self {
        let rng = seed.map_or_else(StdRng::from_entropy, StdRng::seed_from_u64);
        let noise = ReadoutNoise {
            p01: ReadoutNoise::HELMI_DEFAULT,
            p10: ReadoutNoise::HELMI_DEFAULT,
        };
        Self::fake_helmi_with_noise(rng, Some(noise))
    }

    fn fake_helmi_with_noise(rng: StdRng, noise: Option<ReadoutNoise>) -> Self {
        let mut capabilities = Capabilities::helmi().with_name("fake-helmi");
        capabilities.is_simulator = true;
        Self::build(BackendConfig::new("fake-helmi"), capabilities, rng, noise)
    }

    fn build(
        config: BackendConfig,
        capabilities: Capabilities,
        rng: StdRng,
        noise: Option<ReadoutNoise>,
    ) -> Self {
        Self {
            config,
            capabilities,
            rng: Mutex::new(rng),
            noise,
        }
    }

    /// Readout error applied to every shot.
    pub fn readout_noise(&self) -> Option<ReadoutNoise> {
        self.noise
    }

    /// Run simulation synchronously.
    #[instrument(skip(self, circuit), fields(circuit = circuit.name()))]
    fn run_simulation(&self, circuit: &Circuit, shots: u32) -> HalResult<Counts> {
        check_request(&self.capabilities, circuit, shots)?;
        let measurements: Vec<_> = circuit
            .measurements()
            .iter()
            .map(|(q, c)| (q.0 as usize, c.0 as usize))
            .collect();
        if measurements.is_empty() {
            return Err(HalError::InvalidCircuit(format!(
                "circuit '{}' has no measurements",
                circuit.name()
            )));
        }

        let start = Instant::now();
        debug!(
            "Starting simulation: {} qubits, {} shots",
            circuit.num_qubits(),
            shots
        );

        let sv = Statevector::from_circuit(circuit)?;
        let cumulative = sv.cumulative_probabilities();

        let mut rng = self
            .rng
            .lock()
            .map_err(|_| HalError::Backend("sampling state poisoned".into()))?;
        let mut counts = Counts::new();
        for _ in 0..shots {
            let index = Statevector::sample_index(&cumulative, rng.r#gen::<f64>());
            let mut bits = outcome_bits(index, &measurements, circuit.num_clbits());
            if let Some(noise) = &self.noise {
                noise.corrupt(&mut bits, &mut *rng);
            }
            counts.insert(bitstring(&bits), 1);
        }

        debug!("Simulation completed in {:?}", start.elapsed());
        Ok(counts)
    }
}

impl Default for SimulatorBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Backend for SimulatorBackend {
    fn name(&self) -> &str {
        &self.config.name
    }

    fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }

    async fn execute(&self, circuit: &Circuit, shots: u32) -> HalResult<Counts> {
        self.run_simulation(circuit, shots)
    }

    async fn execute_batch(&self, circuits: &[Circuit], shots: u32) -> HalResult<Vec<BatchItem>> {
        debug!("Executing batch of {} circuits", circuits.len());
        circuits
            .iter()
            .enumerate()
            .map(|(index, circuit)| {
                self.run_simulation(circuit, shots)
                    .map(|counts| BatchItem::new(index, counts))
                    .map_err(|e| HalError::batch_item(index, e))
            })
            .collect()
    }
}

impl BackendFactory for SimulatorBackend {
    /// Recognised `extra` keys: `seed`, `max_qubits`, and for the
    /// `fake-helmi` profile `readout_error`.
    fn from_config(config: BackendConfig) -> HalResult<Self> {
        let rng = config
            .extra_u64("seed")
            .map_or_else(StdRng::from_entropy, StdRng::seed_from_u64);

        if config.name == "fake-helmi" {
            let noise = match config.extra_f64("readout_error") {
                Some(p) => ReadoutNoise::symmetric(p)?,
                None => ReadoutNoise::symmetric(ReadoutNoise::HELMI_DEFAULT)?,
            };
            return Ok(Self::fake_helmi_with_noise(rng, Some(noise)));
        }

        let max_qubits = match config.extra_u64("max_qubits") {
            Some(n) => u32::try_from(n)
                .ok()
                .filter(|&n| (1..=MAX_SUPPORTED_QUBITS).contains(&n))
                .ok_or_else(|| {
                    HalError::Configuration(format!("max_qubits out of range: {n}"))
                })?,
            None => DEFAULT_MAX_QUBITS,
        };
        let capabilities = Capabilities::simulator(max_qubits).with_name(config.name.clone());
        Ok(Self::build(config, capabilities, rng, None))
    }
}
