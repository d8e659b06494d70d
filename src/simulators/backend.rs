//! Simulation backends and the runner
//!
//! [`SimulationBackend`] is the seam to whatever actually executes circuits.
//! [`LocalSimulator`] implements it in-process on top of
//! [`StatevectorSimulator`]. [`SimulationRunner`] sits in front of a backend:
//! it strips terminal measurements for exact-state runs and turns backend
//! failures into [`SimulationError::BackendFailure`].

use std::collections::BTreeMap;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{BackendError, SimulationError};
use crate::quantum::circuit::Circuit;
use crate::quantum::state::StateVector;
use crate::simulators::statevector::StatevectorSimulator;

/// Default number of shots, matching the usual simulator default
pub const DEFAULT_SHOTS: u64 = 1024;

/// How a circuit is executed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunMode {
    /// Sample the terminal measurements this many times
    ShotSampling(u64),
    /// Return the exact pre-measurement state vector
    ExactState,
}

/// Measurement counts keyed by classical-register bitstring (qubit 0 first)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Counts {
    qubit_count: usize,
    counts: BTreeMap<String, u64>,
}

impl Counts {
    pub fn new(qubit_count: usize, counts: BTreeMap<String, u64>) -> Self {
        Counts { qubit_count, counts }
    }

    pub fn qubit_count(&self) -> usize {
        self.qubit_count
    }

    /// Count for one bitstring, zero if never observed
    pub fn get(&self, bits: &str) -> u64 {
        self.counts.get(bits).copied().unwrap_or(0)
    }

    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.counts.iter().map(|(bits, &count)| (bits.as_str(), count))
    }

    pub fn as_map(&self) -> &BTreeMap<String, u64> {
        &self.counts
    }
}

/// What a backend returns
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ExecutionResult {
    /// Shot-sampling outcome
    Counts(Counts),
    /// Exact state vector
    State(StateVector),
}

impl ExecutionResult {
    pub fn qubit_count(&self) -> usize {
        match self {
            ExecutionResult::Counts(counts) => counts.qubit_count(),
            ExecutionResult::State(state) => state.qubit_count(),
        }
    }

    pub fn counts(&self) -> Option<&Counts> {
        match self {
            ExecutionResult::Counts(counts) => Some(counts),
            ExecutionResult::State(_) => None,
        }
    }

    pub fn state(&self) -> Option<&StateVector> {
        match self {
            ExecutionResult::State(state) => Some(state),
            ExecutionResult::Counts(_) => None,
        }
    }
}

/// Trait for circuit execution backends
pub trait SimulationBackend {
    /// Get the backend name
    fn name(&self) -> &str;

    /// Widest circuit the backend accepts
    fn max_qubits(&self) -> usize;

    /// Execute a circuit in the given mode
    ///
    /// In [`RunMode::ExactState`] the circuit must carry no measurements.
    fn execute(&self, circuit: &Circuit, mode: RunMode) -> Result<ExecutionResult, BackendError> {
        self.execute_seeded(circuit, mode, None)
    }

    /// Execute with a sampling seed that overrides the backend's own
    fn execute_seeded(&self, circuit: &Circuit, mode: RunMode, seed: Option<u64>)
        -> Result<ExecutionResult, BackendError>;
}

/// Configuration for the local simulator backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalSimulatorConfig {
    /// Use deterministic seed for reproducibility
    pub seed: Option<u64>,

    /// Maximum number of qubits
    pub max_qubits: usize,
}

impl Default for LocalSimulatorConfig {
    fn default() -> Self {
        Self {
            seed: None,
            max_qubits: 16,
        }
    }
}

/// In-process state-vector backend
#[derive(Debug, Clone, Default)]
pub struct LocalSimulator {
    config: LocalSimulatorConfig,
}

impl LocalSimulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: LocalSimulatorConfig) -> Self {
        LocalSimulator { config }
    }

    /// Local simulator with a fixed sampling seed
    pub fn seeded(seed: u64) -> Self {
        Self::with_config(LocalSimulatorConfig {
            seed: Some(seed),
            ..LocalSimulatorConfig::default()
        })
    }

    pub fn config(&self) -> &LocalSimulatorConfig {
        &self.config
    }
}

impl SimulationBackend for LocalSimulator {
    fn name(&self) -> &str {
        "local_statevector"
    }

    fn max_qubits(&self) -> usize {
        self.config.max_qubits
    }

    fn execute_seeded(
        &self,
        circuit: &Circuit,
        mode: RunMode,
        seed: Option<u64>,
    ) -> Result<ExecutionResult, BackendError> {
        if circuit.qubit_count() > self.config.max_qubits {
            return Err(BackendError::CapacityExceeded {
                required: circuit.qubit_count(),
                max: self.config.max_qubits,
            });
        }

        let mut simulator = StatevectorSimulator::with_seed(circuit.qubit_count(), seed.or(self.config.seed));
        simulator.run_circuit(circuit)?;

        match mode {
            RunMode::ShotSampling(shots) => {
                if !circuit.has_measurements() {
                    return Err(BackendError::NothingMeasured);
                }
                let counts = simulator.sample_counts(circuit.measurements(), shots)?;
                Ok(ExecutionResult::Counts(Counts::new(circuit.qubit_count(), counts)))
            }
            RunMode::ExactState => {
                if circuit.has_measurements() {
                    return Err(BackendError::MeasuredCircuit);
                }
                Ok(ExecutionResult::State(simulator.into_state()))
            }
        }
    }
}

/// Runs circuits on a backend
#[derive(Debug, Clone)]
pub struct SimulationRunner<B> {
    backend: B,
}

impl<B: SimulationBackend> SimulationRunner<B> {
    pub fn new(backend: B) -> Self {
        SimulationRunner { backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Execute `circuit` in `mode`
    ///
    /// Exact-state runs use the circuit with its terminal measurements removed.
    /// Backend failures are not retried.
    pub fn run(&self, circuit: &Circuit, mode: RunMode) -> Result<ExecutionResult, SimulationError> {
        self.run_seeded(circuit, mode, None)
    }

    /// Like [`run`](Self::run), sampling with `seed` when one is given
    pub fn run_seeded(
        &self,
        circuit: &Circuit,
        mode: RunMode,
        seed: Option<u64>,
    ) -> Result<ExecutionResult, SimulationError> {
        debug!(
            "running {}-qubit circuit ({} gates) on {} in {:?}",
            circuit.qubit_count(),
            circuit.gate_count(),
            self.backend.name(),
            mode
        );

        let result = match mode {
            RunMode::ShotSampling(0) => return Err(SimulationError::ZeroShots),
            RunMode::ShotSampling(_) => self.backend.execute_seeded(circuit, mode, seed)?,
            RunMode::ExactState => self.backend.execute_seeded(&circuit.without_measurements(), mode, seed)?,
        };
        Ok(result)
    }
}

impl Default for SimulationRunner<LocalSimulator> {
    fn default() -> Self {
        SimulationRunner::new(LocalSimulator::new())
    }
}
