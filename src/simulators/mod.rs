//! Circuit simulation
//!
//! A local state-vector simulator plus the backend seam and the runner that
//! turns a circuit and a run mode into an execution result.

pub mod statevector;
pub mod backend;

pub use statevector::StatevectorSimulator;
pub use backend::{
    Counts,
    ExecutionResult,
    LocalSimulator,
    LocalSimulatorConfig,
    RunMode,
    SimulationBackend,
    SimulationRunner,
};
