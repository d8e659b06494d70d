//! Quantum circuit lab
//!
//! Parses textual gate sequences such as `"H 0; CX 0 1"` into circuits,
//! simulates them on a state-vector backend and derives the quantity a
//! renderer plots: a probability histogram, per-qubit Bloch coordinates, a
//! density-matrix diagonal or a state city.
//!
//! ```no_run
//! use qlabs::prelude::*;
//!
//! let config = SessionConfig::new(2, "H 0; CX 0 1");
//! let response = Pipeline::default().handle(&config)?;
//! println!("{}", response.artifact);
//! # Ok::<(), qlabs::error::PipelineError>(())
//! ```

pub mod error;
pub mod quantum;
pub mod simulators;
pub mod artifacts;
pub mod generation;
pub mod session;
pub mod pipeline;

// Create a prelude module for convenient imports
pub mod prelude {
    pub use crate::quantum::prelude::*;
    pub use crate::quantum::{Algorithm, ExampleCircuit};
    pub use crate::simulators::{ExecutionResult, LocalSimulator, RunMode, SimulationBackend, SimulationRunner};
    pub use crate::artifacts::{derive_artifact, DisplayArtifact, ViewAngles, VisualizationType};
    pub use crate::generation::{ExampleGenerator, GeneratorConfig, TextGenerationClient};
    pub use crate::session::{Authenticator, InMemoryAuthenticator, SessionConfig, SessionContext};
    pub use crate::pipeline::{compile_circuit, Pipeline, Response};
    pub use crate::error::PipelineError;
}

// Version and crate information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const CRATE_NAME: &str = env!("CARGO_PKG_NAME");
