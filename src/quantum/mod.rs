// src/quantum/mod.rs
//! Quantum circuit primitives
//!
//! Gate operations, the gate-text parser, circuits and their builder, state
//! vectors, density matrices and the named algorithm presets.

pub mod gate;
pub mod parser;
pub mod circuit;
pub mod state;
pub mod density_matrix;
pub mod algorithms;

pub use gate::GateOp;
pub use parser::parse_gate_sequence;
pub use circuit::{Circuit, CircuitBuilder};
pub use state::StateVector;
pub use density_matrix::DensityMatrix;
pub use algorithms::{Algorithm, AlgorithmInfo, ExampleCircuit};

/// Re-export commonly used types
pub mod prelude {
    pub use super::{GateOp, Circuit, CircuitBuilder, StateVector, DensityMatrix};
    pub use super::parse_gate_sequence;
}
