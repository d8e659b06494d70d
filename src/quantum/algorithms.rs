//! Preset circuits
//!
//! [`Algorithm`] is the closed set of named algorithms offered to the user.
//! Each maps to a fixed, toy five-qubit gate list that only illustrates the
//! algorithm's shape. [`ExampleCircuit`] holds the two worked examples given
//! in gate-text form.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{BuildError, ConfigError};
use crate::quantum::circuit::{Circuit, CircuitBuilder};
use crate::quantum::gate::GateOp;

/// Register width used by every algorithm preset
pub const ALGORITHM_QUBITS: usize = 5;

/// Named quantum algorithms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Algorithm {
    Teleportation,
    Grover,
    DeutschJozsa,
    Shor,
    Qft,
}

/// Descriptive text shown next to an algorithm
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlgorithmInfo {
    pub definition: &'static str,
    pub features: &'static str,
    pub advantages: &'static str,
    pub disadvantages: &'static str,
}

impl Algorithm {
    pub const ALL: [Algorithm; 5] = [
        Algorithm::Teleportation,
        Algorithm::Grover,
        Algorithm::DeutschJozsa,
        Algorithm::Shor,
        Algorithm::Qft,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            Algorithm::Teleportation => "Quantum Teleportation",
            Algorithm::Grover => "Grover's Search Algorithm",
            Algorithm::DeutschJozsa => "Deutsch-Jozsa Algorithm",
            Algorithm::Shor => "Shor's Algorithm",
            Algorithm::Qft => "Quantum Fourier Transform",
        }
    }

    /// Short command-line key
    pub fn key(&self) -> &'static str {
        match self {
            Algorithm::Teleportation => "teleportation",
            Algorithm::Grover => "grover",
            Algorithm::DeutschJozsa => "deutsch-jozsa",
            Algorithm::Shor => "shor",
            Algorithm::Qft => "qft",
        }
    }

    /// The fixed gate list for this algorithm
    pub fn gates(&self) -> Vec<GateOp> {
        match self {
            Algorithm::Teleportation => teleportation_gates(),
            Algorithm::Grover => grover_gates(),
            Algorithm::DeutschJozsa => deutsch_jozsa_gates(),
            Algorithm::Shor => shor_gates(),
            Algorithm::Qft => qft_gates(),
        }
    }

    /// Qubits read out at the end of the preset
    pub fn measured_qubits(&self) -> Vec<usize> {
        match self {
            Algorithm::Teleportation | Algorithm::Grover => (0..ALGORITHM_QUBITS).collect(),
            Algorithm::DeutschJozsa => vec![0],
            Algorithm::Shor => (0..4).collect(),
            Algorithm::Qft => (0..3).collect(),
        }
    }

    /// Build the preset circuit
    pub fn circuit(&self) -> Result<Circuit, BuildError> {
        let mut builder = CircuitBuilder::new(ALGORITHM_QUBITS)?;
        for gate in self.gates() {
            builder.add_gate(gate)?;
        }
        builder.build_measuring(&self.measured_qubits())
    }

    pub fn info(&self) -> AlgorithmInfo {
        match self {
            Algorithm::Teleportation => AlgorithmInfo {
                definition: "Quantum teleportation is a method of transferring quantum information from one qubit to another.",
                features: "Instantaneous transfer of quantum states, requires entanglement.",
                advantages: "Can transmit quantum information over long distances without physically moving particles.",
                disadvantages: "Requires a classical communication channel, not faster than the speed of light.",
            },
            Algorithm::Grover => AlgorithmInfo {
                definition: "Grover's algorithm provides a quadratic speedup for unstructured search problems.",
                features: "Effective for searching unsorted databases.",
                advantages: "Offers a speedup for large database searches compared to classical methods.",
                disadvantages: "Not exponentially faster; requires a high-quality quantum computer.",
            },
            Algorithm::DeutschJozsa => AlgorithmInfo {
                definition: "A quantum algorithm that decides whether a function is constant or balanced with fewer queries.",
                features: "Exponential speedup over classical counterparts.",
                advantages: "Solves the problem in one query.",
                disadvantages: "Only applicable to a specific type of problem.",
            },
            Algorithm::Shor => AlgorithmInfo {
                definition: "An algorithm for integer factorization that runs in polynomial time.",
                features: "Exponential speedup for factoring large numbers.",
                advantages: "Impacts cryptography by threatening RSA encryption.",
                disadvantages: "Requires a large number of qubits.",
            },
            Algorithm::Qft => AlgorithmInfo {
                definition: "A quantum version of the discrete Fourier transform.",
                features: "Used in many quantum algorithms.",
                advantages: "Can be exponentially faster than classical counterparts.",
                disadvantages: "Complex implementation.",
            },
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for Algorithm {
    type Err = ConfigError;

    /// Accepts the short key or the display name, ignoring case
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Algorithm::ALL
            .into_iter()
            .find(|a| a.key().eq_ignore_ascii_case(wanted) || a.display_name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ConfigError::UnknownName {
                kind: "algorithm",
                value: s.to_string(),
            })
    }
}

fn teleportation_gates() -> Vec<GateOp> {
    vec![
        GateOp::Hadamard(0),
        GateOp::ControlledNot { control: 0, target: 1 },
        GateOp::ControlledNot { control: 1, target: 2 },
    ]
}

fn grover_gates() -> Vec<GateOp> {
    vec![
        GateOp::Hadamard(0),
        GateOp::Hadamard(1),
        GateOp::Hadamard(2),
        GateOp::ControlledNot { control: 0, target: 1 },
        GateOp::ControlledNot { control: 1, target: 2 },
        GateOp::PauliX(2),
        GateOp::Hadamard(2),
        GateOp::ControlledNot { control: 0, target: 2 },
        GateOp::Hadamard(2),
    ]
}

fn deutsch_jozsa_gates() -> Vec<GateOp> {
    vec![
        GateOp::Hadamard(0),
        GateOp::Hadamard(1),
        GateOp::ControlledNot { control: 0, target: 1 },
        GateOp::Hadamard(0),
    ]
}

fn shor_gates() -> Vec<GateOp> {
    (0..4).map(GateOp::Hadamard).collect()
}

fn qft_gates() -> Vec<GateOp> {
    (0..3).map(GateOp::Hadamard).collect()
}

/// The two worked examples, expressed as gate text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExampleCircuit {
    /// Two-qubit Bell pair
    BellPair,
    /// Three-qubit GHZ state
    Ghz,
}

impl ExampleCircuit {
    /// Look up an example by its 1-based number
    pub fn from_number(number: usize) -> Option<Self> {
        match number {
            1 => Some(ExampleCircuit::BellPair),
            2 => Some(ExampleCircuit::Ghz),
            _ => None,
        }
    }

    pub fn number(&self) -> usize {
        match self {
            ExampleCircuit::BellPair => 1,
            ExampleCircuit::Ghz => 2,
        }
    }

    pub fn qubit_count(&self) -> usize {
        match self {
            ExampleCircuit::BellPair => 2,
            ExampleCircuit::Ghz => 3,
        }
    }

    pub fn gate_text(&self) -> &'static str {
        match self {
            ExampleCircuit::BellPair => "H 0; CX 0 1",
            ExampleCircuit::Ghz => "H 0; CX 0 1; CX 1 2",
        }
    }
}
