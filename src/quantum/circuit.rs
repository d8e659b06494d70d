// src/quantum/circuit.rs
//! Quantum circuits
//!
//! A [`Circuit`] is a register width, an ordered list of gates and a set of
//! terminal measurements. Measurement of qubit `i` always lands in classical
//! bit `i`. Circuits are immutable once built; [`CircuitBuilder`] is the only
//! way to assemble one.

use std::fmt;

use serde::Serialize;

use crate::error::BuildError;
use crate::quantum::gate::GateOp;

/// An immutable quantum circuit
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Circuit {
    qubit_count: usize,
    gates: Vec<GateOp>,
    measurements: Vec<usize>,
}

impl Circuit {
    /// Build a circuit from a gate list and measure every qubit
    pub fn from_gates(qubit_count: usize, gates: &[GateOp]) -> Result<Self, BuildError> {
        let mut builder = CircuitBuilder::new(qubit_count)?;
        for gate in gates {
            builder.add_gate(*gate)?;
        }
        Ok(builder.build())
    }

    /// Number of qubits (and classical bits)
    pub fn qubit_count(&self) -> usize {
        self.qubit_count
    }

    /// The gates in application order
    pub fn gates(&self) -> &[GateOp] {
        &self.gates
    }

    /// Get the number of gates in the circuit
    pub fn gate_count(&self) -> usize {
        self.gates.len()
    }

    /// Qubits measured at the end of the circuit, in ascending order
    pub fn measurements(&self) -> &[usize] {
        &self.measurements
    }

    pub fn has_measurements(&self) -> bool {
        !self.measurements.is_empty()
    }

    /// The same circuit with its terminal measurements removed
    ///
    /// Exact state extraction and measurement are mutually exclusive, so the
    /// runner feeds this variant to the backend in exact-state mode.
    pub fn without_measurements(&self) -> Circuit {
        Circuit {
            qubit_count: self.qubit_count,
            gates: self.gates.clone(),
            measurements: Vec::new(),
        }
    }
}

/// A builder for quantum circuits
#[derive(Debug, Clone)]
pub struct CircuitBuilder {
    qubit_count: usize,
    gates: Vec<GateOp>,
}

impl CircuitBuilder {
    /// Create a new circuit builder
    pub fn new(qubit_count: usize) -> Result<Self, BuildError> {
        if qubit_count == 0 {
            return Err(BuildError::EmptyRegister);
        }
        Ok(CircuitBuilder {
            qubit_count,
            gates: Vec::new(),
        })
    }

    /// Append a gate after validating its qubit indices
    pub fn add_gate(&mut self, gate: GateOp) -> Result<(), BuildError> {
        let qubits = gate.qubits();
        for &q in &qubits {
            self.check_index(q)?;
        }
        if qubits.len() == 2 && qubits[0] == qubits[1] {
            return Err(BuildError::DuplicateQubit {
                gate: gate.opcode(),
                qubit: qubits[0],
            });
        }

        self.gates.push(gate);
        Ok(())
    }

    /// Add a Hadamard gate
    pub fn h(&mut self, qubit: usize) -> Result<(), BuildError> {
        self.add_gate(GateOp::Hadamard(qubit))
    }

    /// Add a Pauli-X gate
    pub fn x(&mut self, qubit: usize) -> Result<(), BuildError> {
        self.add_gate(GateOp::PauliX(qubit))
    }

    /// Add a CNOT gate
    pub fn cnot(&mut self, control: usize, target: usize) -> Result<(), BuildError> {
        self.add_gate(GateOp::ControlledNot { control, target })
    }

    /// Add a SWAP gate
    pub fn swap(&mut self, qubit1: usize, qubit2: usize) -> Result<(), BuildError> {
        self.add_gate(GateOp::Swap(qubit1, qubit2))
    }

    /// Create a Bell pair (entangled state)
    pub fn bell_pair(&mut self, qubit1: usize, qubit2: usize) -> Result<(), BuildError> {
        self.h(qubit1)?;
        self.cnot(qubit1, qubit2)
    }

    /// Finish the circuit, measuring every qubit into its classical bit
    pub fn build(self) -> Circuit {
        let measurements = (0..self.qubit_count).collect();
        Circuit {
            qubit_count: self.qubit_count,
            gates: self.gates,
            measurements,
        }
    }

    /// Finish the circuit, measuring only the listed qubits
    pub fn build_measuring(self, qubits: &[usize]) -> Result<Circuit, BuildError> {
        for &q in qubits {
            self.check_index(q)?;
        }
        let mut measurements = qubits.to_vec();
        measurements.sort_unstable();
        measurements.dedup();

        Ok(Circuit {
            qubit_count: self.qubit_count,
            gates: self.gates,
            measurements,
        })
    }

    fn check_index(&self, index: usize) -> Result<(), BuildError> {
        if index >= self.qubit_count {
            return Err(BuildError::QubitIndexOutOfRange {
                index,
                qubit_count: self.qubit_count,
            });
        }
        Ok(())
    }
}

/// Text diagram, one wire per qubit
impl fmt::Display for Circuit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label_width = format!("q{}", self.qubit_count.saturating_sub(1)).len();

        for wire in 0..self.qubit_count {
            write!(f, "{:<width$}: ─", format!("q{}", wire), width = label_width)?;
            for gate in &self.gates {
                write!(f, "{}─", gate_cell(gate, wire))?;
            }
            if self.has_measurements() {
                let cell = if self.measurements.contains(&wire) { "M" } else { "─" };
                write!(f, "{}─", cell)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

fn gate_cell(gate: &GateOp, wire: usize) -> &'static str {
    match *gate {
        GateOp::Hadamard(q) if q == wire => "H",
        GateOp::PauliX(q) if q == wire => "X",
        GateOp::ControlledNot { control, .. } if control == wire => "●",
        GateOp::ControlledNot { target, .. } if target == wire => "⊕",
        GateOp::Swap(a, b) if a == wire || b == wire => "x",
        _ => {
            let qubits = gate.qubits();
            let low = qubits.iter().copied().min().unwrap_or(wire);
            let high = qubits.iter().copied().max().unwrap_or(wire);
            if low < wire && wire < high {
                "┼"
            } else {
                "─"
            }
        }
    }
}
