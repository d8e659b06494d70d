// src/quantum/gate.rs
//! Gate operations
//!
//! A circuit is an ordered list of [`GateOp`] values. Each variant carries the
//! qubit indices it acts on; matrices for the single-qubit part of each gate
//! are provided for the simulator kernels.

use std::fmt;

use ndarray::{array, Array2};
use num_complex::Complex64;
use serde::{Deserialize, Serialize};

/// Common constants used in gate matrices
pub mod constants {
    /// 1/sqrt(2)
    pub const FRAC_1_SQRT_2: f64 = std::f64::consts::FRAC_1_SQRT_2;
}

/// A single gate applied to specific qubits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GateOp {
    /// Hadamard on one qubit
    Hadamard(usize),
    /// Pauli-X (NOT) on one qubit
    PauliX(usize),
    /// Controlled-NOT
    ControlledNot { control: usize, target: usize },
    /// Exchange two qubits
    Swap(usize, usize),
}

impl GateOp {
    /// Textual opcode, as accepted by the parser
    pub fn opcode(&self) -> &'static str {
        match self {
            GateOp::Hadamard(_) => "H",
            GateOp::PauliX(_) => "X",
            GateOp::ControlledNot { .. } => "CX",
            GateOp::Swap(..) => "SWAP",
        }
    }

    /// Qubits this gate touches, controls first
    pub fn qubits(&self) -> Vec<usize> {
        match *self {
            GateOp::Hadamard(q) | GateOp::PauliX(q) => vec![q],
            GateOp::ControlledNot { control, target } => vec![control, target],
            GateOp::Swap(a, b) => vec![a, b],
        }
    }

    /// Number of qubits the gate acts on
    pub fn arity(&self) -> usize {
        match self {
            GateOp::Hadamard(_) | GateOp::PauliX(_) => 1,
            GateOp::ControlledNot { .. } | GateOp::Swap(..) => 2,
        }
    }

    /// The 2x2 unitary applied to the target qubit, if the gate has one
    ///
    /// For `ControlledNot` this is the X matrix applied when the control is set.
    /// `Swap` is a permutation and has no single-qubit matrix.
    pub fn target_matrix(&self) -> Option<Array2<Complex64>> {
        use constants::*;
        match self {
            GateOp::Hadamard(_) => {
                let factor = Complex64::new(FRAC_1_SQRT_2, 0.0);
                Some(array![
                    [factor, factor],
                    [factor, -factor]
                ])
            }
            GateOp::PauliX(_) | GateOp::ControlledNot { .. } => Some(array![
                [Complex64::new(0.0, 0.0), Complex64::new(1.0, 0.0)],
                [Complex64::new(1.0, 0.0), Complex64::new(0.0, 0.0)]
            ]),
            GateOp::Swap(..) => None,
        }
    }
}

impl fmt::Display for GateOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.opcode())?;
        for q in self.qubits() {
            write!(f, " {}", q)?;
        }
        Ok(())
    }
}
