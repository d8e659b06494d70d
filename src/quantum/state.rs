// src/quantum/state.rs
//! State vector representation
//!
//! Basis index `i` of an `n`-qubit state encodes qubit `q` in bit
//! `n - 1 - q`, so qubit 0 is the most significant bit and the leftmost
//! character of a bitstring.

use std::fmt::{self, Display};

use ndarray::{Array1, Array2};
use num_complex::Complex64;
use serde::{Deserialize, Serialize};

use crate::error::BackendError;
use crate::quantum::gate::GateOp;

/// Tolerance used for normalization checks
pub const NORM_TOLERANCE: f64 = 1e-10;

/// State vector representation of a quantum state
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawStateVector")]
pub struct StateVector {
    /// Number of qubits
    qubit_count: usize,

    /// The state vector as an array of complex amplitudes
    amplitudes: Array1<Complex64>,
}

/// Unchecked wire form, validated through [`StateVector::new`]
#[derive(Deserialize)]
struct RawStateVector {
    qubit_count: usize,
    amplitudes: Array1<Complex64>,
}

impl TryFrom<RawStateVector> for StateVector {
    type Error = BackendError;

    fn try_from(raw: RawStateVector) -> Result<Self, Self::Error> {
        StateVector::new(raw.qubit_count, raw.amplitudes)
    }
}

/// `2^qubit_count`, or an error when that does not fit in `usize`
fn state_dimension(qubit_count: usize) -> Result<usize, BackendError> {
    u32::try_from(qubit_count)
        .ok()
        .and_then(|shift| 1usize.checked_shl(shift))
        .ok_or_else(|| BackendError::InvalidState(format!("{} qubits cannot be indexed", qubit_count)))
}

impl StateVector {
    /// Create a new state vector with the given amplitudes
    pub fn new(qubit_count: usize, amplitudes: Array1<Complex64>) -> Result<Self, BackendError> {
        let expected_dim = state_dimension(qubit_count)?;

        if amplitudes.len() != expected_dim {
            return Err(BackendError::InvalidState(format!(
                "state vector dimension mismatch: expected {}, got {}",
                expected_dim,
                amplitudes.len()
            )));
        }

        let state = StateVector {
            qubit_count,
            amplitudes,
        };

        if !state.is_normalized() {
            return Err(BackendError::InvalidState(
                "state vector is not normalized".to_string(),
            ));
        }

        Ok(state)
    }

    /// Create a new state vector in the computational basis state |index⟩
    pub fn computational_basis(qubit_count: usize, index: usize) -> Result<Self, BackendError> {
        let dim = state_dimension(qubit_count)?;

        if index >= dim {
            return Err(BackendError::InvalidState(format!(
                "index {} is out of range for {}-qubit state",
                index, qubit_count
            )));
        }

        let mut amplitudes = Array1::zeros(dim);
        amplitudes[index] = Complex64::new(1.0, 0.0);

        Ok(StateVector {
            qubit_count,
            amplitudes,
        })
    }

    /// Create the zero state |00...0⟩
    pub fn zero_state(qubit_count: usize) -> Self {
        let mut amplitudes = Array1::zeros(1 << qubit_count);
        amplitudes[0] = Complex64::new(1.0, 0.0);
        StateVector {
            qubit_count,
            amplitudes,
        }
    }

    pub fn qubit_count(&self) -> usize {
        self.qubit_count
    }

    /// Dimension of the Hilbert space (2^n)
    pub fn dimension(&self) -> usize {
        1 << self.qubit_count
    }

    /// Get a reference to the amplitudes
    pub fn amplitudes(&self) -> &Array1<Complex64> {
        &self.amplitudes
    }

    /// Calculate the probability of measuring the given basis index
    pub fn probability(&self, index: usize) -> f64 {
        if index >= self.dimension() {
            return 0.0;
        }
        self.amplitudes[index].norm_sqr()
    }

    /// Probabilities of every basis state, indexed like the amplitudes
    pub fn probabilities(&self) -> Vec<f64> {
        self.amplitudes.iter().map(|amp| amp.norm_sqr()).collect()
    }

    /// Squared norm of the state
    pub fn norm_sqr(&self) -> f64 {
        self.amplitudes.iter().map(|amp| amp.norm_sqr()).sum()
    }

    pub fn is_normalized(&self) -> bool {
        (self.norm_sqr() - 1.0).abs() < NORM_TOLERANCE
    }

    /// Bit mask selecting `qubit` inside a basis index
    pub fn qubit_mask(&self, qubit: usize) -> usize {
        1 << (self.qubit_count - 1 - qubit)
    }

    /// Bitstring label of a basis index, qubit 0 first
    pub fn bitstring(&self, index: usize) -> String {
        format!("{:0width$b}", index, width = self.qubit_count)
    }

    /// Apply one gate in place
    pub fn apply_gate(&mut self, gate: &GateOp) -> Result<(), BackendError> {
        for q in gate.qubits() {
            if q >= self.qubit_count {
                return Err(BackendError::InvalidState(format!(
                    "gate {} addresses qubit {} of a {}-qubit state",
                    gate, q, self.qubit_count
                )));
            }
        }

        match *gate {
            GateOp::Hadamard(q) | GateOp::PauliX(q) => {
                if let Some(matrix) = gate.target_matrix() {
                    self.apply_single_qubit(&matrix, q, 0);
                }
            }
            GateOp::ControlledNot { control, target } => {
                if let Some(matrix) = gate.target_matrix() {
                    let control_mask = self.qubit_mask(control);
                    self.apply_single_qubit(&matrix, target, control_mask);
                }
            }
            GateOp::Swap(a, b) => self.apply_swap(a, b),
        }
        Ok(())
    }

    /// Apply a 2x2 matrix to `target` on every basis pair whose bits in
    /// `control_mask` are all set
    fn apply_single_qubit(&mut self, matrix: &Array2<Complex64>, target: usize, control_mask: usize) {
        let target_mask = self.qubit_mask(target);

        for i in 0..self.dimension() {
            if i & target_mask != 0 || i & control_mask != control_mask {
                continue;
            }
            let j = i | target_mask;
            let a = self.amplitudes[i];
            let b = self.amplitudes[j];
            self.amplitudes[i] = matrix[[0, 0]] * a + matrix[[0, 1]] * b;
            self.amplitudes[j] = matrix[[1, 0]] * a + matrix[[1, 1]] * b;
        }
    }

    fn apply_swap(&mut self, a: usize, b: usize) {
        let mask_a = self.qubit_mask(a);
        let mask_b = self.qubit_mask(b);

        for i in 0..self.dimension() {
            // visit each |..1..0..⟩ / |..0..1..⟩ pair once
            if i & mask_a != 0 && i & mask_b == 0 {
                let j = (i & !mask_a) | mask_b;
                self.amplitudes.swap(i, j);
            }
        }
    }
}

impl Display for StateVector {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "{}-qubit state:", self.qubit_count)?;

        let threshold = 1e-10;
        let mut has_entries = false;

        for i in 0..self.dimension() {
            let amp = self.amplitudes[i];
            if amp.norm_sqr() > threshold {
                has_entries = true;
                writeln!(
                    f,
                    "  ({:.6}{:+.6}i) |{}⟩ [{:.1}%]",
                    amp.re,
                    amp.im,
                    self.bitstring(i),
                    amp.norm_sqr() * 100.0
                )?;
            }
        }

        if !has_entries {
            writeln!(f, "  (zero state)")?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unindexable_width_is_rejected() {
        let amplitudes = Array1::from(vec![Complex64::new(1.0, 0.0)]);
        assert!(matches!(
            StateVector::new(usize::BITS as usize, amplitudes),
            Err(BackendError::InvalidState(_))
        ));
        assert!(StateVector::computational_basis(200, 0).is_err());
    }

    #[test]
    fn test_qubit_zero_is_most_significant() {
        let mut state = StateVector::zero_state(3);
        state.apply_gate(&GateOp::PauliX(0)).unwrap();

        assert!((state.probability(0b100) - 1.0).abs() < 1e-10);
        assert_eq!(state.bitstring(0b100), "100");
    }

    #[test]
    fn test_swap_moves_excitation() {
        let mut state = StateVector::zero_state(3);
        state.apply_gate(&GateOp::PauliX(0)).unwrap();
        state.apply_gate(&GateOp::Swap(0, 2)).unwrap();

        assert!((state.probability(0b001) - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_out_of_range_gate_rejected() {
        let mut state = StateVector::zero_state(2);
        assert!(state.apply_gate(&GateOp::Hadamard(2)).is_err());
    }

    #[test]
    fn test_new_rejects_unnormalized() {
        let amplitudes = Array1::from(vec![Complex64::new(1.0, 0.0), Complex64::new(1.0, 0.0)]);
        assert!(StateVector::new(1, amplitudes).is_err());
    }
}
