use std::fmt::{self, Display};

use ndarray::Array2;
use num_complex::Complex64;

use crate::quantum::state::{StateVector, NORM_TOLERANCE};

/// Represents a quantum state as a density matrix
#[derive(Clone, Debug, PartialEq)]
pub struct DensityMatrix {
    /// Number of qubits
    qubit_count: usize,

    /// The density matrix as a 2D array of complex values
    matrix: Array2<Complex64>,
}

impl DensityMatrix {
    /// Create a density matrix from a state vector: ρ = |ψ⟩⟨ψ|
    pub fn from_state_vector(state: &StateVector) -> Self {
        let dim = state.dimension();
        let amplitudes = state.amplitudes();
        let matrix = Array2::from_shape_fn((dim, dim), |(i, j)| amplitudes[i] * amplitudes[j].conj());

        DensityMatrix {
            qubit_count: state.qubit_count(),
            matrix,
        }
    }

    /// Reduced state of one qubit, read straight from the amplitudes
    ///
    /// Equivalent to `from_state_vector(state).reduced_qubit(qubit)` without
    /// forming the full 2ⁿ×2ⁿ matrix.
    pub fn single_qubit_from_state(state: &StateVector, qubit: usize) -> Option<Self> {
        if qubit >= state.qubit_count() {
            return None;
        }

        let mask = state.qubit_mask(qubit);
        let amplitudes = state.amplitudes();
        let mut matrix = Array2::<Complex64>::zeros((2, 2));
        for i in (0..state.dimension()).filter(|i| i & mask == 0) {
            let a0 = amplitudes[i];
            let a1 = amplitudes[i | mask];
            matrix[[0, 0]] += a0 * a0.conj();
            matrix[[0, 1]] += a0 * a1.conj();
            matrix[[1, 0]] += a1 * a0.conj();
            matrix[[1, 1]] += a1 * a1.conj();
        }

        Some(DensityMatrix {
            qubit_count: 1,
            matrix,
        })
    }

    pub fn qubit_count(&self) -> usize {
        self.qubit_count
    }

    /// Calculate the dimension of the Hilbert space
    pub fn dimension(&self) -> usize {
        1 << self.qubit_count
    }

    /// Get a reference to the matrix
    pub fn matrix(&self) -> &Array2<Complex64> {
        &self.matrix
    }

    /// Calculate the trace of the density matrix
    pub fn trace(&self) -> f64 {
        self.matrix.diag().iter().map(|x| x.re).sum()
    }

    /// Calculate the purity Tr(ρ²)
    pub fn purity(&self) -> f64 {
        let mut sum = Complex64::new(0.0, 0.0);
        for i in 0..self.dimension() {
            for j in 0..self.dimension() {
                sum += self.matrix[[i, j]] * self.matrix[[j, i]];
            }
        }
        sum.re
    }

    /// Check trace one, Hermiticity and non-negative diagonal
    pub fn is_valid(&self) -> bool {
        if (self.trace() - 1.0).abs() > NORM_TOLERANCE {
            return false;
        }

        for i in 0..self.dimension() {
            if self.matrix[[i, i]].re < -NORM_TOLERANCE {
                return false;
            }
            for j in 0..i {
                if (self.matrix[[i, j]] - self.matrix[[j, i]].conj()).norm() > NORM_TOLERANCE {
                    return false;
                }
            }
        }

        true
    }

    /// Diagonal entries: the measurement probability of each basis state
    pub fn diagonal(&self) -> Vec<f64> {
        self.matrix.diag().iter().map(|x| x.re).collect()
    }

    /// Real part of every entry
    pub fn real_part(&self) -> Array2<f64> {
        self.matrix.map(|x| x.re)
    }

    /// Imaginary part of every entry
    pub fn imag_part(&self) -> Array2<f64> {
        self.matrix.map(|x| x.im)
    }

    /// Trace out the listed qubits
    ///
    /// The remaining qubits keep their relative order. Returns `None` if an
    /// index is out of range.
    pub fn partial_trace(&self, qubits: &[usize]) -> Option<Self> {
        if qubits.iter().any(|&q| q >= self.qubit_count) {
            return None;
        }

        let mut trace_qubits = qubits.to_vec();
        trace_qubits.sort_unstable();
        trace_qubits.dedup();

        if trace_qubits.is_empty() {
            return Some(self.clone());
        }

        let remaining_qubits: Vec<usize> = (0..self.qubit_count)
            .filter(|q| !trace_qubits.contains(q))
            .collect();

        let dim_remain = 1 << remaining_qubits.len();
        let dim_trace = 1 << trace_qubits.len();
        let mut result = Array2::zeros((dim_remain, dim_remain));

        for i_remain in 0..dim_remain {
            for j_remain in 0..dim_remain {
                let mut sum = Complex64::new(0.0, 0.0);
                for k_trace in 0..dim_trace {
                    let i_orig = self.full_index(i_remain, k_trace, &remaining_qubits, &trace_qubits);
                    let j_orig = self.full_index(j_remain, k_trace, &remaining_qubits, &trace_qubits);
                    sum += self.matrix[[i_orig, j_orig]];
                }
                result[[i_remain, j_remain]] = sum;
            }
        }

        Some(DensityMatrix {
            qubit_count: remaining_qubits.len(),
            matrix: result,
        })
    }

    /// Reduced single-qubit state of `qubit`
    pub fn reduced_qubit(&self, qubit: usize) -> Option<Self> {
        if qubit >= self.qubit_count {
            return None;
        }
        let others: Vec<usize> = (0..self.qubit_count).filter(|&q| q != qubit).collect();
        self.partial_trace(&others)
    }

    // Rebuild an index of the full register from the reduced and traced parts.
    // Both parts are big-endian over their own (ascending) qubit lists.
    fn full_index(&self, remain_idx: usize, trace_idx: usize, remain: &[usize], traced: &[usize]) -> usize {
        let n = self.qubit_count;
        let mut full = 0;

        for (k, &q) in remain.iter().enumerate() {
            let bit = (remain_idx >> (remain.len() - 1 - k)) & 1;
            full |= bit << (n - 1 - q);
        }
        for (k, &q) in traced.iter().enumerate() {
            let bit = (trace_idx >> (traced.len() - 1 - k)) & 1;
            full |= bit << (n - 1 - q);
        }

        full
    }
}

impl Display for DensityMatrix {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "{}-qubit density matrix:", self.qubit_count)?;

        let threshold = 1e-10;
        let purity = self.purity();
        writeln!(f, "Purity: {:.6} (pure: {})", purity, (purity - 1.0).abs() < 1e-10)?;

        let width = self.qubit_count;
        for i in 0..self.dimension() {
            for j in 0..self.dimension() {
                let elem = self.matrix[[i, j]];
                if elem.norm_sqr() > threshold {
                    writeln!(
                        f,
                        "  |{:0w$b}⟩⟨{:0w$b}|: {:.6}{:+.6}i",
                        i,
                        j,
                        elem.re,
                        elem.im,
                        w = width
                    )?;
                }
            }
        }

        Ok(())
    }
}
