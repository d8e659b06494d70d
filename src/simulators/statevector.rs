//! Statevector simulator
//!
//! Applies circuit gates to a dense state vector and samples terminal
//! measurements. Sampling draws from a seedable RNG so runs are reproducible
//! when a seed is given.
use std::collections::BTreeMap;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::BackendError;
use crate::quantum::circuit::Circuit;
use crate::quantum::gate::GateOp;
use crate::quantum::state::StateVector;

/// A statevector simulator for quantum circuits
#[derive(Clone, Debug)]
pub struct StatevectorSimulator {
    /// The current state of the simulator
    state: StateVector,
    /// Random number generator for measurements
    rng: StdRng,
}

impl StatevectorSimulator {
    /// Create a simulator in |0...0⟩, seeded from entropy
    pub fn new(qubit_count: usize) -> Self {
        Self::with_seed(qubit_count, None)
    }

    /// Create a simulator in |0...0⟩ with an optional fixed seed
    pub fn with_seed(qubit_count: usize, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        StatevectorSimulator {
            state: StateVector::zero_state(qubit_count),
            rng,
        }
    }

    /// Get the current state vector
    pub fn state(&self) -> &StateVector {
        &self.state
    }

    /// Consume the simulator, keeping its state
    pub fn into_state(self) -> StateVector {
        self.state
    }

    /// Reset the simulator to the |0...0⟩ state
    pub fn reset(&mut self) {
        self.state = StateVector::zero_state(self.state.qubit_count());
    }

    /// Get the number of qubits in the simulator
    pub fn qubit_count(&self) -> usize {
        self.state.qubit_count()
    }

    /// Apply a single gate
    pub fn apply_gate(&mut self, gate: &GateOp) -> Result<(), BackendError> {
        self.state.apply_gate(gate)
    }

    /// Apply every gate of a circuit in order; measurements are not applied
    pub fn run_circuit(&mut self, circuit: &Circuit) -> Result<(), BackendError> {
        if circuit.qubit_count() != self.qubit_count() {
            return Err(BackendError::InvalidState(format!(
                "circuit has {} qubits, but simulator has {} qubits",
                circuit.qubit_count(),
                self.qubit_count()
            )));
        }

        for gate in circuit.gates() {
            self.apply_gate(gate)?;
        }

        if !self.state.is_normalized() {
            return Err(BackendError::InvalidState(format!(
                "state norm drifted to {}",
                self.state.norm_sqr()
            )));
        }
        Ok(())
    }

    /// Distribution over classical-register bitstrings when `measured` qubits
    /// are read out
    ///
    /// The register is as wide as the state; bits of unmeasured qubits read `0`.
    /// Outcomes with zero probability are omitted.
    pub fn register_distribution(&self, measured: &[usize]) -> Result<BTreeMap<String, f64>, BackendError> {
        let n = self.qubit_count();
        if let Some(&q) = measured.iter().find(|&&q| q >= n) {
            return Err(BackendError::InvalidState(format!(
                "measurement of qubit {} in a {}-qubit register",
                q, n
            )));
        }

        let mask = measured
            .iter()
            .fold(0usize, |acc, &q| acc | self.state.qubit_mask(q));

        let mut distribution = BTreeMap::new();
        for (index, prob) in self.state.probabilities().into_iter().enumerate() {
            if prob > 1e-15 {
                *distribution.entry(self.state.bitstring(index & mask)).or_insert(0.0) += prob;
            }
        }
        Ok(distribution)
    }

    /// Sample `shots` readouts of the measured qubits without collapsing the state
    ///
    /// The returned counts always sum to `shots`.
    pub fn sample_counts(&mut self, measured: &[usize], shots: u64) -> Result<BTreeMap<String, u64>, BackendError> {
        let distribution = self.register_distribution(measured)?;

        // Convert to a cumulative distribution for sampling
        let mut outcomes = Vec::with_capacity(distribution.len());
        let mut cumulative = Vec::with_capacity(distribution.len());
        let mut total_prob = 0.0;
        for (bits, prob) in distribution {
            total_prob += prob;
            outcomes.push(bits);
            cumulative.push(total_prob);
        }

        if outcomes.is_empty() {
            return Err(BackendError::InvalidState("state has zero norm".to_string()));
        }

        let mut hits = vec![0u64; outcomes.len()];
        for _ in 0..shots {
            let r = self.rng.gen::<f64>() * total_prob;
            let slot = cumulative.partition_point(|&c| c <= r).min(outcomes.len() - 1);
            hits[slot] += 1;
        }

        Ok(outcomes
            .into_iter()
            .zip(hits)
            .filter(|(_, count)| *count > 0)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unmeasured_bits_read_zero() {
        let mut simulator = StatevectorSimulator::with_seed(2, Some(1));
        simulator.apply_gate(&GateOp::PauliX(1)).unwrap();

        let distribution = simulator.register_distribution(&[0]).unwrap();
        assert_eq!(distribution.len(), 1);
        assert!((distribution["00"] - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_same_seed_same_counts() {
        let mut a = StatevectorSimulator::with_seed(2, Some(42));
        let mut b = StatevectorSimulator::with_seed(2, Some(42));
        for sim in [&mut a, &mut b] {
            sim.apply_gate(&GateOp::Hadamard(0)).unwrap();
            sim.apply_gate(&GateOp::Hadamard(1)).unwrap();
        }

        assert_eq!(a.sample_counts(&[0, 1], 500).unwrap(), b.sample_counts(&[0, 1], 500).unwrap());
    }
}
