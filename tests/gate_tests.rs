use num_complex::Complex64;
use ndarray::Array1;

use qlabs::quantum::gate::GateOp;
use qlabs::quantum::state::StateVector;
use qlabs::quantum::parse_gate_sequence;

/// Helper function for comparing complex numbers with tolerance
fn complex_approx_eq(a: Complex64, b: Complex64, epsilon: f64) -> bool {
    (a - b).norm() < epsilon
}

fn assert_amplitudes(state: &StateVector, expected: &[Complex64]) {
    let amplitudes = state.amplitudes();
    assert_eq!(amplitudes.len(), expected.len());
    for (i, (&actual, &wanted)) in amplitudes.iter().zip(expected).enumerate() {
        assert!(
            complex_approx_eq(actual, wanted, 1e-10),
            "amplitude {} is {}, expected {}",
            i,
            actual,
            wanted
        );
    }
}

fn c(re: f64) -> Complex64 {
    Complex64::new(re, 0.0)
}

#[test]
fn test_hadamard_on_zero() {
    let mut state = StateVector::zero_state(1);
    state.apply_gate(&GateOp::Hadamard(0)).unwrap();

    let h = 1.0 / 2.0_f64.sqrt();
    assert_amplitudes(&state, &[c(h), c(h)]);
}

#[test]
fn test_hadamard_is_self_inverse() {
    let mut state = StateVector::zero_state(2);
    state.apply_gate(&GateOp::Hadamard(1)).unwrap();
    state.apply_gate(&GateOp::Hadamard(1)).unwrap();

    assert_amplitudes(&state, &[c(1.0), c(0.0), c(0.0), c(0.0)]);
}

#[test]
fn test_pauli_x_on_qubit_zero_sets_most_significant_bit() {
    let mut state = StateVector::zero_state(3);
    state.apply_gate(&GateOp::PauliX(0)).unwrap();

    // |100⟩ is index 4
    assert!((state.probability(4) - 1.0).abs() < 1e-10);
    assert_eq!(state.bitstring(4), "100");
}

#[test]
fn test_cnot_truth_table() {
    let cases = [("00", "00"), ("01", "01"), ("10", "11"), ("11", "10")];

    for (input, output) in cases {
        let index = usize::from_str_radix(input, 2).unwrap();
        let mut state = StateVector::computational_basis(2, index).unwrap();
        state
            .apply_gate(&GateOp::ControlledNot { control: 0, target: 1 })
            .unwrap();

        let expected = usize::from_str_radix(output, 2).unwrap();
        assert!(
            (state.probability(expected) - 1.0).abs() < 1e-10,
            "CX 0 1 should map |{}⟩ to |{}⟩",
            input,
            output
        );
    }
}

#[test]
fn test_reversed_cnot() {
    // control on qubit 1, target qubit 0: |01⟩ -> |11⟩
    let mut state = StateVector::computational_basis(2, 0b01).unwrap();
    state
        .apply_gate(&GateOp::ControlledNot { control: 1, target: 0 })
        .unwrap();
    assert!((state.probability(0b11) - 1.0).abs() < 1e-10);
}

#[test]
fn test_swap_exchanges_qubits() {
    let mut state = StateVector::computational_basis(3, 0b100).unwrap();
    state.apply_gate(&GateOp::Swap(0, 2)).unwrap();
    assert!((state.probability(0b001) - 1.0).abs() < 1e-10);

    // swapping equal bits is the identity
    let mut state = StateVector::computational_basis(3, 0b101).unwrap();
    state.apply_gate(&GateOp::Swap(0, 2)).unwrap();
    assert!((state.probability(0b101) - 1.0).abs() < 1e-10);
}

#[test]
fn test_swap_preserves_superposition() {
    let h = 1.0 / 2.0_f64.sqrt();
    let amplitudes = Array1::from(vec![c(h), c(0.0), c(h), c(0.0)]);
    let mut state = StateVector::new(2, amplitudes).unwrap();

    // (|00⟩ + |10⟩)/√2 -> (|00⟩ + |01⟩)/√2
    state.apply_gate(&GateOp::Swap(0, 1)).unwrap();
    assert_amplitudes(&state, &[c(h), c(h), c(0.0), c(0.0)]);
}

#[test]
fn test_gate_outside_state_is_rejected() {
    let mut state = StateVector::zero_state(2);
    assert!(state.apply_gate(&GateOp::PauliX(2)).is_err());
}

#[test]
fn test_parsed_gates_display_as_input() {
    let text = "H 0; X 1; CX 0 1; SWAP 1 2";
    let rendered: Vec<String> = parse_gate_sequence(text)
        .unwrap()
        .iter()
        .map(|g| g.to_string())
        .collect();
    assert_eq!(rendered.join("; "), text);
}

#[test]
fn test_unnormalized_state_rejected() {
    let amplitudes = Array1::from(vec![c(1.0), c(1.0)]);
    assert!(StateVector::new(1, amplitudes).is_err());
}

#[test]
fn test_gate_arity_matches_qubits() {
    for gate in parse_gate_sequence("H 0; X 2; CX 1 0; SWAP 0 2").unwrap() {
        assert_eq!(gate.arity(), gate.qubits().len());
    }
}
