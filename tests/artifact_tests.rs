use std::collections::BTreeMap;

use qlabs::artifacts::{
    density_diagonal_from_counts, derive_artifact, probability_table, BlochVector, DisplayArtifact, ViewAngles,
    VisualizationType, MAX_DIAGONAL_QUBITS, PROBABILITY_TOLERANCE,
};
use qlabs::error::DerivationError;
use qlabs::pipeline::compile_circuit;
use qlabs::simulators::{Counts, ExecutionResult, LocalSimulator, RunMode, SimulationRunner};

/// Helper function for comparing f64 with tolerance
fn approx_eq(a: f64, b: f64, epsilon: f64) -> bool {
    (a - b).abs() < epsilon
}

fn bloch_approx_eq(v: &BlochVector, x: f64, y: f64, z: f64) -> bool {
    approx_eq(v.x, x, 1e-10) && approx_eq(v.y, y, 1e-10) && approx_eq(v.z, z, 1e-10)
}

fn execute(text: &str, qubits: usize, mode: RunMode) -> ExecutionResult {
    let circuit = compile_circuit(text, qubits).unwrap();
    SimulationRunner::new(LocalSimulator::seeded(11)).run(&circuit, mode).unwrap()
}

fn counts(qubits: usize, entries: &[(&str, u64)]) -> Counts {
    let map: BTreeMap<String, u64> = entries.iter().map(|(b, c)| (b.to_string(), *c)).collect();
    Counts::new(qubits, map)
}

#[test]
fn test_probability_table_sums_to_one() {
    let result = execute("H 0; H 1; CX 1 2", 3, RunMode::ShotSampling(999));
    let artifact = derive_artifact(&result, VisualizationType::ProbabilityAmplitude, ViewAngles::default()).unwrap();

    match artifact {
        DisplayArtifact::ProbabilityTable(table) => {
            let sum: f64 = table.values().sum();
            assert!(approx_eq(sum, 1.0, PROBABILITY_TOLERANCE));
        }
        other => panic!("unexpected artifact {:?}", other),
    }
}

#[test]
fn test_probability_table_from_counts() {
    let table = probability_table(&counts(2, &[("00", 300), ("11", 100)])).unwrap();
    assert!(approx_eq(table["00"], 0.75, 1e-12));
    assert!(approx_eq(table["11"], 0.25, 1e-12));
}

#[test]
fn test_probability_table_from_exact_state() {
    let result = execute("H 0; CX 0 1", 2, RunMode::ExactState);
    let artifact = derive_artifact(&result, VisualizationType::ProbabilityAmplitude, ViewAngles::default()).unwrap();

    let DisplayArtifact::ProbabilityTable(table) = artifact else {
        panic!("expected a probability table");
    };
    assert_eq!(table.len(), 2);
    assert!(approx_eq(table["00"], 0.5, 1e-10));
    assert!(approx_eq(table["11"], 0.5, 1e-10));
}

#[test]
fn test_bloch_vectors_of_product_state() {
    // |+⟩ ⊗ |1⟩ ⊗ |0⟩
    let result = execute("H 0; X 1", 3, RunMode::ExactState);
    let artifact = derive_artifact(&result, VisualizationType::BlochSphere, ViewAngles::default()).unwrap();

    let DisplayArtifact::BlochCoordinates { qubits, .. } = artifact else {
        panic!("expected Bloch coordinates");
    };
    assert_eq!(qubits.len(), 3);
    assert!(bloch_approx_eq(&qubits[0], 1.0, 0.0, 0.0));
    assert!(bloch_approx_eq(&qubits[1], 0.0, 0.0, -1.0));
    assert!(bloch_approx_eq(&qubits[2], 0.0, 0.0, 1.0));
}

#[test]
fn test_entangled_qubits_sit_at_the_origin() {
    let result = execute("H 0; CX 0 1", 2, RunMode::ExactState);
    let artifact = derive_artifact(&result, VisualizationType::BlochSphere, ViewAngles::default()).unwrap();

    let DisplayArtifact::BlochCoordinates { qubits, .. } = artifact else {
        panic!("expected Bloch coordinates");
    };
    for v in &qubits {
        assert!(approx_eq(v.magnitude(), 0.0, 1e-10));
    }
}

#[test]
fn test_view_angles_do_not_change_vectors() {
    let result = execute("H 0; CX 0 1; H 2", 3, RunMode::ExactState);

    let a = derive_artifact(&result, VisualizationType::BlochSphere, ViewAngles::default()).unwrap();
    let b = derive_artifact(
        &result,
        VisualizationType::BlochSphere,
        ViewAngles {
            elevation: 90.0,
            azimuth: 270.0,
        },
    )
    .unwrap();

    match (a, b) {
        (
            DisplayArtifact::BlochCoordinates { view: va, qubits: qa },
            DisplayArtifact::BlochCoordinates { view: vb, qubits: qb },
        ) => {
            assert_eq!(qa, qb);
            assert_ne!(va, vb);
            assert_eq!(vb.azimuth, 270.0);
        }
        other => panic!("unexpected artifacts {:?}", other),
    }
}

#[test]
fn test_bloch_from_counts_requires_exact_state() {
    let result = execute("H 0", 1, RunMode::ShotSampling(10));
    let err = derive_artifact(&result, VisualizationType::BlochSphere, ViewAngles::default()).unwrap_err();
    assert_eq!(err, DerivationError::RequiresExactState);

    let err = derive_artifact(&result, VisualizationType::StateCity, ViewAngles::default()).unwrap_err();
    assert_eq!(err, DerivationError::RequiresExactState);
}

#[test]
fn test_density_diagonal_from_counts_covers_every_basis_state() {
    let result = execute("H 0; CX 0 1", 2, RunMode::ShotSampling(1024));
    let artifact = derive_artifact(&result, VisualizationType::DensityMatrix, ViewAngles::default()).unwrap();

    let DisplayArtifact::DensityDiagonal(diagonal) = artifact else {
        panic!("expected a density diagonal");
    };
    assert_eq!(diagonal.keys().cloned().collect::<Vec<_>>(), vec!["00", "01", "10", "11"]);
    assert_eq!(diagonal["01"], 0.0);
    assert_eq!(diagonal["10"], 0.0);
    assert!(approx_eq(diagonal.values().sum::<f64>(), 1.0, PROBABILITY_TOLERANCE));
}

#[test]
fn test_density_diagonal_from_exact_state() {
    let result = execute("X 0", 2, RunMode::ExactState);
    let artifact = derive_artifact(&result, VisualizationType::DensityMatrix, ViewAngles::default()).unwrap();

    let DisplayArtifact::DensityDiagonal(diagonal) = artifact else {
        panic!("expected a density diagonal");
    };
    assert!(approx_eq(diagonal["10"], 1.0, 1e-10));
}

#[test]
fn test_zero_total_counts_are_malformed() {
    let result = ExecutionResult::Counts(counts(2, &[("00", 0)]));
    let err = derive_artifact(&result, VisualizationType::DensityMatrix, ViewAngles::default()).unwrap_err();
    assert!(matches!(err, DerivationError::MalformedCounts(_)));

    let empty = ExecutionResult::Counts(counts(1, &[]));
    assert!(derive_artifact(&empty, VisualizationType::ProbabilityAmplitude, ViewAngles::default()).is_err());
}

#[test]
fn test_wrong_width_counts_are_malformed() {
    let err = density_diagonal_from_counts(&counts(2, &[("000", 5)])).unwrap_err();
    assert!(matches!(err, DerivationError::MalformedCounts(_)));
}

#[test]
fn test_state_city_is_hermitian() {
    let result = execute("H 0; CX 0 1", 2, RunMode::ExactState);
    let artifact = derive_artifact(&result, VisualizationType::StateCity, ViewAngles::default()).unwrap();

    let DisplayArtifact::StateCity { real, imag } = artifact else {
        panic!("expected a state city");
    };
    assert_eq!(real.dim(), (4, 4));
    assert!(approx_eq(real[[0, 3]], 0.5, 1e-10));
    assert!(approx_eq(real[[3, 0]], 0.5, 1e-10));
    for i in 0..4 {
        for j in 0..4 {
            assert!(approx_eq(real[[i, j]], real[[j, i]], 1e-12));
            assert!(approx_eq(imag[[i, j]], -imag[[j, i]], 1e-12));
        }
    }
}

#[test]
fn test_artifact_display() {
    let table = probability_table(&counts(1, &[("0", 1), ("1", 3)])).unwrap();
    let text = DisplayArtifact::ProbabilityTable(table).to_string();
    assert!(text.contains("0: 0.2500"));
    assert!(text.contains("1: 0.7500"));
}

#[test]
fn test_sixty_four_bit_counts_are_rejected() {
    let wide = "0".repeat(64);
    let result = ExecutionResult::Counts(counts(64, &[(wide.as_str(), 1)]));

    for kind in [VisualizationType::DensityMatrix, VisualizationType::ProbabilityAmplitude] {
        let err = derive_artifact(&result, kind, ViewAngles::default()).unwrap_err();
        assert!(matches!(err, DerivationError::MalformedCounts(_)));
    }
}

#[test]
fn test_wide_counts_keep_histogram_but_not_diagonal() {
    let n = MAX_DIAGONAL_QUBITS + 1;
    let ones = "1".repeat(n);
    let wide = counts(n, &[(ones.as_str(), 3)]);

    let table = probability_table(&wide).unwrap();
    assert!(approx_eq(table[&ones], 1.0, 1e-12));
    assert!(matches!(
        density_diagonal_from_counts(&wide),
        Err(DerivationError::MalformedCounts(_))
    ));
}

#[test]
fn test_sixteen_qubit_diagonal_from_counts() {
    let ones = "1".repeat(16);
    let diagonal = density_diagonal_from_counts(&counts(16, &[(ones.as_str(), 8)])).unwrap();
    assert_eq!(diagonal.len(), 1 << 16);
    assert_eq!(diagonal[&ones], 1.0);
}

#[test]
fn test_deserialized_state_is_checked() {
    let short = r#"{"State":{"qubit_count":2,"amplitudes":{"v":1,"dim":[1],"data":[[1.0,0.0]]}}}"#;
    assert!(serde_json::from_str::<ExecutionResult>(short).is_err());

    let unnormalized = r#"{"State":{"qubit_count":1,"amplitudes":{"v":1,"dim":[2],"data":[[1.0,0.0],[1.0,0.0]]}}}"#;
    assert!(serde_json::from_str::<ExecutionResult>(unnormalized).is_err());

    let good = execute("H 0", 1, RunMode::ExactState);
    let json = serde_json::to_string(&good).unwrap();
    let back: ExecutionResult = serde_json::from_str(&json).unwrap();
    let (before, after) = (good.state().unwrap(), back.state().unwrap());
    assert_eq!(after.qubit_count(), 1);
    for (p, q) in before.probabilities().iter().zip(after.probabilities()) {
        assert!(approx_eq(*p, q, 1e-12));
    }
}
