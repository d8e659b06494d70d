//! Display artifacts
//!
//! Turns an [`ExecutionResult`] into the quantity a renderer plots:
//!
//! - probability table (histogram) from counts or an exact state
//! - Bloch coordinates of every qubit's reduced state (exact state only)
//! - density-matrix diagonal from counts or an exact state
//! - state city: real and imaginary parts of ρ = |ψ⟩⟨ψ| (exact state only)
//!
//! Viewing angles travel with the Bloch artifact for the renderer. They are a
//! camera position and never act on the state.

use std::collections::BTreeMap;
use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, DerivationError};
use crate::quantum::density_matrix::DensityMatrix;
use crate::quantum::state::StateVector;
use crate::simulators::backend::{Counts, ExecutionResult, RunMode};

/// Tolerance for probability sums
pub const PROBABILITY_TOLERANCE: f64 = 1e-9;

/// Widest classical register a count map may describe
pub const MAX_COUNT_BITS: usize = 63;

/// Widest register whose full diagonal is listed
pub const MAX_DIAGONAL_QUBITS: usize = 20;

/// Which artifact the user asked for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VisualizationType {
    ProbabilityAmplitude,
    BlochSphere,
    StateCity,
    DensityMatrix,
}

impl VisualizationType {
    pub const ALL: [VisualizationType; 4] = [
        VisualizationType::ProbabilityAmplitude,
        VisualizationType::BlochSphere,
        VisualizationType::StateCity,
        VisualizationType::DensityMatrix,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            VisualizationType::ProbabilityAmplitude => "Probability Amplitude",
            VisualizationType::BlochSphere => "Bloch Sphere",
            VisualizationType::StateCity => "State City",
            VisualizationType::DensityMatrix => "Density Matrix",
        }
    }

    pub fn key(&self) -> &'static str {
        match self {
            VisualizationType::ProbabilityAmplitude => "probability",
            VisualizationType::BlochSphere => "bloch",
            VisualizationType::StateCity => "city",
            VisualizationType::DensityMatrix => "density",
        }
    }

    /// Whether the artifact can only be computed from an exact state
    pub fn requires_exact_state(&self) -> bool {
        matches!(self, VisualizationType::BlochSphere | VisualizationType::StateCity)
    }

    /// Run mode that produces a suitable result
    pub fn run_mode(&self, shots: u64) -> RunMode {
        if self.requires_exact_state() {
            RunMode::ExactState
        } else {
            RunMode::ShotSampling(shots)
        }
    }
}

impl fmt::Display for VisualizationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for VisualizationType {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        VisualizationType::ALL
            .into_iter()
            .find(|v| v.key().eq_ignore_ascii_case(wanted) || v.display_name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ConfigError::UnknownName {
                kind: "visualization",
                value: s.to_string(),
            })
    }
}

/// Camera position for a Bloch-sphere plot, in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewAngles {
    pub elevation: f64,
    pub azimuth: f64,
}

impl Default for ViewAngles {
    fn default() -> Self {
        ViewAngles {
            elevation: 30.0,
            azimuth: 30.0,
        }
    }
}

/// A point on or inside the Bloch sphere
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BlochVector {
    pub x: f64,
    pub y: f64,
    /// +Z is |0⟩ and -Z is |1⟩
    pub z: f64,
}

impl BlochVector {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Bloch vector of a single-qubit density matrix
    ///
    /// x = 2 Re ρ₀₁, y = 2 Im ρ₁₀, z = ρ₀₀ - ρ₁₁
    pub fn from_density_matrix(rho: &DensityMatrix) -> Option<Self> {
        if rho.qubit_count() != 1 {
            return None;
        }
        let m = rho.matrix();
        Some(Self {
            x: 2.0 * m[[0, 1]].re,
            y: 2.0 * m[[1, 0]].im,
            z: m[[0, 0]].re - m[[1, 1]].re,
        })
    }

    /// Length of the vector: 1 for pure states, less for mixed ones
    pub fn magnitude(&self) -> f64 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    /// Polar angle θ ∈ [0, π] and azimuth φ ∈ [0, 2π) of the vector itself
    pub fn angles(&self) -> (f64, f64) {
        let r = self.magnitude();
        if r < 1e-10 {
            return (0.0, 0.0);
        }
        let theta = (self.z / r).clamp(-1.0, 1.0).acos();
        let phi = self.y.atan2(self.x);
        let phi = if phi < 0.0 { phi + 2.0 * PI } else { phi };
        (theta, phi)
    }
}

/// Something a plotting collaborator can render
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum DisplayArtifact {
    /// Bitstring to probability; probabilities sum to 1
    ProbabilityTable(BTreeMap<String, f64>),
    /// One Bloch vector per qubit, plus the camera position
    BlochCoordinates {
        view: ViewAngles,
        qubits: Vec<BlochVector>,
    },
    /// Bitstring to diagonal density-matrix entry for every basis state
    DensityDiagonal(BTreeMap<String, f64>),
    /// Real and imaginary parts of the full density matrix
    StateCity {
        real: Array2<f64>,
        imag: Array2<f64>,
    },
}

/// Compute the requested artifact from an execution result
pub fn derive_artifact(
    result: &ExecutionResult,
    kind: VisualizationType,
    view: ViewAngles,
) -> Result<DisplayArtifact, DerivationError> {
    match (kind, result) {
        (VisualizationType::ProbabilityAmplitude, ExecutionResult::Counts(counts)) => {
            probability_table(counts).map(DisplayArtifact::ProbabilityTable)
        }
        (VisualizationType::ProbabilityAmplitude, ExecutionResult::State(state)) => {
            Ok(DisplayArtifact::ProbabilityTable(state_probabilities(state)))
        }
        (VisualizationType::BlochSphere, ExecutionResult::State(state)) => Ok(DisplayArtifact::BlochCoordinates {
            view,
            qubits: bloch_vectors(state)?,
        }),
        (VisualizationType::DensityMatrix, ExecutionResult::Counts(counts)) => {
            density_diagonal_from_counts(counts).map(DisplayArtifact::DensityDiagonal)
        }
        (VisualizationType::DensityMatrix, ExecutionResult::State(state)) => {
            Ok(DisplayArtifact::DensityDiagonal(labelled_diagonal(state.qubit_count(), state.probabilities())))
        }
        (VisualizationType::StateCity, ExecutionResult::State(state)) => {
            let rho = DensityMatrix::from_state_vector(state);
            Ok(DisplayArtifact::StateCity {
                real: rho.real_part(),
                imag: rho.imag_part(),
            })
        }
        (VisualizationType::BlochSphere | VisualizationType::StateCity, ExecutionResult::Counts(_)) => {
            Err(DerivationError::RequiresExactState)
        }
    }
}

/// Divide each count by the total shot count
pub fn probability_table(counts: &Counts) -> Result<BTreeMap<String, f64>, DerivationError> {
    let total = checked_total(counts)?;
    Ok(counts
        .iter()
        .map(|(bits, count)| (bits.to_string(), count as f64 / total as f64))
        .collect())
}

/// Shot frequencies as the diagonal of a density matrix, one entry per basis
/// state
///
/// Coherences cannot be recovered from counts; only the diagonal is returned.
pub fn density_diagonal_from_counts(counts: &Counts) -> Result<BTreeMap<String, f64>, DerivationError> {
    let total = checked_total(counts)?;
    let n = counts.qubit_count();
    if n > MAX_DIAGONAL_QUBITS {
        return Err(DerivationError::MalformedCounts(format!(
            "{}-bit register is wider than the {}-qubit diagonal limit",
            n, MAX_DIAGONAL_QUBITS
        )));
    }

    let mut diagonal = vec![0.0; 1 << n];
    for (bits, count) in counts.iter() {
        let index = usize::from_str_radix(bits, 2)
            .map_err(|_| DerivationError::MalformedCounts(format!("`{}` is not a bitstring", bits)))?;
        diagonal[index] = count as f64 / total as f64;
    }
    Ok(labelled_diagonal(n, diagonal))
}

fn checked_total(counts: &Counts) -> Result<u64, DerivationError> {
    let n = counts.qubit_count();
    if n == 0 || n > MAX_COUNT_BITS {
        return Err(DerivationError::MalformedCounts(format!(
            "register width {} outside 1..={}",
            n, MAX_COUNT_BITS
        )));
    }
    for (bits, _) in counts.iter() {
        if bits.len() != n || !bits.chars().all(|c| c == '0' || c == '1') {
            return Err(DerivationError::MalformedCounts(format!(
                "`{}` is not a {}-bit string",
                bits, n
            )));
        }
    }

    match counts.total() {
        0 => Err(DerivationError::MalformedCounts("total count is zero".to_string())),
        total => Ok(total),
    }
}

fn state_probabilities(state: &StateVector) -> BTreeMap<String, f64> {
    state
        .probabilities()
        .into_iter()
        .enumerate()
        .filter(|(_, p)| *p > 1e-15)
        .map(|(i, p)| (state.bitstring(i), p))
        .collect()
}

fn bloch_vectors(state: &StateVector) -> Result<Vec<BlochVector>, DerivationError> {
    (0..state.qubit_count())
        .map(|q| {
            DensityMatrix::single_qubit_from_state(state, q)
                .as_ref()
                .and_then(BlochVector::from_density_matrix)
                .ok_or(DerivationError::RequiresExactState)
        })
        .collect()
}

fn labelled_diagonal(width: usize, diagonal: Vec<f64>) -> BTreeMap<String, f64> {
    diagonal
        .into_iter()
        .enumerate()
        .map(|(i, p)| (format!("{:0width$b}", i, width = width), p))
        .collect()
}

impl fmt::Display for DisplayArtifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DisplayArtifact::ProbabilityTable(table) => {
                writeln!(f, "Probabilities:")?;
                write_bars(f, table)
            }
            DisplayArtifact::DensityDiagonal(table) => {
                writeln!(f, "Density matrix diagonal:")?;
                write_bars(f, table)
            }
            DisplayArtifact::BlochCoordinates { view, qubits } => {
                writeln!(
                    f,
                    "Bloch vectors (view: elevation {:.0}°, azimuth {:.0}°):",
                    view.elevation, view.azimuth
                )?;
                for (q, v) in qubits.iter().enumerate() {
                    let (theta, phi) = v.angles();
                    writeln!(
                        f,
                        "  q{}: ({:+.4}, {:+.4}, {:+.4}) |r|={:.4} θ={:.4} φ={:.4}",
                        q,
                        v.x,
                        v.y,
                        v.z,
                        v.magnitude(),
                        theta,
                        phi
                    )?;
                }
                Ok(())
            }
            DisplayArtifact::StateCity { real, imag } => {
                writeln!(f, "State city, real part:")?;
                write_matrix(f, real)?;
                writeln!(f, "State city, imaginary part:")?;
                write_matrix(f, imag)
            }
        }
    }
}

fn write_bars(f: &mut fmt::Formatter<'_>, table: &BTreeMap<String, f64>) -> fmt::Result {
    for (bits, p) in table {
        let bar = "#".repeat((p * 40.0).round() as usize);
        writeln!(f, "  {}: {:.4} {}", bits, p, bar)?;
    }
    Ok(())
}

fn write_matrix(f: &mut fmt::Formatter<'_>, matrix: &Array2<f64>) -> fmt::Result {
    for row in matrix.rows() {
        write!(f, " ")?;
        for value in row {
            write!(f, " {:+.3}", value)?;
        }
        writeln!(f)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visualization_names() {
        assert_eq!("Bloch Sphere".parse::<VisualizationType>().unwrap(), VisualizationType::BlochSphere);
        assert_eq!("density".parse::<VisualizationType>().unwrap(), VisualizationType::DensityMatrix);
        assert!("hinton".parse::<VisualizationType>().is_err());
    }

    #[test]
    fn test_run_mode_selection() {
        assert_eq!(VisualizationType::BlochSphere.run_mode(100), RunMode::ExactState);
        assert_eq!(VisualizationType::StateCity.run_mode(100), RunMode::ExactState);
        assert_eq!(VisualizationType::DensityMatrix.run_mode(100), RunMode::ShotSampling(100));
    }

    #[test]
    fn test_bloch_angles_of_plus_state() {
        let v = BlochVector::new(1.0, 0.0, 0.0);
        let (theta, phi) = v.angles();
        assert!((theta - PI / 2.0).abs() < 1e-10);
        assert!(phi.abs() < 1e-10);
    }

    #[test]
    fn test_non_binary_bitstring_is_malformed() {
        let mut map = BTreeMap::new();
        map.insert("0a".to_string(), 3);
        let counts = Counts::new(2, map);
        assert!(matches!(probability_table(&counts), Err(DerivationError::MalformedCounts(_))));
    }
}
