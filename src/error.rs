//! Error types for the circuit pipeline
//!
//! Each stage of the pipeline has its own error enum. [`PipelineError`]
//! gathers them so a request handler can report any failure as one message.

use thiserror::Error;

/// Errors raised while parsing gate text such as `"H 0; CX 0 1"`
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The opcode is not part of the recognized gate set
    #[error("unknown gate `{0}`")]
    UnknownGate(String),

    /// An operand is not a non-negative integer
    #[error("invalid operand `{operand}` for gate {gate}")]
    InvalidOperand { gate: String, operand: String },

    /// The gate was given the wrong number of operands
    #[error("gate {gate} expects {expected} operand(s), found {found}")]
    OperandCount {
        gate: String,
        expected: usize,
        found: usize,
    },
}

/// Errors raised while assembling a circuit
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    /// A gate references a qubit outside the register
    #[error("qubit index {index} out of range for a {qubit_count}-qubit circuit")]
    QubitIndexOutOfRange { index: usize, qubit_count: usize },

    /// A multi-qubit gate names the same qubit more than once
    #[error("gate {gate} uses qubit {qubit} more than once")]
    DuplicateQubit { gate: &'static str, qubit: usize },

    /// Circuits need at least one qubit
    #[error("circuit must have at least one qubit")]
    EmptyRegister,
}

/// Errors reported by a simulation backend
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BackendError {
    /// The circuit is wider than the backend can hold
    #[error("circuit requires {required} qubits, backend supports at most {max}")]
    CapacityExceeded { required: usize, max: usize },

    /// Exact state extraction was requested on a circuit that still measures
    #[error("exact state requested for a circuit with terminal measurements")]
    MeasuredCircuit,

    /// Shot sampling was requested on a circuit without measurements
    #[error("no measurements to sample")]
    NothingMeasured,

    /// The state became invalid during execution
    #[error("invalid state: {0}")]
    InvalidState(String),
}

/// Errors surfaced by the simulation runner
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SimulationError {
    /// Any failure inside the backend
    #[error("simulation backend failure: {0}")]
    BackendFailure(String),

    /// Shot sampling needs at least one shot
    #[error("shot count must be positive")]
    ZeroShots,
}

impl From<BackendError> for SimulationError {
    fn from(err: BackendError) -> Self {
        SimulationError::BackendFailure(err.to_string())
    }
}

/// Errors raised while turning an execution result into a display artifact
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DerivationError {
    /// The artifact needs the exact state but shot counts were supplied
    #[error("this visualization requires an exact state vector, not shot counts")]
    RequiresExactState,

    /// The count map cannot be normalized
    #[error("malformed counts: {0}")]
    MalformedCounts(String),
}

/// Errors from the optional text-generation collaborator
#[derive(Debug, Error)]
pub enum GenerationError {
    /// The generator is not configured
    #[error("text generation is not configured: {0}")]
    NotConfigured(String),

    /// Network or transport failure
    #[error("network error: {0}")]
    Network(String),

    /// The endpoint answered with a non-success status
    #[error("error {status}: {body}")]
    Status { status: u16, body: String },

    /// The endpoint answered with a body we could not interpret
    #[error("unexpected response: {0}")]
    MalformedResponse(String),
}

/// Errors raised while validating session configuration
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("qubit count {0} outside the supported range 1..=5")]
    QubitCount(usize),

    #[error("{name} angle {value} outside 0..=360 degrees")]
    Angle { name: &'static str, value: f64 },

    #[error("shot count must be positive")]
    ZeroShots,

    #[error("unknown {kind} `{value}`")]
    UnknownName { kind: &'static str, value: String },
}

/// Errors raised by the authentication collaborator
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("please enter both username and password")]
    MissingCredentials,

    #[error("user {0} already exists")]
    UserExists(String),

    #[error("user not found, please sign up first")]
    UnknownUser,

    #[error("incorrect password, please try again")]
    IncorrectPassword,

    #[error("login required")]
    NotLoggedIn,
}

/// Any failure of a single request
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Build(#[from] BuildError),

    #[error(transparent)]
    Simulation(#[from] SimulationError),

    #[error(transparent)]
    Derivation(#[from] DerivationError),

    #[error(transparent)]
    Auth(#[from] AuthError),
}

impl PipelineError {
    /// The single message shown to the user for a failed request
    pub fn user_message(&self) -> String {
        match self {
            PipelineError::Config(e) => format!("Invalid configuration: {}", e),
            PipelineError::Parse(e) => format!("Could not read gate operations: {}", e),
            PipelineError::Build(e) => format!("Could not build circuit: {}", e),
            PipelineError::Simulation(e) => format!("An error occurred during simulation: {}", e),
            PipelineError::Derivation(e) => format!("Could not prepare visualization: {}", e),
            PipelineError::Auth(e) => e.to_string(),
        }
    }
}
