//! Per-request handler
//!
//! One user action runs parse, build, simulate and derive to completion.
//! Every failure surfaces as a [`PipelineError`]; the session itself is never
//! modified by a request, so the caller can simply re-prompt.
//!
//! The optional [`ExampleGenerator`] runs after the artifact is derived. Its
//! failure is logged and reported alongside a successful response.

use log::{debug, info, warn};
use serde::Serialize;

use crate::artifacts::{derive_artifact, DisplayArtifact};
use crate::error::PipelineError;
use crate::generation::{algorithm_prompt, circuit_prompt, ExampleGenerator};
use crate::quantum::algorithms::{Algorithm, ExampleCircuit};
use crate::quantum::circuit::Circuit;
use crate::quantum::parser::parse_gate_sequence;
use crate::session::{SessionConfig, SessionContext};
use crate::simulators::backend::{ExecutionResult, LocalSimulator, SimulationBackend, SimulationRunner};

/// Parse gate text and build a fully measured circuit on `qubit_count` qubits
pub fn compile_circuit(text: &str, qubit_count: usize) -> Result<Circuit, PipelineError> {
    let gates = parse_gate_sequence(text)?;
    debug!("parsed {} gate operation(s)", gates.len());
    Ok(Circuit::from_gates(qubit_count, &gates)?)
}

/// Everything produced by one successful request
#[derive(Debug, Clone, Serialize)]
pub struct Response {
    pub circuit: Circuit,
    pub result: ExecutionResult,
    pub artifact: DisplayArtifact,
    /// Text from the example generator, when one is attached and succeeded
    pub generated_example: Option<String>,
    /// Why generation failed, if it did
    pub generation_warning: Option<String>,
}

/// Request handler over a simulation backend
pub struct Pipeline<B> {
    runner: SimulationRunner<B>,
    generator: Option<Box<dyn ExampleGenerator>>,
}

impl Default for Pipeline<LocalSimulator> {
    fn default() -> Self {
        Pipeline::new(LocalSimulator::new())
    }
}

impl<B: SimulationBackend> Pipeline<B> {
    pub fn new(backend: B) -> Self {
        Pipeline {
            runner: SimulationRunner::new(backend),
            generator: None,
        }
    }

    /// Attach an example generator
    pub fn with_generator(mut self, generator: Box<dyn ExampleGenerator>) -> Self {
        self.generator = Some(generator);
        self
    }

    pub fn runner(&self) -> &SimulationRunner<B> {
        &self.runner
    }

    /// Run the gate text held in `config`
    pub fn handle(&self, config: &SessionConfig) -> Result<Response, PipelineError> {
        config.validate()?;
        let circuit = compile_circuit(&config.gate_operations, config.qubit_count)?;
        let prompt = circuit_prompt(config.qubit_count, &config.gate_operations, config.visualization);
        self.execute(circuit, config, &prompt)
    }

    /// Run a named algorithm preset
    ///
    /// The preset fixes the circuit; `config` supplies the visualization,
    /// view angles and shot count.
    pub fn handle_algorithm(&self, algorithm: Algorithm, config: &SessionConfig) -> Result<Response, PipelineError> {
        config.validate()?;
        let circuit = algorithm.circuit()?;
        let prompt = algorithm_prompt(algorithm, config.visualization);
        self.execute(circuit, config, &prompt)
    }

    /// Run one of the worked examples with the rest of `config`
    pub fn handle_example(&self, example: ExampleCircuit, config: &SessionConfig) -> Result<Response, PipelineError> {
        let config = SessionConfig {
            qubit_count: example.qubit_count(),
            gate_operations: example.gate_text().to_string(),
            ..config.clone()
        };
        self.handle(&config)
    }

    /// Run the session's configuration on behalf of its signed-in user
    pub fn handle_session(&self, session: &SessionContext) -> Result<Response, PipelineError> {
        let user = session.require_login()?;
        debug!("handling request for {}", user);
        self.handle(&session.config)
    }

    fn execute(&self, circuit: Circuit, config: &SessionConfig, prompt: &str) -> Result<Response, PipelineError> {
        let mode = config.visualization.run_mode(config.shots);
        let result = self.runner.run_seeded(&circuit, mode, config.seed)?;
        let artifact = derive_artifact(&result, config.visualization, config.view())?;
        debug!("derived {} artifact", config.visualization);

        let (generated_example, generation_warning) = match self.generate(prompt) {
            None => (None, None),
            Some(Ok(text)) => (Some(text), None),
            Some(Err(message)) => (None, Some(message)),
        };

        info!(
            "completed {} request: {} qubit(s), {} gate(s)",
            config.visualization,
            circuit.qubit_count(),
            circuit.gate_count()
        );

        Ok(Response {
            circuit,
            result,
            artifact,
            generated_example,
            generation_warning,
        })
    }

    fn generate(&self, prompt: &str) -> Option<Result<String, String>> {
        let generator = self.generator.as_ref()?;
        Some(generator.generate_example(prompt).map_err(|e| {
            warn!("example generation failed: {}", e);
            format!("Error: {}", e)
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{BuildError, GenerationError, ParseError};

    struct FailingGenerator;

    impl ExampleGenerator for FailingGenerator {
        fn generate_example(&self, _prompt: &str) -> Result<String, GenerationError> {
            Err(GenerationError::Status {
                status: 503,
                body: "unavailable".to_string(),
            })
        }
    }

    struct EchoGenerator;

    impl ExampleGenerator for EchoGenerator {
        fn generate_example(&self, prompt: &str) -> Result<String, GenerationError> {
            Ok(format!("# {}", prompt))
        }
    }

    #[test]
    fn test_compile_checks_range_after_parsing() {
        assert!(matches!(
            compile_circuit("H 5", 2),
            Err(PipelineError::Build(BuildError::QubitIndexOutOfRange { index: 5, qubit_count: 2 }))
        ));
        assert!(matches!(
            compile_circuit("Z 0", 2),
            Err(PipelineError::Parse(ParseError::UnknownGate(_)))
        ));
    }

    #[test]
    fn test_generator_failure_does_not_block() {
        let pipeline = Pipeline::new(LocalSimulator::seeded(7)).with_generator(Box::new(FailingGenerator));
        let response = pipeline.handle(&SessionConfig::new(2, "H 0; CX 0 1")).unwrap();

        assert!(response.generated_example.is_none());
        assert!(response.generation_warning.unwrap().contains("503"));
        assert!(matches!(response.artifact, DisplayArtifact::ProbabilityTable(_)));
    }

    #[test]
    fn test_generator_receives_circuit_prompt() {
        let pipeline = Pipeline::new(LocalSimulator::seeded(7)).with_generator(Box::new(EchoGenerator));
        let response = pipeline.handle(&SessionConfig::new(1, "X 0")).unwrap();

        let text = response.generated_example.unwrap();
        assert!(text.contains("no of qubits: 1"));
        assert!(text.contains("X 0"));
    }

    #[test]
    fn test_invalid_config_rejected_before_parsing() {
        let err = Pipeline::default().handle(&SessionConfig::new(9, "nonsense")).unwrap_err();
        assert!(matches!(err, PipelineError::Config(_)));
    }
}
