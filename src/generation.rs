//! Example-code generation
//!
//! An optional collaborator that asks a remote text-generation service for
//! illustrative code matching the current configuration. Nothing in the
//! simulate/derive path depends on it; callers treat its failure as a warning.
//!
//! [`TextGenerationClient`] talks to an IBM watsonx.ai style endpoint: an API
//! key is exchanged for a bearer token at the IAM endpoint, then the prompt is
//! posted with fixed decoding parameters.

use std::env;
use std::time::Duration;

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

use crate::artifacts::VisualizationType;
use crate::error::GenerationError;
use crate::quantum::algorithms::Algorithm;

/// Capability: turn a prompt into example text
pub trait ExampleGenerator {
    fn generate_example(&self, prompt: &str) -> Result<String, GenerationError>;
}

/// Text-generation endpoint configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Generation endpoint
    pub url: String,

    /// Token exchange endpoint
    pub iam_url: String,

    pub model_id: String,

    pub project_id: String,

    /// API key exchanged for a bearer token
    #[serde(skip_serializing)]
    pub api_key: String,

    pub max_new_tokens: u32,

    pub repetition_penalty: f64,

    /// Request timeout in seconds
    pub request_timeout_seconds: u64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            url: "https://us-south.ml.cloud.ibm.com/ml/v1/text/generation?version=2023-05-29".to_string(),
            iam_url: "https://iam.cloud.ibm.com/identity/token".to_string(),
            model_id: "ibm/granite-13b-chat-v2".to_string(),
            project_id: String::new(),
            api_key: String::new(),
            max_new_tokens: 900,
            repetition_penalty: 1.05,
            request_timeout_seconds: 60,
        }
    }
}

impl GeneratorConfig {
    /// Create a configuration with the given credentials and default endpoint
    pub fn new(api_key: impl Into<String>, project_id: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            project_id: project_id.into(),
            ..Self::default()
        }
    }

    /// Read `QLABS_GENERATOR_API_KEY`, `QLABS_GENERATOR_PROJECT_ID` and the
    /// optional `QLABS_GENERATOR_URL` / `QLABS_GENERATOR_MODEL`
    pub fn from_env() -> Result<Self, GenerationError> {
        let api_key = env::var("QLABS_GENERATOR_API_KEY")
            .map_err(|_| GenerationError::NotConfigured("QLABS_GENERATOR_API_KEY is not set".to_string()))?;
        let project_id = env::var("QLABS_GENERATOR_PROJECT_ID")
            .map_err(|_| GenerationError::NotConfigured("QLABS_GENERATOR_PROJECT_ID is not set".to_string()))?;

        let mut config = Self::new(api_key, project_id);
        if let Ok(url) = env::var("QLABS_GENERATOR_URL") {
            config.url = url;
        }
        if let Ok(model) = env::var("QLABS_GENERATOR_MODEL") {
            config.model_id = model;
        }
        Ok(config)
    }

    /// Set custom endpoint URL
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    /// Set the model identifier
    pub fn with_model(mut self, model_id: impl Into<String>) -> Self {
        self.model_id = model_id.into();
        self
    }
}

/// Body posted to the generation endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub input: String,
    pub parameters: GenerationParameters,
    pub model_id: String,
    pub project_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationParameters {
    pub decoding_method: String,
    pub max_new_tokens: u32,
    pub repetition_penalty: f64,
}

#[derive(Debug, Deserialize)]
struct GenerationResponse {
    results: Vec<GeneratedText>,
}

#[derive(Debug, Deserialize)]
struct GeneratedText {
    generated_text: String,
}

#[derive(Debug, Deserialize)]
struct IamTokenResponse {
    access_token: String,
}

/// Blocking client for the remote generation endpoint
pub struct TextGenerationClient {
    config: GeneratorConfig,
    client: reqwest::blocking::Client,
}

impl TextGenerationClient {
    pub fn new(config: GeneratorConfig) -> Result<Self, GenerationError> {
        if config.api_key.is_empty() {
            return Err(GenerationError::NotConfigured("missing API key".to_string()));
        }

        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .build()
            .map_err(|e| GenerationError::Network(format!("HTTP client error: {}", e)))?;

        Ok(Self { config, client })
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Request body for a prompt: greedy decoding with the configured limits
    pub fn request_body(&self, prompt: &str) -> GenerationRequest {
        GenerationRequest {
            input: prompt.to_string(),
            parameters: GenerationParameters {
                decoding_method: "greedy".to_string(),
                max_new_tokens: self.config.max_new_tokens,
                repetition_penalty: self.config.repetition_penalty,
            },
            model_id: self.config.model_id.clone(),
            project_id: self.config.project_id.clone(),
        }
    }

    /// Exchange the API key for a bearer token
    fn access_token(&self) -> Result<String, GenerationError> {
        let response = self
            .client
            .post(&self.config.iam_url)
            .header("Accept", "application/json")
            .form(&[
                ("grant_type", "urn:ibm:params:oauth:grant-type:apikey"),
                ("apikey", self.config.api_key.as_str()),
            ])
            .send()
            .map_err(|e| GenerationError::Network(e.to_string()))?;

        if !is_accepted(response.status()) {
            let status = response.status().as_u16();
            let body = response.text().unwrap_or_default();
            return Err(GenerationError::Status { status, body });
        }

        response
            .json::<IamTokenResponse>()
            .map(|token| token.access_token)
            .map_err(|e| GenerationError::MalformedResponse(format!("token response: {}", e)))
    }
}

impl ExampleGenerator for TextGenerationClient {
    fn generate_example(&self, prompt: &str) -> Result<String, GenerationError> {
        let token = self.access_token()?;

        let response = self
            .client
            .post(&self.config.url)
            .header("Accept", "application/json")
            .bearer_auth(token)
            .json(&self.request_body(prompt))
            .send()
            .map_err(|e| GenerationError::Network(e.to_string()))?;

        if !is_accepted(response.status()) {
            let status = response.status().as_u16();
            let body = response.text().unwrap_or_default();
            return Err(GenerationError::Status { status, body });
        }

        let body = response
            .text()
            .map_err(|e| GenerationError::Network(e.to_string()))?;
        parse_generation_response(&body)
    }
}

/// Only a plain 200 counts as a usable reply from either endpoint
fn is_accepted(status: StatusCode) -> bool {
    status == StatusCode::OK
}

/// Pull the generated text out of a response body
pub fn parse_generation_response(body: &str) -> Result<String, GenerationError> {
    let response: GenerationResponse =
        serde_json::from_str(body).map_err(|e| GenerationError::MalformedResponse(e.to_string()))?;

    let texts: Vec<String> = response.results.into_iter().map(|r| r.generated_text).collect();
    if texts.is_empty() {
        return Err(GenerationError::MalformedResponse("no results".to_string()));
    }
    Ok(texts.join("\n"))
}

/// Prompt describing a hand-authored circuit
pub fn circuit_prompt(qubit_count: usize, gate_operations: &str, visualization: VisualizationType) -> String {
    format!(
        "give me complete code on quantum circuit simulation with qiskit and python where quantum circuit \
         configuration is as follows: no of qubits: {}, gate operations: {}, visualization type: {}.",
        qubit_count, gate_operations, visualization
    )
}

/// Prompt describing a named algorithm
pub fn algorithm_prompt(algorithm: Algorithm, visualization: VisualizationType) -> String {
    format!(
        "Generate a quantum circuit for the algorithm: {} with visualization type: {}.",
        algorithm, visualization
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_ok_status_is_accepted() {
        assert!(is_accepted(StatusCode::OK));
        for status in [StatusCode::CREATED, StatusCode::NO_CONTENT, StatusCode::UNAUTHORIZED] {
            assert!(!is_accepted(status), "{}", status);
        }
    }

    #[test]
    fn test_request_body_shape() {
        let client = TextGenerationClient::new(GeneratorConfig::new("key", "project")).unwrap();
        let body = serde_json::to_value(client.request_body("hello")).unwrap();

        assert_eq!(body["input"], "hello");
        assert_eq!(body["parameters"]["decoding_method"], "greedy");
        assert_eq!(body["parameters"]["max_new_tokens"], 900);
        assert_eq!(body["model_id"], "ibm/granite-13b-chat-v2");
        assert_eq!(body["project_id"], "project");
    }

    #[test]
    fn test_missing_key_is_not_configured() {
        let err = TextGenerationClient::new(GeneratorConfig::default()).err().unwrap();
        assert!(matches!(err, GenerationError::NotConfigured(_)));
    }

    #[test]
    fn test_parse_response() {
        let body = r#"{"model_id":"m","results":[{"generated_text":"print(1)","stop_reason":"eos_token"}]}"#;
        assert_eq!(parse_generation_response(body).unwrap(), "print(1)");

        assert!(matches!(
            parse_generation_response(r#"{"results":[]}"#),
            Err(GenerationError::MalformedResponse(_))
        ));
        assert!(parse_generation_response("not json").is_err());
    }

    #[test]
    fn test_prompts_mention_configuration() {
        let prompt = circuit_prompt(2, "H 0; CX 0 1", VisualizationType::BlochSphere);
        assert!(prompt.contains("no of qubits: 2"));
        assert!(prompt.contains("H 0; CX 0 1"));
        assert!(prompt.contains("Bloch Sphere"));

        let prompt = algorithm_prompt(Algorithm::Grover, VisualizationType::StateCity);
        assert!(prompt.contains("Grover's Search Algorithm"));
    }
}
