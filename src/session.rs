//! Session configuration and identity
//!
//! A [`SessionContext`] is owned by exactly one user session and passed
//! explicitly to each request. It holds the user's current configuration and
//! sign-in state; credentials are checked by an [`Authenticator`].

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::artifacts::{ViewAngles, VisualizationType};
use crate::error::{AuthError, ConfigError};
use crate::simulators::backend::DEFAULT_SHOTS;

/// Smallest register the user may request
pub const MIN_QUBITS: usize = 1;
/// Largest register the user may request
pub const MAX_QUBITS: usize = 5;

/// Per-session configuration consumed by the pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub qubit_count: usize,
    pub gate_operations: String,
    pub visualization: VisualizationType,
    /// Bloch camera elevation in degrees
    pub elevation: f64,
    /// Bloch camera azimuth in degrees
    pub azimuth: f64,
    pub shots: u64,
    /// Fixed sampling seed
    pub seed: Option<u64>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        let view = ViewAngles::default();
        Self {
            qubit_count: 2,
            gate_operations: String::new(),
            visualization: VisualizationType::ProbabilityAmplitude,
            elevation: view.elevation,
            azimuth: view.azimuth,
            shots: DEFAULT_SHOTS,
            seed: None,
        }
    }
}

impl SessionConfig {
    pub fn new(qubit_count: usize, gate_operations: impl Into<String>) -> Self {
        Self {
            qubit_count,
            gate_operations: gate_operations.into(),
            ..Self::default()
        }
    }

    pub fn with_visualization(mut self, visualization: VisualizationType) -> Self {
        self.visualization = visualization;
        self
    }

    pub fn with_view(mut self, elevation: f64, azimuth: f64) -> Self {
        self.elevation = elevation;
        self.azimuth = azimuth;
        self
    }

    pub fn with_shots(mut self, shots: u64) -> Self {
        self.shots = shots;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn view(&self) -> ViewAngles {
        ViewAngles {
            elevation: self.elevation,
            azimuth: self.azimuth,
        }
    }

    /// Check every field against the accepted ranges
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(MIN_QUBITS..=MAX_QUBITS).contains(&self.qubit_count) {
            return Err(ConfigError::QubitCount(self.qubit_count));
        }
        check_angle("elevation", self.elevation)?;
        check_angle("azimuth", self.azimuth)?;
        if self.shots == 0 {
            return Err(ConfigError::ZeroShots);
        }
        Ok(())
    }
}

fn check_angle(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if !(0.0..=360.0).contains(&value) {
        return Err(ConfigError::Angle { name, value });
    }
    Ok(())
}

/// Checks and records credentials
pub trait Authenticator {
    /// Register a new user
    fn register(&mut self, username: &str, password: &str) -> Result<(), AuthError>;

    /// Verify a username/password pair
    fn verify(&self, username: &str, password: &str) -> Result<(), AuthError>;
}

/// Process-local authenticator for development and tests
///
/// Nothing is persisted; restart the process and every account is gone.
#[derive(Debug, Default)]
pub struct InMemoryAuthenticator {
    users: HashMap<String, String>,
}

impl InMemoryAuthenticator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn user_count(&self) -> usize {
        self.users.len()
    }
}

impl Authenticator for InMemoryAuthenticator {
    fn register(&mut self, username: &str, password: &str) -> Result<(), AuthError> {
        if username.is_empty() || password.is_empty() {
            return Err(AuthError::MissingCredentials);
        }
        if self.users.contains_key(username) {
            return Err(AuthError::UserExists(username.to_string()));
        }
        self.users.insert(username.to_string(), password.to_string());
        Ok(())
    }

    fn verify(&self, username: &str, password: &str) -> Result<(), AuthError> {
        match self.users.get(username) {
            None => Err(AuthError::UnknownUser),
            Some(stored) if stored == password => Ok(()),
            Some(_) => Err(AuthError::IncorrectPassword),
        }
    }
}

/// Which sign-in form is being shown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuthScreen {
    Login,
    Signup,
}

/// Name shown for anonymous sessions
pub const GUEST_NAME: &str = "Guest";

/// Everything one user session owns
#[derive(Debug, Clone, PartialEq)]
pub struct SessionContext {
    pub config: SessionConfig,
    user: Option<String>,
    screen: Option<AuthScreen>,
}

impl Default for SessionContext {
    fn default() -> Self {
        Self::new(SessionConfig::default())
    }
}

impl SessionContext {
    pub fn new(config: SessionConfig) -> Self {
        Self {
            config,
            user: None,
            screen: None,
        }
    }

    pub fn is_logged_in(&self) -> bool {
        self.user.is_some()
    }

    /// Signed-in user name, or `Guest`
    pub fn display_name(&self) -> &str {
        self.user.as_deref().unwrap_or(GUEST_NAME)
    }

    pub fn active_screen(&self) -> Option<AuthScreen> {
        self.screen
    }

    pub fn show_screen(&mut self, screen: AuthScreen) {
        self.screen = Some(screen);
    }

    /// Register and sign in
    pub fn sign_up<A: Authenticator>(&mut self, auth: &mut A, username: &str, password: &str) -> Result<(), AuthError> {
        auth.register(username, password)?;
        self.sign_in_as(username);
        Ok(())
    }

    /// Sign in with existing credentials
    pub fn log_in<A: Authenticator>(&mut self, auth: &A, username: &str, password: &str) -> Result<(), AuthError> {
        auth.verify(username, password)?;
        self.sign_in_as(username);
        Ok(())
    }

    pub fn log_out(&mut self) {
        self.user = None;
        self.screen = None;
    }

    /// Fail unless a user is signed in
    pub fn require_login(&self) -> Result<&str, AuthError> {
        self.user.as_deref().ok_or(AuthError::NotLoggedIn)
    }

    fn sign_in_as(&mut self, username: &str) {
        self.user = Some(username.to_string());
        self.screen = None;
    }
}
