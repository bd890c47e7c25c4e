//! Scenario providers: where the contact list for a new exercise comes from.

use std::path::PathBuf;

use thiserror::Error;

use tao_sim::scenario::{fallback_drill, ScenarioError, ScenarioSpec};

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("failed to read scenario file: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Scenario(#[from] ScenarioError),
}

/// Produces a fresh scenario each time an exercise starts.
pub trait ScenarioProvider: Send {
    fn generate(&mut self) -> Result<ScenarioSpec, ProviderError>;
}

/// Always hands out the built-in drill.
#[derive(Debug, Clone, Copy, Default)]
pub struct FallbackDrill;

impl ScenarioProvider for FallbackDrill {
    fn generate(&mut self) -> Result<ScenarioSpec, ProviderError> {
        Ok(fallback_drill())
    }
}

/// A scenario kept as JSON text, parsed on every start.
#[derive(Debug, Clone)]
pub struct JsonScenario {
    text: String,
}

impl JsonScenario {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

impl ScenarioProvider for JsonScenario {
    fn generate(&mut self) -> Result<ScenarioSpec, ProviderError> {
        Ok(ScenarioSpec::from_json(&self.text)?)
    }
}

/// A scenario read from disk on every start.
#[derive(Debug, Clone)]
pub struct ScenarioFile {
    path: PathBuf,
}

impl ScenarioFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ScenarioProvider for ScenarioFile {
    fn generate(&mut self) -> Result<ScenarioSpec, ProviderError> {
        let text = std::fs::read_to_string(&self.path)?;
        Ok(ScenarioSpec::from_json(&text)?)
    }
}
