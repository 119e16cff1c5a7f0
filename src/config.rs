//! Runtime configuration for the CLI driver.
//!
//! Covers generator backend selection and the location of the session
//! checkpoint directory. The interview limits themselves live in the engine's
//! `StartRequest` and are frozen into each session checkpoint.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Result, bail};

use crate::generator::{CommandGenerator, OllamaGenerator, TextGenerator};

/// Environment variable naming the LLM CLI for the command backend.
pub const LLM_CMD_ENV: &str = "PARLEY_LLM_CMD";

/// Which text generation backend drives the interview.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    /// Local Ollama server (`/api/generate`).
    Ollama,
    /// External LLM CLI, prompt on stdin, text on stdout.
    Command,
}

impl std::str::FromStr for Backend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "ollama" => Ok(Backend::Ollama),
            "command" => Ok(Backend::Command),
            other => bail!("Unknown backend '{other}' (expected 'ollama' or 'command')"),
        }
    }
}

/// Settings for building the generator backend.
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    pub backend: Backend,
    pub base_url: String,
    pub model: String,
    pub command: String,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            backend: Backend::Ollama,
            base_url: OllamaGenerator::DEFAULT_BASE_URL.to_string(),
            model: OllamaGenerator::DEFAULT_MODEL.to_string(),
            command: std::env::var(LLM_CMD_ENV).unwrap_or_else(|_| "claude".to_string()),
        }
    }
}

impl GeneratorConfig {
    pub fn build(&self) -> Arc<dyn TextGenerator> {
        match self.backend {
            Backend::Ollama => Arc::new(OllamaGenerator::new(&self.base_url, &self.model)),
            Backend::Command => Arc::new(CommandGenerator::new(&self.command, vec![])),
        }
    }
}

/// Default directory for session checkpoints: `<data dir>/parley/sessions`.
pub fn default_state_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("parley")
        .join("sessions")
}
