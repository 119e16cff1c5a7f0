//! Text generation backends.
//!
//! The engine talks to its language model through the [`TextGenerator`]
//! trait: one prompt in, one block of generated text out, no state retained
//! between calls. Failures are surfaced as [`GenerationError`] and are fatal
//! to the current step; the engine never retries on its own.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::GenerationError;

/// A synchronous-per-call text generator. No retries, no caching.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError>;
}

/// Generator that shells out to an external LLM CLI.
///
/// The prompt is written to the child's stdin and the generated text is read
/// from its stdout. A non-zero exit code fails the step.
pub struct CommandGenerator {
    command: String,
    args: Vec<String>,
}

impl CommandGenerator {
    pub fn new(command: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            command: command.into(),
            args,
        }
    }
}

#[async_trait]
impl TextGenerator for CommandGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        let mut child = tokio::process::Command::new(&self.command)
            .args(&self.args)
            .stdin(std::process::Stdio::piped())
            .stdout(std::process::Stdio::piped())
            .stderr(std::process::Stdio::piped())
            .spawn()
            .map_err(|source| GenerationError::SpawnFailed {
                command: self.command.clone(),
                source,
            })?;

        if let Some(mut stdin) = child.stdin.take() {
            use tokio::io::AsyncWriteExt;
            stdin
                .write_all(prompt.as_bytes())
                .await
                .map_err(|source| GenerationError::SpawnFailed {
                    command: self.command.clone(),
                    source,
                })?;
            stdin
                .shutdown()
                .await
                .map_err(|source| GenerationError::SpawnFailed {
                    command: self.command.clone(),
                    source,
                })?;
        }

        let output = child
            .wait_with_output()
            .await
            .map_err(|source| GenerationError::SpawnFailed {
                command: self.command.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(GenerationError::NonZeroExit {
                exit_code: output.status.code().unwrap_or(-1),
            });
        }

        let text = String::from_utf8_lossy(&output.stdout).trim().to_string();
        debug!(command = %self.command, chars = text.len(), "command generator completed");
        if text.is_empty() {
            return Err(GenerationError::MalformedOutput(
                "generator produced no output".to_string(),
            ));
        }
        Ok(text)
    }
}

#[derive(Debug, Serialize)]
struct OllamaRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct OllamaResponse {
    #[serde(default)]
    response: String,
}

/// Generator backed by a local Ollama server's `/api/generate` endpoint.
pub struct OllamaGenerator {
    client: reqwest::Client,
    base_url: String,
    model: String,
}

impl OllamaGenerator {
    pub const DEFAULT_BASE_URL: &'static str = "http://localhost:11434";
    pub const DEFAULT_MODEL: &'static str = "llama3";

    pub fn new(base_url: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
        }
    }
}

impl Default for OllamaGenerator {
    fn default() -> Self {
        Self::new(Self::DEFAULT_BASE_URL, Self::DEFAULT_MODEL)
    }
}

#[async_trait]
impl TextGenerator for OllamaGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        let url = format!("{}/api/generate", self.base_url);
        let request = OllamaRequest {
            model: &self.model,
            prompt,
            stream: false,
        };

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await?
            .error_for_status()?;

        let body: OllamaResponse = response.json().await?;
        let text = body.response.trim().to_string();
        debug!(model = %self.model, chars = text.len(), "ollama generation completed");
        if text.is_empty() {
            return Err(GenerationError::MalformedOutput(
                "ollama returned an empty response".to_string(),
            ));
        }
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_command_generator_reads_stdout() {
        // `cat` echoes the prompt back, which is enough to verify the
        // stdin/stdout plumbing.
        let generator = CommandGenerator::new("cat", vec![]);
        let text = generator.generate("hello interviewer").await.unwrap();
        assert_eq!(text, "hello interviewer");
    }

    #[tokio::test]
    async fn test_command_generator_missing_binary_is_spawn_failure() {
        let generator = CommandGenerator::new("definitely-not-a-real-llm-cli", vec![]);
        let err = generator.generate("prompt").await.unwrap_err();
        assert!(matches!(err, GenerationError::SpawnFailed { .. }));
    }

    #[tokio::test]
    async fn test_command_generator_nonzero_exit_fails() {
        let generator = CommandGenerator::new("false", vec![]);
        let err = generator.generate("prompt").await.unwrap_err();
        assert!(matches!(err, GenerationError::NonZeroExit { .. }));
    }

    #[tokio::test]
    async fn test_command_generator_empty_output_is_malformed() {
        let generator = CommandGenerator::new("true", vec![]);
        let err = generator.generate("prompt").await.unwrap_err();
        assert!(matches!(err, GenerationError::MalformedOutput(_)));
    }

    #[test]
    fn test_ollama_request_wire_format() {
        let request = OllamaRequest {
            model: "llama3",
            prompt: "Ask a question",
            stream: false,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["model"], "llama3");
        assert_eq!(json["prompt"], "Ask a question");
        assert_eq!(json["stream"], false);
    }

    #[test]
    fn test_ollama_response_parses_response_field() {
        let body: OllamaResponse =
            serde_json::from_str(r#"{"model":"llama3","response":"What did you build?","done":true}"#)
                .unwrap();
        assert_eq!(body.response, "What did you build?");
    }

    #[test]
    fn test_ollama_base_url_trailing_slash_is_trimmed() {
        let generator = OllamaGenerator::new("http://localhost:11434/", "llama3");
        assert_eq!(generator.base_url, "http://localhost:11434");
    }
}
