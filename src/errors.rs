//! Typed error hierarchy for the Parley orchestrator.
//!
//! Three top-level enums cover the three subsystems:
//! - `EngineError` — interview engine step failures
//! - `StoreError` — checkpoint store lookup/creation failures
//! - `GenerationError` — text generator backend failures

use thiserror::Error;

/// Errors from a single engine step (`start` or `answer`).
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Answer text is empty or blank")]
    InvalidAnswer,

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Session {session_id} is not awaiting an answer")]
    NotAwaitingAnswer { session_id: String },

    #[error("Text generation failed: {0}")]
    Generation(#[from] GenerationError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Errors from the checkpoint store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Session {session_id} not found")]
    SessionNotFound { session_id: String },

    #[error("Session {session_id} already exists")]
    DuplicateSession { session_id: String },

    #[error("Failed to read checkpoint at {path}: {source}")]
    ReadFailed {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write checkpoint at {path}: {source}")]
    WriteFailed {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Corrupt checkpoint at {path}: {source}")]
    CorruptCheckpoint {
        path: std::path::PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Errors from a text generator backend.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("Failed to spawn generator process '{command}': {source}")]
    SpawnFailed {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Generator process exited with non-zero code {exit_code}")]
    NonZeroExit { exit_code: i32 },

    #[error("Generator backend request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Generator returned malformed output: {0}")]
    MalformedOutput(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
