//! Error type shared by the engine, its collaborators and the CLI harness.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AssistantError {
    #[error("Catalog query failed: {0}")]
    Catalog(String),

    #[error("Phrasing collaborator failed: {0}")]
    Phrasing(String),

    #[error("Phrasing collaborator timed out after {0}ms")]
    PhrasingTimeout(u64),

    #[error("Failed to read stdin: {0}")]
    StdinRead(#[from] io::Error),

    #[error("Failed to parse input JSON: {0}")]
    InputParse(#[from] serde_json::Error),

    #[error("Failed to serialize reply: {0}")]
    ReplySerialize(serde_json::Error),

    #[error("Failed to read {kind} from {path}: {source}")]
    FileRead {
        kind: &'static str,
        path: PathBuf,
        source: io::Error,
    },

    #[error("Failed to parse {kind}: {message}")]
    FileParse { kind: &'static str, message: String },

    #[error("{0} not found")]
    FileNotFound(PathBuf),

    #[error("Config or data directory not found")]
    NoConfigDir,

    #[error("Message is empty")]
    EmptyMessage,
}

impl AssistantError {
    /// True for failures that come from an external collaborator rather than local I/O.
    pub fn is_collaborator_failure(&self) -> bool {
        matches!(
            self,
            AssistantError::Catalog(_)
                | AssistantError::Phrasing(_)
                | AssistantError::PhrasingTimeout(_)
        )
    }
}
