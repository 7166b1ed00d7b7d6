//! Error types for the vitrine inspector

use thiserror::Error;

/// Main error type for the inspector
#[derive(Debug, Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Failed to load model '{key}': {reason}")]
    Load { key: String, reason: String },

    #[error("Unknown view preset: {0}")]
    UnknownView(String),

    #[error("Unknown projection mode: {0}")]
    UnknownProjection(String),

    #[error("Wipe direction {0} out of range (expected 0..=7)")]
    InvalidWipeDirection(u8),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Remote control error: {0}")]
    Remote(#[from] vitrine_remote::RemoteError),

    #[error("Runtime error: {0}")]
    Runtime(String),
}
