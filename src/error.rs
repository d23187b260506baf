//! Fingerspell Error Types
//!
//! Centralized error handling. Each variant maps onto the HTTP error
//! taxonomy in the server layer; grammar-correction failures never reach
//! this type because the normalizer recovers them locally.

use thiserror::Error;

/// Central error type for Fingerspell
#[derive(Error, Debug)]
pub enum SpellError {
    #[error("No {0} provided")]
    MissingInput(&'static str),

    #[error("Audio format not supported: {0}")]
    UnsupportedAudio(String),

    #[error("Could not understand the audio. Please speak clearly.")]
    UnintelligibleAudio,

    #[error("Speech recognition service error: {0}")]
    Transcription(String),

    #[error("Audio processing failed: {0}")]
    Audio(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias for Fingerspell operations
pub type SpellResult<T> = Result<T, SpellError>;

impl SpellError {
    /// Whether this error is the caller's fault (HTTP 4xx) rather than ours
    pub fn is_client_fault(&self) -> bool {
        matches!(
            self,
            SpellError::MissingInput(_)
                | SpellError::UnsupportedAudio(_)
                | SpellError::UnintelligibleAudio
        )
    }
}
