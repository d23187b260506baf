//! Speech Transcription
//!
//! Remote speech-to-text behind the Wyoming protocol (JSON events over TCP).
//! The core only consumes the resulting text string; recognition itself is
//! the remote service's problem.

pub mod wyoming;

use anyhow::Result;
use async_trait::async_trait;

pub use wyoming::WyomingClient;

/// Trait for speech-to-text backends
#[async_trait]
pub trait SpeechToText: Send + Sync {
    /// Transcribe 16kHz mono i16 samples into text.
    ///
    /// An empty transcript means the audio was unintelligible; errors mean
    /// the service itself failed.
    async fn transcribe(&self, samples: &[i16]) -> Result<String>;
}
