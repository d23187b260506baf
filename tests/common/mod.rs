//! Shared test harness
//!
//! Spawns the real axum app on an ephemeral port with mock collaborators
//! substituted for the grammar model and the speech recognizer.

use std::io::Cursor;
use std::sync::Arc;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use tempfile::TempDir;

use fingerspell::asr::SpeechToText;
use fingerspell::core::grammar::GrammarModel;
use fingerspell::core::Normalizer;
use fingerspell::glyphs::GlyphMapper;
use fingerspell::server::{self, AppState};

/// Grammar stub returning a fixed string
pub struct FixedGrammar(pub String);

#[async_trait]
impl GrammarModel for FixedGrammar {
    async fn correct(&self, _text: &str, _max_len: usize) -> Result<String> {
        Ok(self.0.clone())
    }
}

/// Grammar stub echoing the input unchanged
pub struct EchoGrammar;

#[async_trait]
impl GrammarModel for EchoGrammar {
    async fn correct(&self, text: &str, _max_len: usize) -> Result<String> {
        Ok(text.to_string())
    }
}

/// Grammar stub that always fails
pub struct FailingGrammar;

#[async_trait]
impl GrammarModel for FailingGrammar {
    async fn correct(&self, _text: &str, _max_len: usize) -> Result<String> {
        Err(anyhow!("model unavailable"))
    }
}

/// Speech stub: `Some(text)` transcribes to that text, `None` fails
pub struct MockSpeech(pub Option<String>);

#[async_trait]
impl SpeechToText for MockSpeech {
    async fn transcribe(&self, _samples: &[i16]) -> Result<String> {
        match &self.0 {
            Some(text) => Ok(text.clone()),
            None => Err(anyhow!("recognition service down")),
        }
    }
}

/// A running test server with its own asset directory
pub struct TestServer {
    pub base_url: String,
    // Held so the asset directory outlives the server
    _asset_dir: TempDir,
}

impl TestServer {
    /// Spawn the app with the given collaborators and image assets
    pub async fn spawn(
        grammar: Arc<dyn GrammarModel>,
        speech: Arc<dyn SpeechToText>,
        asset_chars: &[char],
    ) -> Self {
        let asset_dir = TempDir::new().expect("Failed to create asset dir");
        for ch in asset_chars {
            std::fs::write(asset_dir.path().join(format!("{ch}.jpg")), b"jpg")
                .expect("Failed to write asset");
        }

        let state = Arc::new(AppState {
            normalizer: Normalizer::new(grammar, 150),
            mapper: GlyphMapper::new(asset_dir.path().to_path_buf()),
            speech,
            asset_dir: asset_dir.path().to_path_buf(),
        });

        let app = server::router(state);
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("Failed to get local addr");

        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("Test server died");
        });

        Self {
            base_url: format!("http://{addr}"),
            _asset_dir: asset_dir,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

/// Valid in-memory WAV: 16kHz mono, 16-bit, `len` zero samples
pub fn wav_bytes(len: usize) -> Vec<u8> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: 16000,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer = hound::WavWriter::new(&mut cursor, spec).expect("Failed to write wav");
        for _ in 0..len {
            writer.write_sample(0i16).unwrap();
        }
        writer.finalize().unwrap();
    }
    cursor.into_inner()
}
