//! Wyoming Protocol Client
//!
//! Implements the Wyoming protocol for external ASR services.
//! Wyoming is a simple protocol where events are JSON lines over TCP.
//!
//! Reference: https://github.com/rhasspy/wyoming

use anyhow::{Context, Result};
use async_trait::async_trait;
use base64::Engine;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tracing::{debug, info, warn};

use crate::asr::SpeechToText;

/// Wyoming client for ASR services
pub struct WyomingClient {
    host: String,
    port: u16,
    sample_rate: u32,
}

impl WyomingClient {
    /// Create a new Wyoming client
    pub fn new(host: &str, port: u16) -> Self {
        Self {
            host: host.to_string(),
            port,
            sample_rate: crate::audio::TARGET_SAMPLE_RATE,
        }
    }

    /// Check if the server is available
    pub async fn health_check(&self) -> bool {
        match TcpStream::connect((&*self.host, self.port)).await {
            Ok(_) => {
                debug!("Wyoming server available at {}:{}", self.host, self.port);
                true
            }
            Err(e) => {
                warn!("Wyoming server not available: {}", e);
                false
            }
        }
    }

    async fn transcribe_bytes(&self, audio_data: &[u8]) -> Result<String> {
        let stream = TcpStream::connect((&*self.host, self.port))
            .await
            .context("Failed to connect to Wyoming server")?;

        let (reader, mut writer) = stream.into_split();
        let mut reader = BufReader::new(reader);

        // Send Describe (handshake)
        let describe = serde_json::json!({"type": "describe"});
        writer.write_all(describe.to_string().as_bytes()).await?;
        writer.write_all(b"\n").await?;
        writer.flush().await?;

        // Read Info response
        let mut line = String::new();
        reader.read_line(&mut line).await?;
        debug!("Wyoming handshake: {}", line.trim());

        // Send AudioStart
        let audio_start = serde_json::json!({
            "type": "audio-start",
            "data": {
                "rate": self.sample_rate,
                "width": 2,
                "channels": 1
            }
        });
        writer.write_all(audio_start.to_string().as_bytes()).await?;
        writer.write_all(b"\n").await?;

        // Send AudioChunk
        let audio_chunk = serde_json::json!({
            "type": "audio-chunk",
            "data": {
                "rate": self.sample_rate,
                "width": 2,
                "channels": 1,
                "audio": base64::engine::general_purpose::STANDARD.encode(audio_data),
                "timestamp": 0
            }
        });
        writer.write_all(audio_chunk.to_string().as_bytes()).await?;
        writer.write_all(b"\n").await?;

        // Send AudioStop
        let audio_stop = serde_json::json!({"type": "audio-stop"});
        writer.write_all(audio_stop.to_string().as_bytes()).await?;
        writer.write_all(b"\n").await?;
        writer.flush().await?;

        debug!(
            "Sent audio ({} bytes), waiting for transcript...",
            audio_data.len()
        );

        // Read Transcript response (with timeout)
        let timeout = Duration::from_secs(30);
        let transcript = tokio::time::timeout(timeout, async {
            loop {
                let mut line = String::new();
                if reader.read_line(&mut line).await? == 0 {
                    break;
                }

                if let Ok(event) = serde_json::from_str::<serde_json::Value>(&line) {
                    if event.get("type").and_then(|t| t.as_str()) == Some("transcript") {
                        if let Some(data) = event.get("data") {
                            if let Some(text) = data.get("text").and_then(|t| t.as_str()) {
                                return Ok::<_, anyhow::Error>(text.to_string());
                            }
                        }
                    }
                }
            }
            Ok(String::new())
        })
        .await
        .context("Timeout waiting for transcript")??;

        info!("Wyoming transcript: '{}'", transcript);
        Ok(transcript)
    }
}

#[async_trait]
impl SpeechToText for WyomingClient {
    async fn transcribe(&self, samples: &[i16]) -> Result<String> {
        let mut bytes = Vec::with_capacity(samples.len() * 2);
        for sample in samples {
            bytes.extend_from_slice(&sample.to_le_bytes());
        }
        self.transcribe_bytes(&bytes).await
    }
}
