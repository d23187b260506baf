//! Grammar Correction Model Integration
//!
//! Routes raw utterances through an external correction model before glyph
//! mapping. The model is an untrusted black box: possibly slow, possibly
//! wrong, no guarantees beyond "returns some text or fails". Callers must
//! treat every error as recoverable.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, warn};

/// Interface to a text-correction model.
///
/// Abstracted so tests can substitute a deterministic stub.
#[async_trait]
pub trait GrammarModel: Send + Sync {
    /// Correct `text`, producing at most roughly `max_len` tokens of output.
    async fn correct(&self, text: &str, max_len: usize) -> Result<String>;
}

/// Ollama API response
#[derive(Debug, Deserialize)]
struct OllamaResponse {
    response: String,
}

/// Grammar correction backed by an Ollama-compatible generate endpoint
#[derive(Clone)]
pub struct OllamaGrammar {
    url: String,
    model: String,
    enabled: bool,
}

impl OllamaGrammar {
    /// Create new grammar client from config
    pub fn new(config: &crate::config::Config) -> Self {
        Self {
            url: config.grammar_url.clone(),
            model: config.grammar_model.clone(),
            enabled: config.grammar_enabled,
        }
    }

    /// Check if correction is enabled
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Health check - verify the model endpoint is reachable
    pub async fn health_check(&self) -> bool {
        if !self.enabled {
            return false;
        }

        let client = reqwest::Client::new();
        match client
            .get(format!("{}/api/tags", self.url))
            .timeout(std::time::Duration::from_secs(2))
            .send()
            .await
        {
            Ok(resp) => resp.status().is_success(),
            Err(_) => false,
        }
    }

    fn build_prompt(text: &str) -> String {
        format!(
            "Correct the grammar and spelling of the following text. \
             Respond with ONLY the corrected text, nothing else.\n\n\
             Text: \"{text}\"\n\nCorrected text:"
        )
    }
}

#[async_trait]
impl GrammarModel for OllamaGrammar {
    async fn correct(&self, text: &str, max_len: usize) -> Result<String> {
        if !self.enabled {
            return Ok(text.to_string());
        }

        let client = reqwest::Client::new();
        let response = client
            .post(format!("{}/api/generate", self.url))
            .json(&serde_json::json!({
                "model": self.model,
                "prompt": Self::build_prompt(text),
                "stream": false,
                "options": {
                    "temperature": 0.1,
                    "num_predict": max_len
                }
            }))
            .timeout(std::time::Duration::from_secs(10))
            .send()
            .await?;

        let status = response.status();
        let body_text = response.text().await?;

        if !status.is_success() {
            warn!("Grammar model error ({}): {}", status, body_text);
            return Err(anyhow!("grammar model returned {}", status));
        }

        debug!("Grammar model raw body: {}", body_text);

        let resp: OllamaResponse = serde_json::from_str(&body_text)
            .map_err(|e| anyhow!("failed to deserialize model response: {}", e))?;

        Ok(resp.response.trim().to_string())
    }
}
