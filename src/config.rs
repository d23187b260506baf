use anyhow::Result;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    // HTTP
    pub bind_host: String,
    pub bind_port: u16,

    // Assets
    pub asl_image_dir: String,

    // Grammar correction model
    pub grammar_enabled: bool,
    pub grammar_url: String,
    pub grammar_model: String,
    pub grammar_max_length: usize,

    // Speech recognition (Wyoming protocol)
    pub asr_host: String,
    pub asr_port: u16,

    // Meta
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_host: "0.0.0.0".to_string(),
            bind_port: 5000,
            asl_image_dir: dirs::data_dir()
                .unwrap_or_default()
                .join("fingerspell/asl")
                .to_string_lossy()
                .to_string(),
            grammar_enabled: true,
            grammar_url: "http://localhost:11434".to_string(),
            grammar_model: "llama2".to_string(),
            grammar_max_length: 150,
            asr_host: "localhost".to_string(),
            asr_port: 10301,
            log_level: "INFO".to_string(),
        }
    }
}

impl Config {
    /// Load config from file or create default
    pub fn load() -> Result<Self> {
        let config_path = config_path();

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            match serde_json::from_str(&content) {
                Ok(config) => Ok(config),
                Err(e) => {
                    // Graceful degradation: log warning and use defaults
                    tracing::warn!("Config file corrupted or invalid, using defaults: {}", e);
                    // Backup corrupt file for debugging
                    let backup_path = config_path.with_extension("json.corrupt");
                    let _ = std::fs::rename(&config_path, &backup_path);
                    Ok(Self::default())
                }
            }
        } else {
            Ok(Self::default())
        }
    }

    /// Asset directory as a path
    pub fn asl_image_path(&self) -> PathBuf {
        PathBuf::from(&self.asl_image_dir)
    }
}

pub fn config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("fingerspell")
        .join("config.json")
}
