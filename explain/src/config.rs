//! @ai:module:intent Configuration structs for the explain service
//! @ai:module:layer infrastructure
//! @ai:module:public_api ExplainConfig, ApiConfig, PathConfig
//! @ai:module:stateless true

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use uncoder_core::WindowConfig;

/// @ai:intent Main configuration for the explain service
/// @ai:effects pure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExplainConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub window: WindowConfig,
    #[serde(default)]
    pub paths: PathConfig,
}

/// @ai:intent Completion API configuration
/// @ai:effects pure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_api_url")]
    pub api_url: String,
    #[serde(default = "default_engine")]
    pub engine: String,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default)]
    pub temperature: f32,
    #[serde(default = "default_top_p")]
    pub top_p: f32,
    #[serde(default)]
    pub presence_penalty: f32,
    #[serde(default)]
    pub frequency_penalty: f32,
    #[serde(default = "default_best_of")]
    pub best_of: u32,
    #[serde(default = "default_n")]
    pub n: u32,
    #[serde(default = "default_rate_limit")]
    pub requests_per_minute: u32,
    /// When set, requests are routed through the explain proxy instead of
    /// the completion API directly.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proxy_url: Option<String>,
}

/// @ai:intent Path configuration for transcript output
/// @ai:effects pure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathConfig {
    #[serde(default = "default_transcripts_dir")]
    pub transcripts_dir: PathBuf,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            engine: default_engine(),
            max_tokens: default_max_tokens(),
            temperature: 0.0,
            top_p: default_top_p(),
            presence_penalty: 0.0,
            frequency_penalty: 0.0,
            best_of: default_best_of(),
            n: default_n(),
            requests_per_minute: default_rate_limit(),
            proxy_url: None,
        }
    }
}

impl Default for PathConfig {
    fn default() -> Self {
        Self {
            transcripts_dir: default_transcripts_dir(),
        }
    }
}

fn default_api_url() -> String {
    "https://api.openai.com/v1/engines".to_string()
}

fn default_engine() -> String {
    "davinci-codex".to_string()
}

fn default_max_tokens() -> u32 {
    300
}

fn default_top_p() -> f32 {
    1.0
}

fn default_best_of() -> u32 {
    1
}

fn default_n() -> u32 {
    1
}

fn default_rate_limit() -> u32 {
    60
}

fn default_transcripts_dir() -> PathBuf {
    PathBuf::from("transcripts")
}

impl ExplainConfig {
    /// @ai:intent Load configuration from a TOML file, defaults if absent
    /// @ai:effects fs:read
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config {}", path.display()))?;

        Ok(config)
    }

    /// @ai:intent Save configuration to a TOML file
    /// @ai:effects fs:write
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config {}", path.display()))?;
        Ok(())
    }
}
