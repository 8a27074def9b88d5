//! @ai:module:intent Run transcripts for completion queries
//! @ai:module:layer infrastructure
//! @ai:module:public_api RunRecord, list_transcripts
//! @ai:module:stateless true

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// @ai:intent Record of one completion run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunRecord {
    pub timestamp: DateTime<Utc>,
    pub mode: String,
    pub instruction: String,
    pub language: String,
    pub prompt: String,
    pub response: String,
}

impl RunRecord {
    /// @ai:intent Create a record stamped with the current time
    /// @ai:effects time
    pub fn new(
        mode: &str,
        instruction: &str,
        language: &str,
        prompt: &str,
        response: &str,
    ) -> Self {
        Self {
            timestamp: Utc::now(),
            mode: mode.to_string(),
            instruction: instruction.to_string(),
            language: language.to_string(),
            prompt: prompt.to_string(),
            response: response.to_string(),
        }
    }

    /// @ai:intent Save the record as pretty JSON in the transcripts directory
    /// @ai:post filename carries the timestamp and mode
    /// @ai:effects fs:write
    pub fn save(&self, dir: &Path) -> Result<PathBuf> {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create {}", dir.display()))?;

        let filename = format!("{}_{}.json", self.timestamp.format("%Y%m%d_%H%M%S"), self.mode);
        let path = dir.join(filename);

        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(&path, json)
            .with_context(|| format!("Failed to write transcript {}", path.display()))?;

        tracing::info!("Transcript saved to {}", path.display());
        Ok(path)
    }
}

/// @ai:intent List saved transcript files, oldest first
/// @ai:effects fs:read
pub fn list_transcripts(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.exists() {
        return Ok(Vec::new());
    }

    let mut paths = Vec::new();

    for entry in std::fs::read_dir(dir).with_context(|| format!("Failed to read {}", dir.display()))? {
        let path = entry?.path();

        if path.extension().and_then(|ext| ext.to_str()) == Some("json") {
            paths.push(path);
        }
    }

    paths.sort();
    Ok(paths)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn test_save_and_list_round_trips() {
        let dir = TempDir::new().unwrap();

        let record = RunRecord::new("explain", "blockBase", "rust", "the prompt", "the response");
        let path = record.save(dir.path()).unwrap();

        assert!(path.file_name().unwrap().to_str().unwrap().ends_with("_explain.json"));

        let listed = list_transcripts(dir.path()).unwrap();
        assert_eq!(listed, vec![path.clone()]);

        let loaded: RunRecord =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(loaded.mode, "explain");
        assert_eq!(loaded.instruction, "blockBase");
        assert_eq!(loaded.response, "the response");
    }

    #[test]
    fn test_list_missing_dir_is_empty() {
        let listed = list_transcripts(Path::new("/nonexistent/transcripts")).unwrap();
        assert!(listed.is_empty());
    }

    #[test]
    fn test_list_ignores_non_json() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("notes.txt"), "not a transcript").unwrap();

        let listed = list_transcripts(dir.path()).unwrap();
        assert!(listed.is_empty());
    }
}
