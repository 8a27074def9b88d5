//! @ai:module:intent Build a bounded source window around a highlighted block
//! @ai:module:layer domain
//! @ai:module:public_api WindowConfig, build_window
//! @ai:module:stateless true

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// @ai:intent Size limits for the source window fed to a prompt
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WindowConfig {
    #[serde(default = "default_window_size")]
    pub window_size: usize,
    #[serde(default = "default_suffix_size")]
    pub suffix_size: usize,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            window_size: default_window_size(),
            suffix_size: default_suffix_size(),
        }
    }
}

fn default_window_size() -> usize {
    200
}

fn default_suffix_size() -> usize {
    40
}

/// @ai:intent Slice a window of source lines that contains the highlighted block
/// @ai:pre block occurs verbatim in source_code
/// @ai:post sources of window_size lines or fewer are returned unchanged
/// @ai:post the window end sits about suffix_size lines past the block's end
/// @ai:effects pure
pub fn build_window(source_code: &str, block: &str, config: &WindowConfig) -> Result<String> {
    let lines: Vec<&str> = source_code.split('\n').collect();

    if lines.len() <= config.window_size {
        return Ok(source_code.to_string());
    }

    let offset = source_code.find(block).ok_or_else(|| Error::BlockNotFound {
        block: block_preview(block),
    })?;

    let start_line = line_number(source_code, offset);
    let end_line = line_number(source_code, offset + block.len());

    // Most of the budget goes to context before the block, with suffix_size
    // lines allowed after its end. The window never starts past the block's
    // own starting line.
    let biased = end_line as i64 - config.window_size as i64 + config.suffix_size as i64;
    let window_start = biased.min(start_line as i64).max(0) as usize;
    let window_end = (window_start + config.window_size).min(lines.len());

    Ok(lines[window_start..window_end].join("\n"))
}

/// @ai:intent 1-based line number of a byte offset
/// @ai:effects pure
fn line_number(source: &str, offset: usize) -> usize {
    source[..offset].matches('\n').count() + 1
}

/// @ai:intent Shorten a block for use in an error message
/// @ai:effects pure
fn block_preview(block: &str) -> String {
    const MAX_CHARS: usize = 80;

    if block.chars().count() <= MAX_CHARS {
        block.to_string()
    } else {
        let head: String = block.chars().take(MAX_CHARS).collect();
        format!("{}...", head)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbered_source(count: usize) -> String {
        (1..=count)
            .map(|i| format!("line {}", i))
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_small_source_returned_unchanged() {
        let source = numbered_source(200);
        let window = build_window(&source, "line 150", &WindowConfig::default()).unwrap();

        assert_eq!(window, source);
    }

    #[test]
    fn test_window_is_bounded_and_contains_block() {
        let source = numbered_source(300);
        let window = build_window(&source, "line 250\nline 251", &WindowConfig::default()).unwrap();

        let lines: Vec<&str> = window.split('\n').collect();
        assert_eq!(lines.len(), 200);
        // end_line 251, so the slice starts at index 251 - 200 + 40 = 91
        // and ends 40 lines past the block's end.
        assert_eq!(lines[0], "line 92");
        assert!(window.contains("line 250\nline 251"));
        assert_eq!(lines[199], "line 291");
    }

    #[test]
    fn test_block_near_top_clamps_window_start_to_zero() {
        let source = numbered_source(300);
        let window = build_window(&source, "line 5", &WindowConfig::default()).unwrap();

        let lines: Vec<&str> = window.split('\n').collect();
        assert_eq!(lines[0], "line 1");
        assert_eq!(lines.len(), 200);
        assert!(window.contains("line 5"));
    }

    #[test]
    fn test_block_near_end_truncates_window() {
        let source = numbered_source(220);
        let window = build_window(&source, "line 219", &WindowConfig::default()).unwrap();

        let lines: Vec<&str> = window.split('\n').collect();
        // Start 220 - 200 + 40 = 60, so only 160 lines remain past it.
        assert_eq!(lines[0], "line 60");
        assert_eq!(lines.len(), 161);
        assert_eq!(lines[160], "line 220");
    }

    #[test]
    fn test_long_block_starts_window_at_block() {
        let source = numbered_source(100);
        let block = (21..=31)
            .map(|i| format!("line {}", i))
            .collect::<Vec<_>>()
            .join("\n");
        let config = WindowConfig {
            window_size: 10,
            suffix_size: 4,
        };

        let window = build_window(&source, &block, &config).unwrap();

        let lines: Vec<&str> = window.split('\n').collect();
        assert_eq!(lines.len(), 10);
        // start_line 21 used directly as the slice start.
        assert_eq!(lines[0], "line 22");
    }

    #[test]
    fn test_missing_block_is_an_error() {
        let source = numbered_source(300);
        let result = build_window(&source, "not in the source", &WindowConfig::default());

        assert!(matches!(result, Err(Error::BlockNotFound { .. })));
    }

    #[test]
    fn test_missing_block_error_shortens_preview() {
        let source = numbered_source(300);
        let block = "x".repeat(200);
        let err = build_window(&source, &block, &WindowConfig::default()).unwrap_err();

        let message = err.to_string();
        assert!(message.contains("..."));
        assert!(message.len() < 200);
    }

    #[test]
    fn test_partial_config_defaults_apply() {
        let config: WindowConfig = serde_json::from_str("{\"window_size\": 50}").unwrap();

        assert_eq!(config.window_size, 50);
        assert_eq!(config.suffix_size, 40);
    }
}
