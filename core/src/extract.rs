//! @ai:module:intent Batch code-block extraction over files and directories
//! @ai:module:layer application
//! @ai:module:public_api ParsedDocument, extract_file, extract_dir, is_supported_file
//! @ai:module:depends_on parse, error
//! @ai:module:stateless true

use crate::error::{Error, Result};
use crate::parse::{find_code_blocks, CodeBlock};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// @ai:intent A document paired with the code blocks extracted from it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParsedDocument {
    pub path: PathBuf,
    pub blocks: Vec<CodeBlock>,
}

const EXTENSIONS: &[&str] = &["md", "markdown", "txt"];

/// @ai:intent Check if a file should be parsed based on extension
/// @ai:effects pure
pub fn is_supported_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| EXTENSIONS.contains(&ext))
        .unwrap_or(false)
}

/// @ai:intent Extract all code blocks from a single document
/// @ai:pre path exists and is readable
/// @ai:effects fs:read
pub fn extract_file(path: &Path) -> Result<ParsedDocument> {
    let content = std::fs::read_to_string(path).map_err(|source| Error::FileRead {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(ParsedDocument {
        path: path.to_path_buf(),
        blocks: find_code_blocks(&content),
    })
}

/// @ai:intent Extract code blocks from every supported file under a directory
/// @ai:post documents are sorted by path
/// @ai:effects fs:read
pub fn extract_dir(path: &Path) -> Result<Vec<ParsedDocument>> {
    let mut documents = Vec::new();

    for entry in WalkDir::new(path) {
        let entry = entry.map_err(|e| Error::Io(e.into()))?;

        if entry.file_type().is_file() && is_supported_file(entry.path()) {
            documents.push(extract_file(entry.path())?);
        }
    }

    documents.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(documents)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_extract_file_finds_blocks() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("notes.md");
        std::fs::write(&path, "```rust\nlet x = 1;\n```\nbinds x\n").unwrap();

        let document = extract_file(&path).unwrap();

        assert_eq!(document.path, path);
        assert_eq!(document.blocks.len(), 1);
        assert_eq!(document.blocks[0].language, "rust");
        assert_eq!(document.blocks[0].description, "binds x");
    }

    #[test]
    fn test_extract_missing_file_reports_path() {
        let err = extract_file(Path::new("/nonexistent/notes.md")).unwrap_err();

        assert!(matches!(err, Error::FileRead { .. }));
        assert!(err.to_string().contains("notes.md"));
    }

    #[test]
    fn test_extract_dir_filters_and_sorts() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("b.md"), "```js\nb();\n```\n\n").unwrap();
        std::fs::write(dir.path().join("a.txt"), "```py\na()\n```\n\n").unwrap();
        std::fs::write(dir.path().join("skip.rs"), "fn main() {}").unwrap();

        let documents = extract_dir(dir.path()).unwrap();

        assert_eq!(documents.len(), 2);
        assert!(documents[0].path.ends_with("a.txt"));
        assert!(documents[1].path.ends_with("b.md"));
        assert_eq!(documents[0].blocks[0].language, "py");
    }

    #[test]
    fn test_extract_dir_recurses() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("sub");
        std::fs::create_dir(&nested).unwrap();
        std::fs::write(nested.join("deep.markdown"), "```\nx\n```\n\n").unwrap();

        let documents = extract_dir(dir.path()).unwrap();

        assert_eq!(documents.len(), 1);
        assert!(documents[0].path.ends_with("deep.markdown"));
    }

    #[test]
    fn test_supported_extensions() {
        assert!(is_supported_file(Path::new("a.md")));
        assert!(is_supported_file(Path::new("a.markdown")));
        assert!(is_supported_file(Path::new("a.txt")));
        assert!(!is_supported_file(Path::new("a.rs")));
        assert!(!is_supported_file(Path::new("noext")));
    }
}
