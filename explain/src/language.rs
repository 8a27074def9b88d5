//! @ai:module:intent Map file extensions to prompt fence language tags
//! @ai:module:layer domain
//! @ai:module:public_api detect_language
//! @ai:module:stateless true

use std::path::Path;

/// @ai:intent Detect the fence language tag for a source file
/// @ai:post unknown or missing extensions yield the empty tag
/// @ai:example ("main.rs") -> "rust"
/// @ai:example ("notes.xyz") -> ""
/// @ai:effects pure
pub fn detect_language(path: &Path) -> &'static str {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("rs") => "rust",
        Some("py") => "python",
        Some("ts") => "typescript",
        Some("js") => "javascript",
        Some("go") => "go",
        Some("java") => "java",
        Some("c") | Some("h") => "c",
        Some("cpp") | Some("cc") | Some("hpp") => "cpp",
        _ => "",
    }
}
