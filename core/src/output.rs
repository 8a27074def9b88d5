//! @ai:module:intent Format extraction results for different formats (JSON, text)
//! @ai:module:layer infrastructure
//! @ai:module:public_api OutputFormat, format_blocks, format_document, format_documents
//! @ai:module:depends_on parse, extract
//! @ai:module:stateless true

use crate::extract::ParsedDocument;
use crate::parse::CodeBlock;
use colored::Colorize;

/// @ai:intent Output format options
#[derive(Debug, Clone, Copy, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    JsonPretty,
}

/// @ai:intent Format a list of code blocks as a string
/// @ai:effects pure
pub fn format_blocks(blocks: &[CodeBlock], format: OutputFormat) -> String {
    match format {
        OutputFormat::Json => serde_json::to_string(blocks).unwrap_or_default(),
        OutputFormat::JsonPretty => serde_json::to_string_pretty(blocks).unwrap_or_default(),
        OutputFormat::Text => format_blocks_text(blocks),
    }
}

/// @ai:intent Format code blocks as human-readable text
/// @ai:effects pure
fn format_blocks_text(blocks: &[CodeBlock]) -> String {
    let mut output = String::new();

    if blocks.is_empty() {
        output.push_str("No code blocks found\n");
        return output;
    }

    for (index, block) in blocks.iter().enumerate() {
        let language = if block.language.is_empty() {
            "(none)"
        } else {
            &block.language
        };

        output.push_str(&format!(
            "{} {}\n",
            format!("Block {}", index + 1).bold(),
            format!("[{}]", language).cyan()
        ));

        for line in block.code.lines() {
            output.push_str(&format!("    {}\n", line));
        }

        if !block.description.is_empty() {
            output.push_str(&format!("  {}\n", block.description.dimmed()));
        }

        output.push('\n');
    }

    output
}

/// @ai:intent Format one parsed document as a string
/// @ai:effects pure
pub fn format_document(document: &ParsedDocument, format: OutputFormat) -> String {
    match format {
        OutputFormat::Json => serde_json::to_string(document).unwrap_or_default(),
        OutputFormat::JsonPretty => serde_json::to_string_pretty(document).unwrap_or_default(),
        OutputFormat::Text => format_document_text(document),
    }
}

/// @ai:intent Format one parsed document as human-readable text
/// @ai:effects pure
fn format_document_text(document: &ParsedDocument) -> String {
    format!(
        "{} ({} blocks)\n\n{}",
        document.path.display().to_string().bold(),
        document.blocks.len(),
        format_blocks_text(&document.blocks)
    )
}

/// @ai:intent Format a batch of parsed documents as a string
/// @ai:effects pure
pub fn format_documents(documents: &[ParsedDocument], format: OutputFormat) -> String {
    match format {
        OutputFormat::Json => serde_json::to_string(documents).unwrap_or_default(),
        OutputFormat::JsonPretty => serde_json::to_string_pretty(documents).unwrap_or_default(),
        OutputFormat::Text => {
            let mut output = String::new();

            for document in documents {
                output.push_str(&format_document_text(document));
            }

            let total: usize = documents.iter().map(|d| d.blocks.len()).sum();
            output.push_str(&format!(
                "Parsed {} documents, {} blocks\n",
                documents.len(),
                total
            ));

            output
        }
    }
}
