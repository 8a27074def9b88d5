//! @ai:module:intent Uncoder core library for code-block extraction and prompt construction
//! @ai:module:layer infrastructure
//! @ai:module:public_api parse, prompt, window, extract, output, error
//! @ai:module:stateless true
//!
//! # Uncoder Core
//!
//! A library for extracting fenced code blocks from markdown text and for
//! building bounded, templated prompts for a text-completion API.
//!
//! ## Example
//!
//! ```rust
//! use uncoder_core::{find_code_blocks, generate_prompt, Instruction, PromptRequest};
//!
//! // Render a prompt for a completion API
//! let prompt = generate_prompt(&PromptRequest {
//!     input: "fn main() {}".to_string(),
//!     instruction: Instruction::Base,
//!     language: "rust".to_string(),
//!     block: String::new(),
//! });
//! assert!(prompt.contains("Breakdown of how the code block above works:"));
//!
//! // Parse the response that comes back
//! let blocks = find_code_blocks("```rust\nfn main() {}\n```\nentry point\n");
//! assert_eq!(blocks.len(), 1);
//! ```

pub mod error;
pub mod extract;
pub mod output;
pub mod parse;
pub mod prompt;
pub mod window;

pub use error::{Error, Result};
pub use extract::{extract_dir, extract_file, is_supported_file, ParsedDocument};
pub use output::{format_blocks, format_document, format_documents, OutputFormat};
pub use parse::{find_code_blocks, CodeBlock};
pub use prompt::{generate_prompt, stop_sequences, Instruction, PromptRequest};
pub use window::{build_window, WindowConfig};
