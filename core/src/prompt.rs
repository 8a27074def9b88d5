//! @ai:module:intent Prompt templates, instruction catalog, and substitution
//! @ai:module:layer domain
//! @ai:module:public_api Instruction, PromptRequest, generate_prompt, stop_sequences
//! @ai:module:stateless true

use clap::ValueEnum;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};

/// @ai:intent Closed catalog of instruction sentences inserted into prompts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "camelCase")]
pub enum Instruction {
    #[default]
    Base,
    Test,
    BlockBase,
}

impl Instruction {
    /// @ai:intent Get the instruction sentence inserted into the prompt
    /// @ai:effects pure
    pub fn text(&self) -> &'static str {
        match self {
            Instruction::Base => "Breakdown of how the code block above works:",
            Instruction::Test => "Now let's walk through the code to see what's going on:",
            Instruction::BlockBase => "Let's look at this block of code and see what it's doing:",
        }
    }

    /// @ai:intent Get the instruction identifier as used on the wire
    /// @ai:effects pure
    pub fn as_str(&self) -> &'static str {
        match self {
            Instruction::Base => "base",
            Instruction::Test => "test",
            Instruction::BlockBase => "blockBase",
        }
    }
}

/// @ai:intent Request to render a completion prompt
#[derive(Debug, Clone, Default)]
pub struct PromptRequest {
    pub input: String,
    pub instruction: Instruction,
    pub language: String,
    pub block: String,
}

// Template used when no block is highlighted. It ends on an open fence,
// inviting the completion to continue it.
const PLAIN_TEMPLATE: &str =
    "\n```{{LANGUAGE}}\n{{INPUT}}\n```\n\n{{INSTRUCTION}}\n\n```{{LANGUAGE}}\n";

// Template used when a block is highlighted. The block is echoed inside its
// own closed fence after the instruction.
const BLOCK_TEMPLATE: &str =
    "\n```{{LANGUAGE}}\n{{INPUT}}\n```\n\n{{INSTRUCTION}}\n\n```{{LANGUAGE}}\n{{BLOCK}}\n```\n";

const BLOCK_STOP: &[&str] = &["##", "```"];
const PLAIN_STOP: &[&str] = &["##"];

/// @ai:intent Render a fully substituted prompt for a completion API
/// @ai:post every placeholder occurrence is replaced; none remain in output
/// @ai:post placeholder tokens arriving inside values are emitted literally
/// @ai:effects pure
pub fn generate_prompt(request: &PromptRequest) -> String {
    let template = if request.block.is_empty() {
        PLAIN_TEMPLATE
    } else {
        BLOCK_TEMPLATE
    };

    // Single pass over the template: substituted values are never rescanned.
    let re = Regex::new(r"\{\{(LANGUAGE|INPUT|INSTRUCTION|BLOCK)\}\}").expect("Invalid regex");

    re.replace_all(template, |caps: &Captures| {
        match &caps[1] {
            "LANGUAGE" => request.language.as_str(),
            "INPUT" => request.input.as_str(),
            "INSTRUCTION" => request.instruction.text(),
            "BLOCK" => request.block.as_str(),
            _ => "",
        }
        .to_string()
    })
    .into_owned()
}

/// @ai:intent Stop sequences the caller must pass alongside a prompt
/// @ai:post fence stop is present exactly when a block was highlighted
/// @ai:effects pure
pub fn stop_sequences(has_block: bool) -> &'static [&'static str] {
    if has_block {
        BLOCK_STOP
    } else {
        PLAIN_STOP
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::find_code_blocks;

    #[test]
    fn test_plain_prompt_shape() {
        let prompt = generate_prompt(&PromptRequest {
            input: "const a = 1;".to_string(),
            instruction: Instruction::Base,
            language: "js".to_string(),
            block: String::new(),
        });

        assert_eq!(
            prompt,
            "\n```js\nconst a = 1;\n```\n\nBreakdown of how the code block above works:\n\n```js\n"
        );
    }

    #[test]
    fn test_block_prompt_echoes_block_once() {
        let prompt = generate_prompt(&PromptRequest {
            input: "let a = 1;\nlet b = a;".to_string(),
            instruction: Instruction::BlockBase,
            language: "rust".to_string(),
            block: "let b = a;".to_string(),
        });

        assert!(prompt.contains("Let's look at this block of code and see what it's doing:"));
        assert!(prompt.ends_with("```rust\nlet b = a;\n```\n"));
        // Beyond the occurrence inside the input echo.
        assert_eq!(prompt.matches("\nlet b = a;\n").count(), 2);
    }

    #[test]
    fn test_empty_block_selects_plain_template() {
        let prompt = generate_prompt(&PromptRequest {
            input: "x".to_string(),
            ..Default::default()
        });

        assert!(prompt.ends_with("```\n"));
        assert!(!prompt.contains("{{BLOCK}}"));
    }

    #[test]
    fn test_all_placeholder_occurrences_substituted() {
        let prompt = generate_prompt(&PromptRequest {
            input: "code".to_string(),
            instruction: Instruction::Test,
            language: "go".to_string(),
            block: String::new(),
        });

        // LANGUAGE appears twice in the plain template.
        assert_eq!(prompt.matches("```go").count(), 2);
        assert!(!prompt.contains("{{"));
    }

    #[test]
    fn test_placeholder_tokens_inside_values_stay_literal() {
        let prompt = generate_prompt(&PromptRequest {
            input: "uses {{INPUT}} literally".to_string(),
            instruction: Instruction::Base,
            language: "{{INSTRUCTION}}".to_string(),
            block: String::new(),
        });

        assert!(prompt.contains("uses {{INPUT}} literally"));
        assert_eq!(prompt.matches("{{INSTRUCTION}}").count(), 2);
        assert!(!prompt.contains("Now let's walk through"));
    }

    #[test]
    fn test_stop_sequences_policy() {
        assert_eq!(stop_sequences(true), &["##", "```"]);
        assert_eq!(stop_sequences(false), &["##"]);
    }

    #[test]
    fn test_prompt_round_trips_through_parser() {
        let prompt = generate_prompt(&PromptRequest {
            input: "fn main() {}".to_string(),
            instruction: Instruction::Base,
            language: "rust".to_string(),
            block: String::new(),
        });

        // Stub completion: continue the open fence, close it, add prose.
        let completion = "println!(\"hi\");\n```\n\nThat is the entry point.\n";
        let blocks = find_code_blocks(&format!("{}{}", prompt, completion));

        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].language, "rust");
        assert_eq!(blocks[0].code, "fn main() {}");
        assert_eq!(blocks[1].language, "rust");
        assert_eq!(blocks[1].description, "That is the entry point.");
    }

    #[test]
    fn test_instruction_wire_names() {
        assert_eq!(Instruction::Base.as_str(), "base");
        assert_eq!(Instruction::Test.as_str(), "test");
        assert_eq!(Instruction::BlockBase.as_str(), "blockBase");
    }
}
