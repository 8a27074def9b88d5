//! @ai:module:intent Explanation workflows composing window, prompt, and query
//! @ai:module:layer application
//! @ai:module:public_api Explainer, BlockExplanation, Walkthrough
//! @ai:module:stateless false

use crate::client::CompletionClientTrait;
use anyhow::{Context, Result};
use std::sync::Arc;
use uncoder_core::{
    build_window, find_code_blocks, generate_prompt, stop_sequences, CodeBlock, Instruction,
    PromptRequest, WindowConfig,
};

/// @ai:intent Explanation of a single highlighted block
#[derive(Debug, Clone)]
pub struct BlockExplanation {
    pub prompt: String,
    pub explanation: String,
}

/// @ai:intent Step-by-step walkthrough of a source document
#[derive(Debug, Clone)]
pub struct Walkthrough {
    pub prompt: String,
    pub response: String,
    pub steps: Vec<CodeBlock>,
}

/// @ai:intent Composes windowing, templating, querying, and parsing
pub struct Explainer<C: CompletionClientTrait> {
    client: Arc<C>,
    window: WindowConfig,
}

impl<C: CompletionClientTrait> Explainer<C> {
    /// @ai:intent Create a new explainer
    /// @ai:effects pure
    pub fn new(client: Arc<C>, window: WindowConfig) -> Self {
        Self { client, window }
    }

    /// @ai:intent Render the block-annotated prompt without querying
    /// @ai:pre block occurs verbatim in source
    /// @ai:effects pure
    pub fn block_prompt(&self, source: &str, block: &str, language: &str) -> Result<String> {
        let window = build_window(source, block, &self.window)
            .context("Failed to build source window")?;

        Ok(generate_prompt(&PromptRequest {
            input: window,
            instruction: Instruction::BlockBase,
            language: language.to_string(),
            block: block.to_string(),
        }))
    }

    /// @ai:intent Render the plain walkthrough prompt without querying
    /// @ai:effects pure
    pub fn plain_prompt(&self, source: &str, language: &str, instruction: Instruction) -> String {
        generate_prompt(&PromptRequest {
            input: source.to_string(),
            instruction,
            language: language.to_string(),
            block: String::new(),
        })
    }

    /// @ai:intent Explain one highlighted block of a source document
    /// @ai:effects network
    pub async fn explain_block(
        &self,
        source: &str,
        block: &str,
        language: &str,
    ) -> Result<BlockExplanation> {
        let prompt = self.block_prompt(source, block, language)?;

        tracing::info!("Querying completion API for block explanation");

        let response = self
            .client
            .complete(&prompt, stop_sequences(true))
            .await
            .context("Completion request failed")?;

        Ok(BlockExplanation {
            prompt,
            explanation: response.trim().to_string(),
        })
    }

    /// @ai:intent Walk through a source document block by block
    /// @ai:post the echo of the submitted source is not among the steps
    /// @ai:effects network
    pub async fn walkthrough(
        &self,
        source: &str,
        language: &str,
        instruction: Instruction,
    ) -> Result<Walkthrough> {
        let prompt = self.plain_prompt(source, language, instruction);

        tracing::info!("Querying completion API for walkthrough");

        let response = self
            .client
            .complete(&prompt, stop_sequences(false))
            .await
            .context("Completion request failed")?;

        // The stop sequence truncates before the stop text, so a response
        // ending at a model-closed fence has no trailing newline and its
        // final block would be lost to the end-of-input fence rule.
        let mut transcript = format!("{}{}", prompt, response);
        if !transcript.ends_with('\n') {
            transcript.push('\n');
        }

        let mut steps = find_code_blocks(&transcript);

        // The first block is the submitted source echoed by the prompt.
        if !steps.is_empty() {
            steps.remove(0);
        }

        Ok(Walkthrough {
            prompt,
            response,
            steps,
        })
    }
}
