//! @ai:module:intent Extract fenced code blocks and trailing descriptions from markdown
//! @ai:module:layer domain
//! @ai:module:public_api CodeBlock, find_code_blocks
//! @ai:module:stateless true

use serde::{Deserialize, Serialize};

/// @ai:intent A fenced code block paired with the free text that follows it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeBlock {
    pub language: String,
    pub code: String,
    pub description: String,
}

const FENCE: &str = "```";

/// @ai:intent Find every fenced code block in document order
/// @ai:post blocks appear in the order their opening fences appear in input
/// @ai:post a dangling opening fence with no later close yields no block
/// @ai:effects pure
pub fn find_code_blocks(input: &str) -> Vec<CodeBlock> {
    let mut blocks = Vec::new();
    let mut pos = 0;

    while let Some(open) = find_fence(input, pos) {
        match scan_block(input, open) {
            Some((block, resume)) => {
                blocks.push(block);
                pos = resume;
            }
            // Rescan from the next byte: "````js" still opens a fence at
            // offset 1.
            None => pos = open + 1,
        }
    }

    blocks
}

/// @ai:intent Scan one block starting at an opening fence
/// @ai:pre input contains FENCE at byte offset open
/// @ai:effects pure
fn scan_block(input: &str, open: usize) -> Option<(CodeBlock, usize)> {
    let bytes = input.as_bytes();
    let tag_start = open + FENCE.len();
    let tag_end = word_run_end(bytes, tag_start);

    // The language tag must be followed by at least one newline.
    if tag_end >= bytes.len() || bytes[tag_end] != b'\n' {
        return None;
    }

    let lead_end = newline_run_end(bytes, tag_end);
    let close = find_closing_fence(input, tag_end, lead_end)?;

    // Code keeps everything between the newline runs that border the two
    // fences, including indentation and interior blank lines.
    let code = if close == lead_end {
        ""
    } else {
        &input[lead_end..newline_run_start(bytes, close)]
    };

    // The description runs from after the closing fence's newlines to the
    // next fence or the end of input, with trailing whitespace dropped.
    let desc_start = newline_run_end(bytes, close + FENCE.len());
    let desc_end = find_fence(input, desc_start).unwrap_or(input.len());
    let description = input[desc_start..desc_end].trim_end();

    let block = CodeBlock {
        language: input[tag_start..tag_end].to_string(),
        code: code.to_string(),
        description: description.to_string(),
    };

    Some((block, desc_end))
}

/// @ai:intent Locate the closing fence for a block opened before lead_end
/// @ai:pre lead_end > tag_end and bytes in [tag_end, lead_end) are newlines
/// @ai:effects pure
fn find_closing_fence(input: &str, tag_end: usize, lead_end: usize) -> Option<usize> {
    let bytes = input.as_bytes();
    let mut from = lead_end;

    while let Some(fence) = find_fence(input, from) {
        let preceded = if fence == lead_end {
            // A fence sitting directly after the opening newlines closes an
            // empty body, which needs one newline on each side of it.
            lead_end - tag_end >= 2
        } else {
            bytes[fence - 1] == b'\n'
        };

        // A closing fence at the very end of input closes nothing.
        let followed =
            fence + FENCE.len() < bytes.len() && bytes[fence + FENCE.len()] == b'\n';

        if preceded && followed {
            return Some(fence);
        }

        from = fence + 1;
    }

    None
}

/// @ai:intent Find the next fence delimiter at or after a byte offset
/// @ai:effects pure
fn find_fence(input: &str, from: usize) -> Option<usize> {
    input[from..].find(FENCE).map(|idx| from + idx)
}

/// @ai:intent End of the run of word characters starting at an offset
/// @ai:effects pure
fn word_run_end(bytes: &[u8], start: usize) -> usize {
    let mut idx = start;
    while idx < bytes.len() && (bytes[idx].is_ascii_alphanumeric() || bytes[idx] == b'_') {
        idx += 1;
    }
    idx
}

/// @ai:intent End of the run of newlines starting at an offset
/// @ai:effects pure
fn newline_run_end(bytes: &[u8], start: usize) -> usize {
    let mut idx = start;
    while idx < bytes.len() && bytes[idx] == b'\n' {
        idx += 1;
    }
    idx
}

/// @ai:intent Start of the run of newlines ending just before an offset
/// @ai:effects pure
fn newline_run_start(bytes: &[u8], end: usize) -> usize {
    let mut idx = end;
    while idx > 0 && bytes[idx - 1] == b'\n' {
        idx -= 1;
    }
    idx
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_multiple_blocks_with_descriptions() {
        let input = concat!(
            "\n# Title\n",
            "```typescript\n\nconst a = 1;\n\nconst b = 2;\n```\n\n",
            "description 1\ndescription 1.1\n\n",
            "```js\nconst a = 1;\n```\n",
            "```\nconst a = 1;\n```\n",
            "description 3\n  ",
        );

        let blocks = find_code_blocks(input);

        assert_eq!(blocks.len(), 3);

        assert_eq!(blocks[0].language, "typescript");
        assert_eq!(blocks[0].code, "const a = 1;\n\nconst b = 2;");
        assert_eq!(blocks[0].description, "description 1\ndescription 1.1");

        assert_eq!(blocks[1].language, "js");
        assert_eq!(blocks[1].code, "const a = 1;");
        assert_eq!(blocks[1].description, "");

        assert_eq!(blocks[2].language, "");
        assert_eq!(blocks[2].code, "const a = 1;");
        assert_eq!(blocks[2].description, "description 3");
    }

    #[test]
    fn test_no_fences_returns_empty() {
        assert!(find_code_blocks("").is_empty());
        assert!(find_code_blocks("just some prose\nwith lines\n").is_empty());
    }

    #[test]
    fn test_unterminated_fence_returns_empty() {
        let blocks = find_code_blocks("```rust\nlet x = 1;\n");
        assert!(blocks.is_empty());
    }

    #[test]
    fn test_closing_fence_at_end_of_input_closes_nothing() {
        let blocks = find_code_blocks("```rust\nlet x = 1;\n```");
        assert!(blocks.is_empty());
    }

    #[test]
    fn test_extra_backtick_still_opens_a_fence() {
        let blocks = find_code_blocks("````js\nlet a = 1;\n```\nnote\n");

        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].language, "js");
        assert_eq!(blocks[0].code, "let a = 1;");
        assert_eq!(blocks[0].description, "note");
    }

    #[test]
    fn test_single_newline_between_fences_is_no_block() {
        let blocks = find_code_blocks("```x\n```\nafter\n");
        assert!(blocks.is_empty());
    }

    #[test]
    fn test_blank_body_yields_empty_code() {
        let blocks = find_code_blocks("```py\n\n\n```\n\nafter\n");

        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].language, "py");
        assert_eq!(blocks[0].code, "");
        assert_eq!(blocks[0].description, "after");
    }

    #[test]
    fn test_adjacent_blocks_have_empty_description() {
        let blocks = find_code_blocks("```a\nx\n```\n```b\ny\n```\nend\n");

        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].description, "");
        assert_eq!(blocks[1].language, "b");
        assert_eq!(blocks[1].description, "end");
    }

    #[test]
    fn test_fence_without_surrounding_newlines_stays_in_code() {
        let blocks = find_code_blocks("```js\nlet a;\n```x\nmore\n```\nend\n");

        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].code, "let a;\n```x\nmore");
        assert_eq!(blocks[0].description, "end");
    }

    #[test]
    fn test_indentation_preserved() {
        let blocks = find_code_blocks("```rust\n    let x = 1;\n```\n\ndone\n");

        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].code, "    let x = 1;");
    }

    #[test]
    fn test_description_trailing_whitespace_trimmed() {
        let blocks = find_code_blocks("```c\nint x;\n```\nnote  \n\n");

        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].description, "note");
    }

    #[test]
    fn test_block_count_matches_closed_fences() {
        let input = "```a\nx\n```\n\n```b\ny\n```\n\n```c\ndangling\n";
        let blocks = find_code_blocks(input);

        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].language, "a");
        assert_eq!(blocks[1].language, "b");
    }
}
