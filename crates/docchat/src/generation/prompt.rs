//! Prompt composition for grounded answers

use crate::types::ChatTurn;

/// Placed between the caller's instruction and the retrieved passages
pub const CONTEXT_HEADER: &str =
    "\n\nUse the following context to formulate your answer:\n\nCONTEXT:\n";

/// Separates passages inside the context block
pub const PASSAGE_DELIMITER: &str = "\n---\n";

/// Builds the message list sent to the generation provider
pub struct PromptComposer;

impl PromptComposer {
    /// Compose `[system, user]` turns
    ///
    /// With passages, the system turn is the instruction followed by a
    /// CONTEXT block; without them it is the instruction unchanged.
    pub fn compose(system_prompt: &str, passages: &[String], question: &str) -> Vec<ChatTurn> {
        vec![
            ChatTurn::system(Self::system_content(system_prompt, passages)),
            ChatTurn::user(question),
        ]
    }

    fn system_content(system_prompt: &str, passages: &[String]) -> String {
        if passages.is_empty() {
            return system_prompt.to_string();
        }
        format!(
            "{}{}{}",
            system_prompt,
            CONTEXT_HEADER,
            passages.join(PASSAGE_DELIMITER)
        )
    }
}
