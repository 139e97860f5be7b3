//! Answer generation: prompt composition

pub mod prompt;

pub use prompt::{PromptComposer, CONTEXT_HEADER, PASSAGE_DELIMITER};
