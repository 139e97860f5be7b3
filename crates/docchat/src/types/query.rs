//! Request types

use serde::{Deserialize, Serialize};

use super::chat::{ChatTurn, Role};
use super::collection::CollectionId;

/// Upper bound on the output token budget a caller may request
pub const MAX_TOKENS_LIMIT: u32 = 8192;

/// Question about the indexed document (or a plain chat turn)
///
/// The question is taken from `question`, or else from the last `user`
/// turn in `messages`. Earlier turns are not forwarded.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AskRequest {
    /// The question to answer
    #[serde(default)]
    pub question: Option<String>,

    /// Chat transcript; only the last user turn is used
    #[serde(default)]
    pub messages: Vec<ChatTurn>,

    /// Collection returned by a previous index call (none: ungrounded chat)
    #[serde(default, alias = "collectionId")]
    pub collection_id: Option<CollectionId>,

    /// Instruction placed in the system turn
    #[serde(default, alias = "systemPrompt")]
    pub system_prompt: Option<String>,

    /// Output token budget
    #[serde(default, alias = "maxTokens")]
    pub max_tokens: Option<u32>,
}

impl AskRequest {
    /// Create a request with just a question
    pub fn new(question: impl Into<String>) -> Self {
        Self {
            question: Some(question.into()),
            ..Default::default()
        }
    }

    /// Builder: set collection
    pub fn with_collection(mut self, id: CollectionId) -> Self {
        self.collection_id = Some(id);
        self
    }

    /// Builder: set system prompt
    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(prompt.into());
        self
    }

    /// Builder: set max tokens
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// The question text, if any non-blank one was supplied
    pub fn question_text(&self) -> Option<&str> {
        if let Some(q) = self.question.as_deref().map(str::trim) {
            if !q.is_empty() {
                return Some(q);
            }
        }

        self.messages
            .iter()
            .rev()
            .find(|turn| turn.role == Role::User)
            .map(|turn| turn.content.trim())
            .filter(|q| !q.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_question_field_wins() {
        let mut req = AskRequest::new("What is X?");
        req.messages.push(ChatTurn::user("ignored"));
        assert_eq!(req.question_text(), Some("What is X?"));
    }

    #[test]
    fn test_last_user_message_used() {
        let req = AskRequest {
            messages: vec![
                ChatTurn::user("first"),
                ChatTurn::assistant("reply"),
                ChatTurn::user("  second  "),
                ChatTurn::assistant("trailing"),
            ],
            ..Default::default()
        };
        assert_eq!(req.question_text(), Some("second"));
    }

    #[test]
    fn test_blank_question_is_missing() {
        assert_eq!(AskRequest::new("   ").question_text(), None);
        assert_eq!(AskRequest::default().question_text(), None);
    }

    #[test]
    fn test_camel_case_aliases() {
        let req: AskRequest = serde_json::from_str(
            r#"{"question":"q","collectionId":"doc-123","systemPrompt":"be brief","maxTokens":64}"#,
        )
        .unwrap();
        assert_eq!(req.collection_id.unwrap().as_str(), "doc-123");
        assert_eq!(req.system_prompt.as_deref(), Some("be brief"));
        assert_eq!(req.max_tokens, Some(64));
    }

    #[test]
    fn test_messages_payload() {
        let req: AskRequest = serde_json::from_str(
            r#"{"messages":[{"role":"user","content":"Ciao?"}],"max_tokens":256,"system_prompt":"Sei utile."}"#,
        )
        .unwrap();
        assert_eq!(req.question_text(), Some("Ciao?"));
        assert_eq!(req.max_tokens, Some(256));
        assert!(req.collection_id.is_none());
    }
}
