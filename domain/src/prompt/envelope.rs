//! Prompt envelope: the transcript actually sent to the CLI

use crate::chat::entities::ChatMessage;
use crate::prompt::builder::build_prompt;

/// Ordered transcript sent to the CLI for one attempt.
///
/// Starts as the format instruction followed by the caller's messages.
/// Correction attempts never edit an envelope; [`with_correction`](Self::with_correction)
/// returns a new, longer one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptEnvelope {
    messages: Vec<ChatMessage>,
}

impl PromptEnvelope {
    /// Build an envelope with `instruction` placed before every caller message.
    pub fn new(instruction: ChatMessage, conversation: &[ChatMessage]) -> Self {
        let mut messages = Vec::with_capacity(conversation.len() + 1);
        messages.push(instruction);
        messages.extend_from_slice(conversation);
        Self { messages }
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Extend the transcript with a rejected reply and the corrective turn.
    pub fn with_correction(&self, invalid_output: &str, correction: impl Into<String>) -> Self {
        let mut messages = Vec::with_capacity(self.messages.len() + 2);
        messages.extend_from_slice(&self.messages);
        messages.push(ChatMessage::assistant(invalid_output));
        messages.push(ChatMessage::user(correction));
        Self { messages }
    }

    /// Render the transcript as the CLI prompt text.
    pub fn render(&self) -> String {
        build_prompt(&self.messages)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::entities::Role;

    #[test]
    fn test_instruction_is_prepended() {
        let envelope = PromptEnvelope::new(
            ChatMessage::system("FORMAT"),
            &[ChatMessage::system("caller"), ChatMessage::user("Hi")],
        );
        assert_eq!(envelope.len(), 3);
        assert_eq!(envelope.messages()[0].content, "FORMAT");
        assert_eq!(envelope.messages()[1].content, "caller");
    }

    #[test]
    fn test_with_correction_leaves_original_untouched() {
        let original = PromptEnvelope::new(ChatMessage::system("FORMAT"), &[ChatMessage::user("Hi")]);
        let extended = original.with_correction("not json", "fix it");

        assert_eq!(original.len(), 2);
        assert_eq!(extended.len(), 4);
        assert_eq!(extended.messages()[2].role, Role::Assistant);
        assert_eq!(extended.messages()[2].content, "not json");
        assert_eq!(extended.messages()[3].role, Role::User);
        assert_eq!(extended.messages()[3].content, "fix it");
    }

    #[test]
    fn test_render() {
        let envelope = PromptEnvelope::new(ChatMessage::system("F"), &[ChatMessage::user("Hi")]);
        assert_eq!(envelope.render(), "System: F\n\nHuman: Hi\n\nAssistant: ");
    }
}
