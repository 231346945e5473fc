//! Conversation-to-text rendering

use crate::chat::entities::{ChatMessage, Role};

/// Trailing cue that makes the CLI continue the transcript as the assistant.
pub const ASSISTANT_CUE: &str = "Assistant: ";

/// Transcript label for a role, or `None` when the role is not rendered.
pub fn role_label(role: Role) -> Option<&'static str> {
    match role {
        Role::System => Some("System"),
        Role::User => Some("Human"),
        Role::Assistant => Some("Assistant"),
        // No transcript form for tool results yet; they are left out.
        Role::Tool => None,
    }
}

/// Flatten an ordered conversation into one text prompt.
///
/// Each rendered message becomes `"<Label>: <content>\n\n"`, followed by
/// a final [`ASSISTANT_CUE`].
///
/// # Examples
///
/// ```
/// use bridge_domain::{ChatMessage, build_prompt};
///
/// let prompt = build_prompt(&[ChatMessage::user("Hi")]);
/// assert_eq!(prompt, "Human: Hi\n\nAssistant: ");
/// ```
pub fn build_prompt(messages: &[ChatMessage]) -> String {
    let mut prompt = String::new();

    for message in messages {
        let Some(label) = role_label(message.role) else {
            continue;
        };
        prompt.push_str(label);
        prompt.push_str(": ");
        prompt.push_str(&message.content);
        prompt.push_str("\n\n");
    }

    prompt.push_str(ASSISTANT_CUE);
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_user_message() {
        assert_eq!(
            build_prompt(&[ChatMessage::user("Hi")]),
            "Human: Hi\n\nAssistant: "
        );
    }

    #[test]
    fn test_all_labels_in_order() {
        let prompt = build_prompt(&[
            ChatMessage::system("Be terse."),
            ChatMessage::user("2+2?"),
            ChatMessage::assistant("4"),
            ChatMessage::user("3+3?"),
        ]);
        assert_eq!(
            prompt,
            "System: Be terse.\n\nHuman: 2+2?\n\nAssistant: 4\n\nHuman: 3+3?\n\nAssistant: "
        );
    }

    #[test]
    fn test_tool_messages_are_omitted() {
        let prompt = build_prompt(&[
            ChatMessage::user("weather?"),
            ChatMessage::tool("{\"temp\": 21}"),
        ]);
        assert_eq!(prompt, "Human: weather?\n\nAssistant: ");
        assert!(role_label(Role::Tool).is_none());
    }

    #[test]
    fn test_empty_conversation_is_just_the_cue() {
        assert_eq!(build_prompt(&[]), ASSISTANT_CUE);
    }

    #[test]
    fn test_content_is_copied_verbatim() {
        let prompt = build_prompt(&[ChatMessage::user("it's $HOME `ls` \"quoted\"\nline two")]);
        assert!(prompt.contains("it's $HOME `ls` \"quoted\"\nline two"));
    }
}
