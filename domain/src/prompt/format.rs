//! Response-format instruction
//!
//! The external CLI is a free-form text generator. Before the caller's
//! conversation is rendered, a synthetic `system` turn is prepended that
//! demands exactly one raw JSON object shaped like an OpenAI chat completion.
//! The same literal template is restated in every correction turn.

use crate::chat::entities::ChatMessage;
use crate::prompt::envelope::PromptEnvelope;
use serde_json::Value;

/// Required value of the envelope's `object` field.
pub const COMPLETION_OBJECT: &str = "chat.completion";

/// Required value of `choices[].finish_reason` in the template.
pub const STOP_REASON: &str = "stop";

/// Placeholder the CLI must replace with its real answer.
pub const ANSWER_PLACEHOLDER: &str = "<YOUR_ANSWER_HERE>";

/// Numeric counters required inside `usage`.
pub const USAGE_COUNTERS: [&str; 3] = ["prompt_tokens", "completion_tokens", "total_tokens"];

/// Fixed per-request values echoed into the response template.
///
/// Generated once per request and reused for every correction attempt so the
/// restated structure is identical each time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseTemplate {
    pub id: String,
    pub created: i64,
    pub model: String,
}

impl ResponseTemplate {
    pub fn new(id: impl Into<String>, created: i64, model: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            created,
            model: model.into(),
        }
    }

    /// The literal JSON template, with [`ANSWER_PLACEHOLDER`] as content.
    pub fn to_json(&self) -> String {
        format!(
            r#"{{
  "id": {id},
  "object": "{object}",
  "created": {created},
  "model": {model},
  "choices": [
    {{
      "index": 0,
      "message": {{
        "role": "assistant",
        "content": "{placeholder}"
      }},
      "finish_reason": "{stop}"
    }}
  ],
  "usage": {{
    "{prompt}": 0,
    "{completion}": 0,
    "{total}": 0
  }}
}}"#,
            id = Value::String(self.id.clone()),
            object = COMPLETION_OBJECT,
            created = self.created,
            model = Value::String(self.model.clone()),
            placeholder = ANSWER_PLACEHOLDER,
            stop = STOP_REASON,
            prompt = USAGE_COUNTERS[0],
            completion = USAGE_COUNTERS[1],
            total = USAGE_COUNTERS[2],
        )
    }

    /// Text of the synthetic system turn placed before the conversation.
    pub fn format_instruction(&self) -> String {
        format!(
            r#"You must reply with exactly one raw JSON object and nothing else.
Do not wrap it in markdown code fences. Do not write any text before or after it.

The JSON object must match this template exactly:

{template}

Replace {placeholder} with your complete answer to the conversation, encoded as a JSON string (escape quotes and newlines).
Keep "id", "object", "created", "model", "role" and "finish_reason" exactly as shown.
Set the three "usage" counters to integer estimates of the token counts."#,
            template = self.to_json(),
            placeholder = ANSWER_PLACEHOLDER,
        )
    }

    /// Text of the corrective user turn listing every violation.
    pub fn correction_message(&self, violations: &[String]) -> String {
        let mut message =
            String::from("Your previous reply did not match the required format. Problems found:\n");
        for violation in violations {
            message.push_str("- ");
            message.push_str(violation);
            message.push('\n');
        }
        message.push_str(&format!(
            r#"
Reply again with exactly one raw JSON object and nothing else, using this structure:

{template}

Replace {placeholder} with your complete answer."#,
            template = self.to_json(),
            placeholder = ANSWER_PLACEHOLDER,
        ));
        message
    }
}

/// Prepend the format instruction to a caller's conversation.
pub fn enforce_format(template: &ResponseTemplate, conversation: &[ChatMessage]) -> PromptEnvelope {
    PromptEnvelope::new(
        ChatMessage::system(template.format_instruction()),
        conversation,
    )
}
