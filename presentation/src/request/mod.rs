//! Building a [`ChatRequest`] from command-line input
//!
//! A request comes either from a JSON document (`--request <path|->`) or
//! from the positional prompt plus an optional `--system` message.

use crate::cli::commands::{Cli, DEFAULT_MODEL};
use bridge_domain::{ChatMessage, ChatRequest};
use serde::Deserialize;
use std::io::Read;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RequestError {
    #[error("No prompt given. Pass a prompt or --request <path|->.")]
    Missing,

    #[error("Could not read request {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid request JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Request has no messages")]
    NoMessages,
}

/// Request document; `model` may be left to `--model` or the default.
#[derive(Debug, Deserialize)]
struct RequestDocument {
    #[serde(default)]
    model: Option<String>,
    messages: Vec<ChatMessage>,
}

/// Build the request described by `cli`.
pub fn read_request(cli: &Cli) -> Result<ChatRequest, RequestError> {
    if let Some(path) = &cli.request {
        let text = read_source(path)?;
        return parse_request(&text, cli.model.as_deref());
    }

    let prompt = cli.prompt.as_deref().ok_or(RequestError::Missing)?;
    let mut messages = Vec::with_capacity(2);
    if let Some(system) = &cli.system {
        messages.push(ChatMessage::system(system.as_str()));
    }
    messages.push(ChatMessage::user(prompt));

    let model = cli.model.as_deref().unwrap_or(DEFAULT_MODEL);
    Ok(ChatRequest::new(model, messages))
}

/// Parse a JSON request; `model_override` wins over the document's model.
pub fn parse_request(text: &str, model_override: Option<&str>) -> Result<ChatRequest, RequestError> {
    let document: RequestDocument = serde_json::from_str(text)?;
    if document.messages.is_empty() {
        return Err(RequestError::NoMessages);
    }

    let model = model_override
        .map(str::to_string)
        .or(document.model)
        .unwrap_or_else(|| DEFAULT_MODEL.to_string());
    Ok(ChatRequest::new(model, document.messages))
}

fn read_source(path: &Path) -> Result<String, RequestError> {
    let read_error = |source| RequestError::Read {
        path: path.display().to_string(),
        source,
    };

    if path == Path::new("-") {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .map_err(read_error)?;
        Ok(text)
    } else {
        std::fs::read_to_string(path).map_err(read_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bridge_domain::Role;
    use clap::Parser;
    use std::io::Write;

    #[test]
    fn test_prompt_becomes_user_message() {
        let cli = Cli::parse_from(["cli-bridge", "Hi"]);
        let request = read_request(&cli).unwrap();
        assert_eq!(request.model, DEFAULT_MODEL);
        assert_eq!(request.messages, vec![ChatMessage::user("Hi")]);
    }

    #[test]
    fn test_system_message_comes_first() {
        let cli = Cli::parse_from(["cli-bridge", "-m", "opus", "--system", "Be terse", "Hi"]);
        let request = read_request(&cli).unwrap();
        assert_eq!(request.model, "opus");
        assert_eq!(request.messages[0].role, Role::System);
        assert_eq!(request.messages[1], ChatMessage::user("Hi"));
    }

    #[test]
    fn test_missing_prompt() {
        let cli = Cli::parse_from(["cli-bridge"]);
        assert!(matches!(read_request(&cli), Err(RequestError::Missing)));
    }

    #[test]
    fn test_parse_request_document() {
        let text = r#"{
            "model": "haiku",
            "temperature": 0.2,
            "messages": [
                {"role": "system", "content": "You are helpful."},
                {"role": "user", "content": "Hi"},
                {"role": "tool", "content": "42"}
            ]
        }"#;
        let request = parse_request(text, None).unwrap();
        assert_eq!(request.model, "haiku");
        assert_eq!(request.messages.len(), 3);
        assert_eq!(request.count_role(Role::Tool), 1);
    }

    #[test]
    fn test_model_override_and_default() {
        let text = r#"{"model": "haiku", "messages": [{"role": "user", "content": "Hi"}]}"#;
        assert_eq!(parse_request(text, Some("opus")).unwrap().model, "opus");

        let text = r#"{"messages": [{"role": "user", "content": "Hi"}]}"#;
        assert_eq!(parse_request(text, None).unwrap().model, DEFAULT_MODEL);
    }

    #[test]
    fn test_rejects_bad_documents() {
        assert!(matches!(
            parse_request(r#"{"messages": []}"#, None),
            Err(RequestError::NoMessages)
        ));
        assert!(matches!(
            parse_request(r#"{"messages": [{"role": "developer", "content": "x"}]}"#, None),
            Err(RequestError::Parse(_))
        ));
        assert!(matches!(parse_request("not json", None), Err(RequestError::Parse(_))));
    }

    #[test]
    fn test_request_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"messages": [{{"role": "user", "content": "from file"}}]}}"#).unwrap();

        let path = file.path().to_str().unwrap().to_string();
        let cli = Cli::parse_from(["cli-bridge", "--request", path.as_str()]);
        let request = read_request(&cli).unwrap();
        assert_eq!(request.messages, vec![ChatMessage::user("from file")]);
    }
}
