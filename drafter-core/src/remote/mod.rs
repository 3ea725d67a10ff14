pub mod bridge;
pub mod providers;

pub use bridge::try_remote_generate;
pub use providers::ChatCompletionProvider;

/// Common interface for remote text-generation endpoints.
#[async_trait::async_trait]
pub trait RemoteModel: Send + Sync + std::fmt::Debug {
    /// Human-readable provider name.
    fn name(&self) -> &str;

    /// The model ID being used.
    fn model_id(&self) -> &str;

    /// Send one system directive plus user prompt and return the generated text.
    async fn complete(&self, system: &str, prompt: &str) -> Result<String, crate::error::RemoteError>;
}

/// Pull the generated text out of a response body.
///
/// Understands chat-completion bodies (`choices[0].message.content`) and
/// generic `{"output": "..."}` bodies. Returns `None` when neither carries text.
pub fn extract_content(body: &serde_json::Value) -> Option<String> {
    let from_choices = body
        .get("choices")
        .and_then(|c| c.get(0))
        .and_then(|c| c.get("message"))
        .and_then(|m| m.get("content"))
        .and_then(serde_json::Value::as_str);

    let content = match from_choices {
        Some(text) => text,
        None => body.get("output").and_then(serde_json::Value::as_str)?,
    };

    if content.trim().is_empty() {
        None
    } else {
        Some(content.to_string())
    }
}

// ── Tests ───────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn content_from_chat_completion() {
        let body = json!({"choices": [{"message": {"role": "assistant", "content": "{\"a\":1}"}}]});
        assert_eq!(extract_content(&body).as_deref(), Some("{\"a\":1}"));
    }

    #[test]
    fn content_from_output_field() {
        let body = json!({"output": "hello"});
        assert_eq!(extract_content(&body).as_deref(), Some("hello"));
    }

    #[test]
    fn choices_win_over_output() {
        let body = json!({"choices": [{"message": {"content": "first"}}], "output": "second"});
        assert_eq!(extract_content(&body).as_deref(), Some("first"));
    }

    #[test]
    fn missing_or_blank_content_is_none() {
        assert!(extract_content(&json!({})).is_none());
        assert!(extract_content(&json!({"choices": []})).is_none());
        assert!(extract_content(&json!({"output": "  "})).is_none());
        assert!(extract_content(&json!({"output": 42})).is_none());
        assert!(extract_content(&json!([1, 2])).is_none());
    }
}
