// OpenAI chat-completion wire format, restricted to what a single-shot text exchange needs

use bon::Builder;
use serde::{Deserialize, Serialize};

/// Conversation participant tags
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
    Assistant,
}

/// One entry of a conversation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Message {
    pub role: MessageRole,
    pub content: String,
}

impl Message {
    /// Create a system message
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::System,
            content: content.into(),
        }
    }

    /// Create a user message
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }

    /// Create an assistant message
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: content.into(),
        }
    }
}

/// Chat-completion request payload
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Builder)]
#[builder(builder_type(vis = "pub"), state_mod(vis = "pub"))]
pub struct ChatRequest {
    /// Messages in the conversation, in order
    #[builder(field)]
    pub messages: Vec<Message>,

    /// Model identifier
    #[builder(into)]
    pub model: String,

    /// Temperature for randomness (0.0 to 2.0)
    pub temperature: f32,

    /// Maximum tokens in response
    pub max_tokens: u32,
}

impl<S: chat_request_builder::State> ChatRequestBuilder<S> {
    /// Replace the conversation
    pub fn messages(mut self, messages: impl IntoIterator<Item = Message>) -> Self {
        self.messages = messages.into_iter().collect();
        self
    }

    /// Append a message
    pub fn message(mut self, message: Message) -> Self {
        self.messages.push(message);
        self
    }

    /// Append a system message
    pub fn system_message(mut self, content: impl Into<String>) -> Self {
        self.messages.push(Message::system(content));
        self
    }

    /// Append a user message
    pub fn user_message(mut self, content: impl Into<String>) -> Self {
        self.messages.push(Message::user(content));
        self
    }

    /// Append an assistant message
    pub fn assistant_message(mut self, content: impl Into<String>) -> Self {
        self.messages.push(Message::assistant(content));
        self
    }
}

/// Message as returned inside a choice; the service may omit either field
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct ResponseMessage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<MessageRole>,
    #[serde(default)]
    pub content: Option<String>,
}

/// Response choice structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Choice {
    pub message: ResponseMessage,
}

/// Chat-completion response envelope
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct ChatResponse {
    #[serde(default)]
    pub choices: Vec<Choice>,
}

impl ChatResponse {
    /// Content of the first choice, if the service produced one
    #[must_use]
    pub fn first_content(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|choice| choice.message.content.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn request_serializes_to_wire_shape() {
        let request = ChatRequest::builder()
            .model("openai/gpt-4o-mini")
            .system_message("be brief")
            .user_message("hi")
            .temperature(0.5)
            .max_tokens(64)
            .build();

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            json!({
                "messages": [
                    {"role": "system", "content": "be brief"},
                    {"role": "user", "content": "hi"}
                ],
                "model": "openai/gpt-4o-mini",
                "temperature": 0.5,
                "max_tokens": 64
            })
        );
    }

    #[test]
    fn missing_choices_deserialize_as_empty() {
        let response: ChatResponse = serde_json::from_value(json!({"id": "gen-1"})).unwrap();
        assert!(response.choices.is_empty());
        assert_eq!(response.first_content(), None);
    }

    #[test]
    fn first_content_ignores_extra_fields() {
        let response: ChatResponse = serde_json::from_value(json!({
            "id": "gen-1",
            "choices": [
                {"index": 0, "finish_reason": "stop", "message": {"role": "assistant", "content": "one"}},
                {"index": 1, "message": {"role": "assistant", "content": "two"}}
            ],
            "usage": {"prompt_tokens": 3, "completion_tokens": 1, "total_tokens": 4}
        }))
        .unwrap();
        assert_eq!(response.first_content(), Some("one"));
    }

    #[test]
    fn null_content_is_none() {
        let response: ChatResponse = serde_json::from_value(json!({
            "choices": [{"message": {"role": "assistant", "content": null}}]
        }))
        .unwrap();
        assert_eq!(response.first_content(), None);
    }
}
