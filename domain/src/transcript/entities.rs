//! Transcript domain entities

use serde::{Deserialize, Serialize};

/// Role of a message in a conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

/// Kind of payload carried by a [`Message`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    Text,
    Image,
}

/// Message payload: plain text or a reference to an inline binary payload
/// (a data URL or a path produced by the image generator).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "content_type", content = "content", rename_all = "lowercase")]
pub enum MessageContent {
    Text(String),
    Image(String),
}

impl MessageContent {
    pub fn content_type(&self) -> ContentType {
        match self {
            MessageContent::Text(_) => ContentType::Text,
            MessageContent::Image(_) => ContentType::Image,
        }
    }

    /// Returns the text if this is a text payload.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            MessageContent::Text(s) => Some(s),
            MessageContent::Image(_) => None,
        }
    }
}

/// A message in a conversation (Entity)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    #[serde(flatten)]
    pub content: MessageContent,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: MessageContent::Text(content.into()),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: MessageContent::Text(content.into()),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: MessageContent::Text(content.into()),
        }
    }

    /// Empty assistant message appended at stream start and filled by deltas.
    pub fn placeholder() -> Self {
        Self::assistant(String::new())
    }

    pub fn image(role: Role, reference: impl Into<String>) -> Self {
        Self {
            role,
            content: MessageContent::Image(reference.into()),
        }
    }

    pub fn content_type(&self) -> ContentType {
        self.content.content_type()
    }

    pub fn text(&self) -> Option<&str> {
        self.content.as_text()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholder_is_empty_assistant_text() {
        let msg = Message::placeholder();
        assert_eq!(msg.role, Role::Assistant);
        assert_eq!(msg.text(), Some(""));
        assert_eq!(msg.content_type(), ContentType::Text);
    }

    #[test]
    fn image_message_has_no_text() {
        let msg = Message::image(Role::Assistant, "data:image/png;base64,AAAA");
        assert_eq!(msg.content_type(), ContentType::Image);
        assert!(msg.text().is_none());
    }

    #[test]
    fn message_serializes_flat() {
        let json = serde_json::to_value(Message::user("hi")).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"role": "user", "content_type": "text", "content": "hi"})
        );
    }
}
