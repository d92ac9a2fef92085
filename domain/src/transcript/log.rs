//! Ordered conversation log with the single mutation rule used while streaming.

use super::entities::{Message, MessageContent, Role};
use crate::core::error::DomainError;

/// Ordered list of conversation turns (Aggregate)
///
/// Earlier messages are immutable once appended. The only in-place edit is
/// [`set_last_assistant_content`](Self::set_last_assistant_content), which
/// rewrites the trailing assistant message and nothing else.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transcript {
    messages: Vec<Message>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_messages(messages: Vec<Message>) -> Self {
        Self { messages }
    }

    /// Append a message and return its index.
    pub fn push(&mut self, message: Message) -> usize {
        self.messages.push(message);
        self.messages.len() - 1
    }

    /// Rewrite the content of the trailing assistant message.
    ///
    /// Fails without touching anything if the last message is not an
    /// assistant message.
    pub fn set_last_assistant_content(&mut self, text: impl Into<String>) -> Result<(), DomainError> {
        match self.messages.last_mut() {
            Some(last) if last.role == Role::Assistant => {
                last.content = MessageContent::Text(text.into());
                Ok(())
            }
            _ => Err(DomainError::NoAssistantPlaceholder),
        }
    }

    /// Replace the whole log (e.g. after loading history).
    pub fn replace(&mut self, messages: Vec<Message>) {
        self.messages = messages;
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn last_index(&self) -> Option<usize> {
        self.messages.len().checked_sub(1)
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_returns_index() {
        let mut t = Transcript::new();
        assert_eq!(t.push(Message::user("a")), 0);
        assert_eq!(t.push(Message::placeholder()), 1);
        assert_eq!(t.last_index(), Some(1));
    }

    #[test]
    fn set_last_assistant_content_only_touches_last() {
        let mut t = Transcript::from_messages(vec![
            Message::assistant("earlier"),
            Message::user("question"),
            Message::placeholder(),
        ]);
        t.set_last_assistant_content("answer").unwrap();
        assert_eq!(t.messages()[0].text(), Some("earlier"));
        assert_eq!(t.last().unwrap().text(), Some("answer"));
    }

    #[test]
    fn set_last_assistant_content_rejects_user_tail() {
        let mut t = Transcript::from_messages(vec![Message::user("q")]);
        assert_eq!(
            t.set_last_assistant_content("x"),
            Err(DomainError::NoAssistantPlaceholder)
        );
        assert_eq!(t.last().unwrap().text(), Some("q"));
    }

    #[test]
    fn set_last_assistant_content_on_empty_fails() {
        let mut t = Transcript::new();
        assert!(t.set_last_assistant_content("x").is_err());
        assert!(t.is_empty());
    }
}
