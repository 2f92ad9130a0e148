use super::User;
use chrono::{DateTime, Utc};

/// Message content
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Content {
    Text(String),
    /// A parsed command. `args` is the whitespace-split argument list used for
    /// arity checks; `input` is everything after the verb, untouched, so that
    /// hashing and ciphers see the user's exact text.
    Command {
        name: String,
        args: Vec<String>,
        input: String,
    },
}

impl Content {
    pub fn is_command(&self) -> bool {
        matches!(self, Content::Command { .. })
    }
}

/// Represents an incoming message
#[derive(Debug, Clone)]
pub struct Message {
    /// Correlates the log lines of one request
    pub id: String,
    pub chat_id: String,
    pub sender: Option<User>,
    pub content: Content,
    pub timestamp: DateTime<Utc>,
    pub platform: String,
}

impl Message {
    pub fn new(chat_id: impl Into<String>, content: Content) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            chat_id: chat_id.into(),
            sender: None,
            content,
            timestamp: Utc::now(),
            platform: "unknown".to_string(),
        }
    }

    pub fn from_text(chat_id: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(chat_id, Content::Text(text.into()))
    }

    pub fn from_command(chat_id: impl Into<String>, name: impl Into<String>, input: impl Into<String>) -> Self {
        let input = input.into();
        let args = input.split_whitespace().map(str::to_string).collect();
        Self::new(chat_id, Content::Command { name: name.into(), args, input })
    }

    pub fn with_sender(mut self, user: Option<User>) -> Self {
        self.sender = user;
        self
    }

    pub fn with_platform(mut self, platform: impl Into<String>) -> Self {
        self.platform = platform.into();
        self
    }

    /// Argument list and raw input if this is a command
    pub fn command_input(&self) -> Option<(&[String], &str)> {
        match &self.content {
            Content::Command { args, input, .. } => Some((args, input)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_command_splits_args_but_keeps_raw_input() {
        let msg = Message::from_command("1", "hash", "hello   world");
        let (args, input) = msg.command_input().unwrap();
        assert_eq!(args, ["hello", "world"]);
        assert_eq!(input, "hello   world");
        assert!(msg.content.is_command());
    }

    #[test]
    fn text_messages_are_not_commands() {
        let msg = Message::from_text("1", "just chatting").with_platform("console");
        assert!(msg.command_input().is_none());
        assert_eq!(msg.content, Content::Text("just chatting".to_string()));
        assert_eq!(msg.platform, "console");
    }

    #[test]
    fn every_message_gets_its_own_id() {
        let a = Message::from_text("1", "a");
        let b = Message::from_text("1", "a");
        assert_ne!(a.id, b.id);
        assert!(b.timestamp >= a.timestamp);
    }
}
