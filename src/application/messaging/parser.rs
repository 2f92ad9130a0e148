//! Message parser - Parses raw messages into structured messages

use crate::domain::entities::{Message, User};

/// Parses incoming text into command or plain-text messages
pub struct MessageParser {
    command_prefix: String,
    bot_username: Option<String>,
    platform: String,
}

impl MessageParser {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            command_prefix: prefix.into(),
            bot_username: None,
            platform: "unknown".to_string(),
        }
    }

    /// Commands addressed to another bot (`/hash@other_bot`) are treated as
    /// plain text once the username is known.
    pub fn with_bot_username(mut self, username: impl Into<String>) -> Self {
        self.bot_username = Some(username.into());
        self
    }

    pub fn set_bot_username(&mut self, username: impl Into<String>) {
        self.bot_username = Some(username.into());
    }

    /// Platform name stamped on every parsed message
    pub fn set_platform(&mut self, platform: impl Into<String>) {
        self.platform = platform.into();
    }

    /// Parse a text message
    pub fn parse(&self, chat_id: impl Into<String>, text: impl Into<String>, sender: Option<User>) -> Message {
        let text = text.into();
        let chat_id = chat_id.into();

        let message = match self.split_command(&text) {
            Some((name, input)) => Message::from_command(chat_id, name, input),
            None => Message::from_text(chat_id, text.clone()),
        };
        message.with_sender(sender).with_platform(self.platform.as_str())
    }

    /// Returns the verb and the raw argument text, or `None` for plain text
    fn split_command<'a>(&self, text: &'a str) -> Option<(&'a str, &'a str)> {
        let text = text.trim_start();
        let body = text
            .strip_prefix('/')
            .or_else(|| {
                if self.command_prefix.is_empty() {
                    None
                } else {
                    text.strip_prefix(self.command_prefix.as_str())
                }
            })?;

        let (verb, input) = match body.find(char::is_whitespace) {
            Some(end) => (&body[..end], body[end..].trim_start()),
            None => (body, ""),
        };

        let name = match verb.split_once('@') {
            Some((name, target)) => {
                if let Some(own) = &self.bot_username {
                    if !own.eq_ignore_ascii_case(target) {
                        return None;
                    }
                }
                name
            }
            None => verb,
        };

        if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return None;
        }
        Some((name, input))
    }
}
