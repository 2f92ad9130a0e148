//! Command handlers - one module per family of bot commands

pub mod cipher;
pub mod format;
pub mod general;
pub mod hash;

use crate::application::errors::CommandError;
use crate::domain::entities::Message;
use crate::domain::transforms::cipher::DEFAULT_CAESAR_SHIFT;

/// Knobs the handlers read at call time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSettings {
    pub bot_name: String,
    pub caesar_shift: i64,
    /// Longest text, in characters, a single command may transform
    pub max_input_length: usize,
}

impl Default for CommandSettings {
    fn default() -> Self {
        Self {
            bot_name: "cipher-bot".to_string(),
            caesar_shift: DEFAULT_CAESAR_SHIFT,
            max_input_length: 4096,
        }
    }
}

impl CommandSettings {
    pub(crate) fn check_length(&self, text: &str) -> Result<(), CommandError> {
        let len = text.chars().count();
        if len > self.max_input_length {
            return Err(CommandError::invalid_args(format!(
                "input is {} characters, the limit is {}",
                len, self.max_input_length
            )));
        }
        Ok(())
    }
}

/// Raw argument text of a command message
pub(crate) fn command_input(message: &Message) -> Result<&str, CommandError> {
    message
        .command_input()
        .map(|(_, input)| input)
        .ok_or_else(|| CommandError::ExecutionFailed("not a command message".to_string()))
}

/// Split off the first whitespace-delimited token. The remainder keeps its
/// inner and trailing whitespace.
pub(crate) fn next_token(input: &str) -> Option<(&str, &str)> {
    let input = input.trim_start();
    if input.is_empty() {
        return None;
    }
    match input.find(char::is_whitespace) {
        Some(end) => Some((&input[..end], input[end..].trim_start())),
        None => Some((input, "")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_token_splits_once() {
        assert_eq!(next_token("  caesar  hello   world "), Some(("caesar", "hello   world ")));
        assert_eq!(next_token("rot13"), Some(("rot13", "")));
        assert_eq!(next_token("   "), None);
    }

    #[test]
    fn length_limit_counts_characters() {
        let settings = CommandSettings {
            max_input_length: 3,
            ..CommandSettings::default()
        };
        assert!(settings.check_length("äöü").is_ok());
        assert!(matches!(
            settings.check_length("abcd"),
            Err(CommandError::InvalidArguments(_))
        ));
    }
}
