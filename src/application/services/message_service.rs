use crate::application::errors::BotError;
use crate::application::messaging::MessageDispatcher;
use crate::domain::entities::User;
use crate::domain::traits::Bot;

/// Service for processing messages: routes incoming text through the
/// dispatcher and sends the reply back over the bot adapter
pub struct MessageService<B: Bot> {
    bot: B,
    dispatcher: MessageDispatcher,
}

impl<B: Bot> MessageService<B> {
    pub fn new(bot: B, dispatcher: MessageDispatcher) -> Self {
        Self { bot, dispatcher }
    }

    pub fn bot(&self) -> &B {
        &self.bot
    }

    pub fn dispatcher(&self) -> &MessageDispatcher {
        &self.dispatcher
    }

    /// Process an incoming message and send the reply, if any.
    /// Returns the reply text that was sent.
    pub async fn process(&self, chat_id: &str, text: &str, sender: Option<User>) -> Result<Option<String>, BotError> {
        let Some(reply) = self.dispatcher.process_text(chat_id, text, sender) else {
            return Ok(None);
        };

        tracing::info!("Sending response to chat_id {}: {}", chat_id, preview(&reply));
        self.bot.send_message(chat_id, &reply).await?;
        Ok(Some(reply))
    }
}

/// First hundred characters, for logs
fn preview(text: &str) -> String {
    let mut out: String = text.chars().take(100).collect();
    if out.len() < text.len() {
        out.push('…');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preview_truncates_on_char_boundary() {
        let long = "é".repeat(150);
        let short = preview(&long);
        assert_eq!(short.chars().count(), 101);
        assert!(short.ends_with('…'));
        assert_eq!(preview("short"), "short");
    }
}
