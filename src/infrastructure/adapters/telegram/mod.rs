//! Telegram adapter

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::application::commands::format::html_to_plain;
use crate::application::errors::BotError;
use crate::domain::entities;
use crate::domain::traits::{Bot, BotInfo};

/// Telegram API base URL
const API_BASE: &str = "https://api.telegram.org";

/// Telegram rejects longer messages
const MAX_MESSAGE_LEN: usize = 4096;

/// Telegram update type
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Update {
    pub update_id: i64,
    pub message: Option<Message>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Message {
    pub message_id: i64,
    pub from: Option<User>,
    pub chat: Chat,
    pub text: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct User {
    pub id: i64,
    pub username: Option<String>,
    pub first_name: Option<String>,
}

impl From<&User> for entities::User {
    fn from(user: &User) -> Self {
        entities::User::new(user.id.to_string())
            .with_username(user.username.clone())
            .with_first_name(user.first_name.clone())
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Chat {
    pub id: i64,
}

/// Envelope of every Bot API response
#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    ok: bool,
    result: Option<T>,
    description: Option<String>,
}

impl<T> ApiResponse<T> {
    fn into_result(self, method: &str) -> Result<T, BotError> {
        match (self.ok, self.result) {
            (true, Some(result)) => Ok(result),
            _ => Err(BotError::Network(format!(
                "Telegram {} failed: {}",
                method,
                self.description.unwrap_or_else(|| "no description".to_string())
            ))),
        }
    }
}

/// Telegram bot adapter
pub struct TelegramAdapter {
    token: String,
    client: Client,
    info: BotInfo,
}

impl TelegramAdapter {
    pub fn new(token: impl Into<String>, name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            token: token.into(),
            client: Client::new(),
            info: BotInfo {
                id: "unknown".to_string(),
                username: name.replace('-', "_"),
                name,
            },
        }
    }

    /// Get the API URL for a method
    fn api_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", API_BASE, self.token, method)
    }

    async fn call<Req, Resp>(&self, method: &str, request: &Req) -> Result<Resp, BotError>
    where
        Req: Serialize + ?Sized,
        Resp: for<'de> Deserialize<'de>,
    {
        let response = self.client
            .post(self.api_url(method))
            .json(request)
            .send()
            .await
            .map_err(|e| BotError::Network(e.to_string()))?;

        let status = response.status();
        let body: ApiResponse<Resp> = response
            .json()
            .await
            .map_err(|e| BotError::Parse(format!("{} ({}): {}", method, status, e)))?;

        body.into_result(method)
    }

    /// Fetch bot info from Telegram API
    pub async fn fetch_bot_info(&mut self) -> Result<(), BotError> {
        #[derive(Deserialize)]
        struct BotInfoResponse {
            id: i64,
            first_name: String,
            username: String,
        }

        let me: BotInfoResponse = self.call("getMe", &serde_json::json!({})).await?;

        self.info = BotInfo {
            id: me.id.to_string(),
            name: me.first_name,
            username: me.username,
        };

        Ok(())
    }

    /// Get updates from Telegram using getUpdates API
    pub async fn get_updates(&self, offset: i64, timeout: u64) -> Result<Vec<Update>, BotError> {
        #[derive(Serialize)]
        struct GetUpdatesRequest {
            offset: i64,
            timeout: u64,
            allowed_updates: Vec<String>,
        }

        let request = GetUpdatesRequest {
            offset,
            timeout,
            allowed_updates: vec!["message".to_string()],
        };

        self.call("getUpdates", &request).await
    }

    /// Get the next update offset
    pub fn get_next_offset(updates: &[Update], current: i64) -> i64 {
        updates.iter()
            .map(|u| u.update_id + 1)
            .max()
            .unwrap_or(current)
    }

    /// Send a message via Telegram API - try HTML, fall back to plain text
    pub async fn send_message_api(&self, chat_id: &str, text: &str) -> Result<String, BotError> {
        let text = truncate(text, MAX_MESSAGE_LEN);
        match self.send_message_with_format(chat_id, &text, Some("HTML")).await {
            Ok(result) => Ok(result),
            Err(e) => {
                tracing::warn!("HTML rejected, using plain text: {}", e);
                let plain = truncate(&html_to_plain(&text), MAX_MESSAGE_LEN);
                self.send_message_with_format(chat_id, &plain, None).await
            }
        }
    }

    /// Send a message with specific parse mode
    pub async fn send_message_with_format(&self, chat_id: &str, text: &str, parse_mode: Option<&str>) -> Result<String, BotError> {
        #[derive(Serialize)]
        struct SendMessageRequest<'a> {
            chat_id: &'a str,
            text: &'a str,
            #[serde(skip_serializing_if = "Option::is_none")]
            parse_mode: Option<&'a str>,
        }

        #[derive(Deserialize)]
        struct MessageResult {
            message_id: i64,
        }

        let request = SendMessageRequest { chat_id, text, parse_mode };
        let result: MessageResult = self.call("sendMessage", &request).await?;

        Ok(result.message_id.to_string())
    }

    /// Register bot commands with Telegram
    pub async fn register_commands(&self, menu: &[(String, String)]) -> Result<(), BotError> {
        #[derive(Serialize)]
        struct Command<'a> {
            command: &'a str,
            description: &'a str,
        }

        #[derive(Serialize)]
        struct SetMyCommandsRequest<'a> {
            commands: Vec<Command<'a>>,
        }

        let request = SetMyCommandsRequest {
            commands: menu.iter()
                .map(|(command, description)| Command { command, description })
                .collect(),
        };

        let _: bool = self.call("setMyCommands", &request).await?;
        tracing::info!("Registered {} bot commands with Telegram", menu.len());
        Ok(())
    }

    /// Send chat action (typing, upload_photo, etc.)
    pub async fn send_chat_action(&self, chat_id: &str, action: &str) -> Result<(), BotError> {
        #[derive(Serialize)]
        struct SendChatActionRequest<'a> {
            chat_id: &'a str,
            action: &'a str,
        }

        let _: bool = self.call("sendChatAction", &SendChatActionRequest { chat_id, action }).await?;
        Ok(())
    }
}

/// Cut `text` to at most `max` characters
fn truncate(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((idx, _)) => text[..idx].to_string(),
        None => text.to_string(),
    }
}

#[async_trait]
impl Bot for TelegramAdapter {
    async fn start(&self) -> Result<(), BotError> {
        tracing::info!("Starting Telegram bot (token: {}...)", truncate(&self.token, 8));
        Ok(())
    }

    async fn send_message(&self, chat_id: &str, text: &str) -> Result<String, BotError> {
        tracing::debug!("Sending to {}: {}", chat_id, text);

        // Typing indicator is best effort
        let _ = self.send_chat_action(chat_id, "typing").await;

        match self.send_message_api(chat_id, text).await {
            Ok(msg_id) => Ok(msg_id),
            Err(e) => {
                tracing::error!("Failed to send message: {}", e);
                Err(e)
            }
        }
    }

    fn bot_info(&self) -> BotInfo {
        self.info.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_update_payload() {
        let json = r#"{
            "update_id": 41,
            "message": {
                "message_id": 7,
                "from": {"id": 99, "is_bot": false, "first_name": "Ada", "username": "ada"},
                "chat": {"id": -1001, "type": "group"},
                "date": 1700000000,
                "text": "/hash@cipher_bot hello"
            }
        }"#;
        let update: Update = serde_json::from_str(json).unwrap();
        let message = update.message.unwrap();
        assert_eq!(message.chat.id, -1001);
        assert_eq!(message.text.as_deref(), Some("/hash@cipher_bot hello"));

        let sender = entities::User::from(message.from.as_ref().unwrap());
        assert_eq!(sender.id, "99");
        assert_eq!(sender.display_name(), "Ada");
    }

    #[test]
    fn api_errors_carry_description() {
        let body: ApiResponse<bool> = serde_json::from_str(
            r#"{"ok": false, "error_code": 400, "description": "Bad Request: can't parse entities"}"#,
        ).unwrap();
        let err = body.into_result("sendMessage").unwrap_err();
        assert_eq!(err.to_string(), "Network error: Telegram sendMessage failed: Bad Request: can't parse entities");
    }

    #[test]
    fn next_offset_follows_highest_update() {
        let updates: Vec<Update> = serde_json::from_str(r#"[{"update_id": 5}, {"update_id": 9}]"#).unwrap();
        assert_eq!(TelegramAdapter::get_next_offset(&updates, 0), 10);
        assert_eq!(TelegramAdapter::get_next_offset(&[], 10), 10);
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        assert_eq!(truncate("héllo", 2), "hé");
        assert_eq!(truncate("hi", 10), "hi");
    }
}
