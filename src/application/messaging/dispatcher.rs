//! Message dispatcher - Routes messages to handlers
//!
//! This is the boundary between the messaging front-end and the command
//! handlers: every outcome, including failures, leaves here as reply text.

use std::sync::Arc;

use crate::application::commands::format;
use crate::application::services::CommandService;
use crate::domain::entities::{Content, Message, User};
use super::parser::MessageParser;
use super::middleware::{Context, Endpoint, Middleware, MiddlewareChain, MiddlewareError, MiddlewareResult, Next};

const RESPONSE_KEY: &str = "response";

/// Message dispatcher - routes messages through middleware to handlers
pub struct MessageDispatcher {
    parser: MessageParser,
    middleware: Arc<Vec<Arc<dyn Middleware>>>,
    commands: Arc<CommandService>,
}

impl MessageDispatcher {
    pub fn new(commands: CommandService) -> Self {
        Self {
            parser: MessageParser::new(commands.prefix()),
            middleware: MiddlewareChain::new().build(),
            commands: Arc::new(commands),
        }
    }

    pub fn with_middleware(mut self, chain: MiddlewareChain) -> Self {
        self.middleware = chain.build();
        self
    }

    pub fn with_bot_username(mut self, username: impl Into<String>) -> Self {
        self.parser.set_bot_username(username);
        self
    }

    pub fn with_platform(mut self, platform: impl Into<String>) -> Self {
        self.parser.set_platform(platform);
        self
    }

    pub fn commands(&self) -> &CommandService {
        &self.commands
    }

    /// Parse and process raw text from a chat
    pub fn process_text(&self, chat_id: impl Into<String>, text: impl Into<String>, sender: Option<User>) -> Option<String> {
        let message = self.parser.parse(chat_id, text, sender);
        self.process(message)
    }

    /// Process a message through middleware and its command handler.
    /// Returns the reply, or `None` when the message is not a command.
    pub fn process(&self, message: Message) -> Option<String> {
        let Content::Command { name, .. } = &message.content else {
            return None;
        };
        let verb = name.clone();

        let commands = Arc::clone(&self.commands);
        let endpoint: Endpoint = Arc::new(move |mut ctx: Context| -> MiddlewareResult {
            if let Some(response) = commands.handle(&ctx.message)? {
                ctx.set(RESPONSE_KEY, response);
            }
            Ok(ctx)
        });

        let result = Next::new(Arc::clone(&self.middleware), endpoint).run(Context::new(message));

        Some(match result {
            Ok(ctx) => ctx.get(RESPONSE_KEY).cloned().unwrap_or_default(),
            Err(MiddlewareError::Command(e)) => format::error_reply(&e, self.commands.usage(&verb)),
            Err(MiddlewareError::RateLimited { retry_after }) => format!(
                "⏳ Too many requests. Please try again in {} seconds.",
                retry_after.as_secs().max(1)
            ),
            Err(MiddlewareError::Internal(msg)) => {
                tracing::error!("Internal error while handling /{}: {}", verb, msg);
                "❌ Something went wrong, please try again.".to_string()
            }
        })
    }
}
