use std::collections::HashMap;
use std::sync::Arc;

use crate::application::commands::{cipher, format::escape_html, general, hash, CommandSettings};
use crate::application::errors::CommandError;
use crate::domain::entities::{Command, CommandRegistry, Content, Message, Operation};

/// Service for managing and executing commands
pub struct CommandService {
    registry: CommandRegistry,
    prefix: String,
    settings: Arc<CommandSettings>,
}

impl CommandService {
    pub fn new(prefix: impl Into<String>, settings: CommandSettings) -> Self {
        Self {
            registry: CommandRegistry::new(),
            prefix: prefix.into(),
            settings: Arc::new(settings),
        }
    }

    pub fn register(&mut self, command: Command) {
        self.registry.register(command);
    }

    /// Register the built-in command set, `/help` last so it can list the rest
    pub fn register_defaults(&mut self) {
        let settings = Arc::clone(&self.settings);
        self.register(Command::new("start")
            .with_description("Start the bot")
            .with_usage("/start")
            .with_handler(move |msg| general::handle_start(msg, &settings)));

        self.register(Command::new("algorithms")
            .with_description("List hash and cipher algorithms")
            .with_usage("/algorithms")
            .with_handler(general::handle_algorithms));

        let settings = Arc::clone(&self.settings);
        self.register(Command::new("hash")
            .with_description("Hash text with every supported algorithm")
            .with_usage(hash::HASH_USAGE)
            .with_handler(move |msg| hash::handle_hash(msg, &settings)));

        let settings = Arc::clone(&self.settings);
        self.register(Command::new("digest")
            .with_description("Hash text with one algorithm")
            .with_usage(hash::DIGEST_USAGE)
            .with_handler(move |msg| hash::handle_digest(msg, &settings)));

        let settings = Arc::clone(&self.settings);
        self.register(Command::new("encrypt")
            .with_description("Encrypt text with a classical cipher")
            .with_aliases(&["cipher"])
            .with_usage(cipher::ENCRYPT_USAGE)
            .with_handler(move |msg| cipher::handle_cipher(msg, Operation::Encrypt, &settings)));

        let settings = Arc::clone(&self.settings);
        self.register(Command::new("decrypt")
            .with_description("Decrypt text with a classical cipher")
            .with_aliases(&["decipher"])
            .with_usage(cipher::DECRYPT_USAGE)
            .with_handler(move |msg| cipher::handle_cipher(msg, Operation::Decrypt, &settings)));

        self.register_help();
    }

    /// Snapshot the current registry into a `/help` command. Commands
    /// registered afterwards are not listed.
    pub fn register_help(&mut self) {
        self.register(Command::new("help")
            .with_description("Show help message")
            .with_usage("/help [command]"));

        let overview = self.get_help(None);
        let details: HashMap<String, String> = self.registry.all()
            .into_iter()
            .flat_map(|cmd| {
                let text = self.get_help(Some(&cmd.name));
                std::iter::once(cmd.name.clone())
                    .chain(cmd.aliases.iter().cloned())
                    .map(move |name| (name.to_lowercase(), text.clone()))
            })
            .collect();

        self.register(Command::new("help")
            .with_description("Show help message")
            .with_usage("/help [command]")
            .with_handler(move |msg| {
                let topic = msg.command_input()
                    .and_then(|(args, _)| args.first())
                    .map(|t| t.trim_start_matches('/').to_lowercase());
                Ok(match topic {
                    Some(topic) => details.get(&topic).cloned().unwrap_or_else(|| {
                        format!("Command /{} not found", escape_html(&topic))
                    }),
                    None => overview.clone(),
                })
            }));
    }

    /// Run the handler for a command message. Non-command messages yield
    /// `Ok(None)`.
    pub fn handle(&self, message: &Message) -> Result<Option<String>, CommandError> {
        let Content::Command { name, .. } = &message.content else {
            return Ok(None);
        };

        let cmd = self.registry.find(name)
            .ok_or_else(|| CommandError::InvalidCommand(name.clone()))?;

        tracing::debug!("Executing /{} for chat {}", cmd.name, message.chat_id);
        match &cmd.handler {
            Some(handler) => Ok(Some(handler(message)?)),
            None => Err(CommandError::ExecutionFailed(format!("/{} is not implemented", cmd.name))),
        }
    }

    pub fn get_help(&self, command: Option<&str>) -> String {
        if let Some(name) = command {
            if let Some(cmd) = self.registry.find(name) {
                let mut help = format!("/{} - {}", cmd.name, escape_html(cmd.description.as_deref().unwrap_or("No description")));
                if !cmd.aliases.is_empty() {
                    let aliases: Vec<String> = cmd.aliases.iter().map(|a| format!("/{}", a)).collect();
                    help.push_str(&format!("\nAliases: {}", aliases.join(", ")));
                }
                if let Some(usage) = &cmd.usage {
                    help.push_str(&format!("\nUsage: <code>{}</code>", escape_html(usage)));
                }
                return help;
            }
            return format!("Command /{} not found", escape_html(name));
        }

        // List all commands
        let mut help = "🤖 <b>Available commands</b>\n".to_string();
        for cmd in self.registry.all() {
            help.push_str(&format!("  /{} - {}\n", cmd.name, escape_html(cmd.description.as_deref().unwrap_or(""))));
        }
        help.push_str("\nSend /help &lt;command&gt; for usage, /algorithms for the algorithm list.");
        help
    }

    /// Usage line of a command, looked up by name or alias
    pub fn usage(&self, name: &str) -> Option<&str> {
        self.registry.find(name).and_then(|cmd| cmd.usage.as_deref())
    }

    /// `(name, description)` pairs for platform command menus
    pub fn menu(&self) -> Vec<(String, String)> {
        self.registry.all()
            .into_iter()
            .map(|cmd| (cmd.name.clone(), cmd.description.clone().unwrap_or_default()))
            .collect()
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn settings(&self) -> &CommandSettings {
        &self.settings
    }
}
