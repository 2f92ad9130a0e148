use std::collections::HashMap;

use crate::application::errors::CommandError;
use crate::domain::entities::Message;

/// Represents a bot command
pub struct Command {
    pub name: String,
    pub description: Option<String>,
    pub aliases: Vec<String>,
    pub usage: Option<String>,
    pub handler: Option<CommandHandler>,
}

/// Command handler function type
pub type CommandHandler = Box<dyn Fn(&Message) -> Result<String, CommandError> + Send + Sync>;

impl Command {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            aliases: Vec::new(),
            usage: None,
            handler: None,
        }
    }

    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        self.description = Some(desc.into());
        self
    }

    pub fn with_aliases(mut self, aliases: &[&str]) -> Self {
        self.aliases = aliases.iter().map(|a| a.to_string()).collect();
        self
    }

    pub fn with_usage(mut self, usage: impl Into<String>) -> Self {
        self.usage = Some(usage.into());
        self
    }

    pub fn with_handler<F>(mut self, handler: F) -> Self
    where
        F: Fn(&Message) -> Result<String, CommandError> + Send + Sync + 'static,
    {
        self.handler = Some(Box::new(handler));
        self
    }

    pub fn matches(&self, input: &str) -> bool {
        self.name.eq_ignore_ascii_case(input)
            || self.aliases.iter().any(|a| a.eq_ignore_ascii_case(input))
    }
}

/// Command registry for managing available commands
#[derive(Default)]
pub struct CommandRegistry {
    commands: HashMap<String, Command>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, command: Command) {
        self.commands.insert(command.name.clone(), command);
    }

    pub fn get(&self, name: &str) -> Option<&Command> {
        self.commands.get(name)
    }

    /// Look up a command by name or alias, ignoring case
    pub fn find(&self, input: &str) -> Option<&Command> {
        self.commands.values().find(|c| c.matches(input))
    }

    /// All commands ordered by name
    pub fn all(&self) -> Vec<&Command> {
        let mut commands: Vec<&Command> = self.commands.values().collect();
        commands.sort_by(|a, b| a.name.cmp(&b.name));
        commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn find_matches_aliases_case_insensitively() {
        let mut registry = CommandRegistry::new();
        registry.register(Command::new("encrypt").with_aliases(&["cipher"]));
        registry.register(Command::new("decrypt").with_aliases(&["decipher"]));

        assert_eq!(registry.find("CIPHER").map(|c| c.name.as_str()), Some("encrypt"));
        assert_eq!(registry.find("Decrypt").map(|c| c.name.as_str()), Some("decrypt"));
        assert!(registry.find("encode").is_none());
        assert!(registry.get("cipher").is_none());
    }

    #[test]
    fn all_is_sorted_by_name() {
        let mut registry = CommandRegistry::new();
        for name in ["start", "hash", "algorithms"] {
            registry.register(Command::new(name));
        }
        let names: Vec<&str> = registry.all().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["algorithms", "hash", "start"]);
        assert_eq!(registry.len(), 3);
    }
}
