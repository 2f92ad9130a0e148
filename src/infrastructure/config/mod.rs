//! Configuration management

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::application::commands::CommandSettings;
use crate::application::errors::ConfigError;
use crate::domain::transforms::cipher::DEFAULT_CAESAR_SHIFT;

/// Bot configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
    pub bot: BotConfig,
    #[serde(default)]
    pub security: SecurityConfig,
    #[serde(default)]
    pub transforms: TransformsConfig,
    #[serde(default)]
    pub adapters: AdaptersConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct BotConfig {
    pub name: String,
    pub prefix: String,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct SecurityConfig {
    pub rate_limit: RateLimitConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct RateLimitConfig {
    pub max_requests: u32,
    pub window_seconds: u64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: 20,
            window_seconds: 60,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct TransformsConfig {
    pub caesar_shift: i64,
    pub max_input_length: usize,
}

impl Default for TransformsConfig {
    fn default() -> Self {
        Self {
            caesar_shift: DEFAULT_CAESAR_SHIFT,
            max_input_length: 4096,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct AdaptersConfig {
    pub telegram: Option<TelegramConfig>,
    pub console: Option<ConsoleConfig>,
}

impl Default for AdaptersConfig {
    fn default() -> Self {
        Self {
            telegram: Some(TelegramConfig::default()),
            console: Some(ConsoleConfig { enabled: true }),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct TelegramConfig {
    pub enabled: bool,
    pub token: Option<String>,
    #[serde(default = "default_poll_timeout")]
    pub poll_timeout_seconds: u64,
}

fn default_poll_timeout() -> u64 {
    30
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            token: None,
            poll_timeout_seconds: default_poll_timeout(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct ConsoleConfig {
    pub enabled: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bot: BotConfig {
                name: "cipher-bot".to_string(),
                prefix: "/".to_string(),
            },
            security: SecurityConfig::default(),
            transforms: TransformsConfig::default(),
            adapters: AdaptersConfig::default(),
        }
    }
}

impl Config {
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let content = std::fs::read_to_string(&path)
            .map_err(|e| ConfigError::Parse(format!("Failed to read config: {}", e)))?;

        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_yaml::from_str(content)
            .map_err(|e| ConfigError::Parse(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        serde_yaml::to_string(self)
            .map_err(|e| ConfigError::Parse(format!("Failed to serialize config: {}", e)))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.bot.prefix.trim().is_empty() {
            return Err(ConfigError::MissingField("bot.prefix".to_string()));
        }
        if self.transforms.max_input_length == 0 {
            return Err(ConfigError::InvalidValue(
                "transforms.max-input-length must be greater than 0".to_string(),
            ));
        }
        if self.security.rate_limit.max_requests == 0 {
            return Err(ConfigError::InvalidValue(
                "security.rate-limit.max-requests must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    pub fn load_env() -> Self {
        let mut config = Config::default();
        config.apply_env();
        config
    }

    /// Overlay `BOT_TOKEN` / `TELEGRAM_BOT_TOKEN` and `BOT_PREFIX`
    pub fn apply_env(&mut self) {
        let token = std::env::var("BOT_TOKEN")
            .or_else(|_| std::env::var("TELEGRAM_BOT_TOKEN"))
            .ok();
        if let Some(token) = token {
            self.set_telegram_token(token);
        }

        if let Ok(prefix) = std::env::var("BOT_PREFIX") {
            if !prefix.trim().is_empty() {
                self.bot.prefix = prefix;
            }
        }
    }

    pub fn set_telegram_token(&mut self, token: impl Into<String>) {
        let telegram = self.adapters.telegram.get_or_insert_with(TelegramConfig::default);
        telegram.token = Some(token.into());
        telegram.enabled = true;
    }

    /// Token of an enabled Telegram adapter
    pub fn telegram_token(&self) -> Option<&str> {
        self.adapters.telegram
            .as_ref()
            .filter(|t| t.enabled)
            .and_then(|t| t.token.as_deref())
            .filter(|t| !t.is_empty())
    }

    pub fn command_settings(&self) -> CommandSettings {
        CommandSettings {
            bot_name: self.bot.name.clone(),
            caesar_shift: self.transforms.caesar_shift,
            max_input_length: self.transforms.max_input_length,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_survives_yaml_round_trip() {
        let yaml = Config::default().to_yaml().unwrap();
        assert!(yaml.contains("max-input-length: 4096"));
        let parsed = Config::from_yaml(&yaml).unwrap();
        assert_eq!(parsed.bot.prefix, "/");
        assert_eq!(parsed.transforms.caesar_shift, 3);
        assert_eq!(parsed.security.rate_limit.max_requests, 20);
    }

    #[test]
    fn missing_sections_fall_back_to_defaults() {
        let config = Config::from_yaml("bot:\n  name: vault\n  prefix: \"!\"\n").unwrap();
        assert_eq!(config.bot.name, "vault");
        assert_eq!(config.transforms.max_input_length, 4096);
        assert!(config.telegram_token().is_none());
        assert_eq!(config.command_settings().bot_name, "vault");
    }

    #[test]
    fn rejects_invalid_values() {
        let yaml = "bot:\n  name: x\n  prefix: /\ntransforms:\n  caesar-shift: 3\n  max-input-length: 0\n";
        assert!(matches!(Config::from_yaml(yaml), Err(ConfigError::InvalidValue(_))));
        assert!(matches!(Config::from_yaml("bot: ["), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn token_requires_enabled_adapter() {
        let mut config = Config::default();
        assert!(config.telegram_token().is_none());
        config.set_telegram_token("123:abc");
        assert_eq!(config.telegram_token(), Some("123:abc"));
        if let Some(tg) = config.adapters.telegram.as_mut() {
            tg.enabled = false;
        }
        assert!(config.telegram_token().is_none());
    }
}
