use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use cipher_bot::application::commands::format::html_to_plain;
use cipher_bot::application::errors::{BotError, CommandError, ConfigError};
use cipher_bot::application::messaging::{LoggingMiddleware, MessageDispatcher, MiddlewareChain, RateLimitMiddleware};
use cipher_bot::application::services::{CommandService, MessageService};
use cipher_bot::domain::entities::{TransformResult, User};
use cipher_bot::domain::traits::Bot;
use cipher_bot::domain::transforms::hash::hash_reader;
use cipher_bot::domain::transforms::HashAlgorithm;
use cipher_bot::infrastructure::adapters::console::ConsoleAdapter;
use cipher_bot::infrastructure::adapters::telegram::TelegramAdapter;
use cipher_bot::infrastructure::config::Config;

#[derive(Parser)]
#[command(name = "cipher-bot")]
#[command(about = "A chat bot for hashing text and playing with classical ciphers", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path
    #[arg(short, long, default_value = "config.yaml")]
    config: PathBuf,

    /// Bot token (overrides config)
    #[arg(short, long)]
    token: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the bot
    Run,
    /// Run a single command line, e.g. `exec "/encrypt atbash hello"`
    Exec {
        text: String,
    },
    /// Hash a file
    HashFile {
        path: PathBuf,

        /// Algorithms to use
        #[arg(short, long, value_delimiter = ',', default_value = "md5,sha256")]
        algorithm: Vec<String>,
    },
    /// Show version
    Version,
    /// Generate default config
    InitConfig,
}

fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run => run_bot(&cli.config, cli.token),
        Commands::Exec { text } => exec(&cli.config, &text),
        Commands::HashFile { path, algorithm } => hash_file(&path, &algorithm),
        Commands::Version => {
            println!("cipher-bot v{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        Commands::InitConfig => init_config(),
    };

    if let Err(e) = result {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}

/// Config file if present, then environment, then the CLI token
fn load_config(path: &Path, token_override: Option<String>) -> Config {
    let mut config = if path.exists() {
        match Config::load(path) {
            Ok(mut config) => {
                config.apply_env();
                config
            }
            Err(e) => {
                tracing::warn!("Failed to load config: {}, using defaults", e);
                Config::load_env()
            }
        }
    } else {
        Config::load_env()
    };

    if let Some(token) = token_override {
        config.set_telegram_token(token);
    }
    config
}

fn build_dispatcher(config: &Config, platform: &str) -> MessageDispatcher {
    let mut commands = CommandService::new(config.bot.prefix.clone(), config.command_settings());
    commands.register_defaults();

    let limits = &config.security.rate_limit;
    MessageDispatcher::new(commands).with_platform(platform).with_middleware(
        MiddlewareChain::new()
            .add(LoggingMiddleware)
            .add(RateLimitMiddleware::new(limits.max_requests, limits.window_seconds)),
    )
}

fn run_bot(config_path: &Path, token_override: Option<String>) -> Result<(), BotError> {
    let config = load_config(config_path, token_override);
    tracing::info!("Starting cipher-bot: {}", config.bot.name);

    let rt = tokio::runtime::Runtime::new()?;

    if let Some(token) = config.telegram_token() {
        let bot = TelegramAdapter::new(token, config.bot.name.clone());
        let timeout = config.adapters.telegram.as_ref()
            .map(|t| t.poll_timeout_seconds)
            .unwrap_or(30);
        rt.block_on(run_telegram_bot(bot, build_dispatcher(&config, "telegram"), timeout))
    } else if config.adapters.console.as_ref().is_some_and(|c| c.enabled) {
        let bot = ConsoleAdapter::new(config.bot.name.clone());
        rt.block_on(run_console_bot(bot, build_dispatcher(&config, "console")))
    } else {
        Err(ConfigError::MissingField("adapters.telegram.token".to_string()).into())
    }
}

async fn run_telegram_bot(mut bot: TelegramAdapter, dispatcher: MessageDispatcher, timeout: u64) -> Result<(), BotError> {
    bot.fetch_bot_info().await?;

    let info = bot.bot_info();
    tracing::info!("Bot started: @{}", info.username);

    let dispatcher = dispatcher.with_bot_username(info.username);
    let service = MessageService::new(bot, dispatcher);
    service.bot().start().await?;

    let menu = service.dispatcher().commands().menu();
    if let Err(e) = service.bot().register_commands(&menu).await {
        tracing::warn!("Failed to register commands: {}", e);
    }

    let mut offset: i64 = 0;
    tracing::info!("Starting message loop...");

    loop {
        match service.bot().get_updates(offset, timeout).await {
            Ok(updates) => {
                for update in &updates {
                    let Some(message) = &update.message else { continue };
                    let Some(text) = message.text.as_deref() else { continue };

                    let chat_id = message.chat.id.to_string();
                    let sender = message.from.as_ref().map(User::from);

                    if let Err(e) = service.process(&chat_id, text, sender).await {
                        tracing::error!("Failed to handle update {}: {}", update.update_id, e);
                    }
                }

                offset = TelegramAdapter::get_next_offset(&updates, offset);
            }
            Err(e) => {
                tracing::error!("Failed to get updates: {}", e);
                tokio::time::sleep(tokio::time::Duration::from_secs(5)).await;
            }
        }
    }
}

async fn run_console_bot(bot: ConsoleAdapter, dispatcher: MessageDispatcher) -> Result<(), BotError> {
    let service = MessageService::new(bot, dispatcher);
    service.bot().start().await?;

    let sender = User::new("console").with_username(Some("console"));

    while let Some(line) = service.bot().read_line(">> ").await {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if let Err(e) = service.process("console", line, Some(sender.clone())).await {
            tracing::error!("Failed to handle input: {}", e);
        }
    }

    tracing::info!("Console closed");
    Ok(())
}

fn exec(config_path: &Path, text: &str) -> Result<(), BotError> {
    let config = load_config(config_path, None);
    let dispatcher = build_dispatcher(&config, "cli");

    match dispatcher.process_text("cli", text, None) {
        Some(reply) => println!("{}", html_to_plain(&reply)),
        None => println!("Not a command. Try \"{}help\".", config.bot.prefix),
    }
    Ok(())
}

fn hash_file(path: &Path, algorithms: &[String]) -> Result<(), BotError> {
    let algorithms = algorithms.iter()
        .map(|name| name.parse::<HashAlgorithm>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| CommandError::invalid_args(format!("{}. Choose from: {}", e, HashAlgorithm::names())))?;

    let file = std::fs::File::open(path)?;
    let digests = hash_reader(std::io::BufReader::new(file), &algorithms)?;

    println!("{}", path.display());
    println!("{}", TransformResult::Digests(digests));
    Ok(())
}

fn init_config() -> Result<(), BotError> {
    let yaml = Config::default().to_yaml()?;
    println!("{}", yaml);
    println!("\nSave this to config.yaml and adjust as needed.");
    Ok(())
}
