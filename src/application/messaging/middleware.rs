//! Middleware system for message processing pipeline

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use thiserror::Error;

use crate::application::errors::CommandError;
use crate::domain::entities::{Content, Message};

/// Context passed through middleware chain
#[derive(Debug, Clone)]
pub struct Context {
    pub message: Message,
    pub chat_id: String,
    pub user_id: Option<String>,
    pub data: HashMap<String, String>,
}

impl Context {
    pub fn new(message: Message) -> Self {
        let chat_id = message.chat_id.clone();
        let user_id = message.sender.as_ref().map(|u| u.id.clone());

        Self {
            message,
            chat_id,
            user_id,
            data: HashMap::new(),
        }
    }

    /// Get data from context
    pub fn get(&self, key: &str) -> Option<&String> {
        self.data.get(key)
    }

    /// Set data in context
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.data.insert(key.into(), value.into());
    }
}

/// Middleware trait - processors that can intercept and modify message handling
pub trait Middleware: Send + Sync {
    /// Process a message and optionally modify the context
    fn process(&self, ctx: Context, next: Next) -> MiddlewareResult;
}

/// Result of middleware processing
pub type MiddlewareResult = Result<Context, MiddlewareError>;

/// Terminal handler run after the last middleware
pub type Endpoint = Arc<dyn Fn(Context) -> MiddlewareResult + Send + Sync>;

/// Middleware errors
#[derive(Error, Debug, Clone)]
pub enum MiddlewareError {
    #[error("Rate limited, retry after {retry_after:?}")]
    RateLimited { retry_after: Duration },

    /// The command handler failed
    #[error(transparent)]
    Command(#[from] CommandError),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Next middleware in chain
#[derive(Clone)]
pub struct Next {
    chain: Arc<Vec<Arc<dyn Middleware>>>,
    index: usize,
    endpoint: Endpoint,
}

impl Next {
    pub fn new(chain: Arc<Vec<Arc<dyn Middleware>>>, endpoint: Endpoint) -> Self {
        Self { chain, index: 0, endpoint }
    }

    /// Process remaining middleware, then the endpoint
    pub fn run(self, ctx: Context) -> MiddlewareResult {
        match self.chain.get(self.index).cloned() {
            Some(current) => {
                let next = Next {
                    chain: Arc::clone(&self.chain),
                    index: self.index + 1,
                    endpoint: Arc::clone(&self.endpoint),
                };
                current.process(ctx, next)
            }
            None => (self.endpoint)(ctx),
        }
    }
}

/// Middleware chain builder
#[derive(Default)]
pub struct MiddlewareChain {
    middlewares: Vec<Arc<dyn Middleware>>,
}

impl MiddlewareChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add<M: Middleware + 'static>(mut self, middleware: M) -> Self {
        self.middlewares.push(Arc::new(middleware));
        self
    }

    pub fn build(self) -> Arc<Vec<Arc<dyn Middleware>>> {
        Arc::new(self.middlewares)
    }
}

/// Sliding-window rate limit per user, or per chat when the sender is unknown
pub struct RateLimitMiddleware {
    requests: Mutex<HashMap<String, Vec<Instant>>>,
    max_requests: u32,
    window: Duration,
}

impl RateLimitMiddleware {
    pub fn new(max_requests: u32, window_secs: u64) -> Self {
        Self {
            requests: Mutex::new(HashMap::new()),
            max_requests,
            window: Duration::from_secs(window_secs),
        }
    }

    fn check_rate_limit(&self, key: &str) -> Result<(), MiddlewareError> {
        let mut requests = self.requests.lock()
            .map_err(|_| MiddlewareError::Internal("Lock poisoned".to_string()))?;

        let now = Instant::now();

        // Remove old requests outside the window, and callers with none left
        requests.retain(|_, times| {
            times.retain(|&t| now.duration_since(t) < self.window);
            !times.is_empty()
        });

        let times = requests.entry(key.to_string()).or_default();
        if times.len() >= self.max_requests as usize {
            let retry_after = times.first()
                .map(|t| self.window.saturating_sub(now.duration_since(*t)))
                .unwrap_or(self.window);

            return Err(MiddlewareError::RateLimited { retry_after });
        }

        times.push(now);
        Ok(())
    }
}

impl Middleware for RateLimitMiddleware {
    fn process(&self, ctx: Context, next: Next) -> MiddlewareResult {
        let key = ctx.user_id.clone().unwrap_or_else(|| ctx.chat_id.clone());

        if let Err(e) = self.check_rate_limit(&key) {
            tracing::warn!("[{}] rate limited: {}", key, e);
            return Err(e);
        }

        next.run(ctx)
    }
}

/// Logs each command with its outcome
pub struct LoggingMiddleware;

impl Middleware for LoggingMiddleware {
    fn process(&self, ctx: Context, next: Next) -> MiddlewareResult {
        let verb = match &ctx.message.content {
            Content::Command { name, .. } => format!("/{}", name),
            _ => "[text]".to_string(),
        };
        let chat_id = ctx.chat_id.clone();
        let id = ctx.message.id.clone();
        let started = Instant::now();
        let queued_ms = (chrono::Utc::now() - ctx.message.timestamp).num_milliseconds();

        tracing::debug!(
            message_id = %id,
            platform = %ctx.message.platform,
            queued_ms,
            "[{}] {}",
            chat_id,
            verb
        );

        let result = next.run(ctx);

        match &result {
            Ok(_) => tracing::debug!(message_id = %id, "[{}] {} ok in {:?}", chat_id, verb, started.elapsed()),
            Err(e) => tracing::info!(message_id = %id, "[{}] {} failed: {}", chat_id, verb, e),
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::User;

    fn endpoint() -> Endpoint {
        Arc::new(|mut ctx: Context| -> MiddlewareResult {
            ctx.set("response", "done");
            Ok(ctx)
        })
    }

    fn context(user: &str) -> Context {
        Context::new(Message::from_command("chat", "hash", "abc").with_sender(Some(User::new(user))))
    }

    struct Tag(&'static str);

    impl Middleware for Tag {
        fn process(&self, mut ctx: Context, next: Next) -> MiddlewareResult {
            let trail = ctx.get("trail").cloned().unwrap_or_default();
            ctx.set("trail", format!("{}{}", trail, self.0));
            next.run(ctx)
        }
    }

    #[test]
    fn runs_middleware_in_order_then_endpoint() {
        let chain = MiddlewareChain::new().add(Tag("a")).add(Tag("b")).add(LoggingMiddleware).build();
        let ctx = Next::new(chain, endpoint()).run(context("1")).unwrap();
        assert_eq!(ctx.get("trail").map(String::as_str), Some("ab"));
        assert_eq!(ctx.get("response").map(String::as_str), Some("done"));
    }

    #[test]
    fn rate_limit_blocks_per_user() {
        let chain = MiddlewareChain::new().add(RateLimitMiddleware::new(2, 60)).build();
        let run = |user: &str| Next::new(Arc::clone(&chain), endpoint()).run(context(user));

        assert!(run("1").is_ok());
        assert!(run("1").is_ok());
        assert!(matches!(run("1"), Err(MiddlewareError::RateLimited { .. })));
        assert!(run("2").is_ok());
    }

    #[test]
    fn rate_limit_forgets_idle_callers() {
        let limiter = RateLimitMiddleware::new(5, 0);
        for user in ["1", "2", "3"] {
            limiter.check_rate_limit(user).unwrap();
        }
        // A zero window expires every entry on the next check
        assert_eq!(limiter.requests.lock().unwrap().len(), 1);
    }

    #[test]
    fn command_errors_pass_through_unchanged() {
        let failing: Endpoint = Arc::new(|_: Context| -> MiddlewareResult {
            Err(CommandError::InvalidCommand("nope".to_string()).into())
        });
        let chain = MiddlewareChain::new().add(LoggingMiddleware).build();
        let err = Next::new(chain, failing).run(context("1")).unwrap_err();
        assert!(matches!(err, MiddlewareError::Command(CommandError::InvalidCommand(_))));
    }
}
