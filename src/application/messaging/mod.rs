//! Message handling - parsing, middleware and dispatch to command handlers

pub mod dispatcher;
pub mod middleware;
pub mod parser;

pub use dispatcher::MessageDispatcher;
pub use middleware::{LoggingMiddleware, Middleware, MiddlewareChain, RateLimitMiddleware};
pub use parser::MessageParser;
