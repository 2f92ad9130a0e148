//! Application layer - Use cases and business logic
//! 
//! This layer contains:
//! - Commands: bot command handlers and reply formatting
//! - Services: command registry and message processing
//! - Errors: Domain-specific errors
//! - Messaging: Message parsing, middleware, dispatching

pub mod commands;
pub mod errors;
pub mod services;
pub mod messaging;
