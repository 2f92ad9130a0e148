//! cipher-bot: a chat bot that hashes text and runs classical ciphers.
//!
//! Layers follow the usual split: `domain` holds entities and the transform
//! library, `application` routes commands, and `infrastructure` talks to the
//! outside world.

pub mod domain;
pub mod application;
pub mod infrastructure;
