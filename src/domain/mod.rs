//! Domain layer - Core business logic with no platform dependencies
//! 
//! This layer contains:
//! - Entities: Core business objects (User, Message, Command, cipher parameters)
//! - Traits: Abstractions for infrastructure (Bot)
//! - Transforms: The hash and cipher library

pub mod entities;
pub mod traits;
pub mod transforms;
