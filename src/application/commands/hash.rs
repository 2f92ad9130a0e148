//! `/hash` and `/digest`

use crate::application::errors::CommandError;
use crate::domain::entities::{Message, TransformResult};
use crate::domain::transforms::hash::{self, HashAlgorithm};

use super::{command_input, format, next_token, CommandSettings};

pub const HASH_USAGE: &str = "/hash <text>";
pub const DIGEST_USAGE: &str = "/digest <algorithm> <text>";

/// Every supported digest of the text after the verb
pub fn handle_hash(message: &Message, settings: &CommandSettings) -> Result<String, CommandError> {
    let text = command_input(message)?;
    if text.trim().is_empty() {
        return Err(CommandError::invalid_args("please provide text to hash"));
    }
    settings.check_length(text)?;

    tracing::debug!(chars = text.chars().count(), "hashing with all algorithms");
    let result = TransformResult::Digests(hash::hash_all(text.as_bytes()));
    Ok(format::hash_reply(text, &result))
}

/// A single digest chosen by name
pub fn handle_digest(message: &Message, settings: &CommandSettings) -> Result<String, CommandError> {
    let input = command_input(message)?;
    let (name, text) = next_token(input)
        .ok_or_else(|| CommandError::invalid_args("please choose a hash algorithm"))?;
    let algorithm: HashAlgorithm = name.parse().map_err(|e| {
        CommandError::invalid_args(format!("{}. Available: {}", e, HashAlgorithm::names()))
    })?;
    if text.trim().is_empty() {
        return Err(CommandError::invalid_args("please provide text to hash"));
    }
    settings.check_length(text)?;

    let result = TransformResult::Digests(vec![algorithm.digest(text.as_bytes())]);
    Ok(format::hash_reply(text, &result))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(
        handler: fn(&Message, &CommandSettings) -> Result<String, CommandError>,
        input: &str,
    ) -> Result<String, CommandError> {
        handler(&Message::from_command("1", "hash", input), &CommandSettings::default())
    }

    #[test]
    fn hash_lists_every_algorithm() {
        let reply = run(handle_hash, "abc").unwrap();
        for algorithm in HashAlgorithm::ALL {
            assert!(reply.contains(&format!("<b>{}</b>", algorithm.name().to_uppercase())));
        }
        assert!(reply.contains("ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"));
    }

    #[test]
    fn hash_keeps_inner_whitespace() {
        let reply = run(handle_hash, "hello world").unwrap();
        assert!(reply.contains("5eb63bbbe01eeed093cb22bb8f5acdc3"));
    }

    #[test]
    fn hash_requires_text() {
        assert!(matches!(run(handle_hash, "  "), Err(CommandError::InvalidArguments(_))));
    }

    #[test]
    fn digest_selects_one_algorithm() {
        let reply = run(handle_digest, "sha3-256 abc").unwrap();
        assert!(reply.contains("3a985da74fe225b2045c172d6bd390bd855f086e3e9d525b46bfe24511431532"));
        assert!(!reply.contains("<b>MD5</b>"));
    }

    #[test]
    fn digest_rejects_unknown_algorithm() {
        let err = run(handle_digest, "crc32 abc").unwrap_err();
        assert!(err.to_string().contains("unsupported algorithm 'crc32'"));
        assert!(matches!(run(handle_digest, "md5"), Err(CommandError::InvalidArguments(_))));
    }
}
