//! `/encrypt` and `/decrypt`

use crate::application::errors::CommandError;
use crate::domain::entities::{CipherParameters, Message, Operation, TransformResult};
use crate::domain::transforms::cipher::ParameterKind;
use crate::domain::transforms::{Cipher, CipherKind};

use super::{command_input, format, next_token, CommandSettings};

pub const ENCRYPT_USAGE: &str = "/encrypt <algorithm> [key] <text>";
pub const DECRYPT_USAGE: &str = "/decrypt <algorithm> [key] <text>";

/// Usage line for one cipher, e.g. `/encrypt shift <shift> <text>`
pub fn usage_for(kind: CipherKind, operation: Operation) -> String {
    match kind.parameter_label() {
        Some(label) => format!("/{} {} <{}> <text>", operation, kind, label),
        None => format!("/{} {} <text>", operation, kind),
    }
}

pub fn handle_cipher(
    message: &Message,
    operation: Operation,
    settings: &CommandSettings,
) -> Result<String, CommandError> {
    let input = command_input(message)?;
    let (name, rest) = next_token(input)
        .ok_or_else(|| CommandError::invalid_args("please choose a cipher algorithm"))?;
    let kind: CipherKind = name.parse().map_err(|e| {
        CommandError::invalid_args(format!("{}. Available: {}", e, CipherKind::names()))
    })?;

    let (params, parameter, text) = parse_parameters(kind, operation, rest, settings)?;
    if text.trim().is_empty() {
        return Err(CommandError::invalid_args(format!(
            "please provide text to {}. Usage: {}",
            operation,
            usage_for(kind, operation)
        )));
    }
    settings.check_length(text)?;

    tracing::debug!(cipher = %kind, %operation, chars = text.chars().count(), "running cipher");
    let cipher = Cipher::build(kind, &params)?;
    let output = cipher.apply(operation, text)?;

    Ok(format::cipher_reply(
        kind,
        operation,
        parameter,
        text,
        &TransformResult::Text(output),
    ))
}

/// Pull the cipher's key argument off the front of `rest`, checking its
/// shape. Returns the parameters, the raw key token, and the remaining text.
fn parse_parameters<'a>(
    kind: CipherKind,
    operation: Operation,
    rest: &'a str,
    settings: &CommandSettings,
) -> Result<(CipherParameters, Option<&'a str>, &'a str), CommandError> {
    let Some(parameter) = kind.parameter() else {
        let params = match kind {
            CipherKind::Caesar => CipherParameters::none().with_shift(settings.caesar_shift),
            _ => CipherParameters::none(),
        };
        return Ok((params, None, rest));
    };

    let label = kind.parameter_label().unwrap_or("key");
    let (token, text) = next_token(rest).ok_or_else(|| {
        CommandError::invalid_args(format!(
            "{} requires a {}. Usage: {}",
            kind,
            label,
            usage_for(kind, operation)
        ))
    })?;

    let params = match parameter {
        ParameterKind::Shift => {
            let shift = parse_shift(token).ok_or_else(|| {
                CommandError::invalid_args(format!("{} must be an integer, got '{}'", label, token))
            })?;
            CipherParameters::none().with_shift(shift)
        }
        ParameterKind::Alphabet => {
            require_letters(label, token)?;
            CipherParameters::none().with_alphabet(token)
        }
        ParameterKind::Keyword => {
            require_letters(label, token)?;
            CipherParameters::none().with_keyword(token)
        }
        ParameterKind::Count => {
            let count: usize = token.parse().map_err(|_| {
                CommandError::invalid_args(format!("{} must be a positive integer, got '{}'", label, token))
            })?;
            if count > settings.max_input_length {
                return Err(CommandError::invalid_args(format!(
                    "{} must be at most {}, got {}",
                    label, settings.max_input_length, count
                )));
            }
            CipherParameters::none().with_count(count)
        }
    };

    Ok((params, Some(token), text))
}

/// Decimal integer of any length, reduced mod 26 digit by digit
fn parse_shift(token: &str) -> Option<i64> {
    let (negative, digits) = match token.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, token.strip_prefix('+').unwrap_or(token)),
    };
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let shift = digits.bytes().fold(0i64, |acc, b| (acc * 10 + i64::from(b - b'0')) % 26);
    Some(if negative { -shift } else { shift })
}

fn require_letters(label: &str, token: &str) -> Result<(), CommandError> {
    if token.chars().all(|c| c.is_ascii_alphabetic()) {
        Ok(())
    } else {
        Err(CommandError::invalid_args(format!(
            "{} may only contain letters A-Z, got '{}'",
            label, token
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::errors::TransformError;

    fn run(operation: Operation, input: &str) -> Result<String, CommandError> {
        let message = Message::from_command("1", operation.as_str(), input);
        handle_cipher(&message, operation, &CommandSettings::default())
    }

    fn output(reply: &str) -> &str {
        let start = reply.rfind("<code>").unwrap() + "<code>".len();
        let end = reply.rfind("</code>").unwrap();
        &reply[start..end]
    }

    #[test]
    fn atbash_encrypts_remaining_text() {
        let reply = run(Operation::Encrypt, "atbash hello world").unwrap();
        assert_eq!(output(&reply), "svool dliow");
        assert!(reply.contains("<b>Algorithm:</b> ATBASH"));
    }

    #[test]
    fn caesar_uses_configured_shift() {
        let message = Message::from_command("1", "encrypt", "caesar abc");
        let settings = CommandSettings {
            caesar_shift: 5,
            ..CommandSettings::default()
        };
        let reply = handle_cipher(&message, Operation::Encrypt, &settings).unwrap();
        assert_eq!(output(&reply), "fgh");
    }

    #[test]
    fn shift_round_trips_through_commands() {
        let encrypted = run(Operation::Encrypt, "shift -3 Attack at dawn").unwrap();
        assert_eq!(output(&encrypted), "Xqqxzh xq axtk");
        assert!(encrypted.contains("<b>Shift:</b> <code>-3</code>"));
        let decrypted = run(Operation::Decrypt, "shift -3 Xqqxzh xq axtk").unwrap();
        assert_eq!(output(&decrypted), "Attack at dawn");
    }

    #[test]
    fn shift_requires_integer() {
        assert!(matches!(
            run(Operation::Encrypt, "shift three hello"),
            Err(CommandError::InvalidArguments(_))
        ));
    }

    #[test]
    fn huge_shifts_reduce_mod_26() {
        assert_eq!(parse_shift("99999999999999999999"), Some(21));
        assert_eq!(parse_shift("-27"), Some(-1));
        assert_eq!(parse_shift("+3"), Some(3));
        assert_eq!(parse_shift("-"), None);
        assert_eq!(parse_shift("1e3"), None);

        let reply = run(Operation::Encrypt, "shift 99999999999999999999 abc").unwrap();
        assert_eq!(output(&reply), "vwx");
        let reply = run(Operation::Encrypt, "shift -99999999999999999999 abc").unwrap();
        assert_eq!(output(&reply), "fgh");
    }

    #[test]
    fn counts_above_input_limit_are_rejected() {
        for input in ["rail_fence 18446744073709551615 hello", "scytale 4097 hello"] {
            let err = run(Operation::Decrypt, input).unwrap_err();
            assert!(matches!(err, CommandError::InvalidArguments(_)), "{}", input);
        }
        assert!(run(Operation::Decrypt, "scytale 4096 hello").is_ok());
    }

    #[test]
    fn mixed_alphabet_keyword_rules() {
        let reply = run(Operation::Encrypt, "mixed_alphabet secret hello").unwrap();
        assert_eq!(output(&reply), "dtiil");
        assert!(matches!(
            run(Operation::Encrypt, "mixed_alphabet s3cret hello"),
            Err(CommandError::InvalidArguments(_))
        ));
        assert!(matches!(
            run(Operation::Encrypt, "mixed_alphabet"),
            Err(CommandError::InvalidArguments(_))
        ));
        assert!(matches!(
            run(Operation::Encrypt, "mixed_alphabet secret"),
            Err(CommandError::InvalidArguments(_))
        ));
    }

    #[test]
    fn substitution_key_must_be_a_permutation() {
        let err = run(Operation::Encrypt, "simple_substitution aacdefghijklmnopqrstuvwxyz hi").unwrap_err();
        assert!(matches!(err, CommandError::Transform(TransformError::InvalidKey(_))));

        let reply = run(Operation::Decrypt, "simple_substitution qwertyuiopasdfghjklzxcvbnm itssg").unwrap();
        assert_eq!(output(&reply), "hello");
    }

    #[test]
    fn baconian_decrypt_reports_bad_ciphertext() {
        let err = run(Operation::Decrypt, "baconian bbbbb").unwrap_err();
        assert!(matches!(err, CommandError::Transform(TransformError::InvalidCiphertext(_))));
    }

    #[test]
    fn unknown_algorithm_lists_choices() {
        let err = run(Operation::Encrypt, "vigenere key text").unwrap_err();
        let text = err.to_string();
        assert!(text.contains("unsupported algorithm 'vigenere'"));
        assert!(text.contains("mixed_alphabet"));
    }

    #[test]
    fn user_text_is_escaped() {
        let reply = run(Operation::Encrypt, "rot13 <b>").unwrap();
        assert!(reply.contains("<code>&lt;b&gt;</code>"));
        assert!(reply.contains("<code>&lt;o&gt;</code>"));
    }

    #[test]
    fn usage_mentions_parameter() {
        assert_eq!(usage_for(CipherKind::RailFence, Operation::Encrypt), "/encrypt rail_fence <rails> <text>");
        assert_eq!(usage_for(CipherKind::Atbash, Operation::Decrypt), "/decrypt atbash <text>");
    }
}
