//! Reply formatting. Replies are Telegram-flavoured HTML, so anything the
//! user typed must pass through [`escape_html`] before it is embedded.

use once_cell::sync::Lazy;
use regex_lite::Regex;

use crate::application::errors::CommandError;
use crate::domain::entities::{Operation, TransformResult};
use crate::domain::transforms::CipherKind;

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

static TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"</?[a-zA-Z][^>]*>").expect("tag pattern is valid"));

/// Render an HTML reply as plain text, for terminals and for platforms that
/// rejected the markup
pub fn html_to_plain(text: &str) -> String {
    TAG.replace_all(text, "")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}

pub fn code(text: &str) -> String {
    format!("<code>{}</code>", escape_html(text))
}

/// Reply for `/hash` and `/digest`
pub fn hash_reply(input: &str, result: &TransformResult) -> String {
    let mut reply = format!("🔐 <b>Hash results for:</b> {}\n", code(input));
    match result {
        TransformResult::Digests(digests) => {
            for digest in digests {
                reply.push_str(&format!(
                    "\n<b>{}</b>: {}\n",
                    digest.algorithm.name().to_uppercase(),
                    code(&digest.to_hex())
                ));
            }
        }
        TransformResult::Text(text) => reply.push_str(&format!("\n{}\n", code(text))),
    }
    reply
}

/// Reply for `/encrypt` and `/decrypt`
pub fn cipher_reply(
    kind: CipherKind,
    operation: Operation,
    parameter: Option<&str>,
    input: &str,
    result: &TransformResult,
) -> String {
    let mut reply = format!(
        "🔐 <b>Algorithm:</b> {}\n<b>Operation:</b> {}\n",
        kind.name().to_uppercase(),
        operation.as_str().to_uppercase()
    );
    if let (Some(label), Some(value)) = (kind.parameter_label(), parameter) {
        reply.push_str(&format!("<b>{}:</b> {}\n", capitalize(label), code(value)));
    }
    reply.push_str(&format!("<b>Input:</b> {}\n", code(input)));
    reply.push_str(&format!("<b>Output:</b> {}", code(&result.to_string())));
    reply
}

/// User-facing text for a failed command
pub fn error_reply(err: &CommandError, usage: Option<&str>) -> String {
    let mut reply = format!("❌ {}", escape_html(&err.to_string()));
    match err {
        CommandError::InvalidArguments(_) => {
            if let Some(usage) = usage {
                reply.push_str(&format!("\nUsage: {}", code(usage)));
            }
        }
        CommandError::InvalidCommand(_) => reply.push_str("\nSend /help to see available commands."),
        _ => {}
    }
    reply
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
