//! `/start` and `/algorithms`

use crate::application::errors::CommandError;
use crate::domain::entities::Message;
use crate::domain::transforms::{CipherKind, HashAlgorithm};

use super::format::escape_html;
use super::CommandSettings;

pub fn handle_start(message: &Message, settings: &CommandSettings) -> Result<String, CommandError> {
    let greeting = match &message.sender {
        Some(user) => format!("Hi {}! ", escape_html(user.display_name())),
        None => String::new(),
    };
    Ok(format!(
        "{}<b>{}</b> started successfully!\nSend /help to get help, or /algorithms to see what I can do.",
        greeting,
        escape_html(&settings.bot_name)
    ))
}

pub fn handle_algorithms(_message: &Message) -> Result<String, CommandError> {
    let mut reply = String::from("<b>🔐 Hash algorithms</b>\n");
    for algorithm in HashAlgorithm::ALL {
        reply.push_str(&format!(
            "• <code>{}</code> ({} bits)\n",
            algorithm.name(),
            algorithm.output_len() * 8
        ));
    }

    reply.push_str("\n<b>🔒 Ciphers</b>\n");
    for kind in CipherKind::ALL {
        let parameter = kind
            .parameter_label()
            .map(|label| format!(" &lt;{}&gt;", label))
            .unwrap_or_default();
        reply.push_str(&format!(
            "• <code>{}</code>{} - {}\n",
            kind.name(),
            parameter,
            kind.description()
        ));
    }
    Ok(reply)
}
