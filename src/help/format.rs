use std::fmt::Write;

use crate::core::{client::BotUser, command::Command};
use crate::help::config::HelpConfig;

/// `` `!name`|`alias` `<param>` `[opt]` `` depending on the config flags.
pub fn command_string(config: &HelpConfig, cmd: &Command, prefix: &str) -> String {
    let prefix = if config.show_prefix { prefix } else { "" };
    let mut out = format!("`{}{}`", prefix, cmd.qualified_name());

    if config.show_aliases && !cmd.aliases.is_empty() {
        let aliases: Vec<String> = cmd.aliases.iter().map(|a| format!("`{}`", a)).collect();
        out.push('|');
        out.push_str(&aliases.join("|"));
    }

    if config.show_params {
        for param in &cmd.params {
            let (open, close) = if param.optional { ('[', ']') } else { ('<', '>') };
            let _ = write!(out, " `{}{}{}`", open, param.name, close);
        }
    }

    out
}

const MASS_MENTIONS: [(&str, &str); 2] = [
    ("@everyone", "@\u{200b}everyone"),
    ("@here", "@\u{200b}here"),
];

fn defuse_mass_mentions(text: &str) -> String {
    MASS_MENTIONS
        .iter()
        .fold(text.to_string(), |text, &(source, target)| text.replace(source, target))
}

/// Defuse mass pings and mentions of the bot itself.
///
/// The self-mention replacement is defused too, so a bot named `everyone`
/// cannot ping. Running it twice changes nothing unless the username itself
/// contains `<@id>` mention syntax.
pub fn sanitise_mentions(text: &str, user: &BotUser) -> String {
    let self_mention = defuse_mass_mentions(&format!("@{}", user.username));

    let mut text = defuse_mass_mentions(text);
    for source in [format!("<@{}>", user.id), format!("<@!{}>", user.id)] {
        text = text.replace(&source, &self_mention);
    }
    text
}
