use serde::Deserialize;

use crate::core::config::Configurable;

pub const USERNAME_TOKEN: &str = "{username}";
pub const CMD_NAME_TOKEN: &str = "{cmd_name}";

pub const DEFAULT_EMBED_TITLE: &str = "{username} Help Command";
pub const DEFAULT_NOT_FOUND_MESSAGE: &str = "Sorry! No command called `{cmd_name}` was found.";

/// `[help]` section: what the help command lists and how it renders it.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct HelpConfig {
    /// List commands marked hidden.
    pub show_hidden: bool,
    /// List disabled commands.
    pub show_disabled: bool,
    /// Only list commands whose checks pass for the invoking context.
    pub run_checks: bool,
    /// List the help command itself.
    pub show_self: bool,
    pub show_params: bool,
    pub show_aliases: bool,
    /// Prepend the invocation prefix to command names.
    pub show_prefix: bool,
    /// `{username}` is replaced with the bot's current username.
    pub embed_title: String,
    /// `{cmd_name}` is replaced with the requested name, verbatim.
    pub not_found_message: String,
}

impl Default for HelpConfig {
    fn default() -> Self {
        Self {
            show_hidden: false,
            show_disabled: false,
            run_checks: false,
            show_self: false,
            show_params: false,
            show_aliases: false,
            show_prefix: false,
            embed_title: DEFAULT_EMBED_TITLE.to_string(),
            not_found_message: DEFAULT_NOT_FOUND_MESSAGE.to_string(),
        }
    }
}

impl HelpConfig {
    pub fn show_hidden(mut self, show: bool) -> Self {
        self.show_hidden = show;
        self
    }

    pub fn show_disabled(mut self, show: bool) -> Self {
        self.show_disabled = show;
        self
    }

    pub fn run_checks(mut self, run: bool) -> Self {
        self.run_checks = run;
        self
    }

    pub fn show_self(mut self, show: bool) -> Self {
        self.show_self = show;
        self
    }

    pub fn show_params(mut self, show: bool) -> Self {
        self.show_params = show;
        self
    }

    pub fn show_aliases(mut self, show: bool) -> Self {
        self.show_aliases = show;
        self
    }

    pub fn show_prefix(mut self, show: bool) -> Self {
        self.show_prefix = show;
        self
    }

    /// Empty templates fall back to the defaults.
    pub fn embed_title(mut self, title: impl Into<String>) -> Self {
        self.embed_title = non_empty_or(title.into(), DEFAULT_EMBED_TITLE);
        self
    }

    pub fn not_found_message(mut self, message: impl Into<String>) -> Self {
        self.not_found_message = non_empty_or(message.into(), DEFAULT_NOT_FOUND_MESSAGE);
        self
    }

    /// Fill in templates left empty (e.g. `embed_title = ""` in TOML).
    pub(crate) fn with_template_defaults(mut self) -> Self {
        self.embed_title = non_empty_or(std::mem::take(&mut self.embed_title), DEFAULT_EMBED_TITLE);
        self.not_found_message = non_empty_or(
            std::mem::take(&mut self.not_found_message),
            DEFAULT_NOT_FOUND_MESSAGE,
        );
        self
    }

    pub fn render_title(&self, username: &str) -> String {
        self.embed_title.replace(USERNAME_TOKEN, username)
    }

    pub fn render_not_found(&self, cmd_name: &str) -> String {
        self.not_found_message.replace(CMD_NAME_TOKEN, cmd_name)
    }
}

impl Configurable for HelpConfig {
    const PREFIX: &'static str = "help";
}

fn non_empty_or(value: String, default: &str) -> String {
    if value.is_empty() {
        default.to_string()
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::ConfigStore;

    #[test]
    fn defaults_hide_everything_optional() {
        let config = HelpConfig::default();
        assert!(!config.show_hidden);
        assert!(!config.show_disabled);
        assert!(!config.run_checks);
        assert!(!config.show_self);
        assert_eq!(config.render_title("Ayiou"), "Ayiou Help Command");
        assert_eq!(
            config.render_not_found("Xyzzy"),
            "Sorry! No command called `Xyzzy` was found."
        );
    }

    #[test]
    fn empty_templates_fall_back() {
        let config = HelpConfig::default().embed_title("").not_found_message("");
        assert_eq!(config, HelpConfig::default());

        let config = HelpConfig::default().embed_title("Commands of {username}");
        assert_eq!(config.render_title("bot"), "Commands of bot");
    }

    #[test]
    fn loads_from_help_section() {
        let toml = r#"
            [help]
            show_prefix = true
            show_aliases = true
            embed_title = ""
            not_found_message = "No `{cmd_name}` here"
        "#;

        let store = ConfigStore::parse(toml).unwrap();
        let config = store.get::<HelpConfig>().unwrap().with_template_defaults();
        assert!(config.show_prefix);
        assert!(config.show_aliases);
        assert!(!config.show_params);
        assert_eq!(config.embed_title, DEFAULT_EMBED_TITLE);
        assert_eq!(config.render_not_found("ping"), "No `ping` here");
    }
}
