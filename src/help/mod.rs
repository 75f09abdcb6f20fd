//! Configurable `help` command.
//!
//! Lists every command the invoker is allowed to see, or prints the usage of
//! a single command. What is visible is decided by [`HelpConfig`].

pub mod config;
pub mod format;

use std::sync::{Arc, Weak};

use anyhow::{Result, anyhow};
use tracing::{debug, warn};

use crate::core::{
    client::Client,
    command::{Command, CommandId, CommandParam},
    context::Ctx,
    error::Error,
    message::{Color, Embed},
    paginator::Paginator,
};

pub use config::{CMD_NAME_TOKEN, HelpConfig, USERNAME_TOKEN};

pub const HELP_COMMAND_NAME: &str = "help";

/// Joined list output above this many characters is paginated.
pub const LIST_EMBED_LIMIT: usize = 500;
pub const PAGE_SIZE: usize = 500;

// ============================================================================
// Gathered commands
// ============================================================================

/// Commands that survived filtering, keyed by qualified name in registry order.
#[derive(Clone, Debug, Default)]
pub struct GatheredCommands {
    entries: Vec<Arc<Command>>,
}

impl GatheredCommands {
    /// Insert, replacing any entry with the same qualified name.
    fn insert(&mut self, cmd: Arc<Command>) {
        match self
            .entries
            .iter_mut()
            .find(|c| c.qualified_name() == cmd.qualified_name())
        {
            Some(slot) => *slot = cmd,
            None => self.entries.push(cmd),
        }
    }

    /// Lookup by lower-cased qualified name, falling back to any spelling.
    pub fn get(&self, name: &str) -> Option<&Arc<Command>> {
        let wanted = name.to_lowercase();
        self.entries
            .iter()
            .find(|c| c.qualified_name() == wanted)
            .or_else(|| {
                self.entries
                    .iter()
                    .find(|c| c.qualified_name().to_lowercase() == wanted)
            })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<Command>> {
        self.entries.iter()
    }

    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|c| c.qualified_name()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ============================================================================
// Help command
// ============================================================================

#[derive(Clone)]
pub struct HelpCommand {
    client: Arc<Client>,
    config: Arc<HelpConfig>,
    id: CommandId,
}

impl HelpCommand {
    pub fn new(client: Arc<Client>, config: HelpConfig) -> Self {
        let config = config.with_template_defaults();
        if !config.embed_title.contains(USERNAME_TOKEN) {
            warn!("Help embed title has no {} placeholder", USERNAME_TOKEN);
        }
        if !config.not_found_message.contains(CMD_NAME_TOKEN) {
            warn!("Help not-found message has no {} placeholder", CMD_NAME_TOKEN);
        }

        Self {
            client,
            config: Arc::new(config),
            id: CommandId::next(),
        }
    }

    pub fn config(&self) -> &HelpConfig {
        &self.config
    }

    /// Identity of the command built by [`HelpCommand::command`].
    pub fn id(&self) -> CommandId {
        self.id
    }

    /// Build the registry entry for this help command.
    ///
    /// Every call yields a command with the same [`CommandId`]. The handler
    /// only keeps a weak reference to the client, so registering it does not
    /// keep the client alive.
    pub fn command(&self) -> Command {
        let client = Arc::downgrade(&self.client);
        let config = self.config.clone();
        let id = self.id;

        Command::new(HELP_COMMAND_NAME, move |ctx: Ctx| {
            let client: Weak<Client> = client.clone();
            let config = config.clone();
            async move {
                let client = client
                    .upgrade()
                    .ok_or_else(|| anyhow!("client dropped before help was invoked"))?;
                let help = HelpCommand { client, config, id };
                let cmd_name = ctx.values().str("cmd_name").map(str::to_string);
                help.send_help(&ctx, cmd_name.as_deref()).await
            }
        })
        .with_id(self.id)
        .param(CommandParam::optional("cmd_name"))
        .brief("Shows the available commands")
        .help("Shows the available commands, or how to use a single command when one is named.")
    }

    /// Bind into the client as `help`, replacing any existing `help`.
    pub fn register(&self) -> Result<(), Error> {
        if self.client.remove_command(HELP_COMMAND_NAME).is_some() {
            warn!("Replacing existing help command.");
        }
        self.client.add_command(self.command())
    }

    /// Send help for `cmd_name`, or the full list when it is absent or empty.
    pub async fn send_help(&self, ctx: &Ctx, cmd_name: Option<&str>) -> Result<()> {
        match cmd_name {
            Some(name) if !name.is_empty() => self.help_specific(ctx, name).await,
            _ => self.help_list(ctx).await,
        }
    }

    async fn help_list(&self, ctx: &Ctx) -> Result<()> {
        let cmds = self.gather(Some(ctx)).await?;

        let output: Vec<String> = cmds
            .iter()
            .map(|cmd| {
                let line = format!(
                    "{}\n{}",
                    self.generate_command_string(cmd, ctx),
                    cmd.brief_text()
                );
                self.sanitise_mentions(&line)
            })
            .collect();

        let title = self.config.render_title(&self.client.username());
        let body = output.join("\n");

        if body.chars().count() > LIST_EMBED_LIMIT {
            debug!("Help list is {} chars, paginating", body.chars().count());
            Paginator::create_from_list(&output, PAGE_SIZE)
                .with_default_title(title)
                .send(ctx)
                .await
        } else {
            let embed = Embed::new()
                .title(title)
                .description(body)
                .color(Color::BLURPLE);
            ctx.reply_embed(embed).await
        }
    }

    async fn help_specific(&self, ctx: &Ctx, cmd_name: &str) -> Result<()> {
        let cmds = self.gather(Some(ctx)).await?;

        match cmds.get(cmd_name) {
            Some(cmd) => {
                let text = format!(
                    "{}\n{}",
                    self.generate_command_string(cmd, ctx),
                    cmd.help_text()
                );
                ctx.reply_text(self.sanitise_mentions(&text)).await
            }
            None => {
                ctx.reply_text(self.config.render_not_found(cmd_name))
                    .await
            }
        }
    }

    /// Commands visible under the current configuration.
    ///
    /// Checks are only evaluated when `run_checks` is set and a context is
    /// given; a command is dropped as soon as one of its checks (or its
    /// scale's) fails.
    pub async fn gather(&self, ctx: Option<&Ctx>) -> Result<GatheredCommands> {
        let mut out = GatheredCommands::default();

        for cmd in self.client.commands() {
            if !cmd.enabled && !self.config.show_disabled {
                continue;
            }

            if cmd.id() == self.id && !self.config.show_self {
                continue;
            }

            if cmd.hidden && !self.config.show_hidden {
                continue;
            }

            if let Some(ctx) = ctx {
                if self.config.run_checks && !cmd.can_run(ctx).await? {
                    debug!("Hiding {} from help: checks failed", cmd.qualified_name());
                    continue;
                }
            }

            out.insert(cmd);
        }

        Ok(out)
    }

    pub fn generate_command_string(&self, cmd: &Command, ctx: &Ctx) -> String {
        format::command_string(&self.config, cmd, ctx.prefix())
    }

    pub fn sanitise_mentions(&self, text: &str) -> String {
        format::sanitise_mentions(text, &self.client.user())
    }
}
