//! Console demo bot.
//!
//! Reads commands from stdin. Configuration is taken from `config.toml`
//! (or the path in `AYIOU_CONFIG`) when present:
//!
//! ```toml
//! [bot]
//! username = "Ayiou"
//! prefixes = ["!", "/"]
//!
//! [help]
//! show_prefix = true
//! show_aliases = true
//! show_params = true
//! ```

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use ayiou_help::prelude::*;
use tracing::info;
use tracing_subscriber::EnvFilter;

const ADMIN_ID: u64 = 1;

fn load_config() -> Result<ConfigStore> {
    let path = std::env::var("AYIOU_CONFIG").unwrap_or_else(|_| "config.toml".to_string());
    if Path::new(&path).exists() {
        Ok(ConfigStore::from_file(&path)?)
    } else {
        info!("No config at {}, using defaults", path);
        Ok(ConfigStore::empty())
    }
}

fn demo_commands(client: &Client) -> Result<()> {
    let admins = Arc::new(Scale::new("admin").check(check(|ctx: Ctx| async move {
        Ok(ctx.author_id() == Some(ADMIN_ID))
    })));

    client.add_command(
        Command::new("ping", |ctx: Ctx| async move { ctx.reply_text("Pong!").await })
            .alias("p")
            .brief("Check that the bot is alive"),
    )?;

    client.add_command(
        Command::new("echo", |ctx: Ctx| async move {
            let text = ctx.values().str("text").unwrap_or_default().to_string();
            ctx.reply_text(text).await
        })
        .param(CommandParam::required("text").consume_rest())
        .brief("Repeat a message")
        .help("Repeat a message back to you.\nQuote arguments to keep spaces: \"like this\"."),
    )?;

    client.add_command(
        Command::new("add", |ctx: Ctx| async move {
            let a = ctx.values().float("a").unwrap_or_default();
            let b = ctx.values().float("b").unwrap_or_default();
            ctx.reply_text((a + b).to_string()).await
        })
        .alias("sum")
        .param(CommandParam::required("a").converter(integer()).converter(float()))
        .param(
            CommandParam::optional("b")
                .converter(integer())
                .converter(float())
                .default(0i64),
        )
        .brief("Add numbers together"),
    )?;

    client.add_command(
        Command::new("shutdown", |ctx: Ctx| async move {
            ctx.reply_text("Not from the console.").await
        })
        .scale(admins)
        .brief("Stop the bot (admins only)"),
    )?;

    client.add_command(
        Command::new("shout", |ctx: Ctx| async move {
            let text = ctx.values().str("text").unwrap_or_default();
            let text = if ctx.values().bool("loud").unwrap_or(true) {
                text.to_uppercase()
            } else {
                text.to_string()
            };
            ctx.reply_text(text).await
        })
        .param(CommandParam::required("loud").converter(boolean()))
        .param(CommandParam::required("text").consume_rest())
        .brief("Repeat a message, optionally in capitals"),
    )?;

    client.add_command(
        Command::new("debug", |ctx: Ctx| async move {
            ctx.reply(Embed::new().title("debug").description(ctx.content().to_string()))
                .await
        })
        .hidden(true)
        .brief("Show how a message was parsed"),
    )?;

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Starting Ayiou help demo...");

    let config = load_config()?;
    let bot_config: BotConfig = config.get()?;
    let help_config: HelpConfig = config.get()?;

    let client =
        Arc::new(Client::new(bot_config.user()).with_prefixes(bot_config.prefixes.clone()));
    demo_commands(&client)?;
    HelpCommand::new(client.clone(), help_config).register()?;

    AyiouBot::new(client).run(ConsoleDriver::new()).await
}
