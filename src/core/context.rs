use anyhow::Result;
use tokio::sync::mpsc;

use crate::core::{
    args::Args,
    error::Error,
    message::{Embed, Reply},
};

/// Per-invocation context.
///
/// Cheap to clone; every clone replies through the same outbound channel.
#[derive(Clone, Debug)]
pub struct Ctx {
    content: String,
    prefix: String,
    invoked_name: String,
    args: Vec<String>,
    values: Args,
    author_id: Option<u64>,
    outbound_tx: mpsc::Sender<Reply>,
}

impl Ctx {
    pub fn new(
        prefix: impl Into<String>,
        invoked_name: impl Into<String>,
        args: Vec<String>,
        outbound_tx: mpsc::Sender<Reply>,
    ) -> Self {
        let prefix = prefix.into();
        let invoked_name = invoked_name.into();
        let mut content = format!("{}{}", prefix, invoked_name);
        for arg in &args {
            content.push(' ');
            content.push_str(arg);
        }

        Self {
            content,
            prefix,
            invoked_name,
            args,
            values: Args::default(),
            author_id: None,
            outbound_tx,
        }
    }

    /// Parse a raw line into a command invocation.
    ///
    /// Returns `None` when the first token does not start with one of
    /// `prefixes` or carries no command name after it.
    pub fn parse(
        line: &str,
        prefixes: &[String],
        outbound_tx: mpsc::Sender<Reply>,
    ) -> Option<Self> {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return None;
        }

        let token_end = trimmed
            .char_indices()
            .find(|(_, ch)| ch.is_whitespace())
            .map(|(idx, _)| idx)
            .unwrap_or(trimmed.len());
        let token = &trimmed[..token_end];

        // longest prefix wins, so "!!" beats "!"
        let prefix = prefixes
            .iter()
            .filter(|p| !p.is_empty() && token.starts_with(p.as_str()))
            .max_by_key(|p| p.len())?;

        let name = &token[prefix.len()..];
        if name.is_empty() {
            return None;
        }

        Some(Self {
            content: trimmed.to_string(),
            prefix: prefix.clone(),
            invoked_name: name.to_string(),
            args: split_args(&trimmed[token_end..]),
            values: Args::default(),
            author_id: None,
            outbound_tx,
        })
    }

    pub fn with_author(mut self, author_id: u64) -> Self {
        self.author_id = Some(author_id);
        self
    }

    /// Attach converted arguments; done by the client before invoking.
    pub fn with_values(mut self, values: Args) -> Self {
        self.values = values;
        self
    }

    /// Prefix the invocation was made with.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn invoked_name(&self) -> &str {
        &self.invoked_name
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    pub fn arg(&self, index: usize) -> Option<&str> {
        self.args.get(index).map(String::as_str)
    }

    /// Arguments converted against the command's params.
    pub fn values(&self) -> &Args {
        &self.values
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn author_id(&self) -> Option<u64> {
        self.author_id
    }

    pub async fn reply(&self, reply: impl Into<Reply>) -> Result<()> {
        self.outbound_tx
            .send(reply.into())
            .await
            .map_err(|_| Error::ChannelClosed)?;
        Ok(())
    }

    pub async fn reply_text(&self, text: impl Into<String>) -> Result<()> {
        self.reply(Reply::Text(text.into())).await
    }

    pub async fn reply_embed(&self, embed: Embed) -> Result<()> {
        self.reply(Reply::Embed(embed)).await
    }
}

/// Split on whitespace, keeping `"quoted segments"` together.
fn split_args(input: &str) -> Vec<String> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut quoted = false;

    for ch in input.chars() {
        match ch {
            '"' => {
                in_quotes = !in_quotes;
                quoted = true;
            }
            c if c.is_whitespace() && !in_quotes => {
                if !current.is_empty() || quoted {
                    args.push(std::mem::take(&mut current));
                }
                quoted = false;
            }
            c => current.push(c),
        }
    }

    if !current.is_empty() || quoted {
        args.push(current);
    }

    args
}
