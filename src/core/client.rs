use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Result;
use parking_lot::RwLock;
use tracing::{debug, info};

use crate::core::{command::Command, context::Ctx, error::Error};

// ============================================================================
// Bot user
// ============================================================================

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BotUser {
    pub id: u64,
    pub username: String,
}

impl BotUser {
    pub fn new(id: u64, username: impl Into<String>) -> Self {
        Self {
            id,
            username: username.into(),
        }
    }
}

// ============================================================================
// Command registry
// ============================================================================

/// Name-unique command table that remembers registration order.
#[derive(Default)]
struct CommandRegistry {
    commands: RwLock<HashMap<String, Arc<Command>>>,
    order: RwLock<Vec<String>>,
}

impl CommandRegistry {
    fn add(&self, command: Arc<Command>) -> Result<(), Error> {
        let mut commands = self.commands.write();
        let mut order = self.order.write();

        let taken = std::iter::once(&command.name)
            .chain(command.aliases.iter())
            .find(|name| commands.values().any(|c| c.answers_to(name)));
        if let Some(name) = taken {
            return Err(Error::DuplicateCommand(name.clone()));
        }

        order.push(command.name.clone());
        commands.insert(command.name.clone(), command);
        Ok(())
    }

    fn remove(&self, name: &str) -> Option<Arc<Command>> {
        let mut commands = self.commands.write();
        let removed = commands.remove(name)?;
        self.order.write().retain(|n| n != name);
        Some(removed)
    }

    fn get(&self, name: &str) -> Option<Arc<Command>> {
        let commands = self.commands.read();
        commands
            .get(name)
            .or_else(|| commands.values().find(|c| c.answers_to(name)))
            .cloned()
    }

    fn contains(&self, name: &str) -> bool {
        self.commands.read().contains_key(name)
    }

    fn snapshot(&self) -> Vec<Arc<Command>> {
        let commands = self.commands.read();
        self.order
            .read()
            .iter()
            .filter_map(|name| commands.get(name).cloned())
            .collect()
    }

    fn len(&self) -> usize {
        self.commands.read().len()
    }
}

// ============================================================================
// Client
// ============================================================================

/// Bot client: identity, prefixes and the command registry.
pub struct Client {
    user: RwLock<BotUser>,
    prefixes: Vec<String>,
    registry: CommandRegistry,
}

impl Client {
    pub fn new(user: BotUser) -> Self {
        Self {
            user: RwLock::new(user),
            prefixes: vec!["!".to_string()],
            registry: CommandRegistry::default(),
        }
    }

    pub fn with_prefixes<I, S>(mut self, prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.prefixes = prefixes.into_iter().map(Into::into).collect();
        self
    }

    pub fn prefixes(&self) -> &[String] {
        &self.prefixes
    }

    pub fn user(&self) -> BotUser {
        self.user.read().clone()
    }

    pub fn username(&self) -> String {
        self.user.read().username.clone()
    }

    pub fn set_username(&self, username: impl Into<String>) {
        self.user.write().username = username.into();
    }

    /// Register a command. Names and aliases must not collide with existing ones.
    pub fn add_command(&self, command: impl Into<Arc<Command>>) -> Result<(), Error> {
        let command = command.into();
        let name = command.name.clone();
        self.registry.add(command)?;
        info!("Registered command: {}", name);
        Ok(())
    }

    pub fn remove_command(&self, name: &str) -> Option<Arc<Command>> {
        let removed = self.registry.remove(name);
        if removed.is_some() {
            info!("Removed command: {}", name);
        }
        removed
    }

    /// Look up by name, falling back to aliases.
    pub fn get_command(&self, name: &str) -> Option<Arc<Command>> {
        self.registry.get(name)
    }

    pub fn has_command(&self, name: &str) -> bool {
        self.registry.contains(name)
    }

    /// Snapshot of every registered command, in registration order.
    pub fn commands(&self) -> Vec<Arc<Command>> {
        self.registry.snapshot()
    }

    pub fn command_count(&self) -> usize {
        self.registry.len()
    }

    /// Route an invocation to its command.
    pub async fn dispatch(&self, ctx: Ctx) -> Result<()> {
        let name = ctx.invoked_name().to_string();
        let command = self
            .get_command(&name)
            .ok_or_else(|| Error::CommandNotFound(name.clone()))?;

        if !command.enabled {
            debug!("Ignoring disabled command: {}", command.name);
            return Ok(());
        }

        if !command.can_run(&ctx).await? {
            return Err(Error::CheckFailed(command.name.clone()).into());
        }

        let values = command.bind_args(&ctx)?;
        debug!("Invoking command: {} (args: {:?})", command.name, ctx.args());
        command.invoke(ctx.with_values(values)).await
    }
}
