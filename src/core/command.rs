use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use anyhow::Result;
use futures::{FutureExt, future::BoxFuture};

use crate::core::{
    args::{ArgValue, Args, Converter, bind},
    context::Ctx,
    error::Error,
};

// ============================================================================
// Handler / Check
// ============================================================================

/// Async entry point of a command.
pub trait Handler: Send + Sync + 'static {
    fn call(&self, ctx: Ctx) -> BoxFuture<'static, Result<()>>;
}

impl<F, Fut> Handler for F
where
    F: Fn(Ctx) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<()>> + Send + 'static,
{
    fn call(&self, ctx: Ctx) -> BoxFuture<'static, Result<()>> {
        (self)(ctx).boxed()
    }
}

/// Async permission predicate evaluated against the invoking context.
pub type Check = Arc<dyn Fn(Ctx) -> BoxFuture<'static, Result<bool>> + Send + Sync>;

/// Wrap a closure as a [`Check`].
pub fn check<F, Fut>(f: F) -> Check
where
    F: Fn(Ctx) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<bool>> + Send + 'static,
{
    Arc::new(move |ctx: Ctx| f(ctx).boxed())
}

/// Run checks in order, stopping at the first one that fails.
pub async fn run_checks(checks: &[Check], ctx: &Ctx) -> Result<bool> {
    for check in checks {
        if !check(ctx.clone()).await? {
            return Ok(false);
        }
    }
    Ok(true)
}

// ============================================================================
// Params / Scale
// ============================================================================

/// One positional parameter of a command.
///
/// Without converters the raw argument is kept as a string. A param with a
/// default is optional.
#[derive(Clone)]
pub struct CommandParam {
    pub name: String,
    pub optional: bool,
    pub default: Option<ArgValue>,
    pub consume_rest: bool,
    pub converters: Vec<Converter>,
}

impl CommandParam {
    pub fn required(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            optional: false,
            default: None,
            consume_rest: false,
            converters: Vec::new(),
        }
    }

    pub fn optional(name: impl Into<String>) -> Self {
        Self {
            optional: true,
            ..Self::required(name)
        }
    }

    pub fn converter(mut self, converter: Converter) -> Self {
        self.converters.push(converter);
        self
    }

    pub fn default(mut self, value: impl Into<ArgValue>) -> Self {
        self.default = Some(value.into());
        self.optional = true;
        self
    }

    /// Take every remaining argument, joined by spaces.
    pub fn consume_rest(mut self) -> Self {
        self.consume_rest = true;
        self
    }

    /// Run the converters in order; the first success wins.
    pub fn convert(&self, ctx: &Ctx, arg: &str) -> Result<ArgValue, Error> {
        if self.converters.is_empty() {
            return Ok(ArgValue::Str(arg.to_string()));
        }

        let mut last_err = None;
        for converter in &self.converters {
            match converter(ctx, arg) {
                Ok(value) => return Ok(value),
                Err(err) => last_err = Some(err),
            }
        }

        match last_err {
            Some(err) if self.converters.len() == 1 => Err(Error::BadArgument(format!(
                "Invalid argument {}: {}",
                self.name, err
            ))),
            _ => Err(Error::BadArgument(format!(
                "Could not convert {} into a type specified for {}.",
                arg, self.name
            ))),
        }
    }
}

impl fmt::Debug for CommandParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandParam")
            .field("name", &self.name)
            .field("optional", &self.optional)
            .field("default", &self.default)
            .field("consume_rest", &self.consume_rest)
            .field("converters", &self.converters.len())
            .finish()
    }
}

/// A group of commands sharing a set of checks.
pub struct Scale {
    pub name: String,
    pub checks: Vec<Check>,
}

impl Scale {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            checks: Vec::new(),
        }
    }

    pub fn check(mut self, check: Check) -> Self {
        self.checks.push(check);
        self
    }
}

impl fmt::Debug for Scale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scale")
            .field("name", &self.name)
            .field("checks", &self.checks.len())
            .finish()
    }
}

// ============================================================================
// Command
// ============================================================================

/// Process-unique command identity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CommandId(u64);

impl CommandId {
    pub(crate) fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

pub struct Command {
    id: CommandId,
    pub name: String,
    pub aliases: Vec<String>,
    pub params: Vec<CommandParam>,
    brief: Option<String>,
    help: Option<String>,
    pub enabled: bool,
    pub hidden: bool,
    pub checks: Vec<Check>,
    pub scale: Option<Arc<Scale>>,
    handler: Box<dyn Handler>,
}

impl Command {
    pub fn new<H: Handler>(name: impl Into<String>, handler: H) -> Self {
        Self {
            id: CommandId::next(),
            name: name.into(),
            aliases: Vec::new(),
            params: Vec::new(),
            brief: None,
            help: None,
            enabled: true,
            hidden: false,
            checks: Vec::new(),
            scale: None,
            handler: Box::new(handler),
        }
    }

    /// Reuse an identity allocated ahead of construction.
    pub(crate) fn with_id(mut self, id: CommandId) -> Self {
        self.id = id;
        self
    }

    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into());
        self
    }

    pub fn param(mut self, param: CommandParam) -> Self {
        self.params.push(param);
        self
    }

    pub fn brief(mut self, brief: impl Into<String>) -> Self {
        self.brief = Some(brief.into());
        self
    }

    pub fn help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn hidden(mut self, hidden: bool) -> Self {
        self.hidden = hidden;
        self
    }

    pub fn check(mut self, check: Check) -> Self {
        self.checks.push(check);
        self
    }

    pub fn scale(mut self, scale: Arc<Scale>) -> Self {
        self.scale = Some(scale);
        self
    }

    pub fn id(&self) -> CommandId {
        self.id
    }

    pub fn qualified_name(&self) -> &str {
        &self.name
    }

    /// Short description; falls back to the first line of the help text.
    pub fn brief_text(&self) -> &str {
        match (&self.brief, &self.help) {
            (Some(brief), _) => brief.as_str(),
            (None, Some(help)) => help.lines().next().unwrap_or_default(),
            (None, None) => "",
        }
    }

    /// Full help text; falls back to the brief.
    pub fn help_text(&self) -> &str {
        self.help
            .as_deref()
            .or(self.brief.as_deref())
            .unwrap_or_default()
    }

    /// Whether `name` is this command's name or one of its aliases.
    pub fn answers_to(&self, name: &str) -> bool {
        self.name == name || self.aliases.iter().any(|a| a == name)
    }

    /// Command checks first, then the scale's; short-circuits on failure.
    pub async fn can_run(&self, ctx: &Ctx) -> Result<bool> {
        if !run_checks(&self.checks, ctx).await? {
            return Ok(false);
        }
        match &self.scale {
            Some(scale) => run_checks(&scale.checks, ctx).await,
            None => Ok(true),
        }
    }

    /// Convert the invocation's raw arguments against this command's params.
    pub fn bind_args(&self, ctx: &Ctx) -> Result<Args, Error> {
        bind(&self.params, ctx)
    }

    pub async fn invoke(&self, ctx: Ctx) -> Result<()> {
        self.handler.call(ctx).await
    }
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("aliases", &self.aliases)
            .field("params", &self.params)
            .field("enabled", &self.enabled)
            .field("hidden", &self.hidden)
            .field("checks", &self.checks.len())
            .field("scale", &self.scale)
            .finish()
    }
}
