use thiserror::Error;

/// Errors raised by the command framework itself.
///
/// Handlers and checks return `anyhow::Result`, so these usually travel
/// wrapped in an `anyhow::Error` and can be recovered with `downcast_ref`.
#[derive(Debug, Error)]
pub enum Error {
    #[error("no command named '{0}' is registered")]
    CommandNotFound(String),

    #[error("a command named '{0}' is already registered")]
    DuplicateCommand(String),

    #[error("checks failed for command '{0}'")]
    CheckFailed(String),

    #[error("{0}")]
    BadArgument(String),

    #[error("reply channel is closed")]
    ChannelClosed,

    #[error("config error: {0}")]
    Config(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
