pub mod args;
pub mod client;
pub mod command;
pub mod config;
pub mod context;
pub mod driver;
pub mod error;
pub mod message;
pub mod paginator;

pub use args::{ArgValue, Args, Converter, converter};
pub use client::{BotUser, Client};
pub use command::{Check, Command, CommandId, CommandParam, Handler, Scale, check};
pub use config::{BotConfig, ConfigStore, Configurable};
pub use context::Ctx;
pub use driver::Driver;
pub use error::{Error, Result};
pub use message::{Color, Embed, Reply};
pub use paginator::{Page, Paginator};
