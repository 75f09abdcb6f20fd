// Convenience re-exports: use ayiou_help::prelude::*;
pub use crate::AyiouBot;

pub use crate::core::{
    ArgValue, Args, BotConfig, BotUser, Check, Client, Color, Command, CommandParam, ConfigStore,
    Ctx, Embed, Reply, Scale, check,
};

pub use crate::core::args::{boolean, float, integer, string};

pub use crate::driver::{ConsoleDriver, MockDriver};

pub use crate::help::{HelpCommand, HelpConfig};
