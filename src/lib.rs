//! Ayiou help
//!
//! A small chat bot command framework with a configurable `help` command
//! that lists the commands an invoker can see or explains a single one.

#![forbid(unsafe_code)]

pub mod bot;
pub mod core;
pub mod driver;
pub mod help;
pub mod prelude;

pub use bot::AyiouBot;
