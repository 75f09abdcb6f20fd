pub mod console;
pub mod mock;

pub use console::ConsoleDriver;
pub use mock::{MockDriver, Outbox};
