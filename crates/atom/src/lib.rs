// Atom library exports

pub mod app;
pub mod command_processor;
pub mod config;
pub mod error;
pub mod file_manager;
pub mod session;

pub use app::{App, Input, Mode};
pub use command_processor::{Command, CommandProcessor, Outcome};
pub use config::Config;
pub use error::SessionError;
pub use session::Session;
