//! Ready-made command behaviours

pub mod about;
pub mod help;
pub mod scripted;

pub use about::AboutCommand;
pub use help::{text_limit, HelpCommand};
pub use scripted::ScriptedCommand;
