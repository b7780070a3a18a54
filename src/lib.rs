//! cmdtree - aliasable command trees with usage validation and completion
//!
//! A [`CommandManager`] owns a tree of [`CommandNode`]s. Dispatch and
//! completion share one resolver, so every suggested token also
//! validates, and every valid line has matching suggestions.
//! The `cmdtree` binary wraps a configured manager in a console REPL.

pub mod commands;
pub mod completion;
pub mod config;
pub mod error;
pub mod keyword;
pub mod manager;
pub mod node;
pub mod paths;
pub mod resolve;
pub mod roster;

pub use error::{ConfigError, ErrorReporter, LogReporter, Rejection, RejectionKind};
pub use keyword::Keyword;
pub use manager::{
    tokenize, tokenize_partial, CommandManager, DispatchOutcome, Invocation, ManagerInfo,
};
pub use node::{Command, CommandNode, FnCommand, Inert, Reply, Requester, UsageSlot};
pub use resolve::{MatchResult, Resolver};
pub use roster::{EmptyRoster, OnlineRoster, Player, Roster};
