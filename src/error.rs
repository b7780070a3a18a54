//! Rejections and configuration errors

use thiserror::Error;
use tracing::warn;

/// Why a token sequence could not be dispatched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectionKind {
    /// The first token names no command the requester may use
    UnknownCommand,
    /// A later token failed its usage slot, or there were too many
    Usage,
}

/// Invalid input, split where matching stopped
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("incorrect argument for command: {} >>{}<<", .accepted.join(" "), .rejected.join(" "))]
pub struct Rejection {
    pub kind: RejectionKind,
    /// Tokens that resolved
    pub accepted: Vec<String>,
    /// Tokens from the first one that did not
    pub rejected: Vec<String>,
}

impl Rejection {
    pub fn new(kind: RejectionKind, tokens: &[String], split: usize) -> Self {
        let split = split.min(tokens.len());
        Self {
            kind,
            accepted: tokens[..split].to_vec(),
            rejected: tokens[split..].to_vec(),
        }
    }
}

/// Receives rejections so the host can tell the requester
pub trait ErrorReporter<R>: Send + Sync {
    fn report(&self, requester: &R, rejection: &Rejection);
}

/// Reporter that only logs
#[derive(Debug, Default, Clone, Copy)]
pub struct LogReporter;

impl<R> ErrorReporter<R> for LogReporter {
    fn report(&self, _requester: &R, rejection: &Rejection) {
        warn!(kind = ?rejection.kind, "{}", rejection);
    }
}

/// Problems assembling a manager from configuration
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("command with an empty name cannot have children")]
    UnnamedParent,
    #[error("command '{command}' has an empty usage slot at argument {position}")]
    EmptySlot { command: String, position: usize },
    #[error("help page size must be at least 1")]
    PageSize,
    #[error("default command '{0}' is not defined")]
    UnknownDefault(String),
}
