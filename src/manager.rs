//! Command manager: owns the tree and dispatches token arrays

use std::sync::Arc;

use opentelemetry::KeyValue;
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::error::{ErrorReporter, LogReporter, Rejection, RejectionKind};
use crate::node::{permitted, CommandNode, Reply};
use crate::resolve::{MatchResult, Resolver};
use crate::roster::Roster;

/// Get or create the dispatch counter
fn dispatch_counter() -> opentelemetry::metrics::Counter<u64> {
    static COUNTER: std::sync::OnceLock<opentelemetry::metrics::Counter<u64>> =
        std::sync::OnceLock::new();
    COUNTER
        .get_or_init(|| {
            opentelemetry::global::meter("cmdtree")
                .u64_counter("cmdtree.dispatch.total")
                .with_description("Total number of dispatched command lines")
                .build()
        })
        .clone()
}

/// Descriptive metadata shown by help and about
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ManagerInfo {
    /// Display name of the plugin or tool
    pub name: String,
    /// Root command label, rendered as `/<label>`
    pub label: String,
    pub description: String,
    pub version: String,
    pub authors: Vec<String>,
    pub contributors: Vec<String>,
    pub website: String,
}

impl Default for ManagerInfo {
    fn default() -> Self {
        Self {
            name: "cmdtree".to_string(),
            label: "cmdtree".to_string(),
            description: String::new(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            authors: Vec::new(),
            contributors: Vec::new(),
            website: String::new(),
        }
    }
}

/// Everything a command behaviour gets to see when it runs
pub struct Invocation<'a, R> {
    pub requester: &'a R,
    pub manager: &'a CommandManager<R>,
    pub result: MatchResult<'a, R>,
}

impl<'a, R> Invocation<'a, R> {
    pub fn new(
        requester: &'a R,
        manager: &'a CommandManager<R>,
        result: MatchResult<'a, R>,
    ) -> Self {
        Self {
            requester,
            manager,
            result,
        }
    }
}

/// What happened to a dispatched token array
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// A node ran; its reply says whether it accepted the arguments
    Executed(Reply),
    /// Resolution failed; the rejection was also sent to the reporter
    Invalid(Rejection),
    /// Empty input and no default command
    Idle,
}

impl DispatchOutcome {
    fn label(&self) -> &'static str {
        match self {
            DispatchOutcome::Executed(reply) if reply.accepted => "executed",
            DispatchOutcome::Executed(_) => "declined",
            DispatchOutcome::Invalid(_) => "invalid",
            DispatchOutcome::Idle => "idle",
        }
    }
}

/// Split a line into tokens for dispatch
pub fn tokenize(line: &str) -> Vec<String> {
    line.split_whitespace().map(str::to_string).collect()
}

/// Split a line into tokens for completion: the last token is the one
/// being typed, empty when the line is empty or ends in whitespace
pub fn tokenize_partial(line: &str) -> Vec<String> {
    let mut tokens = tokenize(line);
    if tokens.is_empty() || line.ends_with(char::is_whitespace) {
        tokens.push(String::new());
    }
    tokens
}

/// Root of a command tree
pub struct CommandManager<R> {
    info: ManagerInfo,
    commands: Vec<CommandNode<R>>,
    default: Option<CommandNode<R>>,
    roster: Arc<dyn Roster>,
    reporter: Box<dyn ErrorReporter<R>>,
}

impl<R> CommandManager<R> {
    pub fn new(info: ManagerInfo, roster: Arc<dyn Roster>) -> Self {
        Self {
            info,
            commands: Vec::new(),
            default: None,
            roster,
            reporter: Box::new(LogReporter),
        }
    }

    pub fn with_reporter(mut self, reporter: impl ErrorReporter<R> + 'static) -> Self {
        self.reporter = Box::new(reporter);
        self
    }

    /// Append a top-level command; order decides name collisions
    pub fn add_command(&mut self, node: CommandNode<R>) -> &mut Self {
        self.commands.push(node);
        self
    }

    /// Command run when no tokens are given
    pub fn set_default(&mut self, node: CommandNode<R>) -> &mut Self {
        self.default = Some(node);
        self
    }

    pub fn info(&self) -> &ManagerInfo {
        &self.info
    }

    pub fn roster(&self) -> &dyn Roster {
        self.roster.as_ref()
    }

    pub fn commands(&self) -> &[CommandNode<R>] {
        &self.commands
    }

    pub fn default_command(&self) -> Option<&CommandNode<R>> {
        self.default.as_ref()
    }

    /// First top-level command named or aliased `name`, ignoring permissions
    pub fn get_command(&self, name: &str) -> Option<&CommandNode<R>> {
        self.commands.iter().find(|c| c.matches(name))
    }

    /// Top-level commands `requester` may use
    pub fn permitted(&self, requester: &R) -> Vec<&CommandNode<R>> {
        permitted(&self.commands, requester)
    }

    pub fn resolve<'a>(&'a self, requester: &'a R, tokens: &'a [String]) -> MatchResult<'a, R> {
        let top = self.permitted(requester);
        Resolver::new(requester, self.roster.as_ref()).resolve(&top, tokens)
    }

    /// Resolve `tokens` and run the matched command
    ///
    /// Invalid input is reported to the [`ErrorReporter`] and returned as
    /// [`DispatchOutcome::Invalid`]. A handler declining its arguments is
    /// passed through untouched.
    #[instrument(
        name = "cmd.dispatch",
        skip(self, requester, tokens),
        fields(tokens = tokens.len())
    )]
    pub fn dispatch(&self, requester: &R, tokens: &[String]) -> DispatchOutcome {
        let outcome = self.dispatch_inner(requester, tokens);
        dispatch_counter().add(1, &[KeyValue::new("outcome", outcome.label())]);
        outcome
    }

    /// Tokenize and dispatch a raw line
    pub fn dispatch_line(&self, requester: &R, line: &str) -> DispatchOutcome {
        self.dispatch(requester, &tokenize(line))
    }

    fn dispatch_inner(&self, requester: &R, tokens: &[String]) -> DispatchOutcome {
        if tokens.is_empty() {
            return match &self.default {
                Some(node) => {
                    debug!(node = node.name(), "running default command");
                    let result = MatchResult::default_for(node, tokens);
                    let ctx = Invocation::new(requester, self, result);
                    DispatchOutcome::Executed(node.command().execute(&ctx))
                }
                None => DispatchOutcome::Idle,
            };
        }

        let result = self.resolve(requester, tokens);
        match result.node() {
            Some(node) if result.is_dispatchable() => {
                debug!(node = node.name(), token_index = result.token_index(), "dispatching");
                let ctx = Invocation::new(requester, self, result);
                DispatchOutcome::Executed(node.command().execute(&ctx))
            }
            node => {
                let kind = match node {
                    Some(_) => RejectionKind::Usage,
                    None => RejectionKind::UnknownCommand,
                };
                let rejection = Rejection::new(kind, tokens, result.token_index());
                self.reporter.report(requester, &rejection);
                DispatchOutcome::Invalid(rejection)
            }
        }
    }
}
