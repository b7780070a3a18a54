//! Command tree nodes
//!
//! A [`CommandNode`] carries the identity the resolver matches against
//! (name, aliases, usage slots, overflow flag, children) plus one boxed
//! [`Command`] holding its behaviour. The resolver only ever sees the
//! identity side; behaviours are variant records (`FnCommand`,
//! `HelpCommand`, `ScriptedCommand`, ...) behind the same trait.

use std::fmt;

use crate::keyword::{self, Keyword};
use crate::manager::Invocation;
use crate::roster::Roster;

/// Whoever issued a command
pub trait Requester {
    fn name(&self) -> &str;

    /// Named permission check, used by config-declared commands
    fn has_permission(&self, _permission: &str) -> bool {
        true
    }
}

/// Outcome of a command handler
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    /// Output text to show the requester
    pub text: String,
    /// False if the handler refused the parsed arguments
    pub accepted: bool,
}

impl Reply {
    /// Accept the call with output
    pub fn accept(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            accepted: true,
        }
    }

    /// Accept the call without output
    pub fn silent() -> Self {
        Self::accept(String::new())
    }

    /// Refuse the call
    pub fn decline() -> Self {
        Self {
            text: String::new(),
            accepted: false,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// Behaviour of a command node
///
/// Every method has a default so a variant only overrides what it needs:
/// everyone is permitted, execution declines, no extra completions.
pub trait Command<R>: Send + Sync {
    /// May `requester` see and run this node? Not inherited from the parent.
    fn permitted(&self, _requester: &R) -> bool {
        true
    }

    /// Run the node after a successful resolution
    fn execute(&self, _ctx: &Invocation<'_, R>) -> Reply {
        Reply::decline()
    }

    /// Extra completion candidates for the argument being typed
    fn complete(&self, _ctx: &Invocation<'_, R>) -> Option<Vec<String>> {
        None
    }
}

/// Node with no behaviour of its own: a structural parent or placeholder
#[derive(Debug, Default, Clone, Copy)]
pub struct Inert;

impl<R> Command<R> for Inert {}

type Handler<R> = Box<dyn Fn(&Invocation<'_, R>) -> Reply + Send + Sync>;
type Predicate<R> = Box<dyn Fn(&R) -> bool + Send + Sync>;
type Supplier<R> = Box<dyn Fn(&Invocation<'_, R>) -> Option<Vec<String>> + Send + Sync>;

/// Closure-backed command behaviour
pub struct FnCommand<R> {
    handler: Handler<R>,
    permission: Option<Predicate<R>>,
    completer: Option<Supplier<R>>,
}

impl<R> FnCommand<R> {
    pub fn new<F>(handler: F) -> Self
    where
        F: Fn(&Invocation<'_, R>) -> Reply + Send + Sync + 'static,
    {
        Self {
            handler: Box::new(handler),
            permission: None,
            completer: None,
        }
    }

    pub fn permission<P>(mut self, predicate: P) -> Self
    where
        P: Fn(&R) -> bool + Send + Sync + 'static,
    {
        self.permission = Some(Box::new(predicate));
        self
    }

    pub fn completer<C>(mut self, supplier: C) -> Self
    where
        C: Fn(&Invocation<'_, R>) -> Option<Vec<String>> + Send + Sync + 'static,
    {
        self.completer = Some(Box::new(supplier));
        self
    }
}

impl<R> Command<R> for FnCommand<R> {
    fn permitted(&self, requester: &R) -> bool {
        self.permission.as_ref().map_or(true, |p| p(requester))
    }

    fn execute(&self, ctx: &Invocation<'_, R>) -> Reply {
        (self.handler)(ctx)
    }

    fn complete(&self, ctx: &Invocation<'_, R>) -> Option<Vec<String>> {
        self.completer.as_ref().and_then(|c| c(ctx))
    }
}

/// Acceptable tokens for one argument position
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsageSlot {
    options: Vec<String>,
}

impl UsageSlot {
    pub fn new<I, S>(options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            options: options.into_iter().map(Into::into).collect(),
        }
    }

    /// Literal options and keywords, as declared
    pub fn options(&self) -> &[String] {
        &self.options
    }

    pub fn accepts(&self, argument: &str, roster: &dyn Roster) -> bool {
        keyword::slot_accepts(&self.options, argument, roster)
    }

    /// Enumerable options: literals as-is, `%player%` expanded to who is
    /// online, every other keyword left out.
    pub fn suggestions(&self, roster: &dyn Roster) -> Vec<String> {
        let mut out = Vec::new();
        for option in &self.options {
            if Keyword::from_token(option) == Some(Keyword::Player) {
                out.extend(roster.online());
            } else if !keyword::is_keyword(option) {
                out.push(option.clone());
            }
        }
        out
    }
}

/// A named, aliasable node in the command tree
pub struct CommandNode<R> {
    name: String,
    info: String,
    aliases: Vec<String>,
    usage: Vec<UsageSlot>,
    accepts_overflow: bool,
    children: Vec<CommandNode<R>>,
    command: Box<dyn Command<R>>,
}

impl<R: 'static> CommandNode<R> {
    pub fn new(name: impl Into<String>, command: impl Command<R> + 'static) -> Self {
        Self {
            name: name.into(),
            info: String::new(),
            aliases: Vec::new(),
            usage: Vec::new(),
            accepts_overflow: false,
            children: Vec::new(),
            command: Box::new(command),
        }
    }

    /// Node whose behaviour is a single handler closure
    pub fn handler<F>(name: impl Into<String>, handler: F) -> Self
    where
        F: Fn(&Invocation<'_, R>) -> Reply + Send + Sync + 'static,
    {
        Self::new(name, FnCommand::new(handler))
    }

    /// Node that only groups children
    pub fn group(name: impl Into<String>) -> Self {
        Self::new(name, Inert)
    }
}

impl<R> CommandNode<R> {
    pub fn info(mut self, info: impl Into<String>) -> Self {
        self.info = info.into();
        self
    }

    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into());
        self
    }

    pub fn aliases<I, S>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.aliases.extend(aliases.into_iter().map(Into::into));
        self
    }

    /// Replace the usage with one slot per inner list
    pub fn usage<I, J, S>(mut self, usage: I) -> Self
    where
        I: IntoIterator<Item = J>,
        J: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.usage = usage.into_iter().map(UsageSlot::new).collect();
        self
    }

    /// Append one usage slot
    pub fn slot<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.usage.push(UsageSlot::new(options));
        self
    }

    pub fn overflow(mut self, accepts_overflow: bool) -> Self {
        self.accepts_overflow = accepts_overflow;
        self
    }

    pub fn child(mut self, child: CommandNode<R>) -> Self {
        self.children.push(child);
        self
    }

    /// Attach a child in place, during assembly
    pub fn add_child(&mut self, child: CommandNode<R>) -> &mut Self {
        self.children.push(child);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.info
    }

    pub fn alias_list(&self) -> &[String] {
        &self.aliases
    }

    pub fn usage_slots(&self) -> &[UsageSlot] {
        &self.usage
    }

    pub fn accepts_overflow(&self) -> bool {
        self.accepts_overflow
    }

    pub fn children(&self) -> &[CommandNode<R>] {
        &self.children
    }

    pub fn command(&self) -> &dyn Command<R> {
        self.command.as_ref()
    }

    /// Whole-token, case-sensitive match against name or any alias
    pub fn matches(&self, token: &str) -> bool {
        self.name == token || self.aliases.iter().any(|a| a == token)
    }

    pub fn permits(&self, requester: &R) -> bool {
        self.command.permitted(requester)
    }

    /// Children `requester` may see, in declaration order
    pub fn permitted_children(&self, requester: &R) -> Vec<&CommandNode<R>> {
        permitted(&self.children, requester)
    }
}

impl<R> fmt::Debug for CommandNode<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandNode")
            .field("name", &self.name)
            .field("aliases", &self.aliases)
            .field("usage", &self.usage)
            .field("accepts_overflow", &self.accepts_overflow)
            .field("children", &self.children)
            .finish_non_exhaustive()
    }
}

/// Permission filter over one level of siblings
///
/// Each node is asked independently; recursing into children is up to
/// the caller.
pub fn permitted<'a, R>(nodes: &'a [CommandNode<R>], requester: &R) -> Vec<&'a CommandNode<R>> {
    nodes.iter().filter(|n| n.permits(requester)).collect()
}

/// Non-empty names of `nodes`, for listings and completion
pub fn visible_names<'a, R: 'a>(
    nodes: impl IntoIterator<Item = &'a CommandNode<R>>,
) -> Vec<String> {
    nodes
        .into_iter()
        .filter(|n| !n.name.is_empty())
        .map(|n| n.name.clone())
        .collect()
}
