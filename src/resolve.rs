//! Token resolution against the command tree
//!
//! Resolution walks one level per token. At each level the first sibling
//! whose name or alias equals the token wins. Past that node, in order:
//!
//! 1. a bare node token is always a match,
//! 2. an overflow node claims every remaining token,
//! 3. a child matching the next token takes over (structure beats usage),
//! 4. otherwise the remaining tokens are checked against the usage slots.
//!
//! Children are permission-filtered at every level, so a node the requester
//! may not use is never a candidate.

use std::fmt;

use tracing::trace;

use crate::node::{permitted, CommandNode};
use crate::roster::Roster;

/// Where and how resolution ended
pub struct MatchResult<'a, R> {
    node: Option<&'a CommandNode<R>>,
    tokens: &'a [String],
    node_index: usize,
    token_index: usize,
    valid: bool,
    in_usage: bool,
    usage_index: Option<usize>,
}

impl<'a, R> Clone for MatchResult<'a, R> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, R> Copy for MatchResult<'a, R> {}

impl<'a, R> MatchResult<'a, R> {
    fn unmatched(tokens: &'a [String]) -> Self {
        Self {
            node: None,
            tokens,
            node_index: 0,
            token_index: 0,
            valid: false,
            in_usage: false,
            usage_index: None,
        }
    }

    /// Structural match: the node itself, or the node plus its overflow
    fn structural(
        node: &'a CommandNode<R>,
        tokens: &'a [String],
        node_index: usize,
        token_index: usize,
    ) -> Self {
        Self {
            node: Some(node),
            tokens,
            node_index,
            token_index,
            valid: true,
            in_usage: false,
            usage_index: None,
        }
    }

    /// Context for a default command run on empty input
    pub(crate) fn default_for(node: &'a CommandNode<R>, tokens: &'a [String]) -> Self {
        Self::structural(node, tokens, 0, 0)
    }

    pub fn node(&self) -> Option<&'a CommandNode<R>> {
        self.node
    }

    /// The full token array resolution ran over
    pub fn tokens(&self) -> &'a [String] {
        self.tokens
    }

    /// Position of the matched node's own token
    pub fn node_index(&self) -> usize {
        self.node_index
    }

    /// Where matching stopped: the last accepted token on success, the
    /// first rejected token on failure
    pub fn token_index(&self) -> usize {
        self.token_index
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// True if matching ended while checking usage slots
    pub fn in_usage(&self) -> bool {
        self.in_usage
    }

    /// Last usage slot considered; only meaningful when [`in_usage`](Self::in_usage)
    pub fn usage_index(&self) -> Option<usize> {
        self.usage_index
    }

    pub fn current_token(&self) -> Option<&'a str> {
        self.tokens.get(self.token_index).map(String::as_str)
    }

    /// Tokens after the matched node's own token
    pub fn arguments(&self) -> &'a [String] {
        match self.node {
            Some(_) => self.tokens.get(self.node_index + 1..).unwrap_or(&[]),
            None => &[],
        }
    }

    /// Can the matched node be executed?
    pub fn is_dispatchable(&self) -> bool {
        match self.node {
            Some(node) => {
                self.valid
                    && self.token_index < self.tokens.len()
                    && !(self.in_usage && node.usage_slots().is_empty())
            }
            None => false,
        }
    }

    /// Tokens up to where matching stopped
    pub fn accepted(&self) -> &'a [String] {
        &self.tokens[..self.token_index.min(self.tokens.len())]
    }

    /// Tokens from where matching stopped
    pub fn rejected(&self) -> &'a [String] {
        &self.tokens[self.token_index.min(self.tokens.len())..]
    }
}

impl<R> fmt::Debug for MatchResult<'_, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MatchResult")
            .field("node", &self.node.map(CommandNode::name))
            .field("tokens", &self.tokens)
            .field("node_index", &self.node_index)
            .field("token_index", &self.token_index)
            .field("valid", &self.valid)
            .field("in_usage", &self.in_usage)
            .field("usage_index", &self.usage_index)
            .finish()
    }
}

/// Resolves tokens on behalf of one requester
pub struct Resolver<'a, R> {
    requester: &'a R,
    roster: &'a dyn Roster,
}

impl<'a, R> Resolver<'a, R> {
    pub fn new(requester: &'a R, roster: &'a dyn Roster) -> Self {
        Self { requester, roster }
    }

    /// Match `tokens` against `nodes`, which the caller has already
    /// permission-filtered. Pure: neither nodes nor tokens are touched.
    pub fn resolve(
        &self,
        nodes: &[&'a CommandNode<R>],
        tokens: &'a [String],
    ) -> MatchResult<'a, R> {
        self.resolve_at(nodes, tokens, 0)
    }

    fn resolve_at(
        &self,
        nodes: &[&'a CommandNode<R>],
        tokens: &'a [String],
        offset: usize,
    ) -> MatchResult<'a, R> {
        let Some(head) = tokens.get(offset) else {
            return MatchResult::unmatched(tokens);
        };
        let Some(node) = nodes.iter().copied().find(|n| n.matches(head)) else {
            return MatchResult::unmatched(tokens);
        };

        if offset + 1 == tokens.len() {
            return MatchResult::structural(node, tokens, offset, offset);
        }

        if node.accepts_overflow() {
            trace!(node = node.name(), "overflow claims remaining tokens");
            return MatchResult::structural(node, tokens, offset, offset + 1);
        }

        let children = permitted(node.children(), self.requester);
        let deeper = self.resolve_at(&children, tokens, offset + 1);
        if deeper.node.is_some() {
            return deeper;
        }

        self.check_usage(node, tokens, offset)
    }

    fn check_usage(
        &self,
        node: &'a CommandNode<R>,
        tokens: &'a [String],
        offset: usize,
    ) -> MatchResult<'a, R> {
        let arguments = &tokens[offset + 1..];
        debug_assert!(!arguments.is_empty(), "usage check needs at least one argument");

        let usage = node.usage_slots();
        let mut valid = true;
        let mut i = 0;
        while i < usage.len() && i < arguments.len() {
            if !usage[i].accepts(&arguments[i], self.roster) {
                valid = false;
                break;
            }
            i += 1;
        }

        let mut result = MatchResult {
            node: Some(node),
            tokens,
            node_index: offset,
            token_index: offset + i,
            valid: true,
            in_usage: true,
            usage_index: i.checked_sub(1),
        };

        if !(valid && arguments.len() <= usage.len()) {
            trace!(node = node.name(), slot = i, "usage rejected");
            result.valid = false;
            result.token_index = offset + i + 1;
            if !valid {
                result.usage_index = Some(i);
            }
        }
        result
    }
}
