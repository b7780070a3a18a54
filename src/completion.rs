//! Tab completion
//!
//! Completion resolves everything except the token being typed, using the
//! same resolver as dispatch, so a suggestion is only offered where the
//! prefix would also dispatch. Candidates come from, in order:
//! - top-level command names (nothing typed before the partial token)
//! - permitted child names plus the first usage slot (bare node match)
//! - the next usage slot (match ended inside the usage)
//! - whatever the matched node's own completer adds
//!
//! The pool is then filtered by case-insensitive substring match.

use std::collections::HashSet;

use tracing::instrument;

use crate::manager::{tokenize_partial, CommandManager, Invocation};
use crate::node::visible_names;

impl<R> CommandManager<R> {
    /// Candidates for the last token of `tokens`, which is still being typed
    #[instrument(
        name = "cmd.complete",
        skip(self, requester, tokens),
        fields(tokens = tokens.len())
    )]
    pub fn complete(&self, requester: &R, tokens: &[String]) -> Vec<String> {
        let Some((partial, context)) = tokens.split_last() else {
            return Vec::new();
        };

        let pool = if context.is_empty() {
            visible_names(self.permitted(requester))
        } else {
            self.pool_after(requester, context)
        };

        filter(pool, partial)
    }

    /// Complete a raw input line
    pub fn complete_line(&self, requester: &R, line: &str) -> Vec<String> {
        self.complete(requester, &tokenize_partial(line))
    }

    fn pool_after(&self, requester: &R, context: &[String]) -> Vec<String> {
        let result = self.resolve(requester, context);
        let node = match result.node() {
            Some(node) if result.is_dispatchable() => node,
            _ => return Vec::new(),
        };

        let roster = self.roster();
        let mut pool = Vec::new();
        if !result.in_usage() {
            pool.extend(visible_names(node.permitted_children(requester)));
            if let Some(first) = node.usage_slots().first() {
                pool.extend(first.suggestions(roster));
            }
        } else {
            let next = result.usage_index().map_or(0, |i| i + 1);
            if let Some(slot) = node.usage_slots().get(next) {
                pool.extend(slot.suggestions(roster));
            }
        }

        let ctx = Invocation::new(requester, self, result);
        if let Some(extra) = node.command().complete(&ctx) {
            pool.extend(extra);
        }
        pool
    }
}

/// Keep candidates containing `partial`, ignoring case; first occurrence wins
pub fn filter(pool: Vec<String>, partial: &str) -> Vec<String> {
    let needle = partial.to_lowercase();
    let mut seen = HashSet::new();
    pool.into_iter()
        .filter(|c| c.to_lowercase().contains(&needle))
        .filter(|c| seen.insert(c.clone()))
        .collect()
}
