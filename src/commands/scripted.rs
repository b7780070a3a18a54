//! Commands declared in configuration

use crate::manager::Invocation;
use crate::node::{Command, Reply, Requester};

/// Fixed reply with `{sender}` and `{args}` substitution, gated by an
/// optional named permission
#[derive(Debug, Default, Clone)]
pub struct ScriptedCommand {
    reply: Option<String>,
    permission: Option<String>,
}

impl ScriptedCommand {
    pub fn new(reply: Option<String>, permission: Option<String>) -> Self {
        Self { reply, permission }
    }
}

impl<R: Requester> Command<R> for ScriptedCommand {
    fn permitted(&self, requester: &R) -> bool {
        self.permission
            .as_deref()
            .map_or(true, |p| requester.has_permission(p))
    }

    fn execute(&self, ctx: &Invocation<'_, R>) -> Reply {
        match &self.reply {
            Some(template) => Reply::accept(
                template
                    .replace("{sender}", ctx.requester.name())
                    .replace("{args}", &ctx.result.arguments().join(" ")),
            ),
            None => Reply::decline(),
        }
    }
}
