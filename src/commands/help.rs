//! `help`: paged command listing and per-command detail

use crate::keyword;
use crate::manager::{CommandManager, Invocation};
use crate::node::{visible_names, Command, CommandNode, Reply};

/// Default number of commands per help page
pub const PAGE_SIZE: usize = 5;
/// Default width budget for ` /<label> <name>: <info>` lines
pub const INFO_WIDTH: usize = 60;

/// Shorten `text` to `limit` characters, ending in `...`
///
/// The cut lands at `limit - 3`. If the word it splits would keep at most
/// `word_limit` characters, the whole word is dropped instead.
pub fn text_limit(text: &str, limit: usize, word_limit: usize) -> String {
    let chars: Vec<char> = text.chars().collect();
    if chars.len() <= limit {
        return text.to_string();
    }

    let cut = limit.saturating_sub(3);
    let end = match chars[..=cut].iter().rposition(|c| *c == ' ') {
        Some(space) if cut.saturating_sub(space + 1) <= word_limit => space,
        _ => cut,
    };

    let kept: String = chars[..end].iter().collect();
    format!("{}...", kept.trim_end())
}

pub struct HelpCommand {
    page_size: usize,
    info_width: usize,
}

impl Default for HelpCommand {
    fn default() -> Self {
        Self::new(PAGE_SIZE, INFO_WIDTH)
    }
}

impl HelpCommand {
    pub fn new(page_size: usize, info_width: usize) -> Self {
        Self {
            page_size: page_size.max(1),
            info_width,
        }
    }

    /// The `help` node: alias `?`, one free-form argument (page or command)
    pub fn node<R: 'static>(self) -> CommandNode<R> {
        CommandNode::new("help", self)
            .alias("?")
            .info("Shows all available commands.")
            .slot(["%page%", "%command%"])
    }

    /// Render page `page` (clamped) of the commands `requester` may use
    pub fn render_page<R>(&self, manager: &CommandManager<R>, requester: &R, page: i64) -> String {
        let info = manager.info();
        let commands = manager.permitted(requester);

        let mut out = format!("[{} - Help]\n", info.name);
        if !info.description.is_empty() {
            out.push_str(&format!("{}\n\n", info.description));
        }
        out.push_str("All available commands:\n");

        if commands.is_empty() {
            out.push_str("  - No commands to show...\n");
            return out;
        }

        let max_page = commands.len().div_ceil(self.page_size);
        let page = page.clamp(1, max_page as i64) as usize;

        for node in commands
            .iter()
            .skip(self.page_size * (page - 1))
            .take(self.page_size)
            .filter(|n| !n.name().is_empty())
        {
            if node.description().is_empty() {
                out.push_str(&format!(" /{} {}\n", info.label, node.name()));
            } else {
                let title = format!(" /{} {}:", info.label, node.name());
                let width = self.info_width.saturating_sub(title.chars().count());
                out.push_str(&format!("{} {}\n", title, text_limit(node.description(), width, 5)));
            }
        }

        if max_page > 1 {
            out.push_str(&format!("\n Page {} of {} - ", page, max_page));
            if page > 1 {
                out.push_str("Previous");
            }
            if page > 1 && page < max_page {
                out.push_str(" / ");
            }
            if page < max_page {
                out.push_str("Next");
            }
            out.push_str(" page\n");
        }
        out
    }

    /// Render details of one top-level command, if `requester` may use it
    pub fn render_command<R>(
        &self,
        manager: &CommandManager<R>,
        requester: &R,
        name: &str,
    ) -> Option<String> {
        let node = manager.get_command(name).filter(|n| n.permits(requester))?;
        let label = &manager.info().label;

        let mut out = format!("[{} - Command]\n", manager.info().name);
        if !node.name().is_empty() {
            out.push_str(&format!(" Command: {}\n", node.name()));
        }
        if !node.alias_list().is_empty() {
            out.push_str(&format!(" Aliases: {}\n", node.alias_list().join(", ")));
        }
        if !node.description().is_empty() {
            out.push_str(&format!(" Description: {}\n", node.description()));
        }

        let subcommands = visible_names(node.permitted_children(requester));
        let slots = node.usage_slots();
        if slots.is_empty() {
            out.push_str(&format!("\n Usage: /{} {}\n", label, node.name()));
        } else {
            let mut template = format!("/{} {}", label, node.name());
            for i in 1..=slots.len() {
                template.push_str(&format!(" <argument {}>", i));
            }
            out.push_str(&format!("\n Usage of {}:\n", template));
        }

        if !subcommands.is_empty() {
            out.push_str(&format!("   Sub commands: {}\n", subcommands.join(", ")));
        }

        for (i, slot) in slots.iter().enumerate() {
            let options: Vec<String> = slot
                .options()
                .iter()
                .map(|o| {
                    if keyword::is_keyword(o) {
                        format!("<{}>", keyword::display_name(o))
                    } else {
                        o.clone()
                    }
                })
                .collect();
            out.push_str(&format!("   Argument {}: {}\n", i + 1, options.join(" / ")));
        }
        Some(out)
    }
}

impl<R> Command<R> for HelpCommand {
    fn execute(&self, ctx: &Invocation<'_, R>) -> Reply {
        let (manager, requester) = (ctx.manager, ctx.requester);
        if !ctx.result.in_usage() {
            return Reply::accept(self.render_page(manager, requester, 1));
        }

        match ctx.result.current_token() {
            Some(token) => match token.parse::<i32>() {
                Ok(page) => Reply::accept(self.render_page(manager, requester, page.into())),
                Err(_) => self
                    .render_command(manager, requester, token)
                    .map(Reply::accept)
                    .unwrap_or_else(Reply::decline),
            },
            None => Reply::accept(self.render_page(manager, requester, 1)),
        }
    }

    fn complete(&self, ctx: &Invocation<'_, R>) -> Option<Vec<String>> {
        if ctx.result.in_usage() {
            return None;
        }
        Some(visible_names(ctx.manager.permitted(ctx.requester)))
    }
}
