//! `about`: manager metadata

use crate::manager::{Invocation, ManagerInfo};
use crate::node::{Command, CommandNode, Reply};

#[derive(Debug, Default, Clone, Copy)]
pub struct AboutCommand;

impl AboutCommand {
    pub fn node<R: 'static>(self) -> CommandNode<R> {
        CommandNode::new("about", self).info("Shows more details about the plugin.")
    }
}

fn people(out: &mut String, singular: &str, names: &[String]) {
    if names.is_empty() {
        return;
    }
    let plural = if names.len() > 1 { "s" } else { "" };
    out.push_str(&format!(" {}{}: {}\n", singular, plural, names.join(", ")));
}

/// Render the about page for `info`
pub fn render(info: &ManagerInfo) -> String {
    let mut out = format!("[{} - About]\n", info.name);
    out.push_str(&format!(" Plugin: {}\n", info.name));

    if !info.version.is_empty() {
        out.push_str(&format!(" Version: {}\n\n", info.version));
    }
    if !info.description.is_empty() {
        out.push_str(&format!(" Description: {}\n\n", info.description));
    }

    people(&mut out, "Author", &info.authors);
    people(&mut out, "Contributor", &info.contributors);

    if !info.website.is_empty() {
        let lower = info.website.to_lowercase();
        let website = if lower.starts_with("http://") || lower.starts_with("https://") {
            info.website.clone()
        } else {
            format!("http://{}", info.website)
        };
        out.push_str(&format!(" Website: {}\n", website));
    }
    out
}

impl<R> Command<R> for AboutCommand {
    fn execute(&self, ctx: &Invocation<'_, R>) -> Reply {
        Reply::accept(render(ctx.manager.info()))
    }
}
