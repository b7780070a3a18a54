//! cmdtree - console front end for a configured command tree
//!
//! Each stdin line is dispatched as a command. A line starting with `?`
//! prints completions for the rest of the line instead. `:join <name>`
//! and `:leave <name>` change who is online; `:quit` exits.

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;

use cmdtree::config::{Config, ConsoleUser};
use cmdtree::{paths, CommandManager, DispatchOutcome, OnlineRoster};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("cmdtree=info".parse()?),
        )
        .init();

    paths::log_paths();
    let config = Config::load(paths::config_path()).context("failed to load config")?;

    let roster = Arc::new(OnlineRoster::new());
    for name in &config.players {
        roster.join(name);
    }
    info!("{} players online", roster.len());

    let manager: CommandManager<ConsoleUser> = config
        .build_manager(roster.clone())
        .context("failed to assemble command tree")?;
    info!("{} commands registered", manager.commands().len());

    let console = config.console.clone();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Some(line) = lines.next_line().await? {
        let line = line.trim_start();

        if let Some(rest) = line.strip_prefix('?') {
            for candidate in manager.complete_line(&console, rest) {
                println!("{}", candidate);
            }
            continue;
        }

        if let Some(rest) = line.strip_prefix(':') {
            let mut parts = rest.split_whitespace();
            match (parts.next(), parts.next()) {
                (Some("quit"), _) => break,
                (Some("join"), Some(name)) => {
                    let player = roster.join(name);
                    println!("{} joined ({})", player.name, player.id);
                }
                (Some("leave"), Some(name)) => match roster.leave(name) {
                    Some(player) => println!("{} left", player.name),
                    None => println!("{} is not online", name),
                },
                _ => println!("Unknown console command: {}", line),
            }
            continue;
        }

        match manager.dispatch_line(&console, line) {
            DispatchOutcome::Executed(reply) if !reply.accepted => {
                println!("Command refused: {}", line.trim());
            }
            DispatchOutcome::Executed(reply) => {
                if !reply.is_empty() {
                    print!("{}", reply.text);
                    if !reply.text.ends_with('\n') {
                        println!();
                    }
                }
            }
            DispatchOutcome::Invalid(rejection) => println!("{}", rejection),
            DispatchOutcome::Idle => {}
        }
    }

    info!("goodbye");
    Ok(())
}
