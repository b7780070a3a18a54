//! Configuration: manager metadata and a declarative command tree
//!
//! ```toml
//! default = "help"
//! players = ["Steve"]
//!
//! [manager]
//! name = "Demo"
//! label = "demo"
//!
//! [help]
//! page_size = 5
//!
//! [console]
//! name = "console"
//! permissions = ["*"]
//!
//! [[commands]]
//! name = "tell"
//! aliases = ["msg"]
//! usage = [["%player%"], ["%message%"]]
//! reply = "{sender} -> {args}"
//! ```

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::commands::{AboutCommand, HelpCommand, ScriptedCommand};
use crate::error::ConfigError;
use crate::manager::{CommandManager, ManagerInfo};
use crate::node::{CommandNode, Requester};
use crate::roster::Roster;

/// Top-level configuration file
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub manager: ManagerInfo,
    pub help: HelpConfig,
    /// Register the built-in `about` command
    pub about: bool,
    /// Command run on empty input (`help`, `about` or a declared command)
    pub default: Option<String>,
    pub console: ConsoleUser,
    /// Players online at startup
    pub players: Vec<String>,
    pub commands: Vec<CommandConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            manager: ManagerInfo::default(),
            help: HelpConfig::default(),
            about: true,
            default: None,
            console: ConsoleUser::default(),
            players: Vec::new(),
            commands: Vec::new(),
        }
    }
}

/// Built-in `help` command settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HelpConfig {
    pub enabled: bool,
    pub page_size: usize,
    pub info_width: usize,
}

impl Default for HelpConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            page_size: crate::commands::help::PAGE_SIZE,
            info_width: crate::commands::help::INFO_WIDTH,
        }
    }
}

/// One declared command and its children
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CommandConfig {
    pub name: String,
    pub info: String,
    pub aliases: Vec<String>,
    pub usage: Vec<Vec<String>>,
    pub overflow: bool,
    /// Named permission the requester must hold
    pub permission: Option<String>,
    /// Reply template; without one the command only groups children
    pub reply: Option<String>,
    pub children: Vec<CommandConfig>,
}

impl CommandConfig {
    pub fn build<R: Requester + 'static>(&self) -> Result<CommandNode<R>, ConfigError> {
        if self.name.is_empty() && !self.children.is_empty() {
            return Err(ConfigError::UnnamedParent);
        }
        if let Some(position) = self.usage.iter().position(Vec::is_empty) {
            return Err(ConfigError::EmptySlot {
                command: self.name.clone(),
                position: position + 1,
            });
        }

        let command = ScriptedCommand::new(self.reply.clone(), self.permission.clone());
        let mut node = CommandNode::new(self.name.clone(), command)
            .info(self.info.clone())
            .aliases(self.aliases.iter().cloned())
            .usage(self.usage.iter().cloned())
            .overflow(self.overflow);
        for child in &self.children {
            node.add_child(child.build()?);
        }
        Ok(node)
    }
}

/// Requester used by the console binary
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ConsoleUser {
    pub name: String,
    /// Granted permissions; `*` grants everything
    pub permissions: Vec<String>,
}

impl Default for ConsoleUser {
    fn default() -> Self {
        Self {
            name: "console".to_string(),
            permissions: vec!["*".to_string()],
        }
    }
}

impl Requester for ConsoleUser {
    fn name(&self) -> &str {
        &self.name
    }

    fn has_permission(&self, permission: &str) -> bool {
        self.permissions.iter().any(|p| p == "*" || p == permission)
    }
}

impl Config {
    /// Load config from a TOML file, falling back to defaults if missing
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::warn!("config not found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("failed to parse {}", path.display()))?;

        tracing::info!(
            "loaded {} commands from {}",
            config.commands.len(),
            path.display()
        );

        Ok(config)
    }

    /// Assemble a manager: declared commands first, then `help` and `about`
    pub fn build_manager<R: Requester + 'static>(
        &self,
        roster: Arc<dyn Roster>,
    ) -> Result<CommandManager<R>, ConfigError> {
        if self.help.page_size == 0 {
            return Err(ConfigError::PageSize);
        }

        let mut manager = CommandManager::new(self.manager.clone(), roster);
        for command in &self.commands {
            manager.add_command(command.build()?);
        }

        let help = || HelpCommand::new(self.help.page_size, self.help.info_width).node();
        if self.help.enabled {
            manager.add_command(help());
        }
        if self.about {
            manager.add_command(AboutCommand.node());
        }

        if let Some(name) = &self.default {
            let node = match name.as_str() {
                "help" => help(),
                "about" => AboutCommand.node(),
                other => self
                    .commands
                    .iter()
                    .find(|c| c.name == other)
                    .ok_or_else(|| ConfigError::UnknownDefault(other.to_string()))?
                    .build()?,
            };
            manager.set_default(node);
        }

        Ok(manager)
    }
}
