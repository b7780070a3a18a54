//! Config path resolution
//!
//! Follows XDG Base Directory Specification with 12-factor env var overrides.
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `CMDTREE_CONFIG` | Config file | `~/.config/cmdtree/cmdtree.toml` |

use std::path::PathBuf;
use tracing::info;

/// Get the XDG config directory for cmdtree
///
/// Priority: `XDG_CONFIG_HOME` > `~/.config` > current directory
pub fn config_dir() -> PathBuf {
    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
        return PathBuf::from(xdg).join("cmdtree");
    }

    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home).join(".config/cmdtree");
    }

    PathBuf::from(".")
}

/// Get the config file path
///
/// Priority: `CMDTREE_CONFIG` env var > `config_dir()/cmdtree.toml`
pub fn config_path() -> PathBuf {
    std::env::var("CMDTREE_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| config_dir().join("cmdtree.toml"))
}

/// Log resolved paths for discoverability
pub fn log_paths() {
    info!("config directory: {}", config_dir().display());
    info!("config file: {}", config_path().display());
}
