//! Application directories
//!
//! Resolved with `dirs` and created on first use:
//! - Linux: `~/.config/gh-deploy-watch/`, `~/.cache/gh-deploy-watch/`
//! - macOS: `~/Library/Application Support/gh-deploy-watch/`, `~/Library/Caches/gh-deploy-watch/`

use anyhow::{Context, Result};
use std::path::PathBuf;

const APP_NAME: &str = "gh-deploy-watch";

fn app_dir(base: Option<PathBuf>, kind: &str) -> Result<PathBuf> {
    let dir = base
        .with_context(|| format!("Could not determine {} directory", kind))?
        .join(APP_NAME);
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create {}", dir.display()))?;
    Ok(dir)
}

/// Directory holding an optional `config.toml`
pub fn config_dir() -> Result<PathBuf> {
    app_dir(dirs::config_dir(), "config")
}

/// Directory receiving log files of release builds
pub fn cache_dir() -> Result<PathBuf> {
    app_dir(dirs::cache_dir(), "cache")
}
