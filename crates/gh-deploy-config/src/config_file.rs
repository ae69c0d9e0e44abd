//! Config file discovery
//!
//! The first readable `.gh-deploy-watch.toml` wins, looked up in order:
//! the working directory, the application config directory
//! (as `config.toml`), then the home directory.

use std::path::{Path, PathBuf};

const CONFIG_FILE: &str = ".gh-deploy-watch.toml";
const CONFIG_DIR_FILE: &str = "config.toml";

/// A config file that was found and read
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigSource {
    pub path: PathBuf,
    pub content: String,
}

/// Locate and read the config file, if any
pub fn load_config_file() -> Option<ConfigSource> {
    let paths = candidate_paths(
        std::env::current_dir().ok().as_deref(),
        crate::config_dir().ok().as_deref(),
        dirs::home_dir().as_deref(),
    );
    read_first(&paths)
}

fn candidate_paths(
    cwd: Option<&Path>,
    config_dir: Option<&Path>,
    home: Option<&Path>,
) -> Vec<PathBuf> {
    [
        cwd.map(|dir| dir.join(CONFIG_FILE)),
        config_dir.map(|dir| dir.join(CONFIG_DIR_FILE)),
        home.map(|dir| dir.join(CONFIG_FILE)),
    ]
    .into_iter()
    .flatten()
    .collect()
}

fn read_first(paths: &[PathBuf]) -> Option<ConfigSource> {
    paths.iter().find_map(|path| match std::fs::read_to_string(path) {
        Ok(content) => {
            log::debug!("Loaded config from {}", path.display());
            Some(ConfigSource {
                path: path.clone(),
                content,
            })
        }
        Err(e) => {
            log::trace!("No config at {}: {}", path.display(), e);
            None
        }
    })
}
