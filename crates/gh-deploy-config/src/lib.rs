//! Configuration and file management for gh-deploy-watch
//!
//! This crate provides:
//! - File path utilities for the config and cache directories
//! - Configuration file loading (TOML)
//! - Application configuration (AppConfig)
//! - Repository discovery from the local git remote

pub mod app_config;
pub mod config_file;
pub mod git_remote;
pub mod paths;

pub use app_config::AppConfig;
pub use config_file::{load_config_file, ConfigSource};
pub use git_remote::{origin_remote, parse_remote_url, RemoteRepository};
pub use paths::{cache_dir, config_dir};
