//! Configuration module for Chapter-Mirror
//!
//! This module handles loading, parsing, and validating the TOML settings file.
//!
//! # Example
//!
//! ```no_run
//! use chapter_mirror::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("settings.toml")).unwrap();
//! println!("Mirroring {}", config.forum.thread_url);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, ForumConfig, LoggingConfig, MirrorConfig, RedditConfig, SyncConfig,
    DEFAULT_API_URL, DEFAULT_AUTH_URL, DEFAULT_BACKOFF_SECS, DEFAULT_NUMBER_SEPARATOR,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
