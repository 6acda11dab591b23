//! Chapter-Mirror: keeps a link aggregator in step with a serialized forum story
//!
//! This crate reads the table of contents of a forum thread, works out which
//! chapters have not been mirrored yet, and submits the missing ones as link
//! posts, backing off and retrying once when the platform rate-limits us.

pub mod config;
pub mod extract;
pub mod model;
pub mod site;
pub mod sync;

use thiserror::Error;

/// Main error type for Chapter-Mirror operations
#[derive(Debug, Error)]
pub enum MirrorError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    #[error("Site error: {0}")]
    Site(#[from] SiteError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Errors raised while turning the forum thread into a chapter list
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("Unexpected HTTP status {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("Failed to read response body from {url}: {source}")]
    Body { url: String, source: reqwest::Error },

    #[error("No article element found in document")]
    MissingArticle,

    #[error("No post title found in article")]
    MissingTitle,

    #[error("No anchor elements found in article")]
    MissingAnchors,

    #[error("Sentinel anchor '{sentinel}' not found")]
    MissingSentinel { sentinel: String },

    #[error("Anchor '{text}' has no href")]
    MissingHref { text: String },

    #[error("Invalid href '{href}': {source}")]
    InvalidHref {
        href: String,
        source: ::url::ParseError,
    },
}

/// Errors reported by the posting platform
#[derive(Debug, Error)]
pub enum SiteError {
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status} from {endpoint}: {body}")]
    Status {
        endpoint: String,
        status: u16,
        body: String,
    },

    #[error("Rate limited: {0}")]
    RateLimited(String),

    #[error("API error: {0}")]
    Api(String),

    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Failed to decode response: {0}")]
    Decode(String),
}

/// Result type alias for Chapter-Mirror operations
pub type Result<T> = std::result::Result<T, MirrorError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for extraction operations
pub type ExtractionResult<T> = std::result::Result<T, ExtractionError>;

/// Result type alias for platform operations
pub type SiteResult<T> = std::result::Result<T, SiteError>;

// Re-export commonly used types
pub use config::Config;
pub use model::{Chapter, ChapterList, MirrorRecord, SubmittedPost};
pub use site::{MirrorSite, RedditClient};
pub use sync::{CycleOutcome, Resolution, Updater};
