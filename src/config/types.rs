use serde::Deserialize;
use std::time::Duration;

pub const DEFAULT_AUTH_URL: &str = "https://www.reddit.com";
pub const DEFAULT_API_URL: &str = "https://oauth.reddit.com";
pub const DEFAULT_NUMBER_SEPARATOR: &str = " - ";
pub const DEFAULT_BACKOFF_SECS: u64 = 10 * 60;

/// Main configuration structure for Chapter-Mirror
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub forum: ForumConfig,
    pub reddit: RedditConfig,
    pub mirror: MirrorConfig,
    #[serde(default)]
    pub sync: SyncConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Source thread configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ForumConfig {
    /// URL of the thread whose first post holds the table of contents
    #[serde(rename = "thread-url")]
    pub thread_url: String,

    /// Anchor text marking the end of the table of contents
    pub sentinel: String,
}

/// Posting platform credentials and endpoints
#[derive(Debug, Clone, Deserialize)]
pub struct RedditConfig {
    /// User agent sent with every request, forum fetch included
    #[serde(rename = "user-agent")]
    pub user_agent: String,

    #[serde(rename = "client-id")]
    pub client_id: String,

    #[serde(rename = "client-secret")]
    pub client_secret: String,

    #[serde(rename = "redirect-uri")]
    pub redirect_uri: String,

    /// Long-lived access token, used until the first refresh
    #[serde(rename = "access-token")]
    pub access_token: String,

    #[serde(rename = "refresh-token")]
    pub refresh_token: String,

    /// OAuth scopes the tokens were granted with
    pub scopes: Vec<String>,

    /// Base URL of the OAuth token endpoint
    #[serde(rename = "auth-url", default = "default_auth_url")]
    pub auth_url: String,

    /// Base URL of the authenticated API
    #[serde(rename = "api-url", default = "default_api_url")]
    pub api_url: String,
}

/// What gets mirrored where, and by whom
#[derive(Debug, Clone, Deserialize)]
pub struct MirrorConfig {
    /// Communities the chapters are submitted to; the first one is
    /// consulted for the latest mirrored chapter
    pub destinations: Vec<String>,

    /// Account notified about new posts and problems
    pub admin: String,

    /// Accounts whose posts count as mirrored chapters
    pub uploaders: Vec<String>,

    /// Post title template with `{i}` and `{title}` placeholders
    #[serde(rename = "title-template")]
    pub title_template: String,

    /// Text between the chapter number and the rest of a mirrored title
    #[serde(rename = "number-separator", default = "default_number_separator")]
    pub number_separator: String,
}

/// Loop and back-off timing
#[derive(Debug, Clone, Deserialize)]
pub struct SyncConfig {
    /// Minutes between cycles; zero runs a single cycle
    #[serde(rename = "interval-minutes", default)]
    pub interval_minutes: u64,

    /// Seconds to wait after a rate-limited submission
    #[serde(rename = "rate-limit-backoff-secs", default = "default_backoff_secs")]
    pub rate_limit_backoff_secs: u64,
}

impl SyncConfig {
    pub fn interval(&self) -> Option<Duration> {
        (self.interval_minutes > 0).then(|| Duration::from_secs(self.interval_minutes * 60))
    }

    pub fn backoff(&self) -> Duration {
        Duration::from_secs(self.rate_limit_backoff_secs)
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            interval_minutes: 0,
            rate_limit_backoff_secs: DEFAULT_BACKOFF_SECS,
        }
    }
}

/// Log output configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoggingConfig {
    /// File receiving debug-level logs, appended to across runs
    pub file: Option<String>,
}

fn default_auth_url() -> String {
    DEFAULT_AUTH_URL.to_string()
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_number_separator() -> String {
    DEFAULT_NUMBER_SEPARATOR.to_string()
}

fn default_backoff_secs() -> u64 {
    DEFAULT_BACKOFF_SECS
}
