use crate::config::types::{Config, ForumConfig, MirrorConfig, RedditConfig};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_forum_config(&config.forum)?;
    validate_reddit_config(&config.reddit)?;
    validate_mirror_config(&config.mirror)?;
    Ok(())
}

/// Validates the source thread configuration
fn validate_forum_config(config: &ForumConfig) -> Result<(), ConfigError> {
    let url = Url::parse(&config.thread_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid thread-url: {}", e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::Validation(format!(
            "thread-url '{}' must use HTTP or HTTPS",
            config.thread_url
        )));
    }

    require_non_empty("sentinel", &config.sentinel)?;

    Ok(())
}

/// Validates platform credentials and endpoints
fn validate_reddit_config(config: &RedditConfig) -> Result<(), ConfigError> {
    require_non_empty("user-agent", &config.user_agent)?;
    require_non_empty("client-id", &config.client_id)?;
    require_non_empty("client-secret", &config.client_secret)?;
    require_non_empty("refresh-token", &config.refresh_token)?;

    for (name, value) in [
        ("redirect-uri", &config.redirect_uri),
        ("auth-url", &config.auth_url),
        ("api-url", &config.api_url),
    ] {
        Url::parse(value)
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid {}: {}", name, e)))?;
    }

    if config.scopes.is_empty() {
        return Err(ConfigError::Validation(
            "scopes must list at least one scope".to_string(),
        ));
    }

    Ok(())
}

/// Validates destinations, identities and the title template
fn validate_mirror_config(config: &MirrorConfig) -> Result<(), ConfigError> {
    if config.destinations.is_empty() {
        return Err(ConfigError::Validation(
            "destinations must list at least one destination".to_string(),
        ));
    }

    for destination in &config.destinations {
        require_non_empty("destination name", destination)?;
    }

    require_non_empty("admin", &config.admin)?;

    if config.uploaders.is_empty() {
        return Err(ConfigError::Validation(
            "uploaders must list at least one account".to_string(),
        ));
    }

    validate_title_template(&config.title_template)?;
    require_non_empty("number-separator", &config.number_separator)?;

    Ok(())
}

/// The template must carry both placeholders
fn validate_title_template(template: &str) -> Result<(), ConfigError> {
    for placeholder in ["{i}", "{title}"] {
        if !template.contains(placeholder) {
            return Err(ConfigError::Validation(format!(
                "title-template '{}' is missing the {} placeholder",
                template, placeholder
            )));
        }
    }
    Ok(())
}

fn require_non_empty(name: &str, value: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::Validation(format!("{} cannot be empty", name)));
    }
    Ok(())
}
