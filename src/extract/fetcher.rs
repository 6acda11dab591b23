//! HTTP fetcher for the forum thread

use crate::ExtractionError;
use reqwest::{Client, StatusCode};
use std::time::Duration;

/// Builds the HTTP client used for forum fetches
///
/// # Example
///
/// ```no_run
/// use chapter_mirror::extract::build_http_client;
///
/// let client = build_http_client("chapter-mirror/0.1 by masasin").unwrap();
/// ```
pub fn build_http_client(user_agent: &str) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent)
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches the thread page and returns its body
///
/// Anything other than `200 OK` is an [`ExtractionError::Status`]; the body of
/// an error page is never read.
pub async fn fetch_thread(client: &Client, url: &str) -> Result<String, ExtractionError> {
    tracing::debug!("Downloading forum page {}", url);

    let response = client
        .get(url)
        .send()
        .await
        .map_err(|source| ExtractionError::Http {
            url: url.to_string(),
            source,
        })?;

    let status = response.status();
    if status != StatusCode::OK {
        tracing::warn!("Forum returned HTTP {} for {}", status.as_u16(), url);
        return Err(ExtractionError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    response.text().await.map_err(|source| ExtractionError::Body {
        url: url.to_string(),
        source,
    })
}
