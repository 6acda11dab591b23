//! Chapter extraction from the forum thread
//!
//! This module turns the thread's table-of-contents post into a [`ChapterList`]:
//! - Fetching the thread page (only HTTP 200 is accepted)
//! - Walking the post's anchors up to the sentinel anchor
//! - Emitting inline story segments as their own chapters

mod fetcher;
mod parser;

pub use fetcher::{build_http_client, fetch_thread};
pub use parser::{parse_thread, CONTINUATION_SUFFIX};

use crate::config::ForumConfig;
use crate::model::ChapterList;
use crate::ExtractionError;
use reqwest::Client;
use url::Url;

/// Fetches the configured thread and extracts its chapter list
///
/// A non-200 response fails before any parsing happens.
pub async fn extract_chapters(
    client: &Client,
    forum: &ForumConfig,
) -> Result<ChapterList, ExtractionError> {
    tracing::info!("Getting story links");
    let base_url = Url::parse(&forum.thread_url).map_err(|source| ExtractionError::InvalidHref {
        href: forum.thread_url.clone(),
        source,
    })?;

    let body = fetch_thread(client, &forum.thread_url).await?;
    tracing::debug!("Obtained thread page ({} bytes)", body.len());

    let chapters = parse_thread(&body, &base_url, &forum.sentinel)?;
    tracing::debug!("Extracted {} chapters", chapters.len());
    Ok(chapters)
}
