//! Submission replay
//!
//! Missing chapters are submitted destination by destination, oldest first.
//! A rate-limited submission waits out the back-off, re-reads the
//! destination's latest mirrored post and resubmits once unless that post
//! already links to the chapter. Failures are recorded per
//! chapter/destination pair and never stop the rest of the batch.

use crate::config::MirrorConfig;
use crate::model::{Chapter, ChapterList, SubmittedPost};
use crate::site::MirrorSite;
use crate::sync::resolver::chapter_number;
use crate::{SiteError, SiteResult};
use std::time::Duration;
use thiserror::Error;

/// Subject of the message sent to the administrator after each submission
pub const NOTIFY_SUBJECT: &str = "Chapter mirror updated";

/// A chapter together with its 1-indexed number
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChapterRef {
    pub number: usize,
    pub chapter: Chapter,
}

/// A chapter that could not be mirrored to one destination
#[derive(Debug, Error)]
#[error("Failed to submit chapter {number} ('{title}') to {destination}: {source}")]
pub struct SubmissionFailure {
    pub destination: String,
    pub number: usize,
    pub title: String,
    #[source]
    pub source: SiteError,
}

/// What happened to one successfully handled chapter/destination pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionOutcome {
    /// A new post was created
    Submitted(SubmittedPost),

    /// After a rate limit the destination already linked to the chapter
    AlreadyPresent,
}

/// Summary of one replay
#[derive(Debug, Default)]
pub struct ReplayReport {
    /// (destination, chapter, post) for every new post
    pub submitted: Vec<(String, ChapterRef, SubmittedPost)>,

    /// (destination, chapter) pairs found already mirrored during a retry
    pub already_present: Vec<(String, ChapterRef)>,

    pub failures: Vec<SubmissionFailure>,
}

impl ReplayReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Formats a post title from the template's `{i}` and `{title}` placeholders
///
/// # Example
///
/// ```
/// use chapter_mirror::sync::format_title;
///
/// assert_eq!(format_title("{i} - {title}", 2, "Rise"), "2 - Rise");
/// ```
pub fn format_title(template: &str, number: usize, title: &str) -> String {
    template
        .replace("{i}", &number.to_string())
        .replace("{title}", title)
}

/// Chapter title with a leading "<number><separator>" removed when that
/// number is the chapter's own, so the template does not repeat it
fn label_for(chapter: &Chapter, number: usize, separator: &str) -> String {
    match chapter.title.split_once(separator) {
        Some((_, rest)) if chapter_number(&chapter.title, separator) == Some(number as i64) => {
            rest.trim().to_string()
        }
        _ => chapter.title.clone(),
    }
}

/// Submits missing chapters to every configured destination
pub struct Replayer<'a, S: MirrorSite> {
    site: &'a S,
    mirror: &'a MirrorConfig,
    acting_user: &'a str,
    backoff: Duration,
}

impl<'a, S: MirrorSite> Replayer<'a, S> {
    /// Creates a replayer
    ///
    /// # Arguments
    ///
    /// * `site` - Authenticated platform session
    /// * `mirror` - Destinations, identities and title template
    /// * `acting_user` - Account the session posts as
    /// * `backoff` - Wait after a rate-limited submission
    pub fn new(site: &'a S, mirror: &'a MirrorConfig, acting_user: &'a str, backoff: Duration) -> Self {
        Self {
            site,
            mirror,
            acting_user,
            backoff,
        }
    }

    /// Submits the last `missing` chapters of `chapters`, in ascending order,
    /// to each destination in turn
    pub async fn replay(&self, chapters: &ChapterList, missing: usize) -> ReplayReport {
        if missing > 1 {
            tracing::info!("Submitting {} latest links", missing);
        } else {
            tracing::info!("Submitting latest link");
        }

        // Oldest missing chapter first
        let pending: Vec<ChapterRef> = chapters
            .tail(missing)
            .into_iter()
            .map(|(number, chapter)| ChapterRef {
                number,
                chapter: chapter.clone(),
            })
            .collect();

        let mut report = ReplayReport::default();

        // One destination at a time; a failure only affects its own pair
        for destination in &self.mirror.destinations {
            for item in &pending {
                tracing::debug!("Submitting {} to {}", item.chapter.title, destination);

                match self.submit_chapter(destination, item).await {
                    Ok(SubmissionOutcome::Submitted(post)) => {
                        tracing::info!(
                            "Submitted chapter {} to {} ({}, {})",
                            item.number,
                            destination,
                            post.short_link(),
                            post.permalink
                        );
                        report
                            .submitted
                            .push((destination.clone(), item.clone(), post));
                    }
                    Ok(SubmissionOutcome::AlreadyPresent) => {
                        report.already_present.push((destination.clone(), item.clone()));
                    }
                    Err(failure) => {
                        tracing::error!("{}", failure);
                        report.failures.push(failure);
                    }
                }
            }
        }

        report
    }

    /// Submits one chapter to one destination, retrying once after a rate limit
    async fn submit_chapter(
        &self,
        destination: &str,
        item: &ChapterRef,
    ) -> Result<SubmissionOutcome, SubmissionFailure> {
        let label = label_for(&item.chapter, item.number, &self.mirror.number_separator);
        let title = format_title(&self.mirror.title_template, item.number, &label);
        let url = item.chapter.url.as_str();

        let failure = |source: SiteError| SubmissionFailure {
            destination: destination.to_string(),
            number: item.number,
            title: title.clone(),
            source,
        };

        match self.submit_and_notify(destination, &title, url).await {
            Ok(post) => return Ok(SubmissionOutcome::Submitted(post)),
            Err(SiteError::RateLimited(message)) => {
                tracing::warn!("Rate limit exceeded! {}", message);
            }
            Err(e) => return Err(failure(e)),
        }

        // Back off, then check whether the throttled attempt went through
        tracing::debug!("Waiting {:?} to resubmit.", self.backoff);
        tokio::time::sleep(self.backoff).await;

        let latest = self
            .site
            .latest_post(destination, &self.mirror.uploaders)
            .await
            .map_err(&failure)?;

        if latest.map(|post| post.url == url).unwrap_or(false) {
            tracing::debug!("Already submitted.");
            return Ok(SubmissionOutcome::AlreadyPresent);
        }

        // Single retry; a second rate limit is a failure
        tracing::debug!("Submitting now.");
        self.submit_and_notify(destination, &title, url)
            .await
            .map(SubmissionOutcome::Submitted)
            .map_err(failure)
    }

    async fn submit_and_notify(
        &self,
        destination: &str,
        title: &str,
        url: &str,
    ) -> SiteResult<SubmittedPost> {
        let post = self.site.submit_link(destination, title, url).await?;

        // The administrator is only told about posts made by other accounts
        if !self.acting_user.eq_ignore_ascii_case(&self.mirror.admin) {
            let body = format!("New post available! {} at {}", title, post.short_link());
            if let Err(e) = self
                .site
                .send_message(&self.mirror.admin, NOTIFY_SUBJECT, &body)
                .await
            {
                tracing::warn!("Failed to notify {}: {}", self.mirror.admin, e);
            }
        }

        Ok(post)
    }
}
