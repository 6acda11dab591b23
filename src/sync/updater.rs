//! Sync orchestration
//!
//! One cycle authenticates, re-extracts the chapter list, resolves the mirror
//! state against the first destination and replays whatever is missing.
//! [`Updater::run`] performs a single cycle or loops on the configured
//! interval.

use crate::config::Config;
use crate::extract::{build_http_client, extract_chapters};
use crate::model::ChapterList;
use crate::site::MirrorSite;
use crate::sync::replayer::{ReplayReport, Replayer};
use crate::sync::resolver::{resolve, Resolution};
use crate::MirrorError;
use reqwest::Client;
use std::time::Duration;

/// Subject of the message sent when the mirror state cannot be resolved
pub const PROBLEM_SUBJECT: &str = "Chapter mirror problem";

/// Body of the message sent when the mirror state cannot be resolved
pub const PROBLEM_BODY: &str = "Cannot get latest post";

/// Result of one sync cycle
#[derive(Debug)]
pub enum CycleOutcome {
    /// Nothing to submit
    UpToDate { chapters: usize },

    /// No usable mirrored post was found; nothing was submitted
    Unresolvable { reason: String },

    /// Missing chapters were replayed
    Replayed(ReplayReport),
}

/// Drives sync cycles against a [`MirrorSite`]
pub struct Updater<S: MirrorSite> {
    config: Config,
    site: S,
    client: Client,
    chapters: ChapterList,
}

impl<S: MirrorSite> Updater<S> {
    /// Creates an updater with a forum client built from the configured user agent
    pub fn new(config: Config, site: S) -> Result<Self, MirrorError> {
        let client = build_http_client(&config.reddit.user_agent)?;
        Ok(Self {
            config,
            site,
            client,
            chapters: ChapterList::default(),
        })
    }

    /// Chapter list from the most recent extraction
    pub fn chapters(&self) -> &ChapterList {
        &self.chapters
    }

    pub fn site(&self) -> &S {
        &self.site
    }

    /// Runs one cycle, or loops forever when an interval is configured
    ///
    /// In single-run mode a failed cycle is returned as an error. In looping
    /// mode failures are logged and the next cycle starts after the interval.
    pub async fn run(&mut self) -> Result<(), MirrorError> {
        match self.config.sync.interval() {
            None => {
                self.run_cycle().await?;
                Ok(())
            }
            Some(interval) => {
                self.run_loop(interval, None).await;
                Ok(())
            }
        }
    }

    /// Repeats cycles with `interval` between them
    ///
    /// Stops after `max_cycles` cycles when given, otherwise never returns.
    pub async fn run_loop(&mut self, interval: Duration, max_cycles: Option<usize>) {
        let mut completed = 0;

        loop {
            if let Err(e) = self.run_cycle().await {
                tracing::error!("Sync cycle failed: {}", e);
            }
            completed += 1;

            if max_cycles.map(|max| completed >= max).unwrap_or(false) {
                break;
            }

            tracing::debug!("Sleeping {:?} until next cycle", interval);
            tokio::time::sleep(interval).await;
        }
    }

    /// Runs a single authenticate → extract → resolve → replay cycle
    pub async fn run_cycle(&mut self) -> Result<CycleOutcome, MirrorError> {
        // Authenticate
        let acting_user = self.site.authenticate().await?;

        // Re-extract the chapter list, replacing the previous cycle's
        let chapters = extract_chapters(&self.client, &self.config.forum).await?;
        if chapters.len() < self.chapters.len() {
            tracing::warn!(
                "Chapter list shrank from {} to {}",
                self.chapters.len(),
                chapters.len()
            );
        }
        self.chapters = chapters;

        // Validation guarantees at least one destination
        let mirror = &self.config.mirror;
        let primary = mirror.destinations.first().map(String::as_str).unwrap_or_default();
        // Resolve the mirror state; a failed lookup counts as unresolvable
        let resolution = match self.site.latest_post(primary, &mirror.uploaders).await {
            Ok(latest) => {
                if let Some(record) = &latest {
                    tracing::debug!(
                        "Latest mirrored post: '{}' by {} at {:?}",
                        record.title,
                        record.author,
                        record.created
                    );
                }
                resolve(self.chapters.len(), latest.as_ref(), &mirror.number_separator)
            }
            Err(e) => Resolution::Unresolvable(format!("lookup in {} failed: {}", primary, e)),
        };

        match resolution {
            Resolution::UpToDate => {
                tracing::info!("No new chapters...");
                Ok(CycleOutcome::UpToDate {
                    chapters: self.chapters.len(),
                })
            }
            Resolution::Unresolvable(reason) => {
                // No-op for this cycle, but let the administrator know
                tracing::error!("Latest post was not found ({}); skipping this cycle", reason);
                if let Err(e) = self
                    .site
                    .send_message(&mirror.admin, PROBLEM_SUBJECT, PROBLEM_BODY)
                    .await
                {
                    tracing::warn!("Failed to alert {}: {}", mirror.admin, e);
                }
                Ok(CycleOutcome::Unresolvable { reason })
            }
            Resolution::Missing(count) => {
                tracing::info!("A new chapter!");

                // Replay the missing tail to every destination
                let replayer = Replayer::new(
                    &self.site,
                    mirror,
                    &acting_user,
                    self.config.sync.backoff(),
                );
                let report = replayer.replay(&self.chapters, count).await;

                if !report.is_clean() {
                    tracing::warn!(
                        "{} submission(s) failed this cycle",
                        report.failures.len()
                    );
                }
                Ok(CycleOutcome::Replayed(report))
            }
        }
    }
}
