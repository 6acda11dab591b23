//! Platform trait used by the resolver, replayer and updater

use crate::model::{MirrorRecord, SubmittedPost};
use crate::SiteResult;
use async_trait::async_trait;

#[cfg(test)]
use mockall::automock;

/// Operations the mirror needs from the posting platform
///
/// A "destination" is a community on the platform (a subreddit).
#[cfg_attr(test, automock)]
#[async_trait]
pub trait MirrorSite: Send + Sync {
    /// Exchanges stored credentials for a live session
    ///
    /// Returns the name of the account the session acts as.
    async fn authenticate(&mut self) -> SiteResult<String>;

    /// Newest post in `destination` submitted by one of `uploaders`
    ///
    /// `Ok(None)` means every candidate was scanned without a match.
    async fn latest_post(
        &self,
        destination: &str,
        uploaders: &[String],
    ) -> SiteResult<Option<MirrorRecord>>;

    /// Creates a link post, allowing resubmission of a known url
    ///
    /// A throttled attempt fails with [`crate::SiteError::RateLimited`].
    async fn submit_link(&self, destination: &str, title: &str, url: &str)
        -> SiteResult<SubmittedPost>;

    /// Sends a private message
    async fn send_message(&self, recipient: &str, subject: &str, body: &str) -> SiteResult<()>;
}
