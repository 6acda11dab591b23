//! Posting platform access
//!
//! The sync logic talks to the platform only through [`MirrorSite`];
//! [`RedditClient`] is the production implementation.

mod reddit;
mod traits;

pub use reddit::RedditClient;
pub use traits::MirrorSite;

#[cfg(test)]
pub use traits::MockMirrorSite;
