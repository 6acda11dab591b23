//! Core data types shared by the extractor, resolver and replayer

use chrono::{DateTime, Utc};

/// One installment of the story
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chapter {
    /// Anchor text (or post title for inline segments)
    pub title: String,

    /// Absolute URL of the installment
    pub url: String,
}

impl Chapter {
    pub fn new(title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
        }
    }
}

/// Ordered chapters; position `i` (0-based) is chapter number `i + 1`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChapterList {
    chapters: Vec<Chapter>,
}

impl ChapterList {
    pub fn new(chapters: Vec<Chapter>) -> Self {
        Self { chapters }
    }

    pub fn len(&self) -> usize {
        self.chapters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chapters.is_empty()
    }

    /// Gets a chapter by its 1-indexed number
    pub fn get(&self, number: usize) -> Option<&Chapter> {
        number.checked_sub(1).and_then(|i| self.chapters.get(i))
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Chapter> {
        self.chapters.iter()
    }

    /// Returns the last `count` chapters paired with their chapter numbers,
    /// in ascending order
    ///
    /// `count` is clamped to the list length.
    pub fn tail(&self, count: usize) -> Vec<(usize, &Chapter)> {
        let count = count.min(self.chapters.len());
        let start = self.chapters.len() - count;
        self.chapters[start..]
            .iter()
            .enumerate()
            .map(|(offset, chapter)| (start + offset + 1, chapter))
            .collect()
    }
}

impl From<Vec<Chapter>> for ChapterList {
    fn from(chapters: Vec<Chapter>) -> Self {
        Self::new(chapters)
    }
}

impl<'a> IntoIterator for &'a ChapterList {
    type Item = &'a Chapter;
    type IntoIter = std::slice::Iter<'a, Chapter>;

    fn into_iter(self) -> Self::IntoIter {
        self.chapters.iter()
    }
}

/// The latest mirrored post observed at a destination
#[derive(Debug, Clone, PartialEq)]
pub struct MirrorRecord {
    /// Post title, expected to start with the chapter number
    pub title: String,

    /// The link the post points at
    pub url: String,

    /// Account that submitted the post
    pub author: String,

    /// Submission time, when the platform reports one
    pub created: Option<DateTime<Utc>>,
}

/// Reference to a newly created post
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmittedPost {
    /// Platform-assigned post id (base36, without type prefix)
    pub id: String,

    /// Full URL of the post's comment page
    pub permalink: String,
}

impl SubmittedPost {
    /// Short link suitable for notifications
    pub fn short_link(&self) -> String {
        format!("https://redd.it/{}", self.id)
    }
}
