//! Mirror state resolution
//!
//! A mirrored post's title starts with its chapter number followed by the
//! configured separator (`"7 - Title"`). Comparing that number with the
//! length of the freshly extracted chapter list tells how many chapters
//! still need to be submitted.

use crate::model::MirrorRecord;

/// How far behind the mirror is
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// The mirror already has every chapter
    UpToDate,

    /// The last `n` chapters are missing
    Missing(usize),

    /// The latest mirrored chapter could not be determined
    Unresolvable(String),
}

/// Extracts the leading chapter number from a mirrored title
///
/// Everything before the first `separator` must be an integer; a title
/// without the separator is read as a bare number.
///
/// # Example
///
/// ```
/// use chapter_mirror::sync::chapter_number;
///
/// assert_eq!(chapter_number("7 - Rise", " - "), Some(7));
/// assert_eq!(chapter_number("Announcement", " - "), None);
/// ```
pub fn chapter_number(title: &str, separator: &str) -> Option<i64> {
    let head = match title.split_once(separator) {
        Some((head, _)) => head,
        None => title,
    };
    head.trim().parse().ok()
}

/// Computes `missing = total - latest_number`
///
/// # Arguments
///
/// * `total` - Number of chapters in the source (`N`)
/// * `latest` - The newest mirrored post, if one was found
/// * `separator` - Separator following the number in mirrored titles
pub fn resolve(total: usize, latest: Option<&MirrorRecord>, separator: &str) -> Resolution {
    let record = match latest {
        Some(record) => record,
        None => {
            return Resolution::Unresolvable("no mirrored post found".to_string());
        }
    };

    let mirrored = match chapter_number(&record.title, separator) {
        Some(number) => number,
        None => {
            return Resolution::Unresolvable(format!(
                "latest mirrored title '{}' has no chapter number",
                record.title
            ));
        }
    };

    // Negative when the mirror is ahead of the source
    let missing = total as i64 - mirrored;
    tracing::debug!(
        "Source has {} chapters, mirror is at {} ({} missing)",
        total,
        mirrored,
        missing
    );

    if missing > 0 {
        Resolution::Missing(missing as usize)
    } else {
        Resolution::UpToDate
    }
}
