//! Synchronization of the chapter list with the mirror
//!
//! This module contains the incremental sync logic:
//! - Resolving how many chapters the mirror is missing
//! - Replaying missing chapters to every destination, with one
//!   back-off-and-retry on rate limits
//! - Running cycles once or on an interval

mod replayer;
mod resolver;
mod updater;

pub use replayer::{
    format_title, ChapterRef, ReplayReport, Replayer, SubmissionFailure, SubmissionOutcome,
    NOTIFY_SUBJECT,
};
pub use resolver::{chapter_number, resolve, Resolution};
pub use updater::{CycleOutcome, Updater, PROBLEM_BODY, PROBLEM_SUBJECT};
