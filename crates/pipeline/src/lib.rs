//! Media merge orchestration.
//!
//! Joins a submission's per-question recordings into one merged video with
//! an external concatenation tool and records the result on the submission.

pub mod concat;
pub mod locks;
pub mod merge;

pub use concat::{FfmpegConcatenator, MediaConcatenator};
pub use locks::MergeLocks;
pub use merge::{MergeError, MergeOutcome, MergeService};
