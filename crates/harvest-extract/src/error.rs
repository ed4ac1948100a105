//! Error types for extraction.

use thiserror::Error;

/// Conditions that leave the run with nothing to submit.
///
/// None of these are failures of the harvester itself, but every one of them
/// ends the run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ExtractError {
    /// The text source returned no posts at all.
    #[error("the search returned no posts; there may be none in the requested time frame")]
    NoPosts,

    /// Posts were found, but none of them announce codes.
    #[error("none of the {scanned} posts announce codes; nothing to collect")]
    NoAnnouncements { scanned: usize },

    /// Announcement posts were found, but no word survived the filter.
    #[error("no codes found in {announcements} announcement post(s)")]
    NoCodes { announcements: usize },
}

/// Result type for extraction.
pub type Result<T> = std::result::Result<T, ExtractError>;
