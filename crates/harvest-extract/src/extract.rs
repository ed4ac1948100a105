//! Announcement filtering and code extraction.

use std::collections::BTreeSet;

use harvest_model::{Code, FilterPolicy};
use tracing::{debug, trace};

use crate::error::{ExtractError, Result};
use crate::normalize::normalize;

/// Posts listing codes contain this phrase (compared upper-cased).
pub const ANNOUNCEMENT_MARKER: &str = "CODES ARE";

/// Whether a raw post announces codes.
#[must_use]
pub fn is_announcement(text: &str) -> bool {
    text.to_uppercase().contains(ANNOUNCEMENT_MARKER)
}

/// Keep the announcement posts, normalized, in input order.
pub fn select_announcements<I, S>(texts: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    texts
        .into_iter()
        .filter(|text| is_announcement(text.as_ref()))
        .map(|text| normalize(text.as_ref()))
        .collect()
}

/// Pull the codes out of already-selected, normalized texts.
///
/// Every whitespace-separated word the policy admits is added upper-cased;
/// the set makes repeated codes collapse into one.
///
/// # Errors
///
/// [`ExtractError::NoAnnouncements`] when `texts` is empty and
/// [`ExtractError::NoCodes`] when no word passes the policy.
pub fn extract<S: AsRef<str>>(texts: &[S], policy: &FilterPolicy) -> Result<BTreeSet<Code>> {
    if texts.is_empty() {
        return Err(ExtractError::NoAnnouncements { scanned: 0 });
    }
    let mut codes = BTreeSet::new();
    for text in texts {
        for word in text.as_ref().split_whitespace() {
            match policy.admit(word) {
                Some(code) => {
                    trace!(%code, "admitted word");
                    codes.insert(code);
                }
                None => trace!(word, "skipped word"),
            }
        }
    }
    if codes.is_empty() {
        return Err(ExtractError::NoCodes {
            announcements: texts.len(),
        });
    }
    debug!(texts = texts.len(), codes = codes.len(), "extraction complete");
    Ok(codes)
}

/// Run the whole extraction stage over raw posts.
///
/// # Errors
///
/// [`ExtractError::NoPosts`] for an empty input, otherwise whatever
/// [`select_announcements`] and [`extract`] report.
pub fn collect_codes<S: AsRef<str>>(posts: &[S], policy: &FilterPolicy) -> Result<BTreeSet<Code>> {
    if posts.is_empty() {
        return Err(ExtractError::NoPosts);
    }
    let announcements = select_announcements(posts);
    debug!(
        posts = posts.len(),
        announcements = announcements.len(),
        "selected announcement posts"
    );
    if announcements.is_empty() {
        return Err(ExtractError::NoAnnouncements {
            scanned: posts.len(),
        });
    }
    extract(&announcements, policy)
}
