//! Search query for code announcements.

use std::fmt;

use chrono::{Local, NaiveDate};

/// Account that posts the daily codes.
pub const DEFAULT_ACCOUNT: &str = "CodesClub1909";

/// Phrase every announcement contains.
pub const DEFAULT_PHRASE: &str = "codes are";

/// Posts from one account containing a phrase, since a given day.
///
/// Codes expire after a day, so the usual query starts today.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub account: String,
    pub phrase: String,
    pub since: NaiveDate,
}

impl SearchQuery {
    pub fn new(account: impl Into<String>, since: NaiveDate) -> Self {
        Self {
            account: account.into(),
            phrase: DEFAULT_PHRASE.to_string(),
            since,
        }
    }

    /// Query for `account` starting at today's local date.
    pub fn for_today(account: impl Into<String>) -> Self {
        Self::new(account, Local::now().date_naive())
    }

    #[must_use]
    pub fn with_phrase(mut self, phrase: impl Into<String>) -> Self {
        self.phrase = phrase.into();
        self
    }
}

impl Default for SearchQuery {
    fn default() -> Self {
        Self::for_today(DEFAULT_ACCOUNT)
    }
}

impl fmt::Display for SearchQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "from:{} '{}' since:{}",
            self.account,
            self.phrase,
            self.since.format("%Y-%m-%d")
        )
    }
}
