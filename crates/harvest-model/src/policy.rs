//! Token filter policy applied during extraction.

use std::collections::BTreeSet;

use crate::code::Code;

/// Tokens must be strictly longer than this many characters to count as codes.
pub const MIN_CODE_LEN_EXCLUSIVE: usize = 3;

/// Words that show up around code announcements but are not codes.
pub const DEFAULT_EXCLUSIONS: &[&str] = &[
    "SPORTSNET",
    "CODE:",
    "CODES",
    "TODAY'S",
    "TODAYS",
    "ARE:",
    "RADIO",
    "BELL",
    "CENTER",
    "1909",
];

/// Length threshold plus exclusion set.
///
/// Built once at startup and handed to the extractor. Exclusions are stored
/// upper-cased and matched against whole tokens only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterPolicy {
    min_len_exclusive: usize,
    exclusions: BTreeSet<String>,
}

impl Default for FilterPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_EXCLUSIONS.iter().copied())
    }
}

impl FilterPolicy {
    /// Policy with the default length threshold and the given exclusions.
    pub fn new<I, S>(exclusions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            min_len_exclusive: MIN_CODE_LEN_EXCLUSIVE,
            exclusions: exclusions
                .into_iter()
                .map(|word| word.as_ref().to_uppercase())
                .collect(),
        }
    }

    /// Policy that excludes nothing.
    #[must_use]
    pub fn permissive() -> Self {
        Self::new(std::iter::empty::<&str>())
    }

    /// Override the length threshold.
    #[must_use]
    pub fn with_min_len_exclusive(mut self, len: usize) -> Self {
        self.min_len_exclusive = len;
        self
    }

    /// Add more exclusions on top of the current set.
    #[must_use]
    pub fn with_extra_exclusions<I, S>(mut self, extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.exclusions
            .extend(extra.into_iter().map(|word| word.as_ref().to_uppercase()));
        self
    }

    #[must_use]
    pub fn min_len_exclusive(&self) -> usize {
        self.min_len_exclusive
    }

    /// Iterate the exclusion set in sorted order.
    pub fn exclusions(&self) -> impl Iterator<Item = &str> {
        self.exclusions.iter().map(String::as_str)
    }

    /// Whether the upper-cased word is on the exclusion list.
    #[must_use]
    pub fn is_excluded(&self, word: &str) -> bool {
        self.exclusions.contains(&word.to_uppercase())
    }

    /// Turn a word into a code if it passes the length and exclusion rules.
    #[must_use]
    pub fn admit(&self, word: &str) -> Option<Code> {
        if word.chars().count() <= self.min_len_exclusive || self.is_excluded(word) {
            return None;
        }
        Code::new(word).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy_excludes_boilerplate() {
        let policy = FilterPolicy::default();
        assert!(policy.is_excluded("radio"));
        assert!(policy.is_excluded("Today's"));
        assert!(!policy.is_excluded("RADIO1234"));
    }

    #[test]
    fn test_admit_applies_length_threshold() {
        let policy = FilterPolicy::permissive();
        assert_eq!(policy.admit("ABC"), None);
        assert_eq!(policy.admit("xyz1"), Some(Code::new("XYZ1").unwrap()));
    }

    #[test]
    fn test_extra_exclusions_are_upper_cased() {
        let policy = FilterPolicy::permissive().with_extra_exclusions(["promo"]);
        assert!(policy.is_excluded("PROMO"));
        assert_eq!(policy.admit("Promo"), None);
    }

    #[test]
    fn test_custom_threshold() {
        let policy = FilterPolicy::permissive().with_min_len_exclusive(5);
        assert_eq!(policy.admit("WIN24"), None);
        assert!(policy.admit("WIN2024").is_some());
    }
}
