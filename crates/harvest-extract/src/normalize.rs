//! Text cleanup applied to every announcement before extraction.

use std::sync::LazyLock;

use regex::Regex;

static HASHTAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"#[a-zA-Z0-9-]+").expect("hashtag pattern is valid"));
static NEWLINES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n+").expect("newline pattern is valid"));
static SPACES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r" +").expect("space pattern is valid"));

/// Remove hashtags, then turn newline runs into a space, then squeeze space runs.
///
/// Each step is a full pass over the output of the previous one. Case and
/// length are otherwise preserved, and applying it twice changes nothing.
#[must_use]
pub fn normalize(text: &str) -> String {
    let without_tags = HASHTAG.replace_all(text, "");
    let single_line = NEWLINES.replace_all(&without_tags, " ");
    SPACES.replace_all(&single_line, " ").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_removes_hashtags() {
        assert_eq!(normalize("WIN2024 #promo-day now"), "WIN2024 now");
        assert_eq!(normalize("#tag"), "");
    }

    #[test]
    fn test_collapses_newlines_and_spaces() {
        assert_eq!(normalize("A\n\n\nB   C"), "A B C");
        assert_eq!(normalize("A \n B"), "A B");
    }

    #[test]
    fn test_keeps_case_and_other_whitespace() {
        assert_eq!(normalize("MiXeD\tcase"), "MiXeD\tcase");
    }

    #[test]
    fn test_lone_hash_survives() {
        assert_eq!(normalize("## 1"), "## 1");
        assert_eq!(normalize("##abc"), "#");
    }
}
