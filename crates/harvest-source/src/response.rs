//! Wire types for search responses.

use serde::Deserialize;

use crate::TextUnit;

/// Body of a search API response. Only the post text is used.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub statuses: Vec<Status>,
}

/// One post in a search response.
#[derive(Debug, Clone, Deserialize)]
pub struct Status {
    #[serde(alias = "full_text")]
    pub text: String,
}

impl SearchResponse {
    pub fn into_units(self) -> Vec<TextUnit> {
        self.statuses
            .into_iter()
            .map(|status| TextUnit::new(status.text))
            .collect()
    }
}
