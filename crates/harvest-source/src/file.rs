//! Offline text source backed by a saved search response.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::error::{Result, SourceError};
use crate::query::SearchQuery;
use crate::response::SearchResponse;
use crate::{TextSource, TextUnit};

/// Accepted file layouts: a raw search response or a plain list of texts.
#[derive(Deserialize)]
#[serde(untagged)]
enum SavedPosts {
    Response(SearchResponse),
    Texts(Vec<String>),
}

/// Reads posts from a JSON file instead of the network.
///
/// The query is ignored; the file is assumed to already hold the posts of
/// interest.
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TextSource for JsonFileSource {
    fn search(&self, query: &SearchQuery) -> Result<Vec<TextUnit>> {
        debug!(path = %self.path.display(), query = %query, "reading saved posts");
        let content = fs::read_to_string(&self.path).map_err(|source| SourceError::Io {
            path: self.path.clone(),
            source,
        })?;
        let units = match serde_json::from_str(&content)? {
            SavedPosts::Response(response) => response.into_units(),
            SavedPosts::Texts(texts) => texts.into_iter().map(TextUnit::new).collect(),
        };
        Ok(units)
    }
}
