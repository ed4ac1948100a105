//! Where the raw posts come from.
//!
//! The harvester only needs [`TextSource::search`]: give it a
//! [`SearchQuery`], get back the matching post bodies. Two sources ship here:
//!
//! - [`SearchClient`]: the social network's search API, signed with OAuth 1.0a
//! - [`JsonFileSource`]: a search response saved to disk, for offline runs

pub mod client;
pub mod error;
pub mod file;
pub mod oauth;
pub mod query;
pub mod response;

pub use client::{DEFAULT_API_BASE, SearchClient};
pub use error::{Result, SourceError};
pub use file::JsonFileSource;
pub use oauth::ApiCredentials;
pub use query::{DEFAULT_ACCOUNT, DEFAULT_PHRASE, SearchQuery};

/// One post body, exactly as the source returned it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextUnit {
    pub text: String,
}

impl TextUnit {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

impl AsRef<str> for TextUnit {
    fn as_ref(&self) -> &str {
        &self.text
    }
}

/// Anything that can answer a search for posts.
pub trait TextSource {
    /// Return the posts matching `query`.
    ///
    /// An empty vector is a valid answer; deciding whether that ends the run
    /// is up to the caller.
    fn search(&self, query: &SearchQuery) -> Result<Vec<TextUnit>>;
}

impl<T: TextSource + ?Sized> TextSource for &T {
    fn search(&self, query: &SearchQuery) -> Result<Vec<TextUnit>> {
        (**self).search(query)
    }
}

impl<T: TextSource + ?Sized> TextSource for Box<T> {
    fn search(&self, query: &SearchQuery) -> Result<Vec<TextUnit>> {
        (**self).search(query)
    }
}
