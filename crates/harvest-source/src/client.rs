//! Search API client.
//!
//! Issues one signed `GET` against the standard search endpoint and returns
//! the post bodies of the first page of results.

use std::time::Duration;

use chrono::Utc;
use reqwest::StatusCode;
use reqwest::blocking::Client;
use reqwest::header::{AUTHORIZATION, USER_AGENT};
use tracing::{debug, warn};

use crate::error::{Result, SourceError};
use crate::oauth::{ApiCredentials, OAuthSigner, generate_nonce};
use crate::query::SearchQuery;
use crate::response::SearchResponse;
use crate::{TextSource, TextUnit};

/// Search API base URL.
pub const DEFAULT_API_BASE: &str = "https://api.twitter.com";

/// Path of the search endpoint below the base URL.
const SEARCH_PATH: &str = "/1.1/search/tweets.json";

/// Results requested per search (the endpoint maximum).
const PAGE_SIZE: &str = "100";

/// HTTP request timeout.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Rate limit windows are 15 minutes long.
const DEFAULT_RETRY_AFTER_SECS: u64 = 900;

/// Client for the search API.
pub struct SearchClient {
    /// HTTP client.
    client: Client,
    /// Base URL, without trailing slash.
    api_base: String,
    credentials: ApiCredentials,
}

impl SearchClient {
    /// Create a client against the default API base.
    pub fn new(credentials: ApiCredentials) -> Result<Self> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            client,
            api_base: DEFAULT_API_BASE.to_string(),
            credentials,
        })
    }

    /// Point the client at another base URL.
    #[must_use]
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }

    /// Get the search endpoint URL.
    fn search_url(&self) -> String {
        format!("{}{SEARCH_PATH}", self.api_base)
    }

    fn fetch(&self, query: &SearchQuery) -> Result<SearchResponse> {
        let q = query.to_string();
        let params = [("q", q.as_str()), ("count", PAGE_SIZE), ("result_type", "recent")];
        let url = self.search_url();
        let authorization = OAuthSigner::new(&self.credentials).authorization(
            "GET",
            &url,
            &params,
            &generate_nonce(),
            Utc::now().timestamp(),
        )?;
        let query_string = params
            .iter()
            .map(|(key, value)| format!("{key}={}", urlencoding::encode(value)))
            .collect::<Vec<_>>()
            .join("&");

        debug!(query = %q, "searching posts");

        let response = self
            .client
            .get(format!("{url}?{query_string}"))
            .header(AUTHORIZATION, authorization)
            .header(USER_AGENT, format!("code-harvester/{}", env!("CARGO_PKG_VERSION")))
            .send()?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            let message = response.text().unwrap_or_else(|_| "Unknown error".to_string());
            return Err(SourceError::Unauthorized {
                status: status.as_u16(),
                message,
            });
        }
        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after_secs = response
                .headers()
                .get("retry-after")
                .and_then(|value| value.to_str().ok())
                .and_then(|value| value.parse().ok())
                .unwrap_or(DEFAULT_RETRY_AFTER_SECS);
            return Err(SourceError::RateLimited { retry_after_secs });
        }
        if !status.is_success() {
            let message = response.text().unwrap_or_else(|_| "Unknown error".to_string());
            return Err(SourceError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.text()?;
        Ok(serde_json::from_str(&body)?)
    }
}

impl TextSource for SearchClient {
    fn search(&self, query: &SearchQuery) -> Result<Vec<TextUnit>> {
        let units = self.fetch(query)?.into_units();
        if units.is_empty() {
            warn!(query = %query, "search returned no posts");
        } else {
            debug!(count = units.len(), "search returned posts");
        }
        Ok(units)
    }
}
