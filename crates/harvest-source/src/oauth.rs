//! OAuth 1.0a request signing (HMAC-SHA1).

use std::fmt;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use hmac::{Hmac, Mac};
use rand::Rng;
use rand::distributions::Alphanumeric;
use sha1::Sha1;
use urlencoding::encode;

use crate::error::{Result, SourceError};

type HmacSha1 = Hmac<Sha1>;

const NONCE_LEN: usize = 32;

/// The four API credentials: application key pair and user token pair.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiCredentials {
    pub consumer_key: String,
    pub consumer_secret: String,
    pub access_key: String,
    pub access_secret: String,
}

impl fmt::Debug for ApiCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiCredentials")
            .field("consumer_key", &self.consumer_key)
            .field("consumer_secret", &"[REDACTED]")
            .field("access_key", &self.access_key)
            .field("access_secret", &"[REDACTED]")
            .finish()
    }
}

/// Random alphanumeric nonce for one request.
#[must_use]
pub fn generate_nonce() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(NONCE_LEN)
        .map(char::from)
        .collect()
}

/// Signs requests on behalf of one set of credentials.
pub struct OAuthSigner<'a> {
    credentials: &'a ApiCredentials,
}

impl<'a> OAuthSigner<'a> {
    #[must_use]
    pub fn new(credentials: &'a ApiCredentials) -> Self {
        Self { credentials }
    }

    /// Build the `Authorization` header value for a request.
    ///
    /// `params` are the query (or form) parameters, unencoded. `nonce` and
    /// `timestamp` are passed in so signatures are reproducible.
    pub fn authorization(
        &self,
        method: &str,
        base_url: &str,
        params: &[(&str, &str)],
        nonce: &str,
        timestamp: i64,
    ) -> Result<String> {
        let timestamp = timestamp.to_string();
        let mut oauth_params = vec![
            ("oauth_consumer_key", self.credentials.consumer_key.as_str()),
            ("oauth_nonce", nonce),
            ("oauth_signature_method", "HMAC-SHA1"),
            ("oauth_timestamp", timestamp.as_str()),
            ("oauth_token", self.credentials.access_key.as_str()),
            ("oauth_version", "1.0"),
        ];

        let base = signature_base(method, base_url, params, &oauth_params);
        let signature = self.sign(&base)?;
        oauth_params.push(("oauth_signature", signature.as_str()));

        let fields: Vec<String> = oauth_params
            .iter()
            .map(|(key, value)| format!("{}=\"{}\"", encode(key), encode(value)))
            .collect();
        Ok(format!("OAuth {}", fields.join(", ")))
    }

    fn sign(&self, base: &str) -> Result<String> {
        let key = format!(
            "{}&{}",
            encode(&self.credentials.consumer_secret),
            encode(&self.credentials.access_secret)
        );
        let mut mac = HmacSha1::new_from_slice(key.as_bytes())
            .map_err(|err| SourceError::Signing(err.to_string()))?;
        mac.update(base.as_bytes());
        Ok(STANDARD.encode(mac.finalize().into_bytes()))
    }
}

/// `METHOD&url&sorted-params`, each part percent-encoded.
fn signature_base(
    method: &str,
    base_url: &str,
    params: &[(&str, &str)],
    oauth_params: &[(&str, &str)],
) -> String {
    let mut encoded: Vec<(String, String)> = params
        .iter()
        .chain(oauth_params)
        .map(|(key, value)| (encode(key).into_owned(), encode(value).into_owned()))
        .collect();
    encoded.sort();
    let joined = encoded
        .iter()
        .map(|(key, value)| format!("{key}={value}"))
        .collect::<Vec<_>>()
        .join("&");
    format!(
        "{}&{}&{}",
        method.to_uppercase(),
        encode(base_url),
        encode(&joined)
    )
}
