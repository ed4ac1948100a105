//! Credentials and run settings, loaded once from a TOML file.
//!
//! ```toml
//! [api]
//! consumer_key = "..."
//! consumer_secret = "..."
//! access_key = "..."
//! access_secret = "..."
//!
//! [site]
//! user = "..."
//! password = "..."
//!
//! [run]                # optional
//! audit_log = "log.csv"
//! account = "CodesClub1909"
//!
//! [selectors]          # optional, overrides the site profile
//! home_url = "https://club1909.com/"
//! ```
//!
//! The file is looked up at `--config`, then `./credentials.toml`, then the
//! platform config directory (e.g. `~/.config/code-harvester/` on Linux).

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use harvest_model::FilterPolicy;
use harvest_source::{ApiCredentials, DEFAULT_ACCOUNT};
use harvest_submit::{
    Browser, BrowserOptions, DEFAULT_WEBDRIVER_URL, Pacing, SiteCredentials, SiteProfile,
    WaitPolicy,
};
use serde::Deserialize;
use thiserror::Error;

const APP_QUALIFIER: &str = "com";
const APP_ORG: &str = "code-harvester";
const APP_NAME: &str = "code-harvester";
const CONFIG_FILENAME: &str = "credentials.toml";

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// A required value is absent or blank.
    #[error("missing required setting [{section}] {key} ({origin})")]
    Missing {
        section: &'static str,
        key: &'static str,
        origin: String,
    },
}

#[derive(Default, Deserialize)]
struct ApiSection {
    consumer_key: Option<String>,
    consumer_secret: Option<String>,
    access_key: Option<String>,
    access_secret: Option<String>,
}

#[derive(Default, Deserialize)]
struct SiteSection {
    user: Option<String>,
    password: Option<String>,
}

impl fmt::Debug for ApiSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiSection")
            .field("consumer_key", &redacted(self.consumer_key.as_ref()))
            .field("consumer_secret", &redacted(self.consumer_secret.as_ref()))
            .field("access_key", &redacted(self.access_key.as_ref()))
            .field("access_secret", &redacted(self.access_secret.as_ref()))
            .finish()
    }
}

impl fmt::Debug for SiteSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SiteSection")
            .field("user", &self.user)
            .field("password", &redacted(self.password.as_ref()))
            .finish()
    }
}

fn redacted(value: Option<&String>) -> Option<&'static str> {
    value.map(|_| "[REDACTED]")
}

/// Browser choice as written in the config file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BrowserSetting {
    #[default]
    Chrome,
    Firefox,
}

/// Non-secret settings for a run.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct RunSettings {
    /// Where submission outcomes are appended.
    pub audit_log: PathBuf,
    /// Account whose posts are searched.
    pub account: String,
    /// WebDriver server address.
    pub webdriver_url: String,
    pub browser: BrowserSetting,
    pub headless: bool,
    /// Words to exclude on top of the built-in list.
    pub extra_exclusions: Vec<String>,
}

impl Default for RunSettings {
    fn default() -> Self {
        Self {
            audit_log: PathBuf::from("log.csv"),
            account: DEFAULT_ACCOUNT.to_string(),
            webdriver_url: DEFAULT_WEBDRIVER_URL.to_string(),
            browser: BrowserSetting::default(),
            headless: true,
            extra_exclusions: Vec::new(),
        }
    }
}

/// Pacing between submissions, in config-file units.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PacingSettings {
    pub settle_ms: u64,
    pub min_gap_secs: f64,
    pub max_gap_secs: f64,
}

impl Default for PacingSettings {
    fn default() -> Self {
        Self {
            settle_ms: 750,
            min_gap_secs: 2.0,
            max_gap_secs: 5.0,
        }
    }
}

/// Element wait bounds, in config-file units.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct WaitSettings {
    pub poll_ms: u64,
    pub login_secs: f64,
    pub ready_secs: f64,
    pub result_secs: f64,
}

impl Default for WaitSettings {
    fn default() -> Self {
        Self {
            poll_ms: 500,
            login_secs: 10.0,
            ready_secs: 20.0,
            result_secs: 5.0,
        }
    }
}

#[derive(Default, Deserialize)]
#[serde(default)]
struct RawConfig {
    api: Option<ApiSection>,
    site: Option<SiteSection>,
    run: RunSettings,
    pacing: PacingSettings,
    waits: WaitSettings,
    selectors: SiteProfile,
}

/// Loaded configuration.
///
/// Credentials are validated on demand so commands only require what they
/// use; [`Config::require_api`] and [`Config::require_site`] are called
/// before any work starts.
#[derive(Debug)]
pub struct Config {
    origin: Option<PathBuf>,
    api: ApiSection,
    site: SiteSection,
    pub run: RunSettings,
    pub pacing: PacingSettings,
    pub waits: WaitSettings,
    pub profile: SiteProfile,
}

impl Default for Config {
    fn default() -> Self {
        Self::from_raw(RawConfig::default(), None)
    }
}

impl Config {
    /// Load from an explicit path.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&content, Some(path))?;
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Load from `explicit`, or the first default location that exists.
    ///
    /// With no file anywhere, an empty config is returned; commands that
    /// need credentials then fail with [`ConfigError::Missing`].
    pub fn discover(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        match default_locations().into_iter().find(|path| path.is_file()) {
            Some(path) => Self::load(&path),
            None => {
                tracing::debug!("No config file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Parse TOML text. `origin` is only used in error messages.
    pub fn from_toml_str(content: &str, origin: Option<&Path>) -> Result<Self, ConfigError> {
        let raw: RawConfig = toml::from_str(content).map_err(|source| ConfigError::Parse {
            path: origin.map(Path::to_path_buf).unwrap_or_default(),
            source,
        })?;
        Ok(Self::from_raw(raw, origin.map(Path::to_path_buf)))
    }

    fn from_raw(raw: RawConfig, origin: Option<PathBuf>) -> Self {
        Self {
            origin,
            api: raw.api.unwrap_or_default(),
            site: raw.site.unwrap_or_default(),
            run: raw.run,
            pacing: raw.pacing,
            waits: raw.waits,
            profile: raw.selectors,
        }
    }

    /// Path the config was read from, if any.
    #[must_use]
    pub fn origin(&self) -> Option<&Path> {
        self.origin.as_deref()
    }

    /// The four search API credentials.
    pub fn require_api(&self) -> Result<ApiCredentials, ConfigError> {
        Ok(ApiCredentials {
            consumer_key: self.required("api", "consumer_key", self.api.consumer_key.as_deref())?,
            consumer_secret: self.required(
                "api",
                "consumer_secret",
                self.api.consumer_secret.as_deref(),
            )?,
            access_key: self.required("api", "access_key", self.api.access_key.as_deref())?,
            access_secret: self.required(
                "api",
                "access_secret",
                self.api.access_secret.as_deref(),
            )?,
        })
    }

    /// The redemption site login.
    pub fn require_site(&self) -> Result<SiteCredentials, ConfigError> {
        Ok(SiteCredentials {
            user: self.required("site", "user", self.site.user.as_deref())?,
            password: self.required("site", "password", self.site.password.as_deref())?,
        })
    }

    fn required(
        &self,
        section: &'static str,
        key: &'static str,
        value: Option<&str>,
    ) -> Result<String, ConfigError> {
        match value.map(str::trim) {
            Some(value) if !value.is_empty() => Ok(value.to_string()),
            _ => Err(ConfigError::Missing {
                section,
                key,
                origin: match &self.origin {
                    Some(path) => format!("in {}", path.display()),
                    None => "no config file found".to_string(),
                },
            }),
        }
    }

    /// Built-in exclusions plus the configured extras.
    #[must_use]
    pub fn filter_policy(&self) -> FilterPolicy {
        FilterPolicy::default().with_extra_exclusions(&self.run.extra_exclusions)
    }

    #[must_use]
    pub fn pacing(&self) -> Pacing {
        Pacing {
            settle: Duration::from_millis(self.pacing.settle_ms),
            min_gap: secs(self.pacing.min_gap_secs),
            max_gap: secs(self.pacing.max_gap_secs),
        }
    }

    #[must_use]
    pub fn wait_policy(&self) -> WaitPolicy {
        WaitPolicy {
            poll: Duration::from_millis(self.waits.poll_ms.max(1)),
            login: secs(self.waits.login_secs),
            ready: secs(self.waits.ready_secs),
            result: secs(self.waits.result_secs),
        }
    }

    #[must_use]
    pub fn browser_options(&self) -> BrowserOptions {
        BrowserOptions {
            browser: match self.run.browser {
                BrowserSetting::Chrome => Browser::Chrome,
                BrowserSetting::Firefox => Browser::Firefox,
            },
            headless: self.run.headless,
        }
    }
}

/// Candidate config locations, most specific first.
#[must_use]
pub fn default_locations() -> Vec<PathBuf> {
    let mut locations = vec![PathBuf::from(CONFIG_FILENAME)];
    if let Some(dirs) = ProjectDirs::from(APP_QUALIFIER, APP_ORG, APP_NAME) {
        locations.push(dirs.config_dir().join(CONFIG_FILENAME));
    }
    locations
}

/// Negative or non-finite values count as zero.
fn secs(value: f64) -> Duration {
    Duration::try_from_secs_f64(value).unwrap_or(Duration::ZERO)
}
