//! Where things live on the redemption site and how long to wait for them.

use std::fmt;
use std::time::Duration;

use serde::Deserialize;

/// URLs and CSS selectors of the redemption site.
///
/// Defaults describe the club rewards site the harvester was written for;
/// every field can be overridden from the config file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SiteProfile {
    pub home_url: String,
    pub login_trigger: String,
    pub login_form: String,
    pub email_field: String,
    pub password_field: String,
    pub login_button: String,
    pub code_entry: String,
    pub code_submit: String,
    pub result_message: String,
    pub logout_link: String,
}

impl Default for SiteProfile {
    fn default() -> Self {
        Self {
            home_url: "https://club1909.com/".to_string(),
            login_trigger: ".overlay-hover".to_string(),
            login_form: ".form".to_string(),
            email_field: "[name='email']".to_string(),
            password_field: "[name='password']".to_string(),
            login_button: "button.btn".to_string(),
            code_entry: "#ctl00_CntMainBody_ctl11_VoucherCodeTextBox".to_string(),
            code_submit: "#ctl00_CntMainBody_ctl11_ProcessVoucherCodeLinkButton".to_string(),
            result_message: "#VoucherCodeMessageBox".to_string(),
            logout_link: "#ctl00_NavigationControl_lnkLogOut".to_string(),
        }
    }
}

/// Bounds for polling page elements.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WaitPolicy {
    /// Delay between two probes.
    pub poll: Duration,
    /// Bound for the login trigger and the login form.
    pub login: Duration,
    /// Bound for the code entry field after logging in. The account page is slow.
    pub ready: Duration,
    /// Bound for the result message and other per-code elements.
    pub result: Duration,
}

impl Default for WaitPolicy {
    fn default() -> Self {
        Self {
            poll: Duration::from_millis(500),
            login: Duration::from_secs(10),
            ready: Duration::from_secs(20),
            result: Duration::from_secs(5),
        }
    }
}

impl WaitPolicy {
    /// Same bound everywhere, handy for tests.
    #[must_use]
    pub fn uniform(bound: Duration, poll: Duration) -> Self {
        Self {
            poll,
            login: bound,
            ready: bound,
            result: bound,
        }
    }
}

/// Login for the redemption site.
#[derive(Clone, PartialEq, Eq)]
pub struct SiteCredentials {
    pub user: String,
    pub password: String,
}

impl fmt::Debug for SiteCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SiteCredentials")
            .field("user", &self.user)
            .field("password", &"[REDACTED]")
            .finish()
    }
}
