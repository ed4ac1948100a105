//! Lifecycle of one authenticated browser context.
//!
//! ```text
//! Closed -> Opened -> Authenticating -> Ready -> (Submitting -> Ready)* -> LoggedOut -> Closed
//! ```
//!
//! Any fatal failure closes the browser before the error is returned, and
//! closing is idempotent: the driver is told to close at most once.

use std::thread;
use std::time::{Duration, Instant};

use harvest_model::Code;
use tracing::{debug, info, info_span, warn};

use crate::driver::{ElementHandle, FormDriver, keys};
use crate::error::{DriverError, Result, SessionError};
use crate::profile::{SiteCredentials, SiteProfile, WaitPolicy};

/// Where a [`Session`] is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Closed,
    Opened,
    Authenticating,
    Ready,
    Submitting,
    LoggedOut,
}

/// Handles to the code form, found once the account page is ready.
#[derive(Debug, Clone)]
struct CodeForm {
    entry: ElementHandle,
    submit: ElementHandle,
}

/// One browser context against the redemption site.
pub struct Session<D: FormDriver> {
    driver: D,
    profile: SiteProfile,
    waits: WaitPolicy,
    state: SessionState,
    form: Option<CodeForm>,
    driver_closed: bool,
}

impl<D: FormDriver> Session<D> {
    pub fn new(driver: D, profile: SiteProfile, waits: WaitPolicy) -> Self {
        Self {
            driver,
            profile,
            waits,
            state: SessionState::Closed,
            form: None,
            driver_closed: false,
        }
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state
    }

    #[must_use]
    pub fn profile(&self) -> &SiteProfile {
        &self.profile
    }

    /// Read access to the driver, mostly for inspection in tests.
    #[must_use]
    pub fn driver(&self) -> &D {
        &self.driver
    }

    /// Load the landing page.
    ///
    /// # Errors
    ///
    /// [`SessionError::SiteUnreachable`] when the page does not load; the
    /// session is closed before returning.
    pub fn open(&mut self) -> Result<()> {
        self.expect_state(SessionState::Closed)?;
        let url = self.profile.home_url.clone();
        debug!(%url, "opening landing page");
        if let Err(source) = self.driver.open(&url) {
            self.close_after_failure();
            return Err(SessionError::SiteUnreachable { url, source });
        }
        self.state = SessionState::Opened;
        Ok(())
    }

    /// Log in and wait until the code entry form is available.
    ///
    /// # Errors
    ///
    /// [`SessionError::ElementTimeout`] when an awaited element never shows
    /// up, or a driver error; either way the session is closed first.
    pub fn authenticate(&mut self, credentials: &SiteCredentials) -> Result<()> {
        self.expect_state(SessionState::Opened)?;
        let span = info_span!("login", user = %credentials.user);
        let _guard = span.enter();
        self.state = SessionState::Authenticating;
        let result = self.login_steps(credentials);
        match result {
            Ok(form) => {
                self.form = Some(form);
                self.state = SessionState::Ready;
                info!("logged in, code form ready");
                Ok(())
            }
            Err(error) => {
                self.close_after_failure();
                Err(error)
            }
        }
    }

    fn login_steps(&mut self, credentials: &SiteCredentials) -> Result<CodeForm> {
        let profile = self.profile.clone();
        let login = self.waits.login;
        let trigger = self.wait_for(&profile.login_trigger, login, "opening login")?;
        self.driver.click(&trigger)?;
        self.wait_for(&profile.login_form, login, "opening login")?;

        let email = self.wait_for(&profile.email_field, login, "filling login form")?;
        self.driver.type_text(&email, &credentials.user)?;
        let password = self.wait_for(&profile.password_field, login, "filling login form")?;
        self.driver.type_text(&password, &credentials.password)?;
        let button = self.wait_for(&profile.login_button, login, "filling login form")?;
        self.driver.click(&button)?;

        // The account page takes a while to load after login.
        let ready = self.waits.ready;
        let entry = self.wait_for(&profile.code_entry, ready, "loading account page")?;
        let submit = self.wait_for(&profile.code_submit, ready, "loading account page")?;
        Ok(CodeForm { entry, submit })
    }

    /// Enter one code, submit it, and return the site's answer verbatim.
    ///
    /// `settle` is how long to let the answer render before reading it.
    pub fn submit_code(&mut self, code: &Code, settle: Duration) -> Result<String> {
        let form = self.ready_form()?;
        self.state = SessionState::Submitting;
        let result = self.submit_steps(&form, code, settle);
        match result {
            Ok(message) => Ok(message),
            Err(error) => {
                self.close_after_failure();
                Err(error)
            }
        }
    }

    fn submit_steps(&mut self, form: &CodeForm, code: &Code, settle: Duration) -> Result<String> {
        self.driver.type_text(&form.entry, code.as_str())?;
        self.driver.click(&form.submit)?;
        if !settle.is_zero() {
            thread::sleep(settle);
        }
        let selector = self.profile.result_message.clone();
        let message_box =
            self.wait_for(&selector, self.waits.result, "reading submission result")?;
        Ok(self.driver.read_text(&message_box)?)
    }

    /// Empty the code field with select-all then delete, back to `Ready`.
    ///
    /// Key presses are used instead of a plain clear so text the page
    /// re-fills or leaves half-typed is removed too.
    pub fn clear_entry(&mut self) -> Result<()> {
        self.expect_state(SessionState::Submitting)?;
        let Some(form) = self.form.clone() else {
            return Err(SessionError::InvalidState {
                expected: SessionState::Ready,
                actual: self.state,
            });
        };
        let cleared = self
            .driver
            .type_text(&form.entry, keys::SELECT_ALL)
            .and_then(|()| self.driver.type_text(&form.entry, keys::DELETE_KEY));
        if let Err(error) = cleared {
            self.close_after_failure();
            return Err(error.into());
        }
        self.state = SessionState::Ready;
        Ok(())
    }

    /// Click the logout link.
    pub fn logout(&mut self) -> Result<()> {
        self.expect_state(SessionState::Ready)?;
        let selector = self.profile.logout_link.clone();
        let link = self.wait_for(&selector, self.waits.result, "logging out")?;
        self.driver.click(&link)?;
        self.form = None;
        self.state = SessionState::LoggedOut;
        info!("logged out");
        Ok(())
    }

    /// Close the browser context. Safe to call any number of times.
    pub fn close(&mut self) -> std::result::Result<(), DriverError> {
        self.form = None;
        self.state = SessionState::Closed;
        if self.driver_closed {
            return Ok(());
        }
        self.driver_closed = true;
        debug!("closing browser session");
        self.driver.close()
    }

    fn close_after_failure(&mut self) {
        if let Err(error) = self.close() {
            warn!(%error, "failed to close browser session after error");
        }
    }

    fn ready_form(&self) -> Result<CodeForm> {
        self.expect_state(SessionState::Ready)?;
        self.form.clone().ok_or(SessionError::InvalidState {
            expected: SessionState::Ready,
            actual: self.state,
        })
    }

    fn expect_state(&self, expected: SessionState) -> Result<()> {
        if self.state == expected {
            Ok(())
        } else {
            Err(SessionError::InvalidState {
                expected,
                actual: self.state,
            })
        }
    }

    /// Poll for `selector` until it appears or `bound` runs out.
    fn wait_for(
        &mut self,
        selector: &str,
        bound: Duration,
        stage: &'static str,
    ) -> Result<ElementHandle> {
        let started = Instant::now();
        loop {
            if let Some(element) = self.driver.find(selector)? {
                return Ok(element);
            }
            let elapsed = started.elapsed();
            if elapsed >= bound {
                warn!(selector, stage, "crucial element was not located on the page");
                return Err(SessionError::ElementTimeout {
                    selector: selector.to_string(),
                    stage,
                    waited: bound,
                });
            }
            thread::sleep(self.waits.poll.min(bound - elapsed));
        }
    }
}

impl<D: FormDriver> Drop for Session<D> {
    fn drop(&mut self) {
        if !self.driver_closed {
            self.close_after_failure();
        }
    }
}
