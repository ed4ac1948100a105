//! Code submission for the harvester.
//!
//! # Overview
//!
//! - [`FormDriver`]: the browser capabilities the harvester relies on;
//!   [`WebDriverClient`] provides them over the W3C WebDriver protocol.
//! - [`Session`]: the login / ready / logout lifecycle of one browser
//!   context against the redemption site.
//! - [`submit_all`]: enters every code, reads the site's answer, writes it
//!   to the [`AuditLog`], and paces itself between attempts.
//! - [`redeem`]: the whole lifecycle in one call, with guaranteed cleanup.
//!
//! Everything runs on the calling thread. Waiting for page elements and
//! pacing between codes are plain blocking sleeps.

pub mod audit;
pub mod driver;
pub mod error;
pub mod pacing;
pub mod profile;
pub mod session;
pub mod submit;
pub mod webdriver;

use std::collections::BTreeSet;

use harvest_model::{Code, SubmissionRecord};
use tracing::{info, warn};

pub use audit::AuditLog;
pub use driver::{ElementHandle, FormDriver, keys};
pub use error::{AuditError, DriverError, Result, SessionError};
pub use pacing::Pacing;
pub use profile::{SiteCredentials, SiteProfile, WaitPolicy};
pub use session::{Session, SessionState};
pub use submit::{NoopObserver, SubmissionObserver, submit_all};
pub use webdriver::{Browser, BrowserOptions, DEFAULT_WEBDRIVER_URL, WebDriverClient};

/// Everything [`redeem`] needs besides the driver and the codes.
pub struct RedeemPlan<'a> {
    pub profile: SiteProfile,
    pub waits: WaitPolicy,
    pub credentials: &'a SiteCredentials,
    pub pacing: Pacing,
    pub audit: &'a AuditLog,
}

/// Open the site, log in, submit every code, log out and close.
///
/// The session is closed exactly once whatever happens. Logout runs only
/// when every code went through; a failed logout is logged and otherwise
/// ignored because all outcomes are already in the audit log.
pub fn redeem<D: FormDriver>(
    driver: D,
    codes: &BTreeSet<Code>,
    plan: &RedeemPlan<'_>,
    observer: &mut dyn SubmissionObserver,
) -> Result<Vec<SubmissionRecord>> {
    let mut session = Session::new(driver, plan.profile.clone(), plan.waits.clone());
    let outcome = drive(&mut session, codes, plan, observer);
    if let Err(error) = session.close() {
        warn!(%error, "failed to close browser session");
    }
    if let Ok(records) = &outcome {
        info!(submitted = records.len(), "all codes submitted");
    }
    outcome
}

fn drive<D: FormDriver>(
    session: &mut Session<D>,
    codes: &BTreeSet<Code>,
    plan: &RedeemPlan<'_>,
    observer: &mut dyn SubmissionObserver,
) -> Result<Vec<SubmissionRecord>> {
    session.open()?;
    session.authenticate(plan.credentials)?;
    let records = submit_all(codes, session, plan.audit, &plan.pacing, observer)?;
    if let Err(error) = session.logout() {
        warn!(%error, "logout failed");
    }
    Ok(records)
}
