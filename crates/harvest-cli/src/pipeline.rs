//! The two stages of a run: harvest codes from posts, then redeem them.
//!
//! Both stages are generic over their collaborators so they can be driven
//! by stub sources and drivers in tests.

use std::collections::BTreeSet;
use std::time::Instant;

use harvest_extract::collect_codes;
use harvest_model::{Code, FilterPolicy, SubmissionRecord};
use harvest_source::{SearchQuery, TextSource};
use harvest_submit::{DriverError, FormDriver, RedeemPlan, SubmissionObserver, redeem};
use tracing::{debug, info, info_span, trace};

use crate::error::RunError;

/// What the harvest stage produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Harvest {
    /// Number of posts the source returned.
    pub posts: usize,
    pub codes: BTreeSet<Code>,
}

/// Everything a finished run did.
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub harvest: Harvest,
    /// One record per submitted code, in submission order. Empty on dry runs.
    pub records: Vec<SubmissionRecord>,
}

/// Search `source` and extract the codes announced in the results.
///
/// Any empty outcome (no posts, no announcements, nothing left after
/// filtering) is an error: there is nothing to redeem.
pub fn harvest<S: TextSource>(
    source: &S,
    query: &SearchQuery,
    policy: &FilterPolicy,
) -> Result<Harvest, RunError> {
    let span = info_span!("harvest", query = %query);
    let _guard = span.enter();
    let start = Instant::now();

    let units = source.search(query)?;
    debug!(posts = units.len(), "search returned");
    for unit in &units {
        trace!(text = %unit.text, "post");
    }

    let codes = collect_codes(&units, policy)?;
    info!(
        posts = units.len(),
        codes = codes.len(),
        duration_ms = start.elapsed().as_millis(),
        "harvest complete"
    );
    Ok(Harvest {
        posts: units.len(),
        codes,
    })
}

/// Start a browser with `connect` and submit every code through it.
///
/// `connect` runs only once there is something to submit, so a run that
/// finds no codes never launches a browser.
pub fn redeem_codes<D, F>(
    connect: F,
    codes: &BTreeSet<Code>,
    plan: &RedeemPlan<'_>,
    observer: &mut dyn SubmissionObserver,
) -> Result<Vec<SubmissionRecord>, RunError>
where
    D: FormDriver,
    F: FnOnce() -> Result<D, DriverError>,
{
    let span = info_span!("redeem", site = %plan.profile.home_url);
    let _guard = span.enter();
    let driver = connect().map_err(RunError::Browser)?;
    Ok(redeem(driver, codes, plan, observer)?)
}

/// Both stages back to back.
pub fn run_pipeline<S, D, F>(
    source: &S,
    query: &SearchQuery,
    policy: &FilterPolicy,
    connect: F,
    plan: &RedeemPlan<'_>,
    observer: &mut dyn SubmissionObserver,
) -> Result<RunOutcome, RunError>
where
    S: TextSource,
    D: FormDriver,
    F: FnOnce() -> Result<D, DriverError>,
{
    let harvest = harvest(source, query, policy)?;
    let records = redeem_codes(connect, &harvest.codes, plan, observer)?;
    Ok(RunOutcome { harvest, records })
}
