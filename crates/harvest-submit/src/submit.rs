//! The per-code submission loop.

use std::collections::BTreeSet;
use std::thread;

use harvest_model::{Code, SubmissionRecord};
use tracing::{debug, info, info_span};

use crate::audit::AuditLog;
use crate::driver::FormDriver;
use crate::error::Result;
use crate::pacing::Pacing;
use crate::session::Session;

/// Progress callbacks for the submission loop.
pub trait SubmissionObserver {
    /// Called once before the first code with the number of codes.
    fn started(&mut self, _total: usize) {}

    /// Called after each record is written to the audit log.
    fn submitted(&mut self, _record: &SubmissionRecord) {}

    /// Called after the last code.
    fn finished(&mut self) {}
}

/// Observer that ignores every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl SubmissionObserver for NoopObserver {}

/// Submit every code once, in set order, auditing each answer.
///
/// Whatever the site answers (accepted, invalid, expired, already used) is
/// recorded verbatim and the loop moves on. Only session or audit failures
/// stop it.
pub fn submit_all<D: FormDriver>(
    codes: &BTreeSet<Code>,
    session: &mut Session<D>,
    audit: &AuditLog,
    pacing: &Pacing,
    observer: &mut dyn SubmissionObserver,
) -> Result<Vec<SubmissionRecord>> {
    let span = info_span!("submit", codes = codes.len());
    let _guard = span.enter();
    observer.started(codes.len());

    let mut records = Vec::with_capacity(codes.len());
    for code in codes {
        let message = session.submit_code(code, pacing.settle)?;
        let record = SubmissionRecord::now(code.clone(), message);
        audit.append(&record)?;
        info!(code = %record.code, result = %record.message, "submitted code");
        observer.submitted(&record);
        records.push(record);

        session.clear_entry()?;
        let gap = pacing.next_gap();
        if !gap.is_zero() {
            debug!(gap_ms = gap.as_millis(), "pausing before next code");
            thread::sleep(gap);
        }
    }

    observer.finished();
    Ok(records)
}
