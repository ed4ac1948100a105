//! Integration tests for the run pipeline with stub collaborators.

use std::cell::Cell;
use std::collections::BTreeSet;
use std::fs;
use std::time::Duration;

use harvest_cli::error::{ErrorKind, RunError};
use harvest_cli::pipeline::{harvest, redeem_codes, run_pipeline};
use harvest_model::{Code, FilterPolicy};
use harvest_source::{SearchQuery, SourceError, TextSource, TextUnit};
use harvest_submit::{
    AuditLog, DriverError, ElementHandle, FormDriver, NoopObserver, Pacing, RedeemPlan,
    SiteCredentials, SiteProfile, WaitPolicy,
};
use tempfile::TempDir;

/// Source that answers every query with the same posts, or fails.
struct FixedSource {
    posts: Result<Vec<&'static str>, ()>,
    calls: Cell<usize>,
}

impl FixedSource {
    fn new(posts: &[&'static str]) -> Self {
        Self {
            posts: Ok(posts.to_vec()),
            calls: Cell::new(0),
        }
    }

    fn offline() -> Self {
        Self {
            posts: Err(()),
            calls: Cell::new(0),
        }
    }
}

impl TextSource for FixedSource {
    fn search(&self, _query: &SearchQuery) -> harvest_source::Result<Vec<TextUnit>> {
        self.calls.set(self.calls.get() + 1);
        match &self.posts {
            Ok(posts) => Ok(posts.iter().copied().map(TextUnit::new).collect()),
            Err(()) => Err(SourceError::Network("connection refused".to_string())),
        }
    }
}

/// Browser whose every page has every element; answers each code with a
/// fixed message.
#[derive(Default)]
struct AcceptingDriver {
    typed: Vec<String>,
    closed: usize,
}

impl FormDriver for AcceptingDriver {
    fn open(&mut self, _url: &str) -> Result<(), DriverError> {
        Ok(())
    }

    fn find(&mut self, selector: &str) -> Result<Option<ElementHandle>, DriverError> {
        Ok(Some(ElementHandle::new(selector)))
    }

    fn click(&mut self, _element: &ElementHandle) -> Result<(), DriverError> {
        Ok(())
    }

    fn type_text(&mut self, _element: &ElementHandle, text: &str) -> Result<(), DriverError> {
        self.typed.push(text.to_string());
        Ok(())
    }

    fn read_text(&mut self, _element: &ElementHandle) -> Result<String, DriverError> {
        Ok("Invalid code".to_string())
    }

    fn close(&mut self) -> Result<(), DriverError> {
        self.closed += 1;
        Ok(())
    }
}

const ANNOUNCEMENT: &str = "Today's codes are: WIN2024 #promo\n\nLUCKY99 RADIO";

fn query() -> SearchQuery {
    SearchQuery::default()
}

fn credentials() -> SiteCredentials {
    SiteCredentials {
        user: "fan@example.com".to_string(),
        password: "secret".to_string(),
    }
}

fn plan<'a>(credentials: &'a SiteCredentials, audit: &'a AuditLog) -> RedeemPlan<'a> {
    RedeemPlan {
        profile: SiteProfile::default(),
        waits: WaitPolicy::uniform(Duration::from_millis(20), Duration::from_millis(5)),
        credentials,
        pacing: Pacing::immediate(),
        audit,
    }
}

fn codes(values: &[&str]) -> BTreeSet<Code> {
    values.iter().map(|v| Code::new(v).unwrap()).collect()
}

#[test]
fn test_harvest_extracts_announced_codes() {
    let source = FixedSource::new(&["unrelated chatter", ANNOUNCEMENT]);
    let result = harvest(&source, &query(), &FilterPolicy::default()).unwrap();
    assert_eq!(result.posts, 2);
    assert_eq!(result.codes, codes(&["WIN2024", "LUCKY99"]));
}

#[test]
fn test_harvest_without_posts_is_empty_result() {
    let source = FixedSource::new(&[]);
    let err = harvest(&source, &query(), &FilterPolicy::default()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::EmptyResult);
    assert_eq!(err.exit_code(), 4);
}

#[test]
fn test_harvest_source_failure_is_api_unavailable() {
    let source = FixedSource::offline();
    let err = harvest(&source, &query(), &FilterPolicy::default()).unwrap_err();
    assert!(matches!(err, RunError::Source(_)));
    assert_eq!(err.exit_code(), 3);
}

#[test]
fn test_pipeline_submits_and_audits_every_code() {
    let dir = TempDir::new().unwrap();
    let audit = AuditLog::new(dir.path().join("log.csv"));
    let credentials = credentials();
    let mut driver = AcceptingDriver::default();
    let borrowed = &mut driver;

    let outcome = run_pipeline(
        &FixedSource::new(&[ANNOUNCEMENT]),
        &query(),
        &FilterPolicy::default(),
        move || Ok(borrowed),
        &plan(&credentials, &audit),
        &mut NoopObserver,
    )
    .unwrap();

    let submitted: Vec<&str> = outcome.records.iter().map(|r| r.code.as_str()).collect();
    assert_eq!(submitted, ["LUCKY99", "WIN2024"]);
    assert!(outcome.records.iter().all(|r| r.message == "Invalid code"));
    assert_eq!(driver.closed, 1);
    assert!(driver.typed.iter().any(|t| t == "WIN2024"));

    let content = fs::read_to_string(audit.path()).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].ends_with(";LUCKY99;Invalid code"));
    assert!(lines[1].ends_with(";WIN2024;Invalid code"));
}

#[test]
fn test_pipeline_without_codes_never_connects() {
    let dir = TempDir::new().unwrap();
    let audit = AuditLog::new(dir.path().join("log.csv"));
    let credentials = credentials();
    let connected = Cell::new(false);

    let err = run_pipeline(
        &FixedSource::new(&["nothing to see here"]),
        &query(),
        &FilterPolicy::default(),
        || {
            connected.set(true);
            Ok(AcceptingDriver::default())
        },
        &plan(&credentials, &audit),
        &mut NoopObserver,
    )
    .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::EmptyResult);
    assert!(!connected.get());
    assert!(!audit.path().exists());
}

#[test]
fn test_driver_start_failure_is_reported() {
    let dir = TempDir::new().unwrap();
    let audit = AuditLog::new(dir.path().join("log.csv"));
    let credentials = credentials();

    let err = redeem_codes(
        || Err::<AcceptingDriver, _>(DriverError::Http("connection refused".to_string())),
        &codes(&["WIN2024"]),
        &plan(&credentials, &audit),
        &mut NoopObserver,
    )
    .unwrap_err();

    assert!(matches!(err, RunError::Browser(_)));
    assert_eq!(err.kind(), ErrorKind::Other);
}
