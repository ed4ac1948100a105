use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use tracing::{info, info_span};

use harvest_cli::config::Config;
use harvest_cli::error::RunError;
use harvest_cli::pipeline::{Harvest, RunOutcome, harvest, redeem_codes};
use harvest_model::SubmissionRecord;
use harvest_source::{JsonFileSource, SearchClient, SearchQuery, TextSource};
use harvest_submit::{AuditLog, RedeemPlan, SubmissionObserver, WebDriverClient};

use crate::cli::{HistoryArgs, RunArgs, SourceArgs};

/// Result of the `run` command.
pub struct RunReport {
    pub outcome: RunOutcome,
    pub dry_run: bool,
    pub audit_log: PathBuf,
}

pub fn run_harvest(
    config: &Config,
    args: &RunArgs,
    observer: &mut dyn SubmissionObserver,
) -> Result<RunReport> {
    let span = info_span!("run", dry_run = args.dry_run);
    let _guard = span.enter();

    // Every credential the run will need is checked before any network
    // traffic happens.
    let source = build_source(config, &args.source)?;
    let site = if args.dry_run {
        None
    } else {
        Some(config.require_site().map_err(RunError::from)?)
    };

    let query = build_query(config, &args.source);
    let harvest = harvest(&source, &query, &config.filter_policy())?;
    let audit_log = args
        .audit_log
        .clone()
        .unwrap_or_else(|| config.run.audit_log.clone());

    let Some(credentials) = site else {
        info!(codes = harvest.codes.len(), "dry run, skipping submission");
        return Ok(RunReport {
            outcome: RunOutcome {
                harvest,
                records: Vec::new(),
            },
            dry_run: true,
            audit_log,
        });
    };

    let audit = AuditLog::new(audit_log.clone());
    let plan = RedeemPlan {
        profile: config.profile.clone(),
        waits: config.wait_policy(),
        credentials: &credentials,
        pacing: config.pacing(),
        audit: &audit,
    };
    let mut options = config.browser_options();
    if args.headed {
        options.headless = false;
    }
    let server = config.run.webdriver_url.as_str();
    let records = redeem_codes(
        || WebDriverClient::connect(server, &options),
        &harvest.codes,
        &plan,
        observer,
    )?;

    Ok(RunReport {
        outcome: RunOutcome { harvest, records },
        dry_run: false,
        audit_log,
    })
}

pub fn run_extract(config: &Config, args: &SourceArgs) -> Result<Harvest> {
    let source = build_source(config, args)?;
    let query = build_query(config, args);
    Ok(harvest(&source, &query, &config.filter_policy())?)
}

/// Matching records, most recent last, plus how many matched before the limit.
pub fn run_history(config: &Config, args: &HistoryArgs) -> Result<(Vec<SubmissionRecord>, usize)> {
    let path = args
        .audit_log
        .clone()
        .unwrap_or_else(|| config.run.audit_log.clone());
    let records = AuditLog::new(path.clone())
        .read_all()
        .map_err(RunError::from)
        .with_context(|| format!("read audit log {}", path.display()))?;
    let limit = args.limit.map(|n| usize::try_from(n).unwrap_or(usize::MAX));
    Ok(select_history(records, args.code.as_deref(), limit))
}

fn build_source(config: &Config, args: &SourceArgs) -> Result<Box<dyn TextSource>> {
    if let Some(path) = &args.input {
        info!(path = %path.display(), "reading posts from file");
        return Ok(Box::new(JsonFileSource::new(path.clone())));
    }
    let credentials = config.require_api().map_err(RunError::from)?;
    let client = SearchClient::new(credentials).map_err(RunError::from)?;
    Ok(Box::new(client))
}

fn build_query(config: &Config, args: &SourceArgs) -> SearchQuery {
    let account = args
        .account
        .clone()
        .unwrap_or_else(|| config.run.account.clone());
    let since: NaiveDate = args.since.unwrap_or_else(|| Local::now().date_naive());
    SearchQuery::new(account, since)
}

fn select_history(
    records: Vec<SubmissionRecord>,
    code: Option<&str>,
    limit: Option<usize>,
) -> (Vec<SubmissionRecord>, usize) {
    let wanted = code.map(|code| code.trim().to_uppercase());
    let mut matching: Vec<SubmissionRecord> = records
        .into_iter()
        .filter(|record| wanted.as_deref().is_none_or(|code| record.code.as_str() == code))
        .collect();
    let total = matching.len();
    if let Some(limit) = limit
        && total > limit
    {
        matching.drain(..total - limit);
    }
    (matching, total)
}

#[cfg(test)]
mod tests {
    use harvest_model::Code;

    use super::*;

    fn record(code: &str, message: &str) -> SubmissionRecord {
        SubmissionRecord::now(Code::new(code).unwrap(), message)
    }

    #[test]
    fn test_history_filters_by_code_ignoring_case() {
        let records = vec![
            record("WIN2024", "Invalid code"),
            record("LUCKY99", "Points added"),
            record("WIN2024", "Already used"),
        ];
        let (shown, total) = select_history(records, Some("win2024"), None);
        assert_eq!(total, 2);
        assert_eq!(shown[1].message, "Already used");
    }

    #[test]
    fn test_history_limit_keeps_most_recent() {
        let records = vec![
            record("AAAA1", "one"),
            record("BBBB2", "two"),
            record("CCCC3", "three"),
        ];
        let (shown, total) = select_history(records, None, Some(2));
        assert_eq!(total, 3);
        let messages: Vec<&str> = shown.iter().map(|r| r.message.as_str()).collect();
        assert_eq!(messages, ["two", "three"]);
    }
}
