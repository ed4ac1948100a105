//! Error types for browser sessions and the audit log.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::session::SessionState;

/// Failures reported by a [`FormDriver`](crate::FormDriver).
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DriverError {
    /// The driver server could not be reached.
    #[error("driver connection error: {0}")]
    Http(String),

    /// The driver rejected a command.
    #[error("driver command failed (HTTP {status}, {error}): {message}")]
    Command {
        status: u16,
        error: String,
        message: String,
    },

    /// The driver answered with something unexpected.
    #[error("unexpected driver response: {0}")]
    Protocol(String),

    /// A command was issued after the browser context was closed.
    #[error("browser session is already closed")]
    SessionClosed,
}

impl From<reqwest::Error> for DriverError {
    fn from(err: reqwest::Error) -> Self {
        Self::Http(err.to_string())
    }
}

impl From<serde_json::Error> for DriverError {
    fn from(err: serde_json::Error) -> Self {
        Self::Protocol(err.to_string())
    }
}

/// Failures of the audit log.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AuditError {
    #[error("failed to open audit log {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write audit log {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// A row could not be parsed back into a record.
    #[error("malformed audit log row {row} in {path}: {reason}")]
    Malformed {
        path: PathBuf,
        row: u64,
        reason: String,
    },
}

/// Fatal failures of a redemption run.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    /// The landing page could not be loaded.
    #[error("site {url} was not accessible: {source}")]
    SiteUnreachable {
        url: String,
        #[source]
        source: DriverError,
    },

    /// A required element never showed up.
    #[error("element '{selector}' did not appear within {waited:?} while {stage}")]
    ElementTimeout {
        selector: String,
        stage: &'static str,
        waited: Duration,
    },

    /// An operation was attempted in the wrong lifecycle state.
    #[error("session is {actual:?}, expected {expected:?}")]
    InvalidState {
        expected: SessionState,
        actual: SessionState,
    },

    #[error(transparent)]
    Driver(#[from] DriverError),

    #[error(transparent)]
    Audit(#[from] AuditError),
}

/// Result type for session operations.
pub type Result<T> = std::result::Result<T, SessionError>;
