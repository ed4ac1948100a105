//! Run-level errors and their exit codes.

use harvest_extract::ExtractError;
use harvest_source::SourceError;
use harvest_submit::{AuditError, DriverError, SessionError};
use thiserror::Error;

use crate::config::ConfigError;

/// Broad category of a fatal error, as reported to the operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    ConfigMissing,
    ApiUnavailable,
    EmptyResult,
    SiteUnreachable,
    ElementTimeout,
    Other,
}

impl ErrorKind {
    /// Process exit code for this kind.
    #[must_use]
    pub const fn exit_code(self) -> i32 {
        match self {
            Self::Other => 1,
            Self::ConfigMissing => 2,
            Self::ApiUnavailable => 3,
            Self::EmptyResult => 4,
            Self::SiteUnreachable => 5,
            Self::ElementTimeout => 6,
        }
    }
}

/// Anything that ends a run early.
#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("{hint}: {0}", hint = .0.user_message())]
    Source(#[from] SourceError),

    #[error(transparent)]
    Empty(#[from] ExtractError),

    #[error(transparent)]
    Session(#[from] SessionError),

    /// The driver server refused to start a browser.
    #[error("could not start a browser session: {0}")]
    Browser(#[source] DriverError),

    #[error(transparent)]
    Audit(#[from] AuditError),
}

impl RunError {
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Config(_) => ErrorKind::ConfigMissing,
            Self::Source(_) => ErrorKind::ApiUnavailable,
            Self::Empty(_) => ErrorKind::EmptyResult,
            Self::Session(SessionError::SiteUnreachable { .. }) => ErrorKind::SiteUnreachable,
            Self::Session(SessionError::ElementTimeout { .. }) => ErrorKind::ElementTimeout,
            Self::Session(_) | Self::Browser(_) | Self::Audit(_) => ErrorKind::Other,
        }
    }

    #[must_use]
    pub fn exit_code(&self) -> i32 {
        self.kind().exit_code()
    }
}
