//! Audited submission outcome.

use chrono::{Local, NaiveDateTime, Timelike};

use crate::code::Code;

/// Timestamp layout used in the audit log.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One submission attempt and the message the site showed for it.
///
/// The message is kept verbatim; success, already-redeemed and invalid
/// outcomes are not told apart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionRecord {
    pub timestamp: NaiveDateTime,
    pub code: Code,
    pub message: String,
}

impl SubmissionRecord {
    /// Record stamped with the current local time, truncated to seconds.
    pub fn now(code: Code, message: impl Into<String>) -> Self {
        let now = Local::now().naive_local();
        Self {
            timestamp: now.with_nanosecond(0).unwrap_or(now),
            code,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn formatted_timestamp(&self) -> String {
        self.timestamp.format(TIMESTAMP_FORMAT).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_timestamp_format() {
        let record = SubmissionRecord {
            timestamp: NaiveDate::from_ymd_opt(2024, 3, 9)
                .unwrap()
                .and_hms_opt(7, 5, 1)
                .unwrap(),
            code: Code::new("WIN2024").unwrap(),
            message: "Invalid code".to_string(),
        };
        assert_eq!(record.formatted_timestamp(), "2024-03-09 07:05:01");
    }

    #[test]
    fn test_now_has_whole_seconds() {
        let record = SubmissionRecord::now(Code::new("A1B2").unwrap(), "ok");
        assert_eq!(record.timestamp.nanosecond(), 0);
        assert_eq!(record.message, "ok");
    }
}
