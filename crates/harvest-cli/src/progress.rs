//! Terminal progress for the submission loop.

use harvest_model::SubmissionRecord;
use harvest_submit::SubmissionObserver;
use indicatif::{ProgressBar, ProgressStyle};

const TEMPLATE: &str = "{spinner} [{elapsed_precise}] {bar:30} {pos}/{len} {msg}";

/// Progress bar fed by the submission loop.
pub struct ProgressObserver {
    bar: ProgressBar,
}

impl ProgressObserver {
    /// A bar drawn on stderr.
    pub fn stderr() -> Self {
        Self {
            bar: ProgressBar::no_length(),
        }
    }

    /// A bar that never draws, for JSON logs or non-interactive output.
    pub fn hidden() -> Self {
        Self {
            bar: ProgressBar::hidden(),
        }
    }
}

impl SubmissionObserver for ProgressObserver {
    fn started(&mut self, total: usize) {
        self.bar.set_length(total as u64);
        let style = ProgressStyle::with_template(TEMPLATE)
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        self.bar.set_style(style);
    }

    fn submitted(&mut self, record: &SubmissionRecord) {
        self.bar.set_message(format!("{}: {}", record.code, record.message));
        self.bar.inc(1);
    }

    fn finished(&mut self) {
        self.bar.finish_and_clear();
    }
}

#[cfg(test)]
mod tests {
    use harvest_model::Code;

    use super::*;

    #[test]
    fn test_hidden_bar_counts_submissions() {
        let mut observer = ProgressObserver::hidden();
        observer.started(2);
        let code = Code::new("WIN2024").unwrap();
        observer.submitted(&SubmissionRecord::now(code, "Invalid code"));
        assert_eq!(observer.bar.position(), 1);
        assert_eq!(observer.bar.length(), Some(2));
        observer.finished();
        assert!(observer.bar.is_finished());
    }
}
