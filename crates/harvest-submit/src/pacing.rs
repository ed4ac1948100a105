//! Delays between submissions.

use std::time::Duration;

use rand::Rng;

/// How long to let the result render and how long to idle between codes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pacing {
    /// Pause after clicking submit, before reading the result message.
    pub settle: Duration,
    /// Lower bound of the random pause between codes.
    pub min_gap: Duration,
    /// Upper bound of the random pause between codes.
    pub max_gap: Duration,
}

impl Default for Pacing {
    fn default() -> Self {
        Self {
            settle: Duration::from_millis(750),
            min_gap: Duration::from_secs(2),
            max_gap: Duration::from_secs(5),
        }
    }
}

impl Pacing {
    /// No pauses at all.
    #[must_use]
    pub fn immediate() -> Self {
        Self {
            settle: Duration::ZERO,
            min_gap: Duration::ZERO,
            max_gap: Duration::ZERO,
        }
    }

    /// Draw the next pause, uniformly between the two bounds.
    #[must_use]
    pub fn next_gap(&self) -> Duration {
        let (low, high) = if self.min_gap <= self.max_gap {
            (self.min_gap, self.max_gap)
        } else {
            (self.max_gap, self.min_gap)
        };
        if low == high {
            return low;
        }
        let millis = rand::thread_rng().gen_range(low.as_millis()..=high.as_millis());
        Duration::from_millis(u64::try_from(millis).unwrap_or(u64::MAX))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gap_stays_in_bounds() {
        let pacing = Pacing::default();
        for _ in 0..200 {
            let gap = pacing.next_gap();
            assert!(gap >= Duration::from_secs(2) && gap <= Duration::from_secs(5));
        }
    }

    #[test]
    fn test_inverted_bounds_are_swapped() {
        let pacing = Pacing {
            settle: Duration::ZERO,
            min_gap: Duration::from_millis(30),
            max_gap: Duration::from_millis(10),
        };
        let gap = pacing.next_gap();
        assert!(gap >= Duration::from_millis(10) && gap <= Duration::from_millis(30));
    }

    #[test]
    fn test_immediate_is_zero() {
        assert_eq!(Pacing::immediate().next_gap(), Duration::ZERO);
    }
}
