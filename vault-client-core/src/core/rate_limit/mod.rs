//! Rate limit gating and countdown display
//!
//! The vault enforces the limit on chain; here the last known status only
//! decides whether the submit button is enabled and what the countdown shows.

use crate::shared::types::RateLimitStatus;
use std::time::Duration;

impl RateLimitStatus {
    pub fn is_exhausted(&self) -> bool {
        self.remaining == 0
    }

    pub fn has_reset(&self, now_ms: u64) -> bool {
        now_ms >= self.reset_time_epoch_ms
    }

    /// Exhausted limits still allow a submission once the window has rolled over
    pub fn allows_submission(&self, now_ms: u64) -> bool {
        !self.is_exhausted() || self.has_reset(now_ms)
    }

    pub fn time_until_reset(&self, now_ms: u64) -> Duration {
        Duration::from_millis(self.reset_time_epoch_ms.saturating_sub(now_ms))
    }

    /// `m:ss` until the window resets, rounded up to whole seconds
    pub fn countdown(&self, now_ms: u64) -> String {
        let remaining_ms = self.reset_time_epoch_ms.saturating_sub(now_ms);
        let seconds = remaining_ms.div_ceil(1000);
        format!("{}:{:02}", seconds / 60, seconds % 60)
    }

    /// Share of the window already used, 0.0 to 1.0
    pub fn usage_ratio(&self) -> f64 {
        if self.total == 0 {
            return 1.0;
        }
        let used = self.total.saturating_sub(self.remaining);
        f64::from(used) / f64::from(self.total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status(remaining: u32, reset_time_epoch_ms: u64) -> RateLimitStatus {
        RateLimitStatus {
            remaining,
            total: 10,
            reset_time_epoch_ms,
        }
    }

    #[test]
    fn test_gating() {
        assert!(status(3, 10_000).allows_submission(0));
        assert!(!status(0, 10_000).allows_submission(9_999));
        assert!(status(0, 10_000).allows_submission(10_000));
    }

    #[test]
    fn test_countdown() {
        assert_eq!(status(0, 125_000).countdown(0), "2:05");
        assert_eq!(status(0, 1_500).countdown(0), "0:02");
        assert_eq!(status(0, 1_000).countdown(5_000), "0:00");
        assert_eq!(status(0, 61_000).time_until_reset(1_000), Duration::from_secs(60));
    }

    #[test]
    fn test_usage_ratio() {
        assert_eq!(status(10, 0).usage_ratio(), 0.0);
        assert_eq!(status(5, 0).usage_ratio(), 0.5);
        let empty = RateLimitStatus {
            remaining: 0,
            total: 0,
            reset_time_epoch_ms: 0,
        };
        assert_eq!(empty.usage_ratio(), 1.0);
    }
}
