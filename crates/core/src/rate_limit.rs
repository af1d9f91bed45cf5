//! Login throttling policy.
//!
//! Attempts are stored in `rate_limit_attempts`; this module only decides,
//! from the failures counted inside the window, whether another attempt is
//! allowed and how long the caller must wait otherwise.

use chrono::Duration;

use crate::types::Timestamp;

/// Default number of failed attempts tolerated inside one window.
pub const DEFAULT_MAX_ATTEMPTS: i64 = 5;

/// Default window length in minutes.
pub const DEFAULT_WINDOW_MINS: i64 = 15;

/// Client address recorded when the request carries none.
pub const UNKNOWN_IP: &str = "unknown";

/// Throttle thresholds.
#[derive(Debug, Clone, Copy)]
pub struct LoginThrottle {
    pub max_attempts: i64,
    pub window_mins: i64,
}

/// Failed attempts observed inside the current window.
#[derive(Debug, Clone, Copy)]
pub struct FailureWindow {
    pub failures: i64,
    /// The earliest counted failure, if any.
    pub oldest_failure: Option<Timestamp>,
}

/// Outcome of a throttle check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThrottleDecision {
    Allowed,
    Locked { retry_after_secs: i64 },
}

impl Default for LoginThrottle {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            window_mins: DEFAULT_WINDOW_MINS,
        }
    }
}

impl LoginThrottle {
    /// Start of the window ending at `now`.
    pub fn window_start(&self, now: Timestamp) -> Timestamp {
        now - Duration::minutes(self.window_mins)
    }

    /// Decide whether a new attempt at `now` may proceed.
    ///
    /// Once locked, the caller waits until the oldest counted failure leaves
    /// the window. At least one second is always reported.
    pub fn check(&self, window: FailureWindow, now: Timestamp) -> ThrottleDecision {
        if window.failures < self.max_attempts {
            return ThrottleDecision::Allowed;
        }
        let retry_after_secs = window
            .oldest_failure
            .map(|oldest| (oldest + Duration::minutes(self.window_mins) - now).num_seconds())
            .unwrap_or(self.window_mins * 60)
            .max(1);
        ThrottleDecision::Locked { retry_after_secs }
    }
}

/// Extract the originating client address from an `X-Forwarded-For` value.
///
/// Takes the first hop; falls back to [`UNKNOWN_IP`].
pub fn client_ip(forwarded_for: Option<&str>) -> String {
    forwarded_for
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|ip| !ip.is_empty())
        .unwrap_or(UNKNOWN_IP)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use chrono::{TimeZone, Utc};

    fn now() -> Timestamp {
        Utc.with_ymd_and_hms(2026, 5, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn below_threshold_is_allowed() {
        let throttle = LoginThrottle::default();
        let window = FailureWindow {
            failures: 4,
            oldest_failure: Some(now() - Duration::minutes(3)),
        };
        assert_eq!(throttle.check(window, now()), ThrottleDecision::Allowed);
    }

    #[test]
    fn at_threshold_is_locked_until_oldest_expires() {
        let throttle = LoginThrottle::default();
        let window = FailureWindow {
            failures: 5,
            oldest_failure: Some(now() - Duration::minutes(10)),
        };
        assert_matches!(
            throttle.check(window, now()),
            ThrottleDecision::Locked { retry_after_secs: 300 }
        );
    }

    #[test]
    fn lock_reports_at_least_one_second() {
        let throttle = LoginThrottle::default();
        let window = FailureWindow {
            failures: 9,
            oldest_failure: Some(now() - Duration::minutes(20)),
        };
        assert_matches!(
            throttle.check(window, now()),
            ThrottleDecision::Locked { retry_after_secs: 1 }
        );
    }

    #[test]
    fn window_start_subtracts_window() {
        let throttle = LoginThrottle {
            max_attempts: 3,
            window_mins: 30,
        };
        assert_eq!(throttle.window_start(now()), now() - Duration::minutes(30));
    }

    #[test]
    fn client_ip_takes_first_hop() {
        assert_eq!(client_ip(Some("10.0.0.1, 172.16.0.1")), "10.0.0.1");
        assert_eq!(client_ip(Some("  ")), UNKNOWN_IP);
        assert_eq!(client_ip(None), UNKNOWN_IP);
    }
}
