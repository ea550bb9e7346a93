//! Retry policy for transient server failures

use crate::types::BackoffType;
use reqwest::{Response, StatusCode};
use std::time::Duration;

/// Delay schedule between attempts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Backoff {
    pub kind: BackoffType,
    /// Delay before the first retry
    pub initial: Duration,
    /// Upper bound for any single delay
    pub max: Duration,
}

impl Default for Backoff {
    fn default() -> Self {
        Self {
            kind: BackoffType::Exponential,
            initial: Duration::from_millis(100),
            max: Duration::from_secs(60),
        }
    }
}

impl Backoff {
    pub fn new(kind: BackoffType, initial: Duration, max: Duration) -> Self {
        Self { kind, initial, max }
    }

    /// Delay before retry number `retry` (zero-based)
    pub fn delay(&self, retry: u32) -> Duration {
        let delay = match self.kind {
            BackoffType::Constant => self.initial,
            BackoffType::Linear => self.initial.saturating_mul(retry.saturating_add(1)),
            BackoffType::Exponential => self.initial.saturating_mul(2u32.saturating_pow(retry)),
        };
        delay.min(self.max)
    }
}

/// Retries left for one logical request
#[derive(Debug)]
pub(crate) struct RetryBudget {
    used: u32,
    max: u32,
    relogged_in: bool,
}

impl RetryBudget {
    pub(crate) fn new(max: u32) -> Self {
        Self {
            used: 0,
            max,
            relogged_in: false,
        }
    }

    /// Attempt number of the request about to be sent, starting at 1
    pub(crate) fn attempt(&self) -> u32 {
        self.used + 1
    }

    pub(crate) fn total(&self) -> u32 {
        self.max + 1
    }

    /// Consume one retry; `None` once the budget is spent
    pub(crate) fn take(&mut self) -> Option<u32> {
        (self.used < self.max).then(|| {
            self.used += 1;
            self.used - 1
        })
    }

    /// A fresh login is allowed once per request and does not count as a retry
    pub(crate) fn take_relogin(&mut self) -> bool {
        !std::mem::replace(&mut self.relogged_in, true)
    }
}

/// Statuses worth another attempt: throttling and gateway/server hiccups
pub(crate) fn is_transient(status: StatusCode) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS
        || matches!(status.as_u16(), 500 | 502 | 503 | 504 | 520..=524)
}

/// `Retry-After` in whole seconds; HTTP-date values are not supported
pub(crate) fn retry_after(response: &Response) -> Option<Duration> {
    response
        .headers()
        .get(reqwest::header::RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim()
        .parse()
        .ok()
        .map(Duration::from_secs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test_case(BackoffType::Constant, 0, 100 ; "constant first")]
    #[test_case(BackoffType::Constant, 5, 100 ; "constant later")]
    #[test_case(BackoffType::Linear, 1, 200 ; "linear second")]
    #[test_case(BackoffType::Linear, 2, 300 ; "linear third")]
    #[test_case(BackoffType::Exponential, 0, 100 ; "exponential first")]
    #[test_case(BackoffType::Exponential, 2, 400 ; "exponential third")]
    #[test_case(BackoffType::Exponential, 10, 500 ; "exponential capped")]
    #[test_case(BackoffType::Exponential, 40, 500 ; "exponential saturates")]
    fn test_backoff_delay(kind: BackoffType, retry: u32, expected_ms: u64) {
        let backoff = Backoff::new(kind, ms(100), ms(500));
        assert_eq!(backoff.delay(retry), ms(expected_ms));
    }

    #[test]
    fn test_budget_counts_retries() {
        let mut budget = RetryBudget::new(2);
        assert_eq!(budget.total(), 3);
        assert_eq!(budget.attempt(), 1);

        assert_eq!(budget.take(), Some(0));
        assert_eq!(budget.take(), Some(1));
        assert_eq!(budget.attempt(), 3);
        assert_eq!(budget.take(), None);
    }

    #[test]
    fn test_budget_allows_one_relogin() {
        let mut budget = RetryBudget::new(0);
        assert!(budget.take_relogin());
        assert!(!budget.take_relogin());
        assert_eq!(budget.take(), None);
    }

    #[test_case(429, true)]
    #[test_case(500, true)]
    #[test_case(503, true)]
    #[test_case(522, true)]
    #[test_case(501, false)]
    #[test_case(404, false)]
    #[test_case(401, false)]
    fn test_transient_statuses(code: u16, transient: bool) {
        let status = StatusCode::from_u16(code).unwrap();
        assert_eq!(is_transient(status), transient);
    }
}
