//! Bounded polling.
//!
//! # Responsibilities
//! - Repeat a check a fixed number of times with a fixed sleep before each attempt
//! - Stop at the first result the caller accepts
//! - Report what was last seen when the budget runs out
//!
//! # Design Decisions
//! - Check errors consume an attempt and are remembered, never propagated
//! - No backoff: every sleep is the configured interval
//! - A zero interval makes tests run instantly

use std::future::Future;
use std::time::Duration;
use tokio::time::{sleep, Instant};

use crate::observability::metrics;

/// Fixed-count, fixed-interval retry policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Maximum number of check attempts.
    pub max_attempts: u32,
    /// Sleep before each attempt.
    pub interval: Duration,
}

impl RetryPolicy {
    /// Create a new policy.
    pub fn new(max_attempts: u32, interval: Duration) -> Self {
        Self {
            max_attempts,
            interval,
        }
    }

    /// Policy with no sleeping, for tests.
    pub fn immediate(max_attempts: u32) -> Self {
        Self::new(max_attempts, Duration::ZERO)
    }
}

/// A poll that ended with an accepted value.
#[derive(Debug, Clone, PartialEq)]
pub struct Polled<T> {
    /// The accepted value.
    pub value: T,
    /// 1-based attempt that produced it.
    pub attempts: u32,
    /// Time spent since the poll started.
    pub elapsed: Duration,
}

/// A poll that ran out of attempts.
#[derive(Debug, Clone, PartialEq)]
pub struct Exhausted<T, E> {
    /// Attempts made.
    pub attempts: u32,
    /// Last value the check returned, if any attempt succeeded.
    pub last_seen: Option<T>,
    /// Last error the check returned, if any.
    pub last_error: Option<E>,
}

/// Run `check` until `accept` returns true for its value or the policy's
/// attempt budget is spent.
///
/// `site` labels log lines and metrics.
pub async fn poll_until<T, E, F, Fut, P>(
    site: &'static str,
    policy: RetryPolicy,
    mut check: F,
    mut accept: P,
) -> Result<Polled<T>, Exhausted<T, E>>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, E>>,
    P: FnMut(&T) -> bool,
    E: std::fmt::Display,
{
    let started = Instant::now();
    let mut last_seen = None;
    let mut last_error = None;

    for attempt in 1..=policy.max_attempts {
        if !policy.interval.is_zero() {
            sleep(policy.interval).await;
        }

        match check(attempt).await {
            Ok(value) if accept(&value) => {
                metrics::record_poll_attempt(site, "accepted");
                tracing::debug!(site, attempt, "Poll condition met");
                return Ok(Polled {
                    value,
                    attempts: attempt,
                    elapsed: started.elapsed(),
                });
            }
            Ok(value) => {
                metrics::record_poll_attempt(site, "pending");
                tracing::debug!(site, attempt, max_attempts = policy.max_attempts, "Condition not met yet");
                last_seen = Some(value);
            }
            Err(e) => {
                metrics::record_poll_attempt(site, "error");
                tracing::warn!(site, attempt, error = %e, "Poll check failed");
                last_error = Some(e);
            }
        }
    }

    Err(Exhausted {
        attempts: policy.max_attempts,
        last_seen,
        last_error,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[tokio::test]
    async fn test_stops_at_first_accepted_value() {
        let calls = Cell::new(0);
        let result: Result<_, Exhausted<u32, String>> = poll_until(
            "test",
            RetryPolicy::immediate(10),
            |attempt| {
                calls.set(calls.get() + 1);
                async move { Ok(attempt * 10) }
            },
            |v| *v >= 30,
        )
        .await;

        let polled = result.unwrap();
        assert_eq!(polled.value, 30);
        assert_eq!(polled.attempts, 3);
        assert_eq!(calls.get(), 3);
    }

    #[tokio::test]
    async fn test_exhaustion_keeps_last_value() {
        let result: Result<Polled<&str>, _> = poll_until(
            "test",
            RetryPolicy::immediate(4),
            |_| async { Ok::<_, String>("PENDING_PAYMENT") },
            |s| *s == "CONFIRMED",
        )
        .await;

        let exhausted = result.unwrap_err();
        assert_eq!(exhausted.attempts, 4);
        assert_eq!(exhausted.last_seen, Some("PENDING_PAYMENT"));
        assert_eq!(exhausted.last_error, None);
    }

    #[tokio::test]
    async fn test_errors_consume_attempts() {
        let result = poll_until(
            "test",
            RetryPolicy::immediate(3),
            |attempt| async move {
                if attempt < 3 {
                    Err(format!("boom {}", attempt))
                } else {
                    Ok(1u8)
                }
            },
            |_| true,
        )
        .await;
        assert_eq!(result.unwrap().attempts, 3);

        let result: Result<Polled<u8>, _> = poll_until(
            "test",
            RetryPolicy::immediate(2),
            |attempt| async move { Err::<u8, _>(format!("boom {}", attempt)) },
            |_| true,
        )
        .await;
        let exhausted = result.unwrap_err();
        assert_eq!(exhausted.last_error.as_deref(), Some("boom 2"));
        assert_eq!(exhausted.last_seen, None);
    }

    #[tokio::test]
    async fn test_zero_budget_never_checks() {
        let calls = Cell::new(0);
        let result: Result<Polled<()>, Exhausted<(), String>> = poll_until(
            "test",
            RetryPolicy::immediate(0),
            |_| {
                calls.set(calls.get() + 1);
                async { Ok(()) }
            },
            |_| true,
        )
        .await;
        assert!(result.is_err());
        assert_eq!(calls.get(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_sleeps_before_each_attempt() {
        let policy = RetryPolicy::new(30, Duration::from_secs(2));
        let result = poll_until(
            "test",
            policy,
            |attempt| async move { Ok::<_, String>(attempt) },
            |attempt| *attempt == 5,
        )
        .await
        .unwrap();

        assert_eq!(result.attempts, 5);
        assert_eq!(result.elapsed, Duration::from_secs(10));
    }
}
