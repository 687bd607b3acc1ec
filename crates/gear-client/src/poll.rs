//! Retry-until-condition helpers for callers that poll daemon state.
//!
//! The client itself never waits: a created unit "exists" before its
//! workload is serving, and reaching the `running` sub-state is observed by
//! repeatedly listing units. These helpers carry that loop so callers keep
//! readiness semantics out of the protocol client, where they would blur
//! into transport failures.

use std::future::Future;
use std::time::Duration;

use tokio::time::{sleep, timeout};

/// Repeatedly evaluate `check` until it yields a value.
///
/// `check` is re-run every `interval`; the first `Some` ends the loop. The
/// loop itself is unbounded; bound it with [`poll_until_timeout`] or by
/// dropping the future.
pub async fn poll_until<F, Fut, T>(interval: Duration, mut check: F) -> T
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Option<T>>,
{
    loop {
        if let Some(value) = check().await {
            return value;
        }
        sleep(interval).await;
    }
}

/// Like [`poll_until`], giving up once `deadline` has elapsed.
///
/// Returns `None` if no check yields a value before the deadline. A check
/// in flight when the deadline passes is abandoned.
pub async fn poll_until_timeout<F, Fut, T>(
    interval: Duration,
    deadline: Duration,
    check: F,
) -> Option<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Option<T>>,
{
    timeout(deadline, poll_until(interval, check)).await.ok()
}
