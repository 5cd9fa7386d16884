//! Bounded retry for transient failures.

use std::future::Future;

use tracing::{debug, warn};

use crate::error::AcquirerError;

/// Attempt budget shared by the identity resolver and the paginated fetcher.
pub(crate) const DEFAULT_ATTEMPTS: usize = 5;

/// Run `op` up to `attempts` times, returning the first success.
///
/// Fatal errors abort immediately; retryable errors consume an attempt.
/// Exhausting the budget yields `None`, which callers must treat as an
/// absent result rather than an exception.
pub(crate) async fn with_retries<T, F, Fut>(attempts: usize, mut op: F) -> Option<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, AcquirerError>>,
{
    for attempt in 1..=attempts {
        match op().await {
            Ok(value) => {
                debug!(attempt, "operation succeeded");
                return Some(value);
            }
            Err(e) if e.is_retryable() => {
                warn!(attempt, attempts, error = %e, "transient failure");
            }
            Err(e) => {
                warn!(error = %e, "fatal failure; not retrying");
                return None;
            }
        }
    }
    None
}
