//! Timeout enforcement.
//!
//! # Responsibilities
//! - Wrap RPC calls with a deadline
//! - Keep timeout errors distinct from the call's own errors

use std::future::Future;
use std::time::Duration;
use thiserror::Error;

/// Outcome of a call that may have timed out.
#[derive(Debug, Error)]
pub enum TimeoutError<E> {
    /// The deadline passed first.
    #[error("timed out after {0:?}")]
    Elapsed(Duration),
    /// The call completed with an error.
    #[error(transparent)]
    Inner(E),
}

/// Await `fut`, giving up after `duration`.
pub async fn with_timeout<T, E, Fut>(duration: Duration, fut: Fut) -> Result<T, TimeoutError<E>>
where
    Fut: Future<Output = Result<T, E>>,
{
    match tokio::time::timeout(duration, fut).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(e)) => Err(TimeoutError::Inner(e)),
        Err(_) => Err(TimeoutError::Elapsed(duration)),
    }
}
