//! Status confirmation polling.
//!
//! The backend moves a booking to its confirmed status only after it observes
//! the on-chain payment event, so the client waits a bounded, unspecified time.

use std::time::Duration;
use thiserror::Error;

use crate::api::ApiError;
use crate::booking::lookup::BookingLookup;
use crate::resilience::retries::{poll_until, RetryPolicy};

/// Status reported when no attempt managed to read one.
pub const UNKNOWN_STATUS: &str = "UNKNOWN";

/// A booking that reached the target status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Confirmation {
    pub booking_id: u64,
    pub status: String,
    /// Attempts it took.
    pub attempts: u32,
    /// Time spent polling.
    pub waited: Duration,
}

/// The booking never reached the target status.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("booking {booking_id} status stuck at {last_status} after {attempts} attempts (expected {target})")]
pub struct ConfirmationTimeout {
    pub booking_id: u64,
    pub target: String,
    pub last_status: String,
    pub attempts: u32,
    pub last_error: Option<String>,
}

/// Poll a booking until its status equals `target`.
pub async fn await_status<L: BookingLookup>(
    lookup: &L,
    booking_id: u64,
    target: &str,
    policy: RetryPolicy,
) -> Result<Confirmation, ConfirmationTimeout> {
    let result = poll_until(
        "status_confirmation",
        policy,
        |attempt| async move {
            let booking = lookup.booking(booking_id).await?;
            let status = booking.status.unwrap_or_else(|| UNKNOWN_STATUS.to_string());
            tracing::debug!(booking_id, attempt, status = %status, "Booking status");
            Ok::<_, ApiError>(status)
        },
        |status| status == target,
    )
    .await;

    match result {
        Ok(polled) => Ok(Confirmation {
            booking_id,
            status: polled.value,
            attempts: polled.attempts,
            waited: polled.elapsed,
        }),
        Err(exhausted) => Err(ConfirmationTimeout {
            booking_id,
            target: target.to_string(),
            last_status: exhausted
                .last_seen
                .unwrap_or_else(|| UNKNOWN_STATUS.to_string()),
            attempts: exhausted.attempts,
            last_error: exhausted.last_error.map(|e| e.to_string()),
        }),
    }
}
