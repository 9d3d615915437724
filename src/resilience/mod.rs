//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! RPC call:
//!     → timeouts.rs (every chain call has a deadline)
//!
//! Asynchronous platform state (new booking, confirmed status):
//!     → retries.rs (fixed attempts × fixed interval, first accepted value wins)
//! ```
//!
//! # Design Decisions
//! - Timeouts are non-negotiable; every external call has a deadline
//! - Only the two polling sites retry; one-shot calls (login, payment) never do

pub mod retries;
pub mod timeouts;

pub use retries::{poll_until, Exhausted, Polled, RetryPolicy};
pub use timeouts::{with_timeout, TimeoutError};
