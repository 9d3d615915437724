//! Platform HTTP API.
//!
//! # Data Flow
//! ```text
//! VerifierConfig.api
//!     → client.rs (reqwest client with timeouts, bearer auth)
//!     → types.rs (camelCase JSON payloads, ApiError)
//! ```

pub mod client;
pub mod types;

pub use client::PlatformClient;
pub use types::{ApiError, ApiResult, Booking, BookingRequest, Property};
