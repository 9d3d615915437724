//! Booking creation and discovery.
//!
//! # State Transitions
//! ```text
//! NotRequested → Requested(ticket): booking request accepted (200/201/202)
//! Requested → Discovered(booking): a new record for the ticket's property
//!                                  appears in the tenant's list
//! ```
//!
//! The request endpoint materializes the booking asynchronously and does not
//! return its id, so the id is learned by differencing the tenant's list
//! against a snapshot taken before the request.

use chrono::{DateTime, Utc};
use std::collections::HashSet;
use thiserror::Error;

use crate::api::{Booking, BookingRequest};
use crate::booking::lookup::BookingLookup;
use crate::resilience::retries::{poll_until, RetryPolicy};

/// Correlation key linking a booking request to the record it produces.
#[derive(Debug, Clone, PartialEq)]
pub struct BookingTicket {
    /// Tenant who made the request.
    pub tenant_id: String,
    /// Property that was requested.
    pub property_id: u64,
    /// When the request was accepted.
    pub requested_at: DateTime<Utc>,
    /// Booking ids that existed before the request.
    known_ids: HashSet<u64>,
}

impl BookingTicket {
    /// Create a ticket for an accepted request.
    pub fn new(request: &BookingRequest, known_ids: HashSet<u64>) -> Self {
        Self {
            tenant_id: request.user_id.clone(),
            property_id: request.property_id,
            requested_at: Utc::now(),
            known_ids,
        }
    }

    /// Whether `id` was present before the request.
    pub fn is_known(&self, id: u64) -> bool {
        self.known_ids.contains(&id)
    }

    /// Number of bookings in the pre-request snapshot.
    pub fn snapshot_len(&self) -> usize {
        self.known_ids.len()
    }
}

/// The booking a ticket resolved to.
#[derive(Debug, Clone, PartialEq)]
pub struct DiscoveredBooking {
    pub id: u64,
    pub property_id: u64,
    /// Total price in fiat units, as computed by the platform.
    pub total_price: Option<f64>,
    pub status: Option<String>,
}

impl From<(&Booking, u64)> for DiscoveredBooking {
    fn from((booking, property_id): (&Booking, u64)) -> Self {
        Self {
            id: booking.id,
            property_id,
            total_price: booking.total_price,
            status: booking.status.clone(),
        }
    }
}

/// Progress of the booking step.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum BookingState {
    #[default]
    NotRequested,
    Requested(BookingTicket),
    Discovered(DiscoveredBooking),
}

/// Errors from the booking state machine and discovery.
#[derive(Debug, Error, PartialEq)]
pub enum DiscoveryError {
    /// No new booking appeared within the polling budget.
    #[error("could not find the new booking after {attempts} attempts{}", last_error_suffix(.last_error))]
    NotFound {
        attempts: u32,
        last_error: Option<String>,
    },

    /// A transition was attempted from the wrong state.
    #[error("invalid booking transition: {0}")]
    InvalidTransition(&'static str),
}

fn last_error_suffix(last_error: &Option<String>) -> String {
    last_error
        .as_ref()
        .map(|e| format!(" (last error: {})", e))
        .unwrap_or_default()
}

impl BookingState {
    /// Record an accepted request.
    pub fn requested(self, ticket: BookingTicket) -> Result<Self, DiscoveryError> {
        match self {
            BookingState::NotRequested => Ok(BookingState::Requested(ticket)),
            _ => Err(DiscoveryError::InvalidTransition("booking already requested")),
        }
    }

    /// Record the discovered booking.
    pub fn discovered(self, booking: DiscoveredBooking) -> Result<Self, DiscoveryError> {
        match self {
            BookingState::Requested(_) => Ok(BookingState::Discovered(booking)),
            BookingState::NotRequested => {
                Err(DiscoveryError::InvalidTransition("booking was never requested"))
            }
            BookingState::Discovered(_) => {
                Err(DiscoveryError::InvalidTransition("booking already discovered"))
            }
        }
    }

    /// The outstanding ticket, if a request is in flight.
    pub fn ticket(&self) -> Option<&BookingTicket> {
        match self {
            BookingState::Requested(ticket) => Some(ticket),
            _ => None,
        }
    }
}

/// Ids present in a booking list.
pub fn snapshot_ids(bookings: &[Booking]) -> HashSet<u64> {
    bookings.iter().map(|b| b.id).collect()
}

/// First booking absent from the ticket's snapshot that belongs to the
/// ticket's property.
pub fn find_new_booking<'a>(ticket: &BookingTicket, bookings: &'a [Booking]) -> Option<&'a Booking> {
    bookings
        .iter()
        .find(|b| !ticket.is_known(b.id) && b.property_id == Some(ticket.property_id))
}

/// Resolves tickets to concrete bookings by polling.
pub struct BookingDiscovery<'a, L> {
    lookup: &'a L,
    policy: RetryPolicy,
}

impl<'a, L: BookingLookup> BookingDiscovery<'a, L> {
    /// Create a discovery poller.
    pub fn new(lookup: &'a L, policy: RetryPolicy) -> Self {
        Self { lookup, policy }
    }

    /// Poll the tenant's bookings until the ticket's booking appears.
    pub async fn resolve(&self, ticket: &BookingTicket) -> Result<DiscoveredBooking, DiscoveryError> {
        let result = poll_until(
            "booking_discovery",
            self.policy,
            |attempt| async move {
                let bookings = self.lookup.tenant_bookings(&ticket.tenant_id).await?;
                let found = find_new_booking(ticket, &bookings)
                    .map(|b| DiscoveredBooking::from((b, ticket.property_id)));
                if found.is_none() {
                    tracing::info!(attempt, "Waiting for booking...");
                }
                Ok::<_, crate::api::ApiError>(found)
            },
            Option::is_some,
        )
        .await;

        match result {
            Ok(polled) => polled.value.ok_or(DiscoveryError::NotFound {
                attempts: polled.attempts,
                last_error: None,
            }),
            Err(exhausted) => Err(DiscoveryError::NotFound {
                attempts: exhausted.attempts,
                last_error: exhausted.last_error.map(|e| e.to_string()),
            }),
        }
    }
}
