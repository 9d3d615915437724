//! Booking lifecycle as seen by the tenant.
//!
//! # Data Flow
//! ```text
//! properties → selection.rs (skip own listings)
//!     → discovery.rs (snapshot, request, poll & diff → booking id)
//!     → [payment happens on chain]
//!     → confirmation.rs (poll detail until CONFIRMED)
//! ```
//!
//! Both polling steps read through `lookup::BookingLookup`, so they run
//! against fakes in tests.

pub mod confirmation;
pub mod discovery;
pub mod lookup;
pub mod selection;

pub use confirmation::{await_status, Confirmation, ConfirmationTimeout};
pub use discovery::{
    find_new_booking, snapshot_ids, BookingDiscovery, BookingState, BookingTicket,
    DiscoveredBooking, DiscoveryError,
};
pub use lookup::{AuthorizedClient, BookingLookup};
pub use selection::select_bookable;
