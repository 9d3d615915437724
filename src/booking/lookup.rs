//! Read access to a tenant's bookings, independent of transport.

use crate::api::{ApiResult, Booking, PlatformClient};
use crate::auth::BearerToken;

/// Source of booking records for the polling steps.
#[allow(async_fn_in_trait)]
pub trait BookingLookup {
    /// All bookings visible for a tenant.
    async fn tenant_bookings(&self, tenant_id: &str) -> ApiResult<Vec<Booking>>;

    /// One booking by id.
    async fn booking(&self, booking_id: u64) -> ApiResult<Booking>;
}

/// A platform client bound to one user's token.
#[derive(Debug, Clone, Copy)]
pub struct AuthorizedClient<'a> {
    client: &'a PlatformClient,
    token: &'a BearerToken,
}

impl<'a> AuthorizedClient<'a> {
    /// Bind a client to a token.
    pub fn new(client: &'a PlatformClient, token: &'a BearerToken) -> Self {
        Self { client, token }
    }
}

impl BookingLookup for AuthorizedClient<'_> {
    async fn tenant_bookings(&self, tenant_id: &str) -> ApiResult<Vec<Booking>> {
        self.client.list_bookings(self.token, tenant_id).await
    }

    async fn booking(&self, booking_id: u64) -> ApiResult<Booking> {
        self.client.get_booking(self.token, booking_id).await
    }
}
