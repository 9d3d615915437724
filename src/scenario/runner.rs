//! The end-to-end booking and payment run.
//!
//! # Steps
//! ```text
//! chain check → login host, tenant → wallets (lenient) → pick property
//!     → snapshot bookings → request → discover id → pay on chain
//!     → wait for CONFIRMED
//! ```
//!
//! Steps run strictly in order and the first fatal error ends the run.

use alloy::primitives::{Address, U256};
use chrono::{Local, NaiveDate, TimeDelta};
use std::collections::HashSet;
use std::time::Instant;
use tracing::Instrument;
use uuid::Uuid;

use crate::api::{BookingRequest, PlatformClient, Property};
use crate::auth::BearerToken;
use crate::booking::{
    await_status, select_bookable, snapshot_ids, AuthorizedClient, BookingDiscovery,
    BookingLookup, BookingState, BookingTicket, DiscoveredBooking, DiscoveryError,
};
use crate::config::{UserConfig, VerifierConfig};
use crate::observability::metrics;
use crate::payments::{ether_to_wei, try_to_chain_amount, BookingPayment, PaymentGateway};
use crate::scenario::error::{Role, ScenarioError, Step};
use crate::scenario::report::ScenarioReport;

/// A logged-in user.
#[derive(Debug, Clone)]
pub struct UserSession {
    pub role: Role,
    pub email: String,
    pub token: BearerToken,
    /// Subject claim of the token.
    pub user_id: String,
}

/// One verification run against a platform and a chain.
pub struct Scenario<'a, G> {
    config: &'a VerifierConfig,
    api: PlatformClient,
    gateway: G,
    today: NaiveDate,
}

impl<'a, G: PaymentGateway> Scenario<'a, G> {
    /// Create a run dated today.
    pub fn new(config: &'a VerifierConfig, api: PlatformClient, gateway: G) -> Self {
        Self {
            config,
            api,
            gateway,
            today: Local::now().date_naive(),
        }
    }

    /// Pin the date stay dates are computed from.
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = today;
        self
    }

    /// The payment gateway in use.
    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    /// Execute every step.
    pub async fn run(&self) -> Result<ScenarioReport, ScenarioError> {
        let run_id = Uuid::new_v4();
        let span = tracing::info_span!("scenario", %run_id);

        let result = self.run_steps(run_id).instrument(span).await;
        if let Err(e) = &result {
            metrics::record_step(e.step().as_str(), "failed");
        }
        result
    }

    async fn run_steps(&self, run_id: Uuid) -> Result<ScenarioReport, ScenarioError> {
        let started = Instant::now();
        let mut warnings = Vec::new();

        // Chain connectivity
        let block_number = self.gateway.block_number().await.map_err(|source| {
            ScenarioError::ChainUnreachable {
                rpc_url: self.config.blockchain.rpc_url.clone(),
                source,
            }
        })?;
        tracing::info!(block_number, "Blockchain connected");
        passed(Step::ConnectChain);

        // Sessions
        let host = self.login(Role::Host, &self.config.host).await?;
        let tenant = self.login(Role::Tenant, &self.config.tenant).await?;
        passed(Step::Authenticate);

        // Wallets
        for (session, user) in [(&tenant, &self.config.tenant), (&host, &self.config.host)] {
            if let Some(warning) = self.update_wallet(session, user).await {
                warnings.push(warning);
            }
        }
        metrics::record_step(
            Step::UpdateWallets.as_str(),
            if warnings.is_empty() { "ok" } else { "warned" },
        );

        // Property
        let property = self.choose_property(&tenant).await?;
        tracing::info!(
            property_id = property.id,
            title = property.title.as_deref().unwrap_or("-"),
            "Selected property"
        );
        passed(Step::SelectProperty);

        // Booking request
        let lookup = AuthorizedClient::new(&self.api, &tenant.token);
        let known = self.snapshot(&lookup, &tenant.user_id).await;
        let request = self.booking_request(&tenant, property.id)?;
        let status = self
            .api
            .request_booking(&tenant.token, &request)
            .await
            .map_err(ScenarioError::BookingRejected)?;
        let ticket = BookingTicket::new(&request, known);
        tracing::info!(
            status,
            property_id = ticket.property_id,
            known_bookings = ticket.snapshot_len(),
            check_in = %request.check_in_date,
            check_out = %request.check_out_date,
            "Booking request accepted"
        );
        let mut state = BookingState::default().requested(ticket)?;
        passed(Step::RequestBooking);

        // Discovery
        let discovery = BookingDiscovery::new(&lookup, self.config.polling.discovery.policy());
        let ticket = state
            .ticket()
            .ok_or(DiscoveryError::InvalidTransition("no outstanding ticket"))?;
        let booking = discovery.resolve(ticket).await?;
        state = state.discovered(booking.clone())?;
        tracing::info!(booking_id = booking.id, status = ?booking.status, state = ?state, "Found booking");
        passed(Step::DiscoverBooking);

        // Payment
        let total_price = self.price_of(&booking, &property, &mut warnings)?;
        let chain_amount = try_to_chain_amount(total_price, self.config.payment.fiat_per_ether)?;
        let rent_wei = ether_to_wei(chain_amount)?;
        tracing::info!(
            total_price,
            currency = %self.config.payment.fiat_currency,
            chain_amount,
            rent_wei = %rent_wei,
            "Converted booking price"
        );

        let payment = BookingPayment {
            contract: parse_address("payment.contract_address", &self.config.payment.contract_address)?,
            booking_id: booking.id,
            host: parse_address("host.wallet_address", &self.config.host.wallet_address)?,
            tenant: parse_address("tenant.wallet_address", &self.config.tenant.wallet_address)?,
            rent_wei,
            deposit_wei: U256::from(self.config.payment.deposit_wei),
        };
        let receipt = self
            .gateway
            .pay_booking(&payment)
            .await
            .map_err(ScenarioError::Payment)?;
        if !receipt.success {
            return Err(ScenarioError::PaymentReverted(receipt.tx_hash));
        }
        tracing::info!(
            tx_hash = %receipt.tx_hash,
            block = ?receipt.block_number,
            gas_used = receipt.gas_used,
            "Payment mined"
        );
        passed(Step::Pay);

        // Confirmation
        let confirmation = await_status(
            &lookup,
            booking.id,
            &self.config.polling.confirmation.target_status,
            self.config.polling.confirmation.policy(),
        )
        .await?;
        tracing::info!(
            booking_id = booking.id,
            status = %confirmation.status,
            attempts = confirmation.attempts,
            "Booking confirmed"
        );
        passed(Step::AwaitConfirmation);

        Ok(ScenarioReport {
            run_id,
            block_number,
            host_id: host.user_id,
            tenant_id: tenant.user_id,
            property_id: property.id,
            property_title: property.title.clone(),
            booking_id: booking.id,
            total_price,
            chain_amount,
            rent_wei,
            tx_hash: receipt.tx_hash,
            gas_used: receipt.gas_used,
            confirmation,
            warnings,
            elapsed: started.elapsed(),
        })
    }

    async fn login(&self, role: Role, user: &UserConfig) -> Result<UserSession, ScenarioError> {
        let token = self
            .api
            .acquire_token(&user.email, &user.password)
            .await
            .map_err(|source| ScenarioError::Authentication {
                role,
                email: user.email.clone(),
                source,
            })?;
        let user_id = token
            .subject()
            .map_err(|source| ScenarioError::TokenIntrospection { role, source })?;
        tracing::info!(%role, user_id = %user_id, "Logged in");

        Ok(UserSession {
            role,
            email: user.email.clone(),
            token,
            user_id,
        })
    }

    /// Returns a warning instead of failing.
    async fn update_wallet(&self, session: &UserSession, user: &UserConfig) -> Option<String> {
        match self
            .api
            .update_wallet(&session.token, &user.wallet_address)
            .await
        {
            Ok(()) => {
                tracing::info!(role = %session.role, wallet = %user.wallet_address, "Wallet updated");
                None
            }
            Err(e) => {
                tracing::warn!(role = %session.role, error = %e, "Wallet update failed, continuing");
                Some(format!("{} wallet update failed: {}", session.role, e))
            }
        }
    }

    async fn choose_property(&self, tenant: &UserSession) -> Result<Property, ScenarioError> {
        let properties = self
            .api
            .list_properties(&tenant.token)
            .await
            .map_err(ScenarioError::PropertyListing)?;
        if properties.is_empty() {
            return Err(ScenarioError::NoProperties);
        }

        select_bookable(&properties, &tenant.user_id)
            .cloned()
            .ok_or_else(|| ScenarioError::NoBookableProperty {
                tenant_id: tenant.user_id.clone(),
            })
    }

    /// Ids of the tenant's bookings before the request. A failed read counts
    /// as an empty history.
    async fn snapshot<L: BookingLookup>(&self, lookup: &L, tenant_id: &str) -> HashSet<u64> {
        match lookup.tenant_bookings(tenant_id).await {
            Ok(bookings) => snapshot_ids(&bookings),
            Err(e) => {
                tracing::warn!(error = %e, "Could not read existing bookings, assuming none");
                HashSet::new()
            }
        }
    }

    fn booking_request(
        &self,
        tenant: &UserSession,
        property_id: u64,
    ) -> Result<BookingRequest, ScenarioError> {
        let booking = &self.config.booking;
        let check_in_date = self
            .today
            .checked_add_signed(TimeDelta::days(booking.check_in_offset_days))
            .ok_or_else(|| ScenarioError::InvalidInput("check-in date out of range".into()))?;
        let check_out_date = check_in_date
            .checked_add_signed(TimeDelta::days(booking.stay_nights))
            .ok_or_else(|| ScenarioError::InvalidInput("check-out date out of range".into()))?;

        Ok(BookingRequest {
            user_id: tenant.user_id.clone(),
            property_id,
            check_in_date,
            check_out_date,
            number_of_guests: booking.guests,
        })
    }

    /// The platform's total, or nightly price times nights when the record
    /// carries none.
    fn price_of(
        &self,
        booking: &DiscoveredBooking,
        property: &Property,
        warnings: &mut Vec<String>,
    ) -> Result<f64, ScenarioError> {
        if let Some(total) = booking.total_price {
            return Ok(total);
        }

        let daily = property.daily_price.ok_or(ScenarioError::MissingPrice {
            booking_id: booking.id,
        })?;
        let total = daily * self.config.booking.stay_nights as f64;
        tracing::warn!(booking_id = booking.id, total, "Booking has no total price, using nightly rate");
        warnings.push(format!(
            "booking {} had no total price; paid {} x {} nights",
            booking.id, daily, self.config.booking.stay_nights
        ));
        Ok(total)
    }
}

fn passed(step: Step) {
    metrics::record_step(step.as_str(), "ok");
}

fn parse_address(field: &'static str, value: &str) -> Result<Address, ScenarioError> {
    value.parse().map_err(|_| ScenarioError::InvalidAddress {
        field,
        value: value.to_string(),
    })
}
