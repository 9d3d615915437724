//! Scenario failure taxonomy.

use alloy::primitives::TxHash;
use thiserror::Error;

use crate::api::ApiError;
use crate::auth::TokenError;
use crate::blockchain::BlockchainError;
use crate::booking::{ConfirmationTimeout, DiscoveryError};
use crate::payments::ConversionError;

/// Which account a step acted for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Host,
    Tenant,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Host => write!(f, "host"),
            Role::Tenant => write!(f, "tenant"),
        }
    }
}

/// Scenario steps, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Step {
    ConnectChain,
    Authenticate,
    UpdateWallets,
    SelectProperty,
    RequestBooking,
    DiscoverBooking,
    Pay,
    AwaitConfirmation,
}

impl Step {
    /// Label for logs and metrics.
    pub fn as_str(&self) -> &'static str {
        match self {
            Step::ConnectChain => "connect_chain",
            Step::Authenticate => "authenticate",
            Step::UpdateWallets => "update_wallets",
            Step::SelectProperty => "select_property",
            Step::RequestBooking => "request_booking",
            Step::DiscoverBooking => "discover_booking",
            Step::Pay => "pay",
            Step::AwaitConfirmation => "await_confirmation",
        }
    }
}

/// A fatal scenario failure. Every variant stops the run.
#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("blockchain not connected at {rpc_url}: {source}")]
    ChainUnreachable {
        rpc_url: String,
        #[source]
        source: BlockchainError,
    },

    #[error("{role} login failed for {email}: {source}")]
    Authentication {
        role: Role,
        email: String,
        #[source]
        source: ApiError,
    },

    #[error("could not decode {role} token: {source}")]
    TokenIntrospection {
        role: Role,
        #[source]
        source: TokenError,
    },

    #[error("could not fetch properties: {0}")]
    PropertyListing(#[source] ApiError),

    #[error("no properties found to book")]
    NoProperties,

    #[error("could not find a property not owned by tenant {tenant_id}")]
    NoBookableProperty { tenant_id: String },

    #[error("booking request failed: {0}")]
    BookingRejected(#[source] ApiError),

    #[error(transparent)]
    BookingNotDiscovered(#[from] DiscoveryError),

    #[error("booking {booking_id} carries no price to pay")]
    MissingPrice { booking_id: u64 },

    #[error("payment amount invalid: {0}")]
    Conversion(#[from] ConversionError),

    #[error("payment failed: {0}")]
    Payment(#[source] BlockchainError),

    #[error("payment transaction {0} failed on chain")]
    PaymentReverted(TxHash),

    #[error(transparent)]
    ConfirmationTimeout(#[from] ConfirmationTimeout),

    #[error("invalid scenario input: {0}")]
    InvalidInput(String),

    #[error("{field} is not an address: {value}")]
    InvalidAddress { field: &'static str, value: String },
}

impl ScenarioError {
    /// The step that failed.
    pub fn step(&self) -> Step {
        match self {
            ScenarioError::ChainUnreachable { .. } => Step::ConnectChain,
            ScenarioError::Authentication { .. } | ScenarioError::TokenIntrospection { .. } => {
                Step::Authenticate
            }
            ScenarioError::PropertyListing(_)
            | ScenarioError::NoProperties
            | ScenarioError::NoBookableProperty { .. } => Step::SelectProperty,
            ScenarioError::BookingRejected(_) | ScenarioError::InvalidInput(_) => {
                Step::RequestBooking
            }
            ScenarioError::BookingNotDiscovered(_) => Step::DiscoverBooking,
            ScenarioError::MissingPrice { .. }
            | ScenarioError::Conversion(_)
            | ScenarioError::Payment(_)
            | ScenarioError::PaymentReverted(_)
            | ScenarioError::InvalidAddress { .. } => Step::Pay,
            ScenarioError::ConfirmationTimeout(_) => Step::AwaitConfirmation,
        }
    }

    /// Process exit code for this failure.
    pub fn exit_code(&self) -> u8 {
        match self.step() {
            Step::ConnectChain => 10,
            Step::Authenticate => 11,
            Step::SelectProperty => 12,
            // Wallet updates never fail the run
            Step::RequestBooking | Step::UpdateWallets => 13,
            Step::DiscoverBooking => 14,
            Step::Pay => 15,
            Step::AwaitConfirmation => 16,
        }
    }

    /// Operator hint printed alongside the diagnostic.
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            ScenarioError::ChainUnreachable { .. } => Some(
                "is the RPC port-forward running? e.g. kubectl port-forward svc/blockchain-service 8545:8545 -n derent",
            ),
            ScenarioError::ConfirmationTimeout(_) => Some("check the payment service logs"),
            _ => None,
        }
    }
}
