//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for a
//! verification run. All types derive Serde traits for deserialization from
//! config files.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::resilience::retries::RetryPolicy;

/// Root configuration for the booking verifier.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct VerifierConfig {
    /// Platform HTTP API settings.
    pub api: ApiConfig,

    /// The user who owns the listings.
    pub host: UserConfig,

    /// The user who books and pays.
    pub tenant: UserConfig,

    /// Blockchain RPC and transaction settings.
    pub blockchain: BlockchainConfig,

    /// Payment contract and conversion settings.
    pub payment: PaymentConfig,

    /// Shape of the booking request.
    pub booking: BookingConfig,

    /// Polling budgets for the asynchronous steps.
    pub polling: PollingConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Platform API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Gateway base URL (e.g., "http://192.168.49.2:30090").
    pub base_url: String,

    /// Total request timeout in seconds.
    pub request_timeout_secs: u64,

    /// Connection establishment timeout in seconds.
    pub connect_timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://192.168.49.2:30090".to_string(),
            request_timeout_secs: 30,
            connect_timeout_secs: 5,
        }
    }
}

/// Credentials and wallet for one platform user.
#[derive(Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct UserConfig {
    /// Login email.
    pub email: String,

    /// Login password.
    pub password: String,

    /// Wallet address attached to the profile (hex, 0x-prefixed).
    pub wallet_address: String,
}

impl std::fmt::Debug for UserConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserConfig")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("wallet_address", &self.wallet_address)
            .finish()
    }
}

/// Blockchain integration configuration.
#[derive(Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BlockchainConfig {
    /// JSON-RPC endpoint URL.
    pub rpc_url: String,

    /// Failover JSON-RPC endpoint URLs, tried in order.
    pub failover_urls: Vec<String>,

    /// Chain ID (31337 for a local Hardhat/Anvil node).
    pub chain_id: u64,

    /// RPC request timeout in seconds.
    pub rpc_timeout_secs: u64,

    /// Maximum time to wait for a transaction receipt in seconds.
    pub receipt_timeout_secs: u64,

    /// Receipt polling interval in milliseconds.
    pub receipt_poll_interval_ms: u64,

    /// Fixed gas limit for the payment call.
    pub gas_limit: u64,

    /// Fixed gas price in gwei.
    pub gas_price_gwei: u64,

    /// Tenant signing key (hex). Overridden by
    /// `BOOKING_VERIFIER_TENANT_PRIVATE_KEY` when set.
    pub tenant_private_key: Option<String>,
}

impl Default for BlockchainConfig {
    fn default() -> Self {
        Self {
            rpc_url: "http://localhost:8545".to_string(),
            failover_urls: Vec::new(),
            chain_id: 31337,
            rpc_timeout_secs: 10,
            receipt_timeout_secs: 120,
            receipt_poll_interval_ms: 1000,
            gas_limit: 2_000_000,
            gas_price_gwei: 1,
            tenant_private_key: None,
        }
    }
}

impl BlockchainConfig {
    /// Gas price in wei.
    pub fn gas_price_wei(&self) -> u128 {
        u128::from(self.gas_price_gwei) * 1_000_000_000
    }
}

impl std::fmt::Debug for BlockchainConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlockchainConfig")
            .field("rpc_url", &self.rpc_url)
            .field("failover_urls", &self.failover_urls)
            .field("chain_id", &self.chain_id)
            .field("rpc_timeout_secs", &self.rpc_timeout_secs)
            .field("receipt_timeout_secs", &self.receipt_timeout_secs)
            .field("gas_limit", &self.gas_limit)
            .field("gas_price_gwei", &self.gas_price_gwei)
            .field(
                "tenant_private_key",
                &self.tenant_private_key.as_ref().map(|_| "<redacted>"),
            )
            .finish()
    }
}

/// Payment contract configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PaymentConfig {
    /// Address of the booking payment contract.
    pub contract_address: String,

    /// Fixed conversion rate: fiat units per one ether.
    /// Approximation for test runs, not a pricing source.
    pub fiat_per_ether: f64,

    /// Fiat currency label used in logs.
    pub fiat_currency: String,

    /// Security deposit sent with the payment, in wei.
    pub deposit_wei: u64,
}

impl Default for PaymentConfig {
    fn default() -> Self {
        Self {
            contract_address: "0x5FbDB2315678afecb367f032d93F642f64180aa3".to_string(),
            fiat_per_ether: 29079.0,
            fiat_currency: "MAD".to_string(),
            deposit_wei: 0,
        }
    }
}

/// Booking request shape.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BookingConfig {
    /// Days from today until check-in.
    pub check_in_offset_days: i64,

    /// Nights between check-in and check-out.
    pub stay_nights: i64,

    /// Number of guests.
    pub guests: u32,
}

impl Default for BookingConfig {
    fn default() -> Self {
        Self {
            check_in_offset_days: 60,
            stay_nights: 5,
            guests: 2,
        }
    }
}

/// Polling budgets.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct PollingConfig {
    /// Budget for discovering the newly created booking.
    pub discovery: PollBudget,

    /// Budget for waiting on the confirmed status.
    pub confirmation: ConfirmationPollConfig,
}

/// Fixed-count, fixed-interval polling budget.
#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
#[serde(default)]
pub struct PollBudget {
    /// Maximum number of attempts.
    pub max_attempts: u32,

    /// Sleep before each attempt in milliseconds.
    pub interval_ms: u64,
}

impl Default for PollBudget {
    fn default() -> Self {
        Self {
            max_attempts: 10,
            interval_ms: 2000,
        }
    }
}

impl PollBudget {
    /// Convert into a retry policy.
    pub fn policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.max_attempts, Duration::from_millis(self.interval_ms))
    }
}

/// Confirmation polling configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ConfirmationPollConfig {
    /// Maximum number of attempts.
    pub max_attempts: u32,

    /// Sleep before each attempt in milliseconds.
    pub interval_ms: u64,

    /// Status value that ends the wait.
    pub target_status: String,
}

impl Default for ConfirmationPollConfig {
    fn default() -> Self {
        Self {
            max_attempts: 30,
            interval_ms: 2000,
            target_status: "CONFIRMED".to_string(),
        }
    }
}

impl ConfirmationPollConfig {
    /// Convert into a retry policy.
    pub fn policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.max_attempts, Duration::from_millis(self.interval_ms))
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Pretty,
    /// One JSON object per line.
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log output format.
    pub log_format: LogFormat,

    /// Where to write a Prometheus text snapshot when the run ends.
    pub metrics_path: Option<PathBuf>,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_path: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_local_cluster() {
        let config = VerifierConfig::default();
        assert_eq!(config.blockchain.chain_id, 31337);
        assert_eq!(config.blockchain.gas_limit, 2_000_000);
        assert_eq!(config.blockchain.gas_price_wei(), 1_000_000_000);
        assert_eq!(config.polling.discovery.max_attempts, 10);
        assert_eq!(config.polling.confirmation.max_attempts, 30);
        assert_eq!(config.polling.confirmation.target_status, "CONFIRMED");
        assert_eq!(config.booking.guests, 2);
    }

    #[test]
    fn test_partial_toml() {
        let config: VerifierConfig = toml::from_str(
            r#"
            [tenant]
            email = "tenant@example.com"

            [polling.discovery]
            max_attempts = 3
            interval_ms = 0
            "#,
        )
        .unwrap();

        assert_eq!(config.tenant.email, "tenant@example.com");
        assert_eq!(config.polling.discovery.max_attempts, 3);
        assert_eq!(config.polling.discovery.policy().interval, Duration::ZERO);
        // Untouched sections keep their defaults
        assert_eq!(config.polling.confirmation.max_attempts, 30);
        assert_eq!(config.payment.fiat_per_ether, 29079.0);
    }

    #[test]
    fn test_log_format_parsing() {
        let config: ObservabilityConfig = toml::from_str("log_format = \"json\"").unwrap();
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let mut config = VerifierConfig::default();
        config.tenant.password = "hunter2".to_string();
        config.blockchain.tenant_private_key = Some("0xdeadbeef".to_string());

        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("hunter2"));
        assert!(!rendered.contains("deadbeef"));
    }
}
