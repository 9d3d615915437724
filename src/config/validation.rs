//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate URLs, addresses and key material before anything touches the network
//! - Validate value ranges (timeouts > 0, budgets >= 1)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: VerifierConfig → Result<(), Vec<ValidationError>>

use alloy::primitives::Address;
use alloy::signers::local::PrivateKeySigner;

use crate::config::schema::{UserConfig, VerifierConfig};

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path of the offending field.
    pub field: String,
    /// What is wrong with it.
    pub message: String,
}

impl ValidationError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validate a parsed configuration.
pub fn validate_config(config: &VerifierConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    check_http_url(&mut errors, "api.base_url", &config.api.base_url);
    if config.api.request_timeout_secs == 0 {
        errors.push(ValidationError::new("api.request_timeout_secs", "must be greater than 0"));
    }
    if config.api.connect_timeout_secs == 0 {
        errors.push(ValidationError::new("api.connect_timeout_secs", "must be greater than 0"));
    }

    check_user(&mut errors, "host", &config.host);
    check_user(&mut errors, "tenant", &config.tenant);
    if !config.host.email.is_empty()
        && config.host.email.eq_ignore_ascii_case(&config.tenant.email)
    {
        errors.push(ValidationError::new("tenant.email", "host and tenant must be different users"));
    }

    let chain = &config.blockchain;
    check_http_url(&mut errors, "blockchain.rpc_url", &chain.rpc_url);
    for (i, url) in chain.failover_urls.iter().enumerate() {
        check_http_url(&mut errors, &format!("blockchain.failover_urls[{}]", i), url);
    }
    if chain.rpc_timeout_secs == 0 {
        errors.push(ValidationError::new("blockchain.rpc_timeout_secs", "must be greater than 0"));
    }
    if chain.receipt_timeout_secs == 0 {
        errors.push(ValidationError::new("blockchain.receipt_timeout_secs", "must be greater than 0"));
    }
    if chain.gas_limit == 0 {
        errors.push(ValidationError::new("blockchain.gas_limit", "must be greater than 0"));
    }
    match chain.tenant_private_key.as_deref() {
        None => errors.push(ValidationError::new(
            "blockchain.tenant_private_key",
            "missing (set it in the file or via BOOKING_VERIFIER_TENANT_PRIVATE_KEY)",
        )),
        Some(key) => {
            let hex = key.strip_prefix("0x").unwrap_or(key);
            if hex.parse::<PrivateKeySigner>().is_err() {
                errors.push(ValidationError::new(
                    "blockchain.tenant_private_key",
                    "not a valid secp256k1 private key",
                ));
            }
        }
    }

    if config.payment.contract_address.parse::<Address>().is_err() {
        errors.push(ValidationError::new("payment.contract_address", "not a valid address"));
    }
    let rate = config.payment.fiat_per_ether;
    if !rate.is_finite() || rate <= 0.0 {
        errors.push(ValidationError::new("payment.fiat_per_ether", "must be a positive number"));
    }

    if config.booking.check_in_offset_days < 0 {
        errors.push(ValidationError::new("booking.check_in_offset_days", "must not be negative"));
    }
    if config.booking.stay_nights < 1 {
        errors.push(ValidationError::new("booking.stay_nights", "must be at least 1"));
    }
    if config.booking.guests == 0 {
        errors.push(ValidationError::new("booking.guests", "must be at least 1"));
    }

    if config.polling.discovery.max_attempts == 0 {
        errors.push(ValidationError::new("polling.discovery.max_attempts", "must be at least 1"));
    }
    if config.polling.confirmation.max_attempts == 0 {
        errors.push(ValidationError::new("polling.confirmation.max_attempts", "must be at least 1"));
    }
    if config.polling.confirmation.target_status.trim().is_empty() {
        errors.push(ValidationError::new("polling.confirmation.target_status", "must not be empty"));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_user(errors: &mut Vec<ValidationError>, section: &str, user: &UserConfig) {
    if !user.email.contains('@') {
        errors.push(ValidationError::new(format!("{}.email", section), "not an email address"));
    }
    if user.password.is_empty() {
        errors.push(ValidationError::new(format!("{}.password", section), "must not be empty"));
    }
    if user.wallet_address.parse::<Address>().is_err() {
        errors.push(ValidationError::new(
            format!("{}.wallet_address", section),
            "not a valid address",
        ));
    }
}

fn check_http_url(errors: &mut Vec<ValidationError>, field: &str, value: &str) {
    match url::Url::parse(value) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => {}
        Ok(url) => errors.push(ValidationError::new(
            field,
            format!("unsupported scheme '{}'", url.scheme()),
        )),
        Err(e) => errors.push(ValidationError::new(field, format!("invalid URL: {}", e))),
    }
}
