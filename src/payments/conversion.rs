//! Fiat to chain amount conversion.
//!
//! Uses one fixed rate from configuration. This is an approximation for test
//! runs, not a pricing source.

use alloy::primitives::utils::parse_ether;
use alloy::primitives::U256;
use thiserror::Error;

/// Maximum decimals of an ether amount (1 wei = 1e-18 ether).
const ETHER_DECIMALS: usize = 18;

/// Errors converting amounts.
#[derive(Debug, Error, PartialEq)]
pub enum ConversionError {
    /// Amount is negative, NaN or infinite.
    #[error("amount {0} cannot be paid on chain")]
    InvalidAmount(f64),

    /// Rate is zero, negative, NaN or infinite.
    #[error("conversion rate {0} is not positive")]
    InvalidRate(f64),

    /// Unit parsing failed.
    #[error("could not convert {amount} ether to wei: {message}")]
    Units { amount: String, message: String },
}

/// Convert a fiat amount to ether at a fixed `fiat_per_ether` rate.
pub fn to_chain_amount(fiat_amount: f64, fiat_per_ether: f64) -> f64 {
    fiat_amount / fiat_per_ether
}

/// Checked variant of [`to_chain_amount`] for untrusted inputs.
pub fn try_to_chain_amount(fiat_amount: f64, fiat_per_ether: f64) -> Result<f64, ConversionError> {
    if !fiat_per_ether.is_finite() || fiat_per_ether <= 0.0 {
        return Err(ConversionError::InvalidRate(fiat_per_ether));
    }
    if !fiat_amount.is_finite() || fiat_amount < 0.0 {
        return Err(ConversionError::InvalidAmount(fiat_amount));
    }
    Ok(to_chain_amount(fiat_amount, fiat_per_ether))
}

/// Convert an ether amount to wei, truncating beyond 18 decimals.
///
/// Uses the shortest decimal form of the float, so `0.1` becomes exactly
/// 10^17 wei.
pub fn ether_to_wei(amount: f64) -> Result<U256, ConversionError> {
    if !amount.is_finite() || amount < 0.0 {
        return Err(ConversionError::InvalidAmount(amount));
    }

    let text = amount.to_string();
    let text = match text.split_once('.') {
        Some((whole, frac)) if frac.len() > ETHER_DECIMALS => {
            format!("{}.{}", whole, &frac[..ETHER_DECIMALS])
        }
        _ => text,
    };

    parse_ether(&text).map_err(|e| ConversionError::Units {
        amount: text.clone(),
        message: e.to_string(),
    })
}
