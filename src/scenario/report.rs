//! Result of a completed verification run.

use alloy::primitives::{TxHash, U256};
use std::fmt;
use std::time::Duration;
use uuid::Uuid;

use crate::booking::Confirmation;

/// Everything a successful run established.
#[derive(Debug, Clone)]
pub struct ScenarioReport {
    pub run_id: Uuid,
    /// Chain head at the connectivity check.
    pub block_number: u64,
    pub host_id: String,
    pub tenant_id: String,
    pub property_id: u64,
    pub property_title: Option<String>,
    pub booking_id: u64,
    /// Price in fiat units.
    pub total_price: f64,
    /// Price in ether at the configured rate.
    pub chain_amount: f64,
    pub rent_wei: U256,
    pub tx_hash: TxHash,
    pub gas_used: u64,
    pub confirmation: Confirmation,
    /// Non-fatal problems met along the way.
    pub warnings: Vec<String>,
    pub elapsed: Duration,
}

impl fmt::Display for ScenarioReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Booking verification passed (run {})", self.run_id)?;
        writeln!(f, "  host:        {}", self.host_id)?;
        writeln!(f, "  tenant:      {}", self.tenant_id)?;
        match &self.property_title {
            Some(title) => writeln!(f, "  property:    {} ({})", self.property_id, title)?,
            None => writeln!(f, "  property:    {}", self.property_id)?,
        }
        writeln!(f, "  booking:     {}", self.booking_id)?;
        writeln!(
            f,
            "  price:       {} -> {:.6} ETH ({} wei)",
            self.total_price, self.chain_amount, self.rent_wei
        )?;
        writeln!(f, "  payment tx:  {} (gas {})", self.tx_hash, self.gas_used)?;
        writeln!(
            f,
            "  status:      {} after {} checks",
            self.confirmation.status, self.confirmation.attempts
        )?;
        write!(f, "  elapsed:     {:.1}s", self.elapsed.as_secs_f64())?;
        for warning in &self.warnings {
            write!(f, "\n  warning:     {}", warning)?;
        }
        Ok(())
    }
}
