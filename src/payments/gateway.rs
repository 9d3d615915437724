//! On-chain settlement of a booking.

use alloy::primitives::{Address, TxHash};
use std::time::Duration;

use crate::blockchain::client::BlockchainClient;
use crate::blockchain::transaction::{GasSettings, TxBuilder};
use crate::blockchain::types::{BlockchainConfig, BlockchainError, BlockchainResult};
use crate::blockchain::wallet::Wallet;
use crate::payments::contract::BookingPayment;

/// Outcome of a mined payment transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentReceipt {
    pub tx_hash: TxHash,
    pub block_number: Option<u64>,
    pub gas_used: u64,
    /// Receipt status: true for success, false for a revert.
    pub success: bool,
}

/// The chain as seen by the scenario.
#[allow(async_fn_in_trait)]
pub trait PaymentGateway {
    /// Latest block number; doubles as the connectivity check.
    async fn block_number(&self) -> BlockchainResult<u64>;

    /// Build, sign, submit and wait for the payment's receipt.
    ///
    /// A mined-but-reverted transaction is returned as a receipt with
    /// `success == false`, not as an error.
    async fn pay_booking(&self, payment: &BookingPayment) -> BlockchainResult<PaymentReceipt>;
}

/// Gateway backed by a JSON-RPC node.
#[derive(Debug, Clone)]
pub struct ChainGateway {
    client: BlockchainClient,
    tx: TxBuilder,
    receipt_timeout_secs: u64,
    receipt_poll_interval: Duration,
}

impl ChainGateway {
    /// Create a gateway.
    pub fn new(
        client: BlockchainClient,
        tx: TxBuilder,
        receipt_timeout_secs: u64,
        receipt_poll_interval: Duration,
    ) -> Self {
        Self {
            client,
            tx,
            receipt_timeout_secs,
            receipt_poll_interval,
        }
    }

    /// Wire up client, tenant wallet and gas settings from configuration.
    pub fn from_config(config: &BlockchainConfig) -> BlockchainResult<Self> {
        let key = config
            .tenant_private_key
            .as_deref()
            .ok_or_else(|| BlockchainError::Wallet("no tenant private key configured".to_string()))?;
        let wallet = Wallet::from_private_key(key, config.chain_id)?;
        let client = BlockchainClient::new(config.clone())?;
        let gas = GasSettings {
            limit: config.gas_limit,
            price_wei: config.gas_price_wei(),
        };

        Ok(Self::new(
            client.clone(),
            TxBuilder::new(client, wallet, gas),
            config.receipt_timeout_secs,
            Duration::from_millis(config.receipt_poll_interval_ms),
        ))
    }

    /// Address that signs payments.
    pub fn signer_address(&self) -> Address {
        self.tx.address()
    }

    /// The underlying RPC client.
    pub fn client(&self) -> &BlockchainClient {
        &self.client
    }
}

impl PaymentGateway for ChainGateway {
    async fn block_number(&self) -> BlockchainResult<u64> {
        self.client.get_block_number().await
    }

    async fn pay_booking(&self, payment: &BookingPayment) -> BlockchainResult<PaymentReceipt> {
        if payment.tenant != self.tx.address() {
            return Err(BlockchainError::Wallet(format!(
                "payment tenant {} is not the signing wallet {}",
                payment.tenant,
                self.tx.address()
            )));
        }

        let request = self
            .tx
            .build(payment.contract, payment.value(), payment.calldata())
            .await?;
        let tx_hash = self.tx.send(request).await?;

        let receipt = self
            .tx
            .wait_for_receipt(tx_hash, self.receipt_timeout_secs, self.receipt_poll_interval)
            .await?;

        Ok(PaymentReceipt {
            tx_hash,
            block_number: receipt.block_number,
            gas_used: receipt.gas_used,
            success: receipt.status(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_config_requires_key() {
        let config = BlockchainConfig::default();
        assert!(matches!(
            ChainGateway::from_config(&config),
            Err(BlockchainError::Wallet(_))
        ));
    }

    #[test]
    fn test_from_config_signer() {
        let config = BlockchainConfig {
            tenant_private_key: Some(
                "0x47e179ec197488593b187f80a00eb0da91f1b9d0b13f8733639f19c30a34926a".to_string(),
            ),
            ..BlockchainConfig::default()
        };
        let gateway = ChainGateway::from_config(&config).unwrap();
        assert_eq!(
            gateway.signer_address(),
            "0x15d34AAf54267DB7D7c367839AAf71A00a2C6A65".parse::<Address>().unwrap()
        );
    }

    #[tokio::test]
    async fn test_rejects_foreign_tenant_before_rpc() {
        let config = BlockchainConfig {
            rpc_url: "http://127.0.0.1:9".to_string(),
            tenant_private_key: Some(
                "47e179ec197488593b187f80a00eb0da91f1b9d0b13f8733639f19c30a34926a".to_string(),
            ),
            ..BlockchainConfig::default()
        };
        let gateway = ChainGateway::from_config(&config).unwrap();
        let payment = BookingPayment {
            contract: Address::repeat_byte(0xaa),
            booking_id: 1,
            host: Address::repeat_byte(0x01),
            tenant: Address::repeat_byte(0x02),
            rent_wei: alloy::primitives::U256::from(1u64),
            deposit_wei: alloy::primitives::U256::ZERO,
        };
        let err = gateway.pay_booking(&payment).await.unwrap_err();
        assert!(err.to_string().contains("is not the signing wallet"));
    }
}
