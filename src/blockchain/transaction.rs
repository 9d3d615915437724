//! Transaction building, signing, and receipt monitoring.
//!
//! # Lifecycle
//! ```text
//! build (nonce from chain, fixed gas) → sign (EIP-155) → submit raw → mined (receipt)
//! ```
//!
//! Submission is never retried; a failed or reverted payment is final.

use alloy::eips::eip2718::Encodable2718;
use alloy::network::TransactionBuilder;
use alloy::primitives::{Address, Bytes, TxHash, U256};
use alloy::rpc::types::{TransactionReceipt, TransactionRequest};
use std::time::Duration;
use tokio::time::{interval, timeout, MissedTickBehavior};

use crate::blockchain::client::BlockchainClient;
use crate::blockchain::types::{BlockchainError, BlockchainResult};
use crate::blockchain::wallet::Wallet;

/// Fixed gas parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GasSettings {
    pub limit: u64,
    /// Legacy gas price in wei.
    pub price_wei: u128,
}

/// Transaction builder for the tenant's wallet.
#[derive(Debug, Clone)]
pub struct TxBuilder {
    client: BlockchainClient,
    wallet: Wallet,
    gas: GasSettings,
}

impl TxBuilder {
    /// Create a new transaction builder.
    pub fn new(client: BlockchainClient, wallet: Wallet, gas: GasSettings) -> Self {
        Self { client, wallet, gas }
    }

    /// Build a contract call with the sender's current nonce.
    ///
    /// # Arguments
    /// * `to` - Contract address
    /// * `value` - Amount of native token to send
    /// * `data` - ABI-encoded call data
    pub async fn build(
        &self,
        to: Address,
        value: U256,
        data: Bytes,
    ) -> BlockchainResult<TransactionRequest> {
        let nonce = self.client.get_transaction_count(self.wallet.address()).await?;

        Ok(legacy_request(
            self.wallet.address(),
            to,
            value,
            data,
            nonce,
            self.gas,
            self.wallet.chain_id(),
        ))
    }

    /// Sign a request into an EIP-2718 encoded envelope.
    pub async fn sign(&self, tx: TransactionRequest) -> BlockchainResult<Bytes> {
        let envelope = tx
            .build(&self.wallet.network_wallet())
            .await
            .map_err(|e| BlockchainError::Signing(e.to_string()))?;
        Ok(Bytes::from(envelope.encoded_2718()))
    }

    /// Sign and submit, returning the transaction hash.
    pub async fn send(&self, tx: TransactionRequest) -> BlockchainResult<TxHash> {
        let raw = self.sign(tx).await?;
        let tx_hash = self.client.send_raw_transaction(raw).await?;
        tracing::info!(tx_hash = %tx_hash, "Transaction submitted");
        Ok(tx_hash)
    }

    /// Wait until the transaction has a receipt.
    ///
    /// # Arguments
    /// * `tx_hash` - Transaction hash to monitor
    /// * `timeout_secs` - Maximum time to wait for the receipt
    /// * `poll_interval` - Delay between receipt lookups
    pub async fn wait_for_receipt(
        &self,
        tx_hash: TxHash,
        timeout_secs: u64,
        poll_interval: Duration,
    ) -> BlockchainResult<TransactionReceipt> {
        let result = timeout(Duration::from_secs(timeout_secs), async {
            let mut ticker = interval(poll_interval.max(Duration::from_millis(1)));
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;

                match self.client.get_transaction_receipt(tx_hash).await? {
                    Some(receipt) => return Ok(receipt),
                    None => tracing::debug!(tx_hash = %tx_hash, "Transaction pending"),
                }
            }
        })
        .await;

        match result {
            Ok(receipt) => receipt,
            Err(_) => Err(BlockchainError::ReceiptTimeout {
                tx_hash,
                secs: timeout_secs,
            }),
        }
    }

    /// The sender address.
    pub fn address(&self) -> Address {
        self.wallet.address()
    }
}

/// Assemble a legacy (gas price) transaction request.
pub fn legacy_request(
    from: Address,
    to: Address,
    value: U256,
    data: Bytes,
    nonce: u64,
    gas: GasSettings,
    chain_id: u64,
) -> TransactionRequest {
    TransactionRequest::default()
        .with_from(from)
        .with_to(to)
        .with_value(value)
        .with_input(data)
        .with_nonce(nonce)
        .with_gas_price(gas.price_wei)
        .with_gas_limit(gas.limit)
        .with_chain_id(chain_id)
}
