//! The ledger client seam
//!
//! Everything the wallet needs from the network goes through
//! [`LedgerClient`]. Autofill and submit-and-wait are provided on top of the
//! primitive queries so every implementation shares them.

use crate::client::autofill;
use crate::codec::CodecError;
use crate::core::{
    AccountSnapshot, AmountError, Drops, FeeLevels, ReserveSchedule, SignerList, Transaction,
};
use crate::wallet::SignedTransaction;
use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

/// Client errors
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Connection error: {0}")]
    Connection(String),
    #[error("WebSocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Account not found: {0}")]
    AccountNotFound(String),
    #[error("Ledger returned {code}: {message}")]
    Ledger { code: String, message: String },
    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),
    #[error("Codec error: {0}")]
    Codec(#[from] CodecError),
    #[error("Amount error: {0}")]
    Amount(#[from] AmountError),
    #[error("Transaction {hash} was not validated by ledger {last_ledger_sequence}")]
    Expired {
        hash: String,
        last_ledger_sequence: u32,
    },
}

/// Tuning for autofill and submit-and-wait
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmissionSettings {
    /// Ledgers of headroom given to `LastLedgerSequence`
    pub ledger_offset: u32,
    pub poll_interval: Duration,
    /// Extra percentage added to quoted fees
    pub fee_cushion_percent: u32,
}

impl Default for SubmissionSettings {
    fn default() -> Self {
        Self {
            ledger_offset: 20,
            poll_interval: Duration::from_millis(1000),
            fee_cushion_percent: 0,
        }
    }
}

/// Result of submitting a transaction
#[derive(Debug, Clone, PartialEq)]
pub struct SubmitResponse {
    pub hash: String,
    pub engine_result: String,
    pub engine_result_message: Option<String>,
    /// Whether the transaction was seen in a validated ledger
    pub validated: bool,
    /// The network's response, uninterpreted
    pub raw: Value,
}

impl SubmitResponse {
    /// Local or malformed failures that can never make it into a ledger
    pub fn is_final_rejection(&self) -> bool {
        ["tem", "tef", "tel"]
            .iter()
            .any(|prefix| self.engine_result.starts_with(prefix))
    }
}

/// Outcome of running a transaction against the current ledger without
/// applying it
#[derive(Debug, Clone, PartialEq)]
pub struct SimulateResponse {
    pub engine_result: String,
    pub engine_result_message: Option<String>,
    /// The network's response, metadata included
    pub raw: Value,
}

impl SimulateResponse {
    pub fn is_success(&self) -> bool {
        self.engine_result == "tesSUCCESS"
    }
}

/// Lookup result for a submitted transaction
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionStatus {
    pub validated: bool,
    pub result: Option<String>,
    pub raw: Value,
}

#[async_trait]
pub trait LedgerClient: Send + Sync {
    /// Current state of an account root
    async fn account_info(&self, address: &str) -> Result<AccountSnapshot, ClientError>;

    async fn reserve_schedule(&self) -> Result<ReserveSchedule, ClientError>;

    async fn fee_levels(&self) -> Result<FeeLevels, ClientError>;

    /// Index of the current open ledger
    async fn ledger_index(&self) -> Result<u32, ClientError>;

    /// The account's signer list, `None` when it has none
    async fn signer_list(&self, address: &str) -> Result<Option<SignerList>, ClientError>;

    /// Every ledger object the account owns, as returned by the network
    async fn account_objects(&self, address: &str) -> Result<Vec<Value>, ClientError>;

    async fn submit(&self, tx_blob: &str) -> Result<SubmitResponse, ClientError>;

    /// Dry-run an unsigned transaction; nothing is applied or broadcast
    async fn simulate(&self, tx: &Transaction) -> Result<SimulateResponse, ClientError>;

    /// Look up a transaction by hash, `None` when the network doesn't know it
    async fn transaction(&self, hash: &str) -> Result<Option<TransactionStatus>, ClientError>;

    fn settings(&self) -> SubmissionSettings {
        SubmissionSettings::default()
    }

    /// Fee to quote for one ordinary transaction
    async fn base_fee(&self) -> Result<Drops, ClientError> {
        let levels = self.fee_levels().await?;
        Ok(levels.recommended())
    }

    /// Fill `Sequence`, `Fee` and `LastLedgerSequence` where missing
    async fn autofill(&self, tx: Transaction) -> Result<Transaction, ClientError> {
        autofill::autofill(self, tx).await
    }

    /// Submit a signed transaction and wait until it is validated or its
    /// `LastLedgerSequence` has passed
    async fn submit_and_wait(
        &self,
        signed: &SignedTransaction,
    ) -> Result<SubmitResponse, ClientError> {
        let mut response = self.submit(&signed.tx_blob).await?;
        response.hash = signed.hash.clone();
        log::info!("Submitted {}: {}", signed.hash, response.engine_result);

        if response.is_final_rejection() {
            return Ok(response);
        }

        let Some(last_ledger_sequence) = signed.transaction.common.last_ledger_sequence else {
            log::warn!("{} has no LastLedgerSequence, not waiting", signed.hash);
            return Ok(response);
        };

        loop {
            if let Some(status) = self.transaction(&signed.hash).await? {
                if status.validated {
                    log::info!(
                        "{} validated: {}",
                        signed.hash,
                        status.result.as_deref().unwrap_or("unknown")
                    );
                    response.validated = true;
                    response.raw = status.raw;
                    return Ok(response);
                }
            }

            let current = self.ledger_index().await?;
            if current > last_ledger_sequence {
                return Err(ClientError::Expired {
                    hash: signed.hash.clone(),
                    last_ledger_sequence,
                });
            }

            tokio::time::sleep(self.settings().poll_interval).await;
        }
    }
}
