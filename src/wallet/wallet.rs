//! Keypair wallets
//!
//! A wallet owns one family seed and the account key derived from it. It
//! signs transactions either alone (filling `SigningPubKey` and
//! `TxnSignature`) or as one member of a signer list (producing a blob
//! with a single `Signers` entry for later combination).

use crate::codec::{self, CodecError};
use crate::core::{Signer, SignerWrapper, Transaction};
use crate::crypto::{KeyError, KeyPair, Seed};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Wallet-related errors
#[derive(Error, Debug)]
pub enum WalletError {
    #[error("Wallet not found: {0}")]
    NotFound(String),
    #[error("Wallet already exists: {0}")]
    AlreadyExists(String),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
    #[error("Crypto error: {0}")]
    CryptoError(#[from] KeyError),
    #[error("Codec error: {0}")]
    CodecError(#[from] CodecError),
}

/// A signed, ready-to-submit transaction
#[derive(Debug, Clone, PartialEq)]
pub struct SignedTransaction {
    pub tx_blob: String,
    pub hash: String,
    pub transaction: Transaction,
}

impl SignedTransaction {
    /// Encode an already-signed transaction
    pub fn from_transaction(transaction: Transaction) -> Result<Self, CodecError> {
        let tx_blob = codec::encode(&transaction)?;
        let hash = codec::transaction_hash(&tx_blob)?;
        Ok(Self {
            tx_blob,
            hash,
            transaction,
        })
    }
}

/// A ledger wallet for managing keys and signing transactions
#[derive(Clone)]
pub struct Wallet {
    seed: Seed,
    key_pair: KeyPair,
    /// Optional label for the wallet
    pub label: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Wallet {
    /// Create a new wallet with a fresh seed
    pub fn generate() -> Result<Self, WalletError> {
        Self::from_seed_bytes(Seed::generate())
    }

    /// Create a wallet with a label
    pub fn with_label(label: &str) -> Result<Self, WalletError> {
        let mut wallet = Self::generate()?;
        wallet.label = Some(label.to_string());
        Ok(wallet)
    }

    /// Import a wallet from an encoded `s…` seed
    pub fn from_seed(seed: &str) -> Result<Self, WalletError> {
        Self::from_seed_bytes(Seed::decode(seed)?)
    }

    fn from_seed_bytes(seed: Seed) -> Result<Self, WalletError> {
        let key_pair = KeyPair::from_seed(&seed)?;
        Ok(Self {
            seed,
            key_pair,
            label: None,
            created_at: Utc::now(),
        })
    }

    /// Get the wallet's classic address
    pub fn address(&self) -> String {
        self.key_pair.address()
    }

    pub fn account_id(&self) -> [u8; 20] {
        self.key_pair.account_id()
    }

    /// Get the wallet's public key (hex)
    pub fn public_key(&self) -> String {
        self.key_pair.public_key_hex()
    }

    /// Get the wallet's encoded seed
    /// WARNING: Keep this secret!
    pub fn seed(&self) -> String {
        self.seed.encode()
    }

    /// Sign as the sole signer
    pub fn sign(&self, tx: &Transaction) -> Result<SignedTransaction, WalletError> {
        let mut prepared = tx.clone();
        prepared.strip_signatures();
        prepared.common.signing_pub_key = Some(self.public_key());

        let digest = codec::signing_hash(&prepared)?;
        let signature = self.key_pair.sign(&digest)?;
        prepared.common.txn_signature = Some(hex::encode_upper(signature));

        Ok(SignedTransaction::from_transaction(prepared)?)
    }

    /// Sign as one member of a signer list, returning a partial blob
    pub fn multisign(&self, tx: &Transaction) -> Result<String, WalletError> {
        let mut prepared = tx.clone();
        prepared.strip_signatures();
        prepared.common.signing_pub_key = Some(String::new());

        let digest = codec::multisigning_hash(&prepared, &self.account_id())?;
        let signature = self.key_pair.sign(&digest)?;

        prepared.common.signers = Some(vec![SignerWrapper {
            signer: Signer {
                account: self.address(),
                txn_signature: hex::encode_upper(signature),
                signing_pub_key: self.public_key(),
            },
        }]);

        Ok(codec::encode(&prepared)?)
    }

    /// Export wallet info (without seed)
    pub fn export_public_info(&self) -> WalletInfo {
        WalletInfo {
            address: self.address(),
            public_key: self.public_key(),
            label: self.label.clone(),
            created_at: self.created_at,
        }
    }
}

impl std::fmt::Debug for Wallet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Wallet")
            .field("address", &self.address())
            .field("label", &self.label)
            .finish()
    }
}

/// Public wallet information (safe to share)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalletInfo {
    pub address: String,
    pub public_key: String,
    pub label: Option<String>,
    pub created_at: DateTime<Utc>,
}
