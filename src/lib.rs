//! Ledger Wallet: a multi-wallet core for XRP-Ledger-style networks
//!
//! This crate provides:
//! - Family-seed wallets (secp256k1) with file-backed storage
//! - Typed transactions with the ledger's binary signing codec
//! - Balance and reserve sufficiency checks before anything is signed
//! - Declarative form validation for the supported actions
//! - Batch envelopes with atomicity modes
//! - Multi-signature assembly against the account's on-ledger signer list
//! - An async WebSocket ledger client with autofill and validated submission
//!
//! # Example
//!
//! ```rust
//! use ledger_wallet::core::{
//!     is_insufficient, AccountSnapshot, Drops, ReserveSchedule, TransactionBuilder,
//! };
//! use ledger_wallet::core::transaction::Payment;
//! use ledger_wallet::core::Amount;
//! use ledger_wallet::wallet::Wallet;
//!
//! let wallet = Wallet::generate().unwrap();
//! let tx = TransactionBuilder::new(&wallet.address()).build(Payment {
//!     destination: "rPT1Sjq2YGrBMTttX4GZHjKu9dyfzbpAYe".to_string(),
//!     amount: Amount::Native(Drops(5_000_000)),
//!     destination_tag: None,
//!     send_max: None,
//!     deliver_min: None,
//! });
//!
//! let account = AccountSnapshot {
//!     address: wallet.address(),
//!     balance: Drops(12_000_000),
//!     owner_count: 0,
//!     sequence: 1,
//!     flags: 0,
//! };
//! let reserve = ReserveSchedule::new(Drops(10_000_000), Drops(2_000_000));
//!
//! // 5 XRP + fee on top of a 10 XRP reserve is more than 12 XRP
//! assert!(is_insufficient(&reserve, &account, "0", &tx, Drops(12)).unwrap());
//! ```

pub mod actions;
pub mod batch;
pub mod cli;
pub mod client;
pub mod codec;
pub mod config;
pub mod core;
pub mod crypto;
pub mod multisig;
pub mod validation;
pub mod wallet;

// Re-export commonly used types
pub use batch::{submit_batch, BatchMode};
pub use client::{LedgerClient, SubmissionSettings, WsLedgerClient};
pub use config::WalletConfig;
pub use core::{Drops, Transaction, TransactionBuilder};
pub use crypto::KeyPair;
pub use multisig::{submit_multisigned, SignerCredential};
pub use validation::Validator;
pub use wallet::{Wallet, WalletStore};
