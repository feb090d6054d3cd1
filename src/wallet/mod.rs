//! Wallet module for key management and transaction signing

pub mod store;
pub mod wallet;

pub use store::WalletStore;
pub use wallet::{SignedTransaction, Wallet, WalletError, WalletInfo};
