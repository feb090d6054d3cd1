//! Core wallet components
//!
//! This module contains the fundamental building blocks:
//! - Amounts (drops, issued, MPT)
//! - Typed transactions and their builder
//! - Flag sets
//! - Account and reserve snapshots
//! - Balance/reserve sufficiency checking
//! - Fee quoting
//! - Action result state

pub mod account;
pub mod action;
pub mod amount;
pub mod fee;
pub mod flags;
pub mod reserve;
pub mod transaction;

pub use account::{AccountSnapshot, ReserveSchedule, SignerList};
pub use action::ActionState;
pub use amount::{
    Amount, AmountError, Drops, Issue, IssuedAmount, MptAmount, DROPS_PER_XRP, MAX_XRP_DECIMALS,
};
pub use fee::{batch_fee, multisign_fee, with_cushion, FeeLevels};
pub use flags::{
    AccountRootFlags, BatchFlags, GlobalFlags, MpTokenAuthorizeFlags, NfTokenMintFlags,
    TrustSetFlags,
};
pub use reserve::{
    batch_requirement, is_insufficient, reserve_requirement, spendable, ReserveRequirement,
};
pub use transaction::{
    CommonFields, Memo, MemoWrapper, PermissionWrapper, RawTransaction, Signer, SignerEntry,
    SignerEntryWrapper, SignerWrapper, Transaction, TransactionBuilder, TransactionKind,
    TransactionType,
};
