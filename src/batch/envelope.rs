//! Batch modes and envelope construction

use crate::client::ClientError;
use crate::codec::CodecError;
use crate::core::transaction::{Batch, RawTransaction};
use crate::core::{
    BatchFlags, Drops, GlobalFlags, Transaction, TransactionBuilder, TransactionType,
};
use crate::multisig::MultisigError;
use crate::wallet::WalletError;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Most inner transactions one envelope may carry
pub const MAX_INNER_TRANSACTIONS: usize = 8;

/// Errors related to batch submission
#[derive(Error, Debug)]
pub enum BatchError {
    #[error("no inner transactions provided")]
    Empty,
    #[error("Batch holds {0} inner transactions, the limit is {}", MAX_INNER_TRANSACTIONS)]
    TooMany(usize),
    #[error("Inner transaction {0} is itself a batch")]
    Nested(usize),
    #[error("Unknown batch mode: {0}")]
    UnknownMode(String),
    #[error("Wallet error: {0}")]
    WalletError(#[from] WalletError),
    #[error("Client error: {0}")]
    ClientError(#[from] ClientError),
    #[error("Multisig error: {0}")]
    MultisigError(#[from] MultisigError),
    #[error("Codec error: {0}")]
    CodecError(#[from] CodecError),
}

/// How the ledger executes the inner transactions of an envelope
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchMode {
    /// Every inner transaction succeeds or none is applied
    AllOrNothing,
    /// The first one to succeed is applied, the rest are skipped
    OnlyOne,
    /// Applied in order until the first failure
    UntilFailure,
    /// Each applied on its own regardless of the others
    Independent,
}

impl BatchMode {
    pub fn flags(&self) -> BatchFlags {
        match self {
            BatchMode::AllOrNothing => BatchFlags::ALL_OR_NOTHING,
            BatchMode::OnlyOne => BatchFlags::ONLY_ONE,
            BatchMode::UntilFailure => BatchFlags::UNTIL_FAILURE,
            BatchMode::Independent => BatchFlags::INDEPENDENT,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BatchMode::AllOrNothing => "all-or-nothing",
            BatchMode::OnlyOne => "only-one",
            BatchMode::UntilFailure => "until-failure",
            BatchMode::Independent => "independent",
        }
    }
}

impl fmt::Display for BatchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for BatchMode {
    type Err = BatchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('_', "-").as_str() {
            "all-or-nothing" | "allornothing" => Ok(BatchMode::AllOrNothing),
            "only-one" | "onlyone" => Ok(BatchMode::OnlyOne),
            "until-failure" | "untilfailure" => Ok(BatchMode::UntilFailure),
            "independent" => Ok(BatchMode::Independent),
            _ => Err(BatchError::UnknownMode(s.to_string())),
        }
    }
}

/// Rewrite a transaction to run inside an envelope sent by `account`
pub fn prepare_inner(mut tx: Transaction, account: &str) -> Transaction {
    tx.strip_signatures();
    tx.common.account = account.to_string();
    tx.common.fee = Some(Drops::ZERO);
    tx.common.signing_pub_key = Some(String::new());
    tx.common.flags = Some(tx.flags() | GlobalFlags::INNER_BATCH_TXN.bits());
    tx
}

/// Wrap `inner` in a batch envelope sent by `account`
pub fn build_envelope(
    account: &str,
    inner: Vec<Transaction>,
    mode: BatchMode,
) -> Result<Transaction, BatchError> {
    if inner.is_empty() {
        return Err(BatchError::Empty);
    }
    if inner.len() > MAX_INNER_TRANSACTIONS {
        return Err(BatchError::TooMany(inner.len()));
    }
    if let Some(index) = inner
        .iter()
        .position(|tx| tx.transaction_type() == TransactionType::Batch)
    {
        return Err(BatchError::Nested(index + 1));
    }

    let raw_transactions = inner
        .into_iter()
        .map(|tx| RawTransaction {
            raw_transaction: prepare_inner(tx, account),
        })
        .collect();

    Ok(TransactionBuilder::new(account)
        .flags(mode.flags().bits())
        .build(Batch { raw_transactions }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::transaction::TicketCreate;

    fn ticket_create(account: &str) -> Transaction {
        TransactionBuilder::new(account)
            .fee(Drops(12))
            .build(TicketCreate { ticket_count: 1 })
    }

    #[test]
    fn test_mode_flags() {
        assert_eq!(BatchMode::AllOrNothing.flags().bits(), 0x0001_0000);
        assert_eq!(BatchMode::OnlyOne.flags().bits(), 0x0002_0000);
        assert_eq!(BatchMode::UntilFailure.flags().bits(), 0x0004_0000);
        assert_eq!(BatchMode::Independent.flags().bits(), 0x0008_0000);
    }

    #[test]
    fn test_mode_parsing() {
        assert_eq!("only-one".parse::<BatchMode>().unwrap(), BatchMode::OnlyOne);
        assert_eq!(
            "UNTIL_FAILURE".parse::<BatchMode>().unwrap(),
            BatchMode::UntilFailure
        );
        assert!(matches!(
            "sometimes".parse::<BatchMode>(),
            Err(BatchError::UnknownMode(_))
        ));
    }

    #[test]
    fn test_inner_rewrite() {
        let mut tx = ticket_create("rSomeoneElse");
        tx.common.txn_signature = Some("AB".to_string());
        tx.common.flags = Some(0x0000_0001);

        let inner = prepare_inner(tx, "rWallet");
        assert_eq!(inner.account(), "rWallet");
        assert_eq!(inner.fee(), Some(Drops::ZERO));
        assert_eq!(inner.common.signing_pub_key.as_deref(), Some(""));
        assert_eq!(inner.flags(), 0x4000_0001);
        assert!(inner.common.txn_signature.is_none());
    }

    #[test]
    fn test_envelope() {
        let envelope = build_envelope(
            "rWallet",
            vec![ticket_create("rWallet"), ticket_create("rWallet")],
            BatchMode::Independent,
        )
        .unwrap();
        assert_eq!(envelope.transaction_type(), TransactionType::Batch);
        assert_eq!(envelope.flags(), 0x0008_0000);
        assert_eq!(envelope.inner_transactions().unwrap().len(), 2);
        assert!(envelope.fee().is_none());
    }

    #[test]
    fn test_envelope_limits() {
        assert!(matches!(
            build_envelope("rWallet", vec![], BatchMode::AllOrNothing),
            Err(BatchError::Empty)
        ));

        let too_many = (0..9).map(|_| ticket_create("rWallet")).collect();
        assert!(matches!(
            build_envelope("rWallet", too_many, BatchMode::AllOrNothing),
            Err(BatchError::TooMany(9))
        ));

        let nested = build_envelope(
            "rWallet",
            vec![ticket_create("rWallet"), ticket_create("rWallet")],
            BatchMode::AllOrNothing,
        )
        .unwrap();
        assert!(matches!(
            build_envelope(
                "rWallet",
                vec![ticket_create("rWallet"), nested],
                BatchMode::AllOrNothing
            ),
            Err(BatchError::Nested(2))
        ));
    }
}
