//! Combining partially multi-signed blobs
//!
//! Each co-signer produces a blob carrying only its own `Signers` entry.
//! Combining checks they all sign the same transaction and merges the
//! entries sorted by account ID, so input order never matters.

use crate::codec;
use crate::core::{SignerWrapper, Transaction};
use crate::crypto::decode_address;
use crate::multisig::signer_list::MultisigError;

/// Merge multi-signed blobs into one transaction
pub fn combine(blobs: &[String]) -> Result<Transaction, MultisigError> {
    let mut decoded = blobs
        .iter()
        .map(|blob| codec::decode(blob))
        .collect::<Result<Vec<_>, _>>()?;

    let Some(first) = decoded.first() else {
        return Err(MultisigError::NoSignatures);
    };

    let mut unsigned = first.clone();
    unsigned.strip_signatures();

    let mut signers: Vec<SignerWrapper> = Vec::new();
    for tx in decoded.iter_mut() {
        let entries = tx.common.signers.take().unwrap_or_default();
        tx.strip_signatures();
        if *tx != unsigned {
            return Err(MultisigError::TransactionMismatch);
        }
        signers.extend(entries);
    }

    let mut keyed = Vec::with_capacity(signers.len());
    for wrapper in signers {
        keyed.push((decode_address(&wrapper.signer.account)?, wrapper));
    }
    keyed.sort_by(|a, b| a.0.cmp(&b.0));
    keyed.dedup_by(|a, b| a.0 == b.0);

    if keyed.is_empty() {
        return Err(MultisigError::NoSignatures);
    }

    unsigned.common.signers = Some(keyed.into_iter().map(|(_, s)| s).collect());
    Ok(unsigned)
}
