//! Autofill of network-dependent fields
//!
//! Only fields the caller left empty are filled, so a fee chosen up front
//! (multi-sign surcharge, explicit override) survives autofill untouched.

use crate::client::ledger::{ClientError, LedgerClient};
use crate::core::{
    batch_fee, multisign_fee, with_cushion, AccountSnapshot, Drops, FeeLevels, ReserveSchedule, Transaction,
    TransactionKind,
};
use serde::Serialize;

/// Fill `Sequence`, `Fee` and `LastLedgerSequence` where missing.
///
/// Batch envelopes are quoted at base × (2 + inner count) and inner
/// transactions without a sequence or ticket get consecutive sequences
/// after the envelope's.
pub async fn autofill<C: LedgerClient + ?Sized>(
    client: &C,
    mut tx: Transaction,
) -> Result<Transaction, ClientError> {
    let settings = client.settings();

    let inner_missing_sequence = tx
        .inner_transactions()
        .map(|inner| inner.iter().any(|t| needs_sequence(t)))
        .unwrap_or(false);

    if needs_sequence(&tx) || inner_missing_sequence {
        let account = client.account_info(tx.account()).await?;
        let mut next = account.sequence;

        if tx.common.sequence.is_none() && tx.common.ticket_sequence.is_none() {
            tx.common.sequence = Some(next);
        }
        if tx.common.ticket_sequence.is_none() {
            next = tx.common.sequence.unwrap_or(next).saturating_add(1);
        }

        if let TransactionKind::Batch(batch) = &mut tx.kind {
            for raw in batch.raw_transactions.iter_mut() {
                let inner = &mut raw.raw_transaction;
                if needs_sequence(inner) {
                    inner.common.sequence = Some(next);
                    next = next.saturating_add(1);
                }
            }
        }
    }

    if tx.common.fee.is_none() {
        tx.common.fee = Some(quote_fee(client, &tx).await?);
    }

    if tx.common.last_ledger_sequence.is_none() {
        let current = client.ledger_index().await?;
        tx.common.last_ledger_sequence = Some(current.saturating_add(settings.ledger_offset));
    }

    log::debug!(
        "Autofilled {} for {}: sequence={:?} fee={:?} last_ledger={:?}",
        tx.transaction_type(),
        tx.account(),
        tx.common.sequence,
        tx.common.fee,
        tx.common.last_ledger_sequence
    );

    Ok(tx)
}

/// Fee for a single-signed `tx`, with the configured cushion applied
pub async fn quote_fee<C: LedgerClient + ?Sized>(
    client: &C,
    tx: &Transaction,
) -> Result<Drops, ClientError> {
    let base = client.base_fee().await?;
    let fee = match &tx.kind {
        TransactionKind::Batch(batch) => batch_fee(base, batch.raw_transactions.len()),
        _ => base,
    };
    Ok(with_cushion(fee, client.settings().fee_cushion_percent))
}

/// Fee `tx` will actually carry when submitted.
///
/// An override wins. Multi-signed transactions pay the quote times
/// (signers + 1); a single-signed one keeps a preset non-zero fee and
/// is quoted otherwise.
pub async fn submission_fee<C: LedgerClient + ?Sized>(
    client: &C,
    tx: &Transaction,
    signer_count: usize,
    fee_override: Option<Drops>,
) -> Result<Drops, ClientError> {
    if let Some(fee) = fee_override {
        return Ok(fee);
    }
    if signer_count > 0 {
        return Ok(multisign_fee(quote_fee(client, tx).await?, signer_count));
    }
    match tx.fee() {
        Some(fee) if fee > Drops::ZERO => Ok(fee),
        _ => quote_fee(client, tx).await,
    }
}

fn needs_sequence(tx: &Transaction) -> bool {
    tx.common.sequence.is_none() && tx.common.ticket_sequence.is_none()
}

/// Everything an account view or sufficiency check needs, fetched at once
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AccountContext {
    pub account: AccountSnapshot,
    pub reserve: ReserveSchedule,
    pub fees: FeeLevels,
    pub ledger_index: u32,
}

/// Fetch account, reserve, fee and ledger index concurrently
pub async fn fetch_account_context<C: LedgerClient + ?Sized>(
    client: &C,
    address: &str,
) -> Result<AccountContext, ClientError> {
    let (account, reserve, fees, ledger_index) = tokio::try_join!(
        client.account_info(address),
        client.reserve_schedule(),
        client.fee_levels(),
        client.ledger_index(),
    )?;

    Ok(AccountContext {
        account,
        reserve,
        fees,
        ledger_index,
    })
}
