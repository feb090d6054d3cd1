//! Batch submission
//!
//! A single transaction goes out on its own; two or more are wrapped in an
//! envelope that is autofilled, signed (alone or by a signer list) and
//! submitted as one.

use crate::batch::envelope::{build_envelope, BatchError, BatchMode};
use crate::client::{LedgerClient, SubmitResponse};
use crate::core::{Drops, Transaction};
use crate::multisig::{submit_multisigned, SignerCredential};
use crate::wallet::Wallet;

/// Signing choices for [`submit_batch`]
#[derive(Debug, Clone, Default)]
pub struct SubmitOptions {
    /// Co-signers; when non-empty the envelope is multi-signed
    pub signers: Vec<SignerCredential>,
    /// Fee to use instead of the quote
    pub fee_override: Option<Drops>,
    /// Key that signs in place of the wallet's own (e.g. a regular key)
    pub fallback_signer: Option<Wallet>,
}

/// Submit `inner` from `wallet` with the given batch semantics
pub async fn submit_batch<C: LedgerClient + ?Sized>(
    client: &C,
    wallet: &Wallet,
    inner: Vec<Transaction>,
    mode: BatchMode,
    options: SubmitOptions,
) -> Result<SubmitResponse, BatchError> {
    if inner.is_empty() {
        return Err(BatchError::Empty);
    }

    let account = wallet.address();
    let signer = options.fallback_signer.as_ref().unwrap_or(wallet);

    if inner.len() == 1 {
        log::debug!("[{}] one transaction, submitting without an envelope", account);
        let Some(mut tx) = inner.into_iter().next() else {
            return Err(BatchError::Empty);
        };
        tx.common.account = account.clone();
        // A zero fee is an inner-transaction fee; quote a real one instead
        tx.common.fee = match options.fee_override {
            Some(fee) => Some(fee),
            None => tx.common.fee.filter(|fee| *fee > Drops::ZERO),
        };
        let tx = client.autofill(tx).await?;
        let signed = signer.sign(&tx)?;
        return Ok(client.submit_and_wait(&signed).await?);
    }

    log::debug!(
        "[{}] building {} envelope with {} inner transactions",
        account,
        mode,
        inner.len()
    );
    let mut envelope = build_envelope(&account, inner, mode)?;

    if !options.signers.is_empty() {
        let outcome =
            submit_multisigned(client, envelope, &options.signers, options.fee_override).await?;
        return Ok(outcome.response);
    }

    if let Some(fee) = options.fee_override {
        envelope.common.fee = Some(fee);
    }
    let envelope = client.autofill(envelope).await?;
    let signed = signer.sign(&envelope)?;
    Ok(client.submit_and_wait(&signed).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::mock::MockLedger;
    use crate::codec;
    use crate::core::transaction::{Payment, TicketCreate};
    use crate::core::{Amount, SignerEntry, SignerList, TransactionBuilder, TransactionType};

    const DESTINATION: &str = "rPT1Sjq2YGrBMTttX4GZHjKu9dyfzbpAYe";

    fn payment(from: &str, drops: u64) -> Transaction {
        TransactionBuilder::new(from).build(Payment {
            destination: DESTINATION.to_string(),
            amount: Amount::Native(Drops(drops)),
            destination_tag: None,
            send_max: None,
            deliver_min: None,
        })
    }

    fn setup() -> (MockLedger, Wallet) {
        let wallet = Wallet::generate().unwrap();
        let mock = MockLedger::new();
        mock.add_account(&wallet.address(), Drops(100_000_000), 0, 20);
        (mock, wallet)
    }

    #[tokio::test]
    async fn test_empty_makes_no_calls() {
        let (mock, wallet) = setup();
        let err = submit_batch(
            &mock,
            &wallet,
            vec![],
            BatchMode::AllOrNothing,
            SubmitOptions::default(),
        )
        .await
        .unwrap_err();

        assert_eq!(err.to_string(), "no inner transactions provided");
        assert!(mock.calls().is_empty());
    }

    #[tokio::test]
    async fn test_single_transaction_skips_envelope() {
        let (mock, wallet) = setup();
        let response = submit_batch(
            &mock,
            &wallet,
            vec![payment(&wallet.address(), 1_000)],
            BatchMode::AllOrNothing,
            SubmitOptions::default(),
        )
        .await
        .unwrap();

        assert!(response.validated);
        let submitted = mock.submitted();
        assert_eq!(submitted.len(), 1);
        assert_eq!(submitted[0].transaction_type(), TransactionType::Payment);
        assert_eq!(submitted[0].fee(), Some(Drops(10)));
        assert_eq!(
            submitted[0].common.signing_pub_key.as_deref(),
            Some(wallet.public_key().as_str())
        );
        assert!(codec::verify_signatures(&submitted[0]).unwrap());
    }

    #[tokio::test]
    async fn test_single_transaction_uses_fallback_signer() {
        let (mock, wallet) = setup();
        let regular_key = Wallet::generate().unwrap();
        let options = SubmitOptions {
            fallback_signer: Some(regular_key.clone()),
            ..Default::default()
        };

        submit_batch(
            &mock,
            &wallet,
            vec![payment(&wallet.address(), 1_000)],
            BatchMode::Independent,
            options,
        )
        .await
        .unwrap();

        let tx = &mock.submitted()[0];
        assert_eq!(tx.account(), wallet.address());
        assert_eq!(
            tx.common.signing_pub_key.as_deref(),
            Some(regular_key.public_key().as_str())
        );
    }

    #[tokio::test]
    async fn test_single_transaction_is_bound_to_wallet_with_real_fee() {
        let (mock, wallet) = setup();
        let other = Wallet::generate().unwrap();
        let tx = TransactionBuilder::new(&other.address())
            .fee(Drops::ZERO)
            .build(TicketCreate { ticket_count: 1 });

        submit_batch(
            &mock,
            &wallet,
            vec![tx],
            BatchMode::AllOrNothing,
            SubmitOptions::default(),
        )
        .await
        .unwrap();

        let submitted = &mock.submitted()[0];
        assert_eq!(submitted.account(), wallet.address());
        assert_eq!(submitted.fee(), Some(Drops(10)));
        assert_eq!(submitted.common.sequence, Some(20));
        assert!(codec::verify_signatures(submitted).unwrap());
    }

    #[tokio::test]
    async fn test_single_transaction_fee_override() {
        let (mock, wallet) = setup();
        let options = SubmitOptions {
            fee_override: Some(Drops(77)),
            ..Default::default()
        };

        submit_batch(
            &mock,
            &wallet,
            vec![payment(&wallet.address(), 5)],
            BatchMode::OnlyOne,
            options,
        )
        .await
        .unwrap();

        assert_eq!(mock.submitted()[0].fee(), Some(Drops(77)));
    }

    #[tokio::test]
    async fn test_three_inner_all_or_nothing() {
        let (mock, wallet) = setup();
        let inner = vec![
            payment("rOther", 1_000),
            payment(&wallet.address(), 2_000),
            TransactionBuilder::new(&wallet.address()).build(TicketCreate { ticket_count: 2 }),
        ];

        submit_batch(
            &mock,
            &wallet,
            inner,
            BatchMode::AllOrNothing,
            SubmitOptions::default(),
        )
        .await
        .unwrap();

        let submitted = mock.submitted();
        assert_eq!(submitted.len(), 1);
        let envelope = &submitted[0];
        assert_eq!(envelope.transaction_type(), TransactionType::Batch);
        assert_eq!(envelope.flags(), 0x0001_0000);
        assert_eq!(envelope.account(), wallet.address());
        assert_eq!(envelope.fee(), Some(Drops(50)));
        assert_eq!(envelope.common.sequence, Some(20));
        assert!(codec::verify_signatures(envelope).unwrap());

        let inner = envelope.inner_transactions().unwrap();
        assert_eq!(inner.len(), 3);
        for (i, tx) in inner.iter().enumerate() {
            assert_eq!(tx.account(), wallet.address());
            assert_eq!(tx.fee(), Some(Drops::ZERO));
            assert_eq!(tx.common.signing_pub_key.as_deref(), Some(""));
            assert_eq!(tx.flags() & 0x4000_0000, 0x4000_0000);
            assert_eq!(tx.common.sequence, Some(21 + i as u32));
        }
    }

    #[tokio::test]
    async fn test_fee_override_on_envelope() {
        let (mock, wallet) = setup();
        let options = SubmitOptions {
            fee_override: Some(Drops(500)),
            ..Default::default()
        };

        submit_batch(
            &mock,
            &wallet,
            vec![payment("rA", 1), payment("rB", 2)],
            BatchMode::OnlyOne,
            options,
        )
        .await
        .unwrap();

        assert_eq!(mock.submitted()[0].fee(), Some(Drops(500)));
    }

    #[tokio::test]
    async fn test_multisigned_envelope() {
        let (mock, wallet) = setup();
        let cosigners: Vec<Wallet> = (0..2).map(|_| Wallet::generate().unwrap()).collect();
        mock.set_signer_list(
            &wallet.address(),
            SignerList {
                quorum: 2,
                entries: cosigners
                    .iter()
                    .map(|w| SignerEntry {
                        account: w.address(),
                        signer_weight: 1,
                    })
                    .collect(),
            },
        );
        let options = SubmitOptions {
            signers: cosigners
                .iter()
                .map(|w| SignerCredential::new(&w.address(), &w.seed()))
                .collect(),
            ..Default::default()
        };

        submit_batch(
            &mock,
            &wallet,
            vec![payment("rA", 1), payment("rB", 2)],
            BatchMode::UntilFailure,
            options,
        )
        .await
        .unwrap();

        let envelope = &mock.submitted()[0];
        assert!(envelope.is_multisigned());
        // batch quote 10 × (2 + 2), times (2 signers + 1)
        assert_eq!(envelope.fee(), Some(Drops(120)));
        assert_eq!(envelope.common.signing_pub_key.as_deref(), Some(""));
        assert!(codec::verify_signatures(envelope).unwrap());
    }
}
