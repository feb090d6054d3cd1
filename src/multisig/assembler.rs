//! Multi-signed submission
//!
//! One call walks the whole flow:
//! COLLECT_INPUTS → VALIDATE_SIGNER_SET → AUTOFILL_SEQUENCE_AND_FEE →
//! PER_SIGNER_SIGN_LOOP → COMBINE_SIGNATURES → SUBMIT.
//! The signer set is validated before anything is autofilled or signed,
//! and a failed step ends the flow with no retry.

use crate::client::{submission_fee, LedgerClient, SubmitResponse};
use crate::core::{Drops, Signer, Transaction};
use crate::multisig::combine::combine;
use crate::multisig::signer_list::{validate_signers, MultisigError, SignerCredential};
use crate::wallet::{SignedTransaction, Wallet};
use std::fmt;

/// Steps of a multi-signed submission, logged as they are entered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssemblyStep {
    CollectInputs,
    ValidateSignerSet,
    AutofillSequenceAndFee,
    PerSignerSignLoop,
    CombineSignatures,
    Submit,
}

impl fmt::Display for AssemblyStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AssemblyStep::CollectInputs => "COLLECT_INPUTS",
            AssemblyStep::ValidateSignerSet => "VALIDATE_SIGNER_SET",
            AssemblyStep::AutofillSequenceAndFee => "AUTOFILL_SEQUENCE_AND_FEE",
            AssemblyStep::PerSignerSignLoop => "PER_SIGNER_SIGN_LOOP",
            AssemblyStep::CombineSignatures => "COMBINE_SIGNATURES",
            AssemblyStep::Submit => "SUBMIT",
        };
        write!(f, "{}", name)
    }
}

fn enter(step: AssemblyStep, account: &str) {
    log::debug!("[{}] {}", account, step);
}

/// Outcome of a multi-signed submission
#[derive(Debug, Clone, PartialEq)]
pub struct MultisignOutcome {
    /// Hash of the combined blob
    pub hash: String,
    /// The combined `Signers` array, sorted by account ID
    pub signers: Vec<Signer>,
    pub response: SubmitResponse,
}

/// Sign `tx` with every credential and submit the combined transaction.
///
/// The fee is `fee_override` when given, otherwise the quoted fee times
/// (signer count + 1).
pub async fn submit_multisigned<C: LedgerClient + ?Sized>(
    client: &C,
    tx: Transaction,
    credentials: &[SignerCredential],
    fee_override: Option<Drops>,
) -> Result<MultisignOutcome, MultisigError> {
    let account = tx.account().to_string();
    enter(AssemblyStep::CollectInputs, &account);

    let signer_list = client
        .signer_list(&account)
        .await?
        .ok_or(MultisigError::NoSignerList)?;

    enter(AssemblyStep::ValidateSignerSet, &account);
    let weight = validate_signers(&signer_list, credentials)?;
    log::debug!(
        "[{}] {} signers, weight {} of quorum {}",
        account,
        credentials.len(),
        weight,
        signer_list.quorum
    );

    enter(AssemblyStep::AutofillSequenceAndFee, &account);
    let mut prepared = tx;
    prepared.common.fee =
        Some(submission_fee(client, &prepared, credentials.len(), fee_override).await?);
    prepared.common.signing_pub_key = Some(String::new());
    let mut prepared = client.autofill(prepared).await?;
    prepared.strip_signatures();

    enter(AssemblyStep::PerSignerSignLoop, &account);
    let mut blobs = Vec::with_capacity(credentials.len());
    for (index, credential) in credentials.iter().enumerate() {
        let wallet = Wallet::from_seed(&credential.seed)?;
        if wallet.address() != credential.address {
            return Err(MultisigError::AddressMismatch {
                index: index + 1,
                expected: credential.address.clone(),
                derived: wallet.address(),
            });
        }
        blobs.push(wallet.multisign(&prepared)?);
    }

    if blobs.is_empty() {
        return Err(MultisigError::NoSignatures);
    }

    enter(AssemblyStep::CombineSignatures, &account);
    let combined = SignedTransaction::from_transaction(combine(&blobs)?)?;
    let signers = combined
        .transaction
        .common
        .signers
        .iter()
        .flatten()
        .map(|w| w.signer.clone())
        .collect();

    enter(AssemblyStep::Submit, &account);
    let response = client.submit_and_wait(&combined).await?;

    Ok(MultisignOutcome {
        hash: combined.hash,
        signers,
        response,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::mock::MockLedger;
    use crate::codec;
    use crate::core::transaction::TicketCreate;
    use crate::core::{SignerEntry, SignerList, TransactionBuilder};

    const MULTISIG_ACCOUNT: &str = "rHb9CJAWyB4rj91VRWn96DkukG4bwdtyTh";

    struct Fixture {
        mock: MockLedger,
        signers: Vec<Wallet>,
    }

    /// Account with a 2-of-3 signer list of fresh wallets
    fn fixture() -> Fixture {
        let mock = MockLedger::new();
        mock.add_account(MULTISIG_ACCOUNT, Drops(100_000_000), 1, 12);
        let signers: Vec<Wallet> = (0..3).map(|_| Wallet::generate().unwrap()).collect();
        mock.set_signer_list(
            MULTISIG_ACCOUNT,
            SignerList {
                quorum: 2,
                entries: signers
                    .iter()
                    .map(|w| SignerEntry {
                        account: w.address(),
                        signer_weight: 1,
                    })
                    .collect(),
            },
        );
        Fixture { mock, signers }
    }

    fn credential(wallet: &Wallet) -> SignerCredential {
        SignerCredential::new(&wallet.address(), &wallet.seed())
    }

    fn ticket_create() -> Transaction {
        TransactionBuilder::new(MULTISIG_ACCOUNT).build(TicketCreate { ticket_count: 1 })
    }

    #[tokio::test]
    async fn test_two_of_three_submits_once() {
        let f = fixture();
        let creds = vec![credential(&f.signers[2]), credential(&f.signers[0])];

        let outcome = submit_multisigned(&f.mock, ticket_create(), &creds, None)
            .await
            .unwrap();

        assert!(outcome.response.validated);
        assert_eq!(outcome.signers.len(), 2);

        let submitted = f.mock.submitted();
        assert_eq!(submitted.len(), 1);
        let tx = &submitted[0];
        assert_eq!(tx.common.signing_pub_key.as_deref(), Some(""));
        assert_eq!(tx.common.fee, Some(Drops(30)));
        assert_eq!(tx.common.sequence, Some(12));
        assert!(codec::verify_signatures(tx).unwrap());
        assert_eq!(
            outcome.hash,
            codec::transaction_hash(&codec::encode(tx).unwrap()).unwrap()
        );
    }

    #[tokio::test]
    async fn test_fee_override_is_used() {
        let f = fixture();
        let creds = vec![credential(&f.signers[0]), credential(&f.signers[1])];

        submit_multisigned(&f.mock, ticket_create(), &creds, Some(Drops(999)))
            .await
            .unwrap();
        assert_eq!(f.mock.submitted()[0].common.fee, Some(Drops(999)));
    }

    #[tokio::test]
    async fn test_no_signer_list() {
        let mock = MockLedger::new();
        let wallet = Wallet::generate().unwrap();
        let tx = TransactionBuilder::new("rPlain").build(TicketCreate { ticket_count: 1 });

        let err = submit_multisigned(&mock, tx, &[credential(&wallet)], None)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "account has no signer list");
        assert_eq!(mock.calls(), vec!["signer_list".to_string()]);
    }

    #[tokio::test]
    async fn test_under_quorum_stops_before_autofill() {
        let f = fixture();
        let creds = vec![credential(&f.signers[0])];

        let result = submit_multisigned(&f.mock, ticket_create(), &creds, None).await;
        assert!(matches!(
            result,
            Err(MultisigError::InsufficientWeight { have: 1, need: 2 })
        ));
        assert_eq!(f.mock.calls(), vec!["signer_list".to_string()]);
        assert!(f.mock.submitted().is_empty());
    }

    #[tokio::test]
    async fn test_signer_outside_list_stops_before_autofill() {
        let f = fixture();
        let outsider = Wallet::generate().unwrap();
        let creds = vec![credential(&f.signers[0]), credential(&outsider)];

        let result = submit_multisigned(&f.mock, ticket_create(), &creds, None).await;
        assert!(matches!(result, Err(MultisigError::UnauthorizedSigner(_))));
        assert_eq!(f.mock.calls(), vec!["signer_list".to_string()]);
    }

    #[tokio::test]
    async fn test_seed_address_mismatch() {
        let f = fixture();
        let wrong_seed = SignerCredential::new(&f.signers[1].address(), &f.signers[2].seed());
        let creds = vec![credential(&f.signers[0]), wrong_seed];

        let err = submit_multisigned(&f.mock, ticket_create(), &creds, None)
            .await
            .unwrap_err();
        match err {
            MultisigError::AddressMismatch {
                index,
                expected,
                derived,
            } => {
                assert_eq!(index, 2);
                assert_eq!(expected, f.signers[1].address());
                assert_eq!(derived, f.signers[2].address());
            }
            other => panic!("unexpected error: {}", other),
        }
        assert!(f.mock.submitted().is_empty());
    }
}
