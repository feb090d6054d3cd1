//! Balance and reserve sufficiency
//!
//! Decides whether an account can afford a candidate transaction: the
//! native value it sends, the fee, and the reserve the account must keep
//! afterwards. Everything is supplied by the caller; nothing here touches
//! the network.

use crate::core::account::{AccountSnapshot, ReserveSchedule};
use crate::core::amount::{AmountError, Drops};
use crate::core::transaction::Transaction;
use serde::{Deserialize, Serialize};

/// What a transaction needs the sending account to hold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReserveRequirement {
    /// Native value leaving the account
    pub native: Drops,
    pub fee: Drops,
    /// Reserve after the transaction, including any new owned object
    pub reserve: Drops,
    pub total: Drops,
}

/// Break down what `tx` requires from `account`.
///
/// `native_amount` is the caller's display-unit amount. It is only used
/// when the transaction type moves native currency and the transaction
/// does not carry a native `Amount` of its own.
pub fn reserve_requirement(
    reserve: &ReserveSchedule,
    account: &AccountSnapshot,
    native_amount: &str,
    tx: &Transaction,
    fee: Drops,
) -> Result<ReserveRequirement, AmountError> {
    let requested = Drops::from_xrp(native_amount)?;

    let native = if tx.transaction_type().moves_native_currency() {
        tx.native_amount().unwrap_or(requested)
    } else {
        Drops::ZERO
    };

    let owner_count = if tx.increases_owner_count() {
        account.owner_count.saturating_add(1)
    } else {
        account.owner_count
    };
    let reserve = reserve.reserve_for(owner_count);

    let total = native.saturating_add(fee).saturating_add(reserve);

    Ok(ReserveRequirement {
        native,
        fee,
        reserve,
        total,
    })
}

/// `true` when `account` cannot cover `tx`; an exact match is enough.
pub fn is_insufficient(
    reserve: &ReserveSchedule,
    account: &AccountSnapshot,
    native_amount: &str,
    tx: &Transaction,
    fee: Drops,
) -> Result<bool, AmountError> {
    let requirement = reserve_requirement(reserve, account, native_amount, tx, fee)?;
    log::debug!(
        "Sufficiency for {} ({}): balance {} vs required {} (native {}, fee {}, reserve {})",
        account.address,
        tx.transaction_type(),
        account.balance,
        requirement.total,
        requirement.native,
        requirement.fee,
        requirement.reserve
    );
    Ok(account.balance < requirement.total)
}

/// What a batch envelope needs from `account`: the envelope `fee`, every
/// inner transaction's native `Amount`, and one reserve increment per inner
/// transaction that creates an owned object.
///
/// Inner transactions carry no display amount, so only native `Amount`
/// fields count. A transaction that is not an envelope needs its fee and
/// the current reserve.
pub fn batch_requirement(
    reserve: &ReserveSchedule,
    account: &AccountSnapshot,
    envelope: &Transaction,
    fee: Drops,
) -> ReserveRequirement {
    let inner = envelope.inner_transactions().unwrap_or_default();

    let native = inner
        .iter()
        .filter(|tx| tx.transaction_type().moves_native_currency())
        .filter_map(|tx| tx.native_amount())
        .fold(Drops::ZERO, Drops::saturating_add);
    let new_objects = inner.iter().filter(|tx| tx.increases_owner_count()).count();
    let owner_count = account
        .owner_count
        .saturating_add(u32::try_from(new_objects).unwrap_or(u32::MAX));
    let reserve = reserve.reserve_for(owner_count);

    let total = native.saturating_add(fee).saturating_add(reserve);
    log::debug!(
        "Batch of {} for {}: required {} (native {}, fee {}, reserve {})",
        inner.len(),
        account.address,
        total,
        native,
        fee,
        reserve
    );

    ReserveRequirement {
        native,
        fee,
        reserve,
        total,
    }
}

/// Balance above the account's current reserve
pub fn spendable(reserve: &ReserveSchedule, account: &AccountSnapshot) -> Drops {
    account
        .balance
        .saturating_sub(reserve.reserve_for(account.owner_count))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::amount::{Amount, Issue, IssuedAmount, MptAmount};
    use crate::core::transaction::*;

    fn schedule() -> ReserveSchedule {
        ReserveSchedule::new(Drops(10_000_000), Drops(200_000))
    }

    fn account(balance: u64, owner_count: u32) -> AccountSnapshot {
        AccountSnapshot {
            address: "rAccount".to_string(),
            balance: Drops(balance),
            owner_count,
            sequence: 1,
            flags: 0,
        }
    }

    fn tx(kind: impl Into<TransactionKind>) -> Transaction {
        TransactionBuilder::new("rAccount").build(kind)
    }

    fn payment(amount: Amount) -> Transaction {
        tx(Payment {
            destination: "rDest".to_string(),
            amount,
            destination_tag: None,
            send_max: None,
            deliver_min: None,
        })
    }

    fn authorize() -> Transaction {
        tx(MpTokenAuthorize {
            mptoken_issuance_id: "0000000100000000".to_string(),
            holder: None,
        })
    }

    fn mint() -> Transaction {
        tx(NfTokenMint {
            nftoken_taxon: 0,
            issuer: None,
            transfer_fee: None,
            uri: None,
            amount: Some(Amount::Native(Drops(9_000_000))),
            destination: None,
            expiration: None,
        })
    }

    #[test]
    fn test_authorization_scenario_is_sufficient() {
        // 100 XRP, base 10, increment 0.2, owner count 2, fee 10 drops
        let requirement =
            reserve_requirement(&schedule(), &account(100_000_000, 2), "0", &authorize(), Drops(10))
                .unwrap();
        assert_eq!(requirement.native, Drops::ZERO);
        assert_eq!(requirement.reserve, Drops(10_400_000));
        assert_eq!(requirement.total, Drops(10_400_010));

        let insufficient =
            is_insufficient(&schedule(), &account(100_000_000, 2), "0", &authorize(), Drops(10))
                .unwrap();
        assert!(!insufficient);
    }

    fn usd(value: &str) -> IssuedAmount {
        IssuedAmount {
            currency: "USD".to_string(),
            issuer: "rIssuer".to_string(),
            value: value.to_string(),
        }
    }

    fn usd_issue() -> Issue {
        Issue {
            currency: "USD".to_string(),
            issuer: Some("rIssuer".to_string()),
        }
    }

    /// One transaction of every supported type
    fn every_type() -> Vec<Transaction> {
        let xrp = |drops: u64| Amount::Native(Drops(drops));
        let kinds: Vec<TransactionKind> = vec![
            Payment {
                destination: "rDest".to_string(),
                amount: xrp(1_000_000),
                destination_tag: None,
                send_max: None,
                deliver_min: None,
            }
            .into(),
            EscrowCreate {
                destination: "rDest".to_string(),
                amount: xrp(2_000_000),
                finish_after: Some(1),
                cancel_after: None,
                condition: None,
            }
            .into(),
            EscrowFinish {
                owner: "rOwner".to_string(),
                offer_sequence: 1,
                condition: None,
                fulfillment: None,
            }
            .into(),
            EscrowCancel {
                owner: "rOwner".to_string(),
                offer_sequence: 1,
            }
            .into(),
            CheckCreate {
                destination: "rDest".to_string(),
                send_max: xrp(1),
                expiration: None,
            }
            .into(),
            CheckCash {
                check_id: "00".to_string(),
                amount: None,
                deliver_min: None,
            }
            .into(),
            CheckCancel {
                check_id: "00".to_string(),
            }
            .into(),
            PaymentChannelCreate {
                destination: "rDest".to_string(),
                amount: xrp(3_000_000),
                settle_delay: 60,
                public_key: "02".to_string(),
            }
            .into(),
            PaymentChannelFund {
                channel: "00".to_string(),
                amount: xrp(4_000_000),
            }
            .into(),
            PaymentChannelClaim {
                channel: "00".to_string(),
                amount: None,
                balance: None,
                signature: None,
                public_key: None,
            }
            .into(),
            OfferCreate {
                taker_gets: xrp(1),
                taker_pays: Amount::Issued(usd("1")),
                expiration: None,
                offer_sequence: None,
            }
            .into(),
            OfferCancel { offer_sequence: 1 }.into(),
            AmmCreate {
                amount: xrp(5_000_000),
                amount2: Amount::Issued(usd("10")),
                trading_fee: 0,
            }
            .into(),
            AmmDeposit {
                asset: Issue::xrp(),
                asset2: usd_issue(),
                amount: Some(xrp(6_000_000)),
                amount2: None,
                lp_token_out: None,
            }
            .into(),
            AmmWithdraw {
                asset: Issue::xrp(),
                asset2: usd_issue(),
                amount: None,
                amount2: None,
                lp_token_in: None,
            }
            .into(),
            TrustSet {
                limit_amount: usd("100"),
                quality_in: None,
                quality_out: None,
            }
            .into(),
            TicketCreate { ticket_count: 5 }.into(),
            SignerListSet {
                signer_quorum: 1,
                signer_entries: None,
            }
            .into(),
            AccountSet::default().into(),
            NfTokenMint {
                nftoken_taxon: 0,
                issuer: None,
                transfer_fee: None,
                uri: None,
                amount: Some(xrp(9_000_000)),
                destination: None,
                expiration: None,
            }
            .into(),
            NfTokenBurn {
                nftoken_id: "00".to_string(),
                owner: None,
            }
            .into(),
            NfTokenModify {
                nftoken_id: "00".to_string(),
                owner: None,
                uri: None,
            }
            .into(),
            DelegateSet {
                authorize: "rDelegate".to_string(),
                permissions: vec![PermissionWrapper::new("Payment")],
            }
            .into(),
            MpTokenAuthorize {
                mptoken_issuance_id: "00".to_string(),
                holder: None,
            }
            .into(),
            Batch {
                raw_transactions: Vec::new(),
            }
            .into(),
        ];
        kinds.into_iter().map(tx).collect()
    }

    const OWNER_COUNT_INCREASING: [TransactionType; 9] = [
        TransactionType::TrustSet,
        TransactionType::OfferCreate,
        TransactionType::CheckCreate,
        TransactionType::EscrowCreate,
        TransactionType::PaymentChannelCreate,
        TransactionType::TicketCreate,
        TransactionType::SignerListSet,
        TransactionType::AmmDeposit,
        TransactionType::NfTokenMint,
    ];

    #[test]
    fn test_every_type_is_sampled() {
        let mut types: Vec<String> =
            every_type().iter().map(|t| t.transaction_type().to_string()).collect();
        types.sort();
        types.dedup();
        assert_eq!(types.len(), 25);
    }

    #[test]
    fn test_non_transfer_types_ignore_requested_amount() {
        let mut checked = 0;
        for candidate in every_type() {
            let kind = candidate.transaction_type();
            let requirement = reserve_requirement(
                &schedule(),
                &account(0, 0),
                "5000",
                &candidate,
                Drops(10),
            )
            .unwrap();

            if kind.moves_native_currency() {
                let expected = candidate.native_amount().unwrap_or(Drops(5_000_000_000));
                assert_eq!(requirement.native, expected, "{}", kind);
            } else {
                assert_eq!(requirement.native, Drops::ZERO, "{}", kind);
                checked += 1;
            }
        }
        assert_eq!(checked, 25 - TransactionType::NATIVE_TRANSFER.len());
    }

    #[test]
    fn test_transfer_prefers_native_amount_field() {
        let candidate = payment(Amount::Native(Drops(3_000_000)));
        let requirement =
            reserve_requirement(&schedule(), &account(0, 0), "99", &candidate, Drops(10)).unwrap();
        assert_eq!(requirement.native, Drops(3_000_000));
    }

    #[test]
    fn test_issued_and_mpt_amounts_fall_back_to_requested() {
        let issued = payment(Amount::Issued(IssuedAmount {
            currency: "USD".to_string(),
            issuer: "rIssuer".to_string(),
            value: "50".to_string(),
        }));
        let mpt = payment(Amount::Mpt(MptAmount {
            mpt_issuance_id: "00AB".to_string(),
            value: "50".to_string(),
        }));

        for candidate in [issued, mpt] {
            let zero =
                reserve_requirement(&schedule(), &account(0, 0), "0", &candidate, Drops(10))
                    .unwrap();
            assert_eq!(zero.native, Drops::ZERO);

            let requested =
                reserve_requirement(&schedule(), &account(0, 0), "1.5", &candidate, Drops(10))
                    .unwrap();
            assert_eq!(requested.native, Drops(1_500_000));
        }
    }

    #[test]
    fn test_offer_without_amount_field_uses_requested() {
        let offer = tx(OfferCreate {
            taker_gets: Amount::Native(Drops(1)),
            taker_pays: Amount::Native(Drops(2)),
            expiration: None,
            offer_sequence: None,
        });
        let requirement =
            reserve_requirement(&schedule(), &account(0, 3), "2", &offer, Drops(10)).unwrap();
        assert_eq!(requirement.native, Drops(2_000_000));
        // OfferCreate adds an owned object
        assert_eq!(requirement.reserve, schedule().reserve_for(4));
    }

    #[test]
    fn test_owner_count_increase_adds_one_increment() {
        let mut increasing = 0;
        for candidate in every_type() {
            let kind = candidate.transaction_type();
            let requirement =
                reserve_requirement(&schedule(), &account(0, 4), "0", &candidate, Drops(0))
                    .unwrap();

            let expected_owners = if OWNER_COUNT_INCREASING.contains(&kind) {
                increasing += 1;
                5
            } else {
                4
            };
            assert_eq!(
                requirement.reserve,
                Drops(10_000_000 + expected_owners * 200_000),
                "{}",
                kind
            );
        }
        assert_eq!(increasing, OWNER_COUNT_INCREASING.len());

        // Removing a trust line leaves the count alone
        let removal = tx(TrustSet {
            limit_amount: usd("0"),
            quality_in: None,
            quality_out: None,
        });
        let requirement =
            reserve_requirement(&schedule(), &account(0, 4), "0", &removal, Drops(0)).unwrap();
        assert_eq!(requirement.reserve, Drops(10_000_000 + 4 * 200_000));
    }

    #[test]
    fn test_batch_requirement_sums_inner_transactions() {
        let inner = |kind: TransactionKind| RawTransaction {
            raw_transaction: tx(kind),
        };
        let envelope = tx(Batch {
            raw_transactions: vec![
                inner(
                    Payment {
                        destination: "rDest".to_string(),
                        amount: Amount::Native(Drops(5_000_000)),
                        destination_tag: None,
                        send_max: None,
                        deliver_min: None,
                    }
                    .into(),
                ),
                inner(
                    Payment {
                        destination: "rDest".to_string(),
                        amount: Amount::Issued(usd("7")),
                        destination_tag: None,
                        send_max: None,
                        deliver_min: None,
                    }
                    .into(),
                ),
                inner(TicketCreate { ticket_count: 2 }.into()),
                inner(
                    NfTokenMint {
                        nftoken_taxon: 0,
                        issuer: None,
                        transfer_fee: None,
                        uri: None,
                        amount: Some(Amount::Native(Drops(9_000_000))),
                        destination: None,
                        expiration: None,
                    }
                    .into(),
                ),
            ],
        });

        let requirement = batch_requirement(&schedule(), &account(0, 1), &envelope, Drops(60));
        // The mint's sell price is not sent; the issued payment is not native
        assert_eq!(requirement.native, Drops(5_000_000));
        assert_eq!(requirement.fee, Drops(60));
        assert_eq!(requirement.reserve, schedule().reserve_for(3));
        assert_eq!(
            requirement.total,
            Drops(5_000_000 + 60 + 10_000_000 + 3 * 200_000)
        );

        let plain = batch_requirement(&schedule(), &account(0, 1), &mint(), Drops(10));
        assert_eq!(plain.native, Drops::ZERO);
        assert_eq!(plain.reserve, schedule().reserve_for(1));
    }

    #[test]
    fn test_boundary_is_inclusive() {
        let candidate = payment(Amount::Native(Drops(1_000_000)));
        let required =
            reserve_requirement(&schedule(), &account(0, 1), "0", &candidate, Drops(12))
                .unwrap()
                .total
                .as_u64();

        assert!(
            is_insufficient(&schedule(), &account(required - 1, 1), "0", &candidate, Drops(12))
                .unwrap()
        );
        assert!(
            !is_insufficient(&schedule(), &account(required, 1), "0", &candidate, Drops(12))
                .unwrap()
        );
    }

    #[test]
    fn test_invalid_requested_amount_is_an_error() {
        for bad in ["", "-1", "ten"] {
            let result = is_insufficient(&schedule(), &account(0, 0), bad, &authorize(), Drops(1));
            assert!(result.is_err(), "{:?} should be rejected", bad);
        }
    }

    #[test]
    fn test_spendable() {
        assert_eq!(
            spendable(&schedule(), &account(100_000_000, 2)),
            Drops(100_000_000 - 10_400_000)
        );
        assert_eq!(spendable(&schedule(), &account(5, 2)), Drops::ZERO);
    }
}
