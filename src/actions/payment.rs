//! Payments and trust lines

use crate::actions::{parse_field, required, value, ActionError};
use crate::core::transaction::{Payment, TrustSet};
use crate::core::{Amount, Drops, IssuedAmount, Transaction, TransactionBuilder};
use crate::validation::Form;

/// Memo type attached to a payment's free-text `memo`
pub const TEXT_MEMO_TYPE: &str = "text/plain";

/// Native payment: `destination`, `amount` (XRP), optional `destination_tag`
/// and a free-text `memo`
pub fn payment(account: &str, form: &Form) -> Result<Transaction, ActionError> {
    let amount = Drops::from_xrp(required(form, "amount")?)?;

    let mut builder = TransactionBuilder::new(account);
    if let Some(memo) = value(form, "memo") {
        builder = builder.memo(TEXT_MEMO_TYPE, memo);
    }

    Ok(builder.build(Payment {
        destination: required(form, "destination")?.to_string(),
        amount: Amount::Native(amount),
        destination_tag: parse_field(form, "destination_tag")?,
        send_max: None,
        deliver_min: None,
    }))
}

/// Trust line to `issuer` for `currency` up to `limit`
pub fn trust_set(account: &str, form: &Form) -> Result<Transaction, ActionError> {
    Ok(TransactionBuilder::new(account).build(TrustSet {
        limit_amount: IssuedAmount {
            currency: required(form, "currency")?.to_string(),
            issuer: required(form, "issuer")?.to_string(),
            value: required(form, "limit")?.to_string(),
        },
        quality_in: None,
        quality_out: None,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::form;
    use crate::core::TransactionKind;

    #[test]
    fn test_payment_in_drops() {
        let tx = payment(
            "rSender",
            &form(&[("destination", "rDest"), ("amount", "1.5"), ("destination_tag", "42")]),
        )
        .unwrap();
        assert_eq!(tx.native_amount(), Some(Drops(1_500_000)));
        match tx.kind {
            TransactionKind::Payment(p) => assert_eq!(p.destination_tag, Some(42)),
            other => panic!("unexpected kind {:?}", other),
        }
    }

    #[test]
    fn test_payment_memo_is_hex_encoded() {
        let destination = "rPT1Sjq2YGrBMTttX4GZHjKu9dyfzbpAYe";
        let tx = payment(
            "rHb9CJAWyB4rj91VRWn96DkukG4bwdtyTh",
            &form(&[("destination", destination), ("amount", "2"), ("memo", "rent for May")]),
        )
        .unwrap();

        let memos = tx.common.memos.as_ref().unwrap();
        assert_eq!(memos.len(), 1);
        let memo = &memos[0].memo;
        assert_eq!(memo.memo_type.as_deref(), Some(hex::encode_upper(TEXT_MEMO_TYPE).as_str()));
        assert_eq!(memo.memo_data.as_deref(), Some(hex::encode_upper("rent for May").as_str()));

        let decoded = crate::codec::decode(&crate::codec::encode(&tx).unwrap()).unwrap();
        assert_eq!(decoded.common.memos, tx.common.memos);

        let plain = payment(
            "rHb9CJAWyB4rj91VRWn96DkukG4bwdtyTh",
            &form(&[("destination", destination), ("amount", "2"), ("memo", "  ")]),
        )
        .unwrap();
        assert!(plain.common.memos.is_none());
    }

    #[test]
    fn test_trust_set_counts_as_new_object() {
        let tx = trust_set(
            "rHolder",
            &form(&[("currency", "USD"), ("issuer", "rIssuer"), ("limit", "100")]),
        )
        .unwrap();
        assert!(tx.increases_owner_count());
    }
}
