//! Multi-purpose token authorization and transfer

use crate::actions::{is_set, required, value, ActionError};
use crate::core::transaction::{MpTokenAuthorize, Payment};
use crate::core::{Amount, MpTokenAuthorizeFlags, MptAmount, Transaction, TransactionBuilder};
use crate::validation::Form;

/// Opt in to holding an issuance, or (as issuer, with `holder`) authorize
/// a holder. `unauthorize` reverses either.
pub fn mpt_authorize(account: &str, form: &Form) -> Result<Transaction, ActionError> {
    let flags = if is_set(form, "unauthorize") {
        MpTokenAuthorizeFlags::UNAUTHORIZE
    } else {
        MpTokenAuthorizeFlags::empty()
    };

    Ok(TransactionBuilder::new(account)
        .flags(flags.bits())
        .build(MpTokenAuthorize {
            mptoken_issuance_id: required(form, "mpt_issuance_id")?.to_uppercase(),
            holder: value(form, "holder").map(str::to_string),
        }))
}

pub fn mpt_transfer(account: &str, form: &Form) -> Result<Transaction, ActionError> {
    Ok(TransactionBuilder::new(account).build(Payment {
        destination: required(form, "destination")?.to_string(),
        amount: Amount::Mpt(MptAmount {
            mpt_issuance_id: required(form, "mpt_issuance_id")?.to_uppercase(),
            value: required(form, "amount")?.to_string(),
        }),
        destination_tag: None,
        send_max: None,
        deliver_min: None,
    }))
}
