//! Form-to-transaction builders
//!
//! Every action validates its form with the rule engine first, then builds
//! an unsigned, unfilled transaction for the sending account. Autofill and
//! signing happen later, in the submission path.

pub mod delegate;
pub mod nft;
pub mod mpt;
pub mod payment;
pub mod ticket;

use crate::core::{AmountError, Transaction};
use crate::validation::{FieldError, Form, ValidationError, Validator};
use thiserror::Error;

/// Action errors
#[derive(Error, Debug)]
pub enum ActionError {
    #[error("Unknown action: {0}")]
    UnknownAction(String),
    #[error("{0}")]
    Validation(#[from] ValidationError),
    #[error("Amount error: {0}")]
    Amount(#[from] AmountError),
}

/// Every action name [`build_action`] accepts
pub const ACTIONS: &[&str] = &[
    "payment",
    "trust_set",
    "delegate_set",
    "nft_mint",
    "nft_burn",
    "nft_modify",
    "mpt_authorize",
    "mpt_transfer",
    "ticket_create",
    "ticket_delete",
];

/// Validate `form` and build the named action's transaction from `account`
pub fn build_action(
    validator: &Validator,
    action: &str,
    account: &str,
    form: &Form,
) -> Result<Transaction, ActionError> {
    if !ACTIONS.contains(&action) {
        return Err(ActionError::UnknownAction(action.to_string()));
    }
    validator.validate(action, form)?;

    let tx = match action {
        "payment" => payment::payment(account, form)?,
        "trust_set" => payment::trust_set(account, form)?,
        "delegate_set" => delegate::delegate_set(account, form)?,
        "nft_mint" => nft::nft_mint(account, form)?,
        "nft_burn" => nft::nft_burn(account, form)?,
        "nft_modify" => nft::nft_modify(account, form)?,
        "mpt_authorize" => mpt::mpt_authorize(account, form)?,
        "mpt_transfer" => mpt::mpt_transfer(account, form)?,
        "ticket_create" => ticket::ticket_create(account, form)?,
        "ticket_delete" => ticket::ticket_delete(account, form)?,
        other => return Err(ActionError::UnknownAction(other.to_string())),
    };

    log::debug!("Built {} for {}", tx.transaction_type(), account);
    Ok(tx)
}

// =============================================================================
// Form helpers
// =============================================================================

/// Trimmed value of `key`, `None` when absent or blank
pub(crate) fn value<'a>(form: &'a Form, key: &str) -> Option<&'a str> {
    form.get(key).map(|v| v.trim()).filter(|v| !v.is_empty())
}

pub(crate) fn required<'a>(form: &'a Form, key: &str) -> Result<&'a str, ActionError> {
    value(form, key).ok_or_else(|| invalid(key, "is required"))
}

pub(crate) fn parse_field<T: std::str::FromStr>(
    form: &Form,
    key: &str,
) -> Result<Option<T>, ActionError> {
    value(form, key)
        .map(|v| v.parse::<T>().map_err(|_| invalid(key, "could not be parsed")))
        .transpose()
}

pub(crate) fn is_set(form: &Form, key: &str) -> bool {
    value(form, key) == Some("true")
}

pub(crate) fn invalid(field: &str, message: &str) -> ActionError {
    ActionError::Validation(ValidationError::Invalid(vec![FieldError {
        field: field.to_string(),
        message: message.to_string(),
    }]))
}

#[cfg(test)]
pub(crate) fn form(pairs: &[(&str, &str)]) -> Form {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}
