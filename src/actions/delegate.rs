//! Permission delegation

use crate::actions::{invalid, required, ActionError};
use crate::core::transaction::DelegateSet;
use crate::core::{PermissionWrapper, Transaction, TransactionBuilder};
use crate::validation::{split_list, Form};

/// Grant `authorize` the comma-separated `permissions` on `account`'s behalf.
///
/// An empty grant is how the ledger revokes delegation, but the form
/// requires at least one permission so revocation is not done by accident.
pub fn delegate_set(account: &str, form: &Form) -> Result<Transaction, ActionError> {
    let authorize = required(form, "authorize")?;
    if authorize == account {
        return Err(invalid("authorize", "cannot delegate to the sending account"));
    }

    let permissions = split_list(required(form, "permissions")?)
        .into_iter()
        .map(PermissionWrapper::new)
        .collect();

    Ok(TransactionBuilder::new(account).build(DelegateSet {
        authorize: authorize.to_string(),
        permissions,
    }))
}
