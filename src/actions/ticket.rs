//! Tickets
//!
//! Deleting a ticket is done by consuming it with a no-op `AccountSet`.

use crate::actions::{invalid, required, ActionError};
use crate::core::transaction::{AccountSet, TicketCreate};
use crate::core::{Transaction, TransactionBuilder};
use crate::validation::Form;

pub fn ticket_create(account: &str, form: &Form) -> Result<Transaction, ActionError> {
    let ticket_count = required(form, "count")?
        .parse()
        .map_err(|_| invalid("count", "could not be parsed"))?;
    Ok(TransactionBuilder::new(account).build(TicketCreate { ticket_count }))
}

pub fn ticket_delete(account: &str, form: &Form) -> Result<Transaction, ActionError> {
    let ticket = required(form, "ticket_sequence")?
        .parse()
        .map_err(|_| invalid("ticket_sequence", "could not be parsed"))?;
    Ok(TransactionBuilder::new(account)
        .ticket_sequence(ticket)
        .build(AccountSet::default()))
}
