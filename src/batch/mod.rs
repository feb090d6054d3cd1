//! Batched transactions
//!
//! Several transactions from one account travel inside a single `Batch`
//! envelope whose flag decides how the ledger applies them.

pub mod envelope;
pub mod submit;

pub use envelope::{
    build_envelope, prepare_inner, BatchError, BatchMode, MAX_INNER_TRANSACTIONS,
};
pub use submit::{submit_batch, SubmitOptions};
