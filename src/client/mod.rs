//! Ledger network access
//!
//! - [`LedgerClient`]: the async seam every network call goes through
//! - Autofill and submit-and-wait, shared by all clients
//! - [`WsLedgerClient`]: the JSON WebSocket implementation

pub mod autofill;
pub mod ledger;
#[cfg(test)]
pub mod mock;
pub mod ws;

pub use autofill::{fetch_account_context, quote_fee, submission_fee, AccountContext};
pub use ledger::{
    ClientError, LedgerClient, SimulateResponse, SubmissionSettings, SubmitResponse,
    TransactionStatus,
};
pub use ws::WsLedgerClient;
