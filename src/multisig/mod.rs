//! Multi-signed transaction support
//!
//! Co-signers listed in an account's on-ledger signer list each sign the
//! same transaction; their signatures are combined into one `Signers`
//! array whose total weight must reach the list's quorum.
//!
//! # Example
//!
//! ```ignore
//! use ledger_wallet::multisig::{submit_multisigned, SignerCredential};
//!
//! let signers: Vec<SignerCredential> = vec!["rAlice:sAliceSeed".parse()?, "rBob:sBobSeed".parse()?];
//! let outcome = submit_multisigned(&client, tx, &signers, None).await?;
//! println!("{} signed by {}", outcome.hash, outcome.signers.len());
//! ```

pub mod assembler;
pub mod combine;
pub mod signer_list;

pub use assembler::{submit_multisigned, AssemblyStep, MultisignOutcome};
pub use combine::combine;
pub use signer_list::{validate_signers, MultisigError, SignerCredential};
