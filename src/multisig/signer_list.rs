//! Signer credentials and signer-set validation
//!
//! Credentials are what the user supplies; the signer list is what the
//! ledger says. Validation compares the two before anything is signed.

use crate::client::ClientError;
use crate::codec::CodecError;
use crate::core::SignerList;
use crate::wallet::WalletError;
use std::collections::HashSet;
use std::str::FromStr;
use thiserror::Error;

/// Errors related to multi-signed submission
#[derive(Error, Debug)]
pub enum MultisigError {
    #[error("account has no signer list")]
    NoSignerList,
    #[error("Duplicate signer: {0}")]
    DuplicateSigner(String),
    #[error("Signer not authorized: {0} is not in the account's signer list")]
    UnauthorizedSigner(String),
    #[error("Insufficient signer weight: have {have}, need {need}")]
    InsufficientWeight { have: u32, need: u32 },
    #[error("Signer {index}: seed derives {derived}, expected {expected}")]
    AddressMismatch {
        index: usize,
        expected: String,
        derived: String,
    },
    #[error("no valid signatures collected")]
    NoSignatures,
    #[error("Signed blobs are for different transactions")]
    TransactionMismatch,
    #[error("Invalid signer credential: {0}")]
    InvalidCredential(String),
    #[error("Wallet error: {0}")]
    WalletError(#[from] WalletError),
    #[error("Client error: {0}")]
    ClientError(#[from] ClientError),
    #[error("Codec error: {0}")]
    CodecError(#[from] CodecError),
    #[error("Crypto error: {0}")]
    CryptoError(#[from] crate::crypto::KeyError),
}

/// A co-signer's claimed address and the seed that should derive it
#[derive(Clone, PartialEq, Eq)]
pub struct SignerCredential {
    pub address: String,
    pub seed: String,
}

impl SignerCredential {
    pub fn new(address: &str, seed: &str) -> Self {
        Self {
            address: address.to_string(),
            seed: seed.to_string(),
        }
    }
}

impl std::fmt::Debug for SignerCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignerCredential")
            .field("address", &self.address)
            .finish()
    }
}

/// Parses `address:seed`
impl FromStr for SignerCredential {
    type Err = MultisigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (address, seed) = s
            .split_once(':')
            .ok_or_else(|| MultisigError::InvalidCredential("expected address:seed".to_string()))?;
        let (address, seed) = (address.trim(), seed.trim());
        if address.is_empty() || seed.is_empty() {
            return Err(MultisigError::InvalidCredential(
                "address and seed must both be given".to_string(),
            ));
        }
        Ok(Self::new(address, seed))
    }
}

/// Check credentials against the on-ledger list.
///
/// Rejects repeated addresses and non-members, then requires the
/// members' combined weight to reach the quorum.
pub fn validate_signers(
    list: &SignerList,
    credentials: &[SignerCredential],
) -> Result<u32, MultisigError> {
    let mut seen = HashSet::new();
    let mut weight = 0u32;

    for credential in credentials {
        if !seen.insert(credential.address.as_str()) {
            return Err(MultisigError::DuplicateSigner(credential.address.clone()));
        }
        let member_weight = list
            .weight_of(&credential.address)
            .ok_or_else(|| MultisigError::UnauthorizedSigner(credential.address.clone()))?;
        weight += member_weight as u32;
    }

    if weight < list.quorum {
        return Err(MultisigError::InsufficientWeight {
            have: weight,
            need: list.quorum,
        });
    }

    Ok(weight)
}
