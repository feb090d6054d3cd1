//! ECDSA key management
//!
//! Derives secp256k1 account keys from family seeds the way the ledger
//! does (root key, then account key #0), and encodes classic `r…`
//! addresses from the public key.

use secp256k1::{ecdsa::Signature, Message, PublicKey, Scalar, Secp256k1, SecretKey};
use thiserror::Error;

use super::hash::{checksum, hash160, sha512_half_parts};
use super::seed::Seed;

/// Version byte of a classic account address
pub const ACCOUNT_ID_VERSION: u8 = 0x00;

/// Errors that can occur during key operations
#[derive(Error, Debug)]
pub enum KeyError {
    #[error("Invalid private key")]
    InvalidPrivateKey,
    #[error("Invalid public key")]
    InvalidPublicKey,
    #[error("Invalid signature")]
    InvalidSignature,
    #[error("Invalid seed")]
    InvalidSeed,
    #[error("Invalid address: {0}")]
    InvalidAddress(String),
    #[error("Key derivation exhausted")]
    DerivationExhausted,
    #[error("Secp256k1 error: {0}")]
    Secp256k1Error(#[from] secp256k1::Error),
}

/// A key pair consisting of a private key and its corresponding public key
#[derive(Clone)]
pub struct KeyPair {
    pub secret_key: SecretKey,
    pub public_key: PublicKey,
}

impl KeyPair {
    /// Derive the account key pair of a family seed
    pub fn from_seed(seed: &Seed) -> Result<Self, KeyError> {
        let secp = Secp256k1::new();

        let root = derive_scalar(&[&seed.entropy()[..]])?;
        let root_public = PublicKey::from_secret_key(&secp, &root).serialize();

        // Account family 0
        let tweak = derive_scalar(&[&root_public[..], &0u32.to_be_bytes()[..]])?;
        let scalar = Scalar::from_be_bytes(tweak.secret_bytes())
            .map_err(|_| KeyError::InvalidPrivateKey)?;
        let secret_key = root.add_tweak(&scalar)?;

        Ok(Self::from_secret_key(secret_key))
    }

    /// Create a key pair from an existing secret key
    pub fn from_secret_key(secret_key: SecretKey) -> Self {
        let secp = Secp256k1::new();
        let public_key = PublicKey::from_secret_key(&secp, &secret_key);
        Self {
            secret_key,
            public_key,
        }
    }

    /// Compressed public key as uppercase hex
    pub fn public_key_hex(&self) -> String {
        hex::encode_upper(self.public_key.serialize())
    }

    /// 20-byte account ID
    pub fn account_id(&self) -> [u8; 20] {
        hash160(&self.public_key.serialize())
    }

    /// Classic address of this key pair
    pub fn address(&self) -> String {
        public_key_to_address(&self.public_key)
    }

    /// Sign a 32-byte digest, returning a DER signature
    pub fn sign(&self, digest: &[u8; 32]) -> Result<Vec<u8>, KeyError> {
        sign_digest(&self.secret_key, digest)
    }

    /// Verify a DER signature against this key pair's public key
    pub fn verify(&self, digest: &[u8; 32], signature: &[u8]) -> Result<bool, KeyError> {
        verify_signature(&self.public_key, digest, signature)
    }
}

/// First SHA-512-half of `parts || counter` that is a valid secret key
fn derive_scalar(parts: &[&[u8]]) -> Result<SecretKey, KeyError> {
    for counter in 0..=u32::MAX {
        let counter_bytes = counter.to_be_bytes();
        let mut input: Vec<&[u8]> = parts.to_vec();
        input.push(&counter_bytes);
        let candidate = sha512_half_parts(&input);
        if let Ok(key) = SecretKey::from_slice(&candidate) {
            return Ok(key);
        }
    }
    Err(KeyError::DerivationExhausted)
}

/// Convert a public key to a classic address
pub fn public_key_to_address(public_key: &PublicKey) -> String {
    encode_account_id(&hash160(&public_key.serialize()))
}

/// Base58Check(0x00 || account_id) with the ripple alphabet
pub fn encode_account_id(account_id: &[u8; 20]) -> String {
    let mut bytes = Vec::with_capacity(25);
    bytes.push(ACCOUNT_ID_VERSION);
    bytes.extend_from_slice(account_id);
    let check = checksum(&bytes);
    bytes.extend_from_slice(&check);
    bs58::encode(bytes)
        .with_alphabet(bs58::Alphabet::RIPPLE)
        .into_string()
}

/// Decode a classic address back to its account ID
pub fn decode_address(address: &str) -> Result<[u8; 20], KeyError> {
    let invalid = || KeyError::InvalidAddress(address.to_string());

    let bytes = bs58::decode(address)
        .with_alphabet(bs58::Alphabet::RIPPLE)
        .into_vec()
        .map_err(|_| invalid())?;

    if bytes.len() != 25 || bytes[0] != ACCOUNT_ID_VERSION {
        return Err(invalid());
    }
    if checksum(&bytes[..21]) != bytes[21..] {
        return Err(invalid());
    }

    let mut account_id = [0u8; 20];
    account_id.copy_from_slice(&bytes[1..21]);
    Ok(account_id)
}

/// Whether `address` is a well-formed classic address
pub fn is_valid_address(address: &str) -> bool {
    decode_address(address).is_ok()
}

/// Parse a public key from hex string
pub fn public_key_from_hex(hex_key: &str) -> Result<PublicKey, KeyError> {
    let bytes = hex::decode(hex_key).map_err(|_| KeyError::InvalidPublicKey)?;
    PublicKey::from_slice(&bytes).map_err(|_| KeyError::InvalidPublicKey)
}

/// Sign a digest with a secret key
pub fn sign_digest(secret_key: &SecretKey, digest: &[u8; 32]) -> Result<Vec<u8>, KeyError> {
    let secp = Secp256k1::new();
    let message = Message::from_digest_slice(digest)?;
    let signature = secp.sign_ecdsa(&message, secret_key);
    Ok(signature.serialize_der().to_vec())
}

/// Verify a DER signature against a public key
pub fn verify_signature(
    public_key: &PublicKey,
    digest: &[u8; 32],
    signature: &[u8],
) -> Result<bool, KeyError> {
    let secp = Secp256k1::new();
    let message = Message::from_digest_slice(digest)?;
    let sig = Signature::from_der(signature).map_err(|_| KeyError::InvalidSignature)?;

    match secp.verify_ecdsa(&message, &sig, public_key) {
        Ok(()) => Ok(true),
        Err(_) => Ok(false),
    }
}
