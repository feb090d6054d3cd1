//! Cryptographic utilities for wallets
//!
//! This module provides:
//! - SHA-256 / SHA-512-half hashing
//! - Family seed encoding
//! - secp256k1 key derivation and signing
//! - Classic address encoding

pub mod hash;
pub mod keys;
pub mod seed;

pub use hash::{checksum, double_sha256, hash160, sha256, sha512_half, sha512_half_parts};
pub use keys::{
    decode_address, encode_account_id, is_valid_address, public_key_from_hex,
    public_key_to_address, sign_digest, verify_signature, KeyError, KeyPair,
};
pub use seed::{Seed, SEED_LENGTH};
