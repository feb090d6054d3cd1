//! Transaction blobs, signing data and hashes
//!
//! A blob is the uppercase hex of the transaction's binary serialization.
//! Signing data is the same serialization without the fields a signature
//! does not cover, behind a 4-byte prefix that separates single-sign,
//! multi-sign and transaction-ID hashing.

use crate::codec::binary::{serialize_object, BinaryParser, CodecError};
use crate::core::Transaction;
use crate::crypto::{decode_address, public_key_from_hex, sha512_half, verify_signature};
use serde_json::Value;

/// Prefix of single-signature signing data
pub const PREFIX_SINGLE_SIGN: [u8; 4] = *b"STX\0";

/// Prefix of multi-signature signing data
pub const PREFIX_MULTI_SIGN: [u8; 4] = *b"SMT\0";

/// Prefix of transaction-ID hashing
pub const PREFIX_TRANSACTION_ID: [u8; 4] = *b"TXN\0";

fn serialize(tx: &Transaction, signing_only: bool) -> Result<Vec<u8>, CodecError> {
    let value = serde_json::to_value(tx)?;
    let object = value.as_object().ok_or(CodecError::InvalidValue {
        field: "transaction".to_string(),
        reason: "not an object".to_string(),
    })?;
    let mut out = Vec::new();
    serialize_object(object, signing_only, &mut out)?;
    Ok(out)
}

/// Encode a transaction to a hex blob
pub fn encode(tx: &Transaction) -> Result<String, CodecError> {
    Ok(hex::encode_upper(serialize(tx, false)?))
}

/// Decode a hex blob back into a transaction
pub fn decode(blob: &str) -> Result<Transaction, CodecError> {
    let bytes = hex::decode(blob).map_err(|_| CodecError::InvalidHex)?;
    let object = BinaryParser::new(&bytes).read_transaction()?;
    Ok(serde_json::from_value(Value::Object(object))?)
}

/// Bytes a single signer signs
pub fn signing_data(tx: &Transaction) -> Result<Vec<u8>, CodecError> {
    let mut data = PREFIX_SINGLE_SIGN.to_vec();
    data.extend(serialize(tx, true)?);
    Ok(data)
}

/// Bytes the signer with `account_id` signs for a multi-signed transaction
pub fn multisigning_data(tx: &Transaction, account_id: &[u8; 20]) -> Result<Vec<u8>, CodecError> {
    let mut data = PREFIX_MULTI_SIGN.to_vec();
    data.extend(serialize(tx, true)?);
    data.extend_from_slice(account_id);
    Ok(data)
}

pub fn signing_hash(tx: &Transaction) -> Result<[u8; 32], CodecError> {
    Ok(sha512_half(&signing_data(tx)?))
}

pub fn multisigning_hash(tx: &Transaction, account_id: &[u8; 20]) -> Result<[u8; 32], CodecError> {
    Ok(sha512_half(&multisigning_data(tx, account_id)?))
}

/// Transaction ID of a signed blob, uppercase hex
pub fn transaction_hash(blob: &str) -> Result<String, CodecError> {
    let bytes = hex::decode(blob).map_err(|_| CodecError::InvalidHex)?;
    let mut data = PREFIX_TRANSACTION_ID.to_vec();
    data.extend(bytes);
    Ok(hex::encode_upper(sha512_half(&data)))
}

/// Check every signature a transaction carries.
///
/// Multi-signed transactions are checked signer by signer; anything else
/// must carry a single `TxnSignature` over `SigningPubKey`.
pub fn verify_signatures(tx: &Transaction) -> Result<bool, CodecError> {
    if let Some(signers) = tx.common.signers.as_ref().filter(|s| !s.is_empty()) {
        for wrapper in signers {
            let signer = &wrapper.signer;
            let account_id = decode_address(&signer.account)?;
            let public_key = public_key_from_hex(&signer.signing_pub_key)?;
            let signature = hex::decode(&signer.txn_signature).map_err(|_| CodecError::InvalidHex)?;
            let digest = multisigning_hash(tx, &account_id)?;
            if !verify_signature(&public_key, &digest, &signature)? {
                return Ok(false);
            }
        }
        return Ok(true);
    }

    let public_key = tx
        .common
        .signing_pub_key
        .as_deref()
        .filter(|k| !k.is_empty())
        .ok_or(CodecError::Unsigned)?;
    let signature = tx
        .common
        .txn_signature
        .as_deref()
        .ok_or(CodecError::Unsigned)?;

    let public_key = public_key_from_hex(public_key)?;
    let signature = hex::decode(signature).map_err(|_| CodecError::InvalidHex)?;
    Ok(verify_signature(&public_key, &signing_hash(tx)?, &signature)?)
}
