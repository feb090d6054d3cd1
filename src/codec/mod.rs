//! Transaction encoding
//!
//! Binary serialization, blob encoding, signing data and transaction
//! hashing shared by the wallet (signing) and the multi-sign combiner.

pub mod binary;
pub mod blob;
pub mod definitions;

pub use binary::{BinaryParser, CodecError};
pub use blob::{
    decode, encode, multisigning_data, multisigning_hash, signing_data, signing_hash,
    transaction_hash, verify_signatures, PREFIX_MULTI_SIGN, PREFIX_SINGLE_SIGN,
    PREFIX_TRANSACTION_ID,
};
