//! Family seeds
//!
//! A seed is 16 bytes of entropy. Its human form is base58 (ripple
//! alphabet) over `0x21 || entropy || checksum`, which always starts
//! with `s`.

use rand::rngs::OsRng;
use rand::RngCore;

use super::hash::checksum;
use super::keys::KeyError;

/// Version byte of an encoded secp256k1 family seed
pub const SEED_VERSION: u8 = 0x21;

/// Entropy length in bytes
pub const SEED_LENGTH: usize = 16;

/// Raw seed entropy
#[derive(Clone, PartialEq, Eq)]
pub struct Seed([u8; SEED_LENGTH]);

impl Seed {
    /// Fresh random seed from the OS RNG
    pub fn generate() -> Self {
        let mut entropy = [0u8; SEED_LENGTH];
        OsRng.fill_bytes(&mut entropy);
        Self(entropy)
    }

    pub fn from_entropy(entropy: [u8; SEED_LENGTH]) -> Self {
        Self(entropy)
    }

    /// Decode an `s…` seed string, verifying version and checksum
    pub fn decode(encoded: &str) -> Result<Self, KeyError> {
        let bytes = bs58::decode(encoded.trim())
            .with_alphabet(bs58::Alphabet::RIPPLE)
            .into_vec()
            .map_err(|_| KeyError::InvalidSeed)?;

        if bytes.len() != 1 + SEED_LENGTH + 4 || bytes[0] != SEED_VERSION {
            return Err(KeyError::InvalidSeed);
        }

        let (payload, check) = bytes.split_at(1 + SEED_LENGTH);
        if checksum(payload) != check {
            return Err(KeyError::InvalidSeed);
        }

        let mut entropy = [0u8; SEED_LENGTH];
        entropy.copy_from_slice(&payload[1..]);
        Ok(Self(entropy))
    }

    /// Encode as an `s…` string
    pub fn encode(&self) -> String {
        let mut payload = Vec::with_capacity(1 + SEED_LENGTH + 4);
        payload.push(SEED_VERSION);
        payload.extend_from_slice(&self.0);
        let check = checksum(&payload);
        payload.extend_from_slice(&check);
        bs58::encode(payload)
            .with_alphabet(bs58::Alphabet::RIPPLE)
            .into_string()
    }

    pub fn entropy(&self) -> &[u8; SEED_LENGTH] {
        &self.0
    }
}

impl std::fmt::Debug for Seed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Seed(..)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_encoding_prefix() {
        let seed = Seed::generate();
        assert!(seed.encode().starts_with('s'));
    }

    #[test]
    fn test_seed_decode_encode() {
        let seed = Seed::from_entropy([7u8; SEED_LENGTH]);
        let decoded = Seed::decode(&seed.encode()).unwrap();
        assert_eq!(seed, decoded);
    }

    #[test]
    fn test_corrupted_seed_rejected() {
        let mut encoded = Seed::from_entropy([1u8; SEED_LENGTH]).encode();
        let last = encoded.pop().unwrap();
        encoded.push(if last == 'a' { 'b' } else { 'a' });
        assert!(matches!(Seed::decode(&encoded), Err(KeyError::InvalidSeed)));
    }

    #[test]
    fn test_garbage_seed_rejected() {
        assert!(Seed::decode("").is_err());
        assert!(Seed::decode("not a seed").is_err());
        assert!(Seed::decode("0OIl").is_err());
    }

    #[test]
    fn test_debug_does_not_leak_entropy() {
        let seed = Seed::from_entropy([9u8; SEED_LENGTH]);
        assert_eq!(format!("{:?}", seed), "Seed(..)");
    }
}
