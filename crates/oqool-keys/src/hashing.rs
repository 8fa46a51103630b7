//! Key material generation and one-way hashing.
//!
//! Keys carry 256 bits of randomness. Only a blake3 keyed hash of the
//! plaintext is ever stored; the hashing key is derived from a deployment
//! secret.

use rand::RngCore;

/// Human-readable prefix on every issued key.
pub const KEY_PREFIX: &str = "oqool_";

/// Bytes of randomness per key (hex-encoded to 64 characters).
pub const KEY_BYTES: usize = 32;

const PEPPER_CONTEXT: &str = "oqool 2024-06 developer api key hashing";

/// One-way hash of a plaintext key. Equality is constant-time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyHash(blake3::Hash);

impl KeyHash {
    pub fn to_hex(&self) -> String {
        self.0.to_hex().to_string()
    }
}

/// Hashes presented keys with a deployment-specific pepper.
#[derive(Clone)]
pub struct KeyHasher {
    pepper: [u8; 32],
}

impl KeyHasher {
    /// Hasher keyed from a deployment secret.
    pub fn new(secret: &str) -> Self {
        Self {
            pepper: blake3::derive_key(PEPPER_CONTEXT, secret.as_bytes()),
        }
    }

    pub fn hash(&self, plaintext: &str) -> KeyHash {
        KeyHash(blake3::keyed_hash(&self.pepper, plaintext.as_bytes()))
    }
}

impl Default for KeyHasher {
    fn default() -> Self {
        Self::new("")
    }
}

impl std::fmt::Debug for KeyHasher {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("KeyHasher").finish_non_exhaustive()
    }
}

/// Fresh plaintext key: prefix plus 64 hex characters.
pub fn generate_key_material() -> String {
    let mut buf = [0u8; KEY_BYTES];
    rand::rng().fill_bytes(&mut buf);
    format!("{}{}", KEY_PREFIX, hex::encode(buf))
}
