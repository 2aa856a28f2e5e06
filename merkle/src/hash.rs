//! Keccak-256 digests and sorted-pair combination

use serde::{Deserialize, Serialize};
use sha3::{Digest, Keccak256};
use std::fmt;

/// A 32-byte Keccak-256 digest
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Hash32(pub [u8; 32]);

impl Hash32 {
    /// The all-zero digest used as the padding sentinel for odd levels
    pub const ZERO: Hash32 = Hash32([0u8; 32]);

    /// Keccak-256 of raw bytes
    pub fn digest(data: &[u8]) -> Self {
        let mut hasher = Keccak256::new();
        hasher.update(data);
        Hash32(hasher.finalize().into())
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for Hash32 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl fmt::Debug for Hash32 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Hash32({})", self.to_hex())
    }
}

/// Hash a pair of child digests in ascending byte order.
///
/// Returns the parent digest and a `flipped` flag: true when `a > b`, i.e.
/// the inputs were swapped before hashing. Byte-array ordering here is the
/// unsigned big-endian comparison of the raw digests.
pub fn combine(a: Hash32, b: Hash32) -> (Hash32, bool) {
    let mut buf = [0u8; 64];
    if a <= b {
        buf[..32].copy_from_slice(&a.0);
        buf[32..].copy_from_slice(&b.0);
        (Hash32::digest(&buf), false)
    } else {
        buf[..32].copy_from_slice(&b.0);
        buf[32..].copy_from_slice(&a.0);
        (Hash32::digest(&buf), true)
    }
}
