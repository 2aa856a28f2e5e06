//! Merkle hash trees for eligibility and metadata claims
//!
//! Provides:
//! - Tree construction from ordered leaf records
//! - Inclusion proof generation (leaf-to-root sibling path)
//! - Pure proof verification against a root digest
//!
//! Pair hashing is order-independent: the two child digests are always
//! hashed in ascending byte order, so a verifier needs no left/right
//! bookkeeping.

pub mod error;
pub mod hash;
pub mod record;
pub mod tree;

pub use error::{MerkleError, Result};
pub use hash::{combine, Hash32};
pub use record::{leaf_hash, Record, Value};
pub use tree::{verify_proof, HashNode, HashTree};
