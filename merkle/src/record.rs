//! Leaf records and their canonical hashing
//!
//! A leaf is an ordered set of named fields. The leaf digest is Keccak-256
//! over the concatenation of each selected field's 32-byte image, in the
//! order given by `field_order`. Fixed-width images keep the encoding
//! unambiguous: an address is left-padded to 32 bytes, an integer is
//! 32-byte big-endian, and text contributes the digest of its UTF-8 bytes.

use crate::error::{MerkleError, Result};
use crate::hash::Hash32;
use serde::{Deserialize, Serialize};

/// A single leaf field value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Value {
    /// 20-byte account address
    Address([u8; 20]),
    /// Unsigned integer (token ids, amounts)
    Uint(u128),
    /// Arbitrary text (metadata URIs)
    Text(String),
}

impl Value {
    /// The field's fixed 32-byte image
    pub fn to_word(&self) -> [u8; 32] {
        let mut word = [0u8; 32];
        match self {
            Value::Address(addr) => word[12..].copy_from_slice(addr),
            Value::Uint(n) => word[16..].copy_from_slice(&n.to_be_bytes()),
            Value::Text(s) => word.copy_from_slice(Hash32::digest(s.as_bytes()).as_bytes()),
        }
        word
    }
}

/// An ordered field map forming one leaf
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Record {
    fields: Vec<(String, Value)>,
}

impl Record {
    pub fn new() -> Self {
        Self { fields: Vec::new() }
    }

    /// Add a field, replacing any existing field of the same name
    pub fn with(mut self, name: &str, value: Value) -> Self {
        self.set(name, value);
        self
    }

    pub fn set(&mut self, name: &str, value: Value) {
        if let Some(slot) = self.fields.iter_mut().find(|(n, _)| n == name) {
            slot.1 = value;
        } else {
            self.fields.push((name.to_string(), value));
        }
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }
}

/// Hash a record's `field_order`-selected fields into a leaf digest
pub fn leaf_hash(record: &Record, field_order: &[String]) -> Result<Hash32> {
    let mut buf = Vec::with_capacity(32 * field_order.len());
    for name in field_order {
        let value = record
            .get(name)
            .ok_or_else(|| MerkleError::MissingField(name.clone()))?;
        buf.extend_from_slice(&value.to_word());
    }
    Ok(Hash32::digest(&buf))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_leaf_hash_is_deterministic() {
        let record = Record::new()
            .with("tokenId", Value::Uint(7))
            .with("uri", Value::Text("ipfs://abc".to_string()));
        let fields = order(&["tokenId", "uri"]);

        assert_eq!(
            leaf_hash(&record, &fields).unwrap(),
            leaf_hash(&record, &fields).unwrap()
        );
    }

    #[test]
    fn test_leaf_hash_depends_on_field_order() {
        let record = Record::new()
            .with("tokenId", Value::Uint(7))
            .with("uri", Value::Text("ipfs://abc".to_string()));

        let forward = leaf_hash(&record, &order(&["tokenId", "uri"])).unwrap();
        let backward = leaf_hash(&record, &order(&["uri", "tokenId"])).unwrap();
        assert_ne!(forward, backward);
    }

    #[test]
    fn test_missing_field_is_an_error() {
        let record = Record::new().with("address", Value::Address([1u8; 20]));
        let err = leaf_hash(&record, &order(&["owner"])).unwrap_err();
        assert_eq!(err, MerkleError::MissingField("owner".to_string()));
    }

    #[test]
    fn test_insertion_order_does_not_matter_for_selected_fields() {
        let a = Record::new()
            .with("tokenId", Value::Uint(1))
            .with("uri", Value::Text("u".to_string()));
        let b = Record::new()
            .with("uri", Value::Text("u".to_string()))
            .with("tokenId", Value::Uint(1));
        let fields = order(&["tokenId", "uri"]);

        assert_eq!(
            leaf_hash(&a, &fields).unwrap(),
            leaf_hash(&b, &fields).unwrap()
        );
    }
}
