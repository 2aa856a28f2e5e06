//! Merkle tree error types

use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum MerkleError {
    #[error("Cannot build a tree from an empty leaf sequence")]
    EmptyInput,

    #[error("Leaf index {index} out of range (tree has {leaves} leaves)")]
    LeafOutOfRange { index: usize, leaves: usize },

    #[error("Leaf record is missing field '{0}'")]
    MissingField(String),
}

pub type Result<T> = std::result::Result<T, MerkleError>;
