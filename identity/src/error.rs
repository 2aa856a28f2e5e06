//! Identity error types

use gates::GateError;
use ledger::LedgerError;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum IdentityError {
    #[error("Uninitialized tree: {0}")]
    UninitializedTree(u64),

    #[error("Address is not eligible: {0}")]
    AddressNotEligible(String),

    #[error("Invalid metadata proof for token {0}")]
    InvalidProof(u128),

    #[error("Token already exists: {0}")]
    TokenAlreadyExists(u128),

    #[error(transparent)]
    Gate(#[from] GateError),

    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

pub type Result<T> = std::result::Result<T, IdentityError>;
