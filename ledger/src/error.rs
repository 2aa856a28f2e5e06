//! Ledger error types

use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum LedgerError {
    #[error("Insufficient balance: requested {requested}, available {available}")]
    InsufficientBalance { requested: u64, available: u64 },

    #[error("Amount overflow")]
    AmountOverflow,

    #[error("Token {0} already exists")]
    TokenAlreadyExists(u128),

    #[error("Token {0} does not exist")]
    UnknownToken(u128),

    #[error("Account {0} does not own token {1}")]
    NotTokenOwner(String, u128),
}

pub type Result<T> = std::result::Result<T, LedgerError>;
