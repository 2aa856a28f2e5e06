//! Gate error types

use ledger::LedgerError;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum GateError {
    #[error("Uninitialized gate: {0}")]
    UninitializedGate(u64),

    #[error("Address is not eligible: {0}")]
    AddressNotEligible(String),

    #[error("Insufficient payment: price {required}, provided {provided}")]
    InsufficientPayment { required: u64, provided: u64 },

    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),

    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

pub type Result<T> = std::result::Result<T, GateError>;
