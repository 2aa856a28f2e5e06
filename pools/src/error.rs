//! Pool error types

use ledger::LedgerError;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum PoolError {
    #[error("Uninitialized pool: {0}")]
    UninitializedPool(u64),

    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),

    #[error("Insufficient funding: pool requires {required}, funder has {available}")]
    InsufficientFunding { required: u64, available: u64 },

    #[error("Unknown deposit {deposit} in pool {pool}")]
    UnknownDeposit { pool: u64, deposit: u64 },

    #[error("Deposit {deposit} does not belong to {caller}")]
    NotDepositOwner { deposit: u64, caller: String },

    #[error("Deposit {0} already withdrawn")]
    AlreadyWithdrawn(u64),

    #[error("Pool {pool} not mature until {matures_at}")]
    PoolNotMature { pool: u64, matures_at: u64 },

    #[error("Pool {0} still has outstanding deposits")]
    DepositsOutstanding(u64),

    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

pub type Result<T> = std::result::Result<T, PoolError>;
