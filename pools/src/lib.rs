//! Reward pool accounting
//!
//! Pools accrue per-second token rewards against individual deposits,
//! take a per-mille tax from gross rewards at withdrawal, and release the
//! unearned remainder of their pre-funded reward budget after maturity.
//!
//! All time enters as caller-supplied Unix seconds; the engine never
//! reads a clock. Every operation is atomic: validation happens before
//! any state change or external transfer.

pub mod error;
pub mod pool;
pub mod registry;

pub use error::{PoolError, Result};
pub use pool::{Deposit, PoolStatus, RewardPool};
pub use registry::{PoolParams, PoolRegistry};

/// Seconds per pool-duration day
pub const SECONDS_PER_DAY: u64 = 86_400;

/// Denominator for per-mille (tax) rates
pub const PER_MILLE: u64 = 1_000;
