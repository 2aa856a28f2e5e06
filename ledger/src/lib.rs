//! External value-transfer and NFT collaborators
//!
//! The accounting engine never holds real balances; it talks to an
//! external balance service and an external NFT collection through the
//! traits here. `MemoryLedger` and `MemoryCollection` are the in-memory
//! implementations used by the engine's own tests.

pub mod error;
pub mod nft;
pub mod token;

pub use error::{LedgerError, Result};
pub use nft::{MemoryCollection, NftCollection};
pub use token::{MemoryLedger, TokenLedger};

/// Account addresses are opaque strings
pub type Address = String;
