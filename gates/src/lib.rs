//! Mint gating policies
//!
//! Two families of append-only gate registries consulted by a minting
//! front end: eligibility gates answer "may this address mint", price
//! gates answer "for how much" and collect the proceeds. Variants form a
//! closed set; each carries its own state payload.

pub mod eligibility;
pub mod error;
pub mod price;

pub use eligibility::{address_leaf, EligibilityGate, EligibilityRegistry, ADDRESS_FIELD};
pub use error::{GateError, Result};
pub use price::{PriceGate, PriceRegistry};
