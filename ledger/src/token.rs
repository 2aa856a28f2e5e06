//! Token balance service

use crate::error::{LedgerError, Result};
use crate::Address;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// External value-transfer service.
///
/// Fail-closed: a transfer either moves the full amount or moves nothing.
pub trait TokenLedger {
    fn transfer(&mut self, from: &str, to: &str, amount: u64) -> Result<()>;
    fn balance_of(&self, account: &str) -> u64;
}

/// In-memory balance map
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MemoryLedger {
    accounts: HashMap<Address, u64>,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self {
            accounts: HashMap::new(),
        }
    }

    /// Seed an account balance
    pub fn credit(&mut self, account: &str, amount: u64) -> Result<()> {
        let balance = self.accounts.entry(account.to_string()).or_insert(0);
        *balance = balance
            .checked_add(amount)
            .ok_or(LedgerError::AmountOverflow)?;
        Ok(())
    }

    pub fn total_supply(&self) -> u64 {
        self.accounts.values().sum()
    }
}

impl TokenLedger for MemoryLedger {
    fn transfer(&mut self, from: &str, to: &str, amount: u64) -> Result<()> {
        let available = self.balance_of(from);
        if available < amount {
            return Err(LedgerError::InsufficientBalance {
                requested: amount,
                available,
            });
        }
        if from == to {
            return Ok(());
        }
        let recipient = self.balance_of(to);
        let credited = recipient
            .checked_add(amount)
            .ok_or(LedgerError::AmountOverflow)?;

        self.accounts.insert(from.to_string(), available - amount);
        self.accounts.insert(to.to_string(), credited);
        Ok(())
    }

    fn balance_of(&self, account: &str) -> u64 {
        self.accounts.get(account).copied().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transfer() {
        let mut ledger = MemoryLedger::new();
        ledger.credit("alice", 1000).unwrap();

        ledger.transfer("alice", "bob", 400).unwrap();
        assert_eq!(ledger.balance_of("alice"), 600);
        assert_eq!(ledger.balance_of("bob"), 400);
    }

    #[test]
    fn test_insufficient_balance() {
        let mut ledger = MemoryLedger::new();
        ledger.credit("alice", 100).unwrap();

        let err = ledger.transfer("alice", "bob", 101).unwrap_err();
        assert_eq!(
            err,
            LedgerError::InsufficientBalance {
                requested: 101,
                available: 100
            }
        );
        // Nothing moved
        assert_eq!(ledger.balance_of("alice"), 100);
        assert_eq!(ledger.balance_of("bob"), 0);
    }

    #[test]
    fn test_self_transfer_preserves_balance() {
        let mut ledger = MemoryLedger::new();
        ledger.credit("alice", 100).unwrap();

        ledger.transfer("alice", "alice", 60).unwrap();
        assert_eq!(ledger.balance_of("alice"), 100);
    }

    #[test]
    fn test_supply_is_conserved() {
        let mut ledger = MemoryLedger::new();
        ledger.credit("alice", 700).unwrap();
        ledger.credit("bob", 300).unwrap();

        ledger.transfer("alice", "carol", 250).unwrap();
        ledger.transfer("bob", "alice", 300).unwrap();
        assert_eq!(ledger.total_supply(), 1000);
    }
}
