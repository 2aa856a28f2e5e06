//! Per-pool state and reward math
//!
//! Each deposit carries its own accrual window: rewards for a deposit are
//! computed from that deposit's own timestamps at the pool's rate, never
//! from a pool-wide share. All reward math is integer with truncating
//! division; the tax rounds down, in the depositor's favor.

use crate::error::{PoolError, Result};
use crate::PER_MILLE;
use ledger::Address;
use serde::{Deserialize, Serialize};

/// Lifecycle phase derived from the clock
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PoolStatus {
    /// Accepting deposits and accruing rewards
    Active,
    /// Past end time; excess rewards claimable once deposits clear
    Matured,
    /// Excess rewards have been paid out
    ExcessSettled,
}

/// One deposit position. Consumed whole on withdrawal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Deposit {
    pub id: u64,
    pub owner: Address,
    pub amount: u64,
    pub deposit_time: u64,
    pub withdrawn: bool,
}

/// Amounts produced by settling one deposit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settlement {
    /// Principal plus net reward, owed to the depositor
    pub payout: u64,
    /// Reward before tax
    pub gross_reward: u64,
    /// Tax withheld, split across the pool and global shares
    pub tax: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RewardPool {
    pub id: u64,
    pub token: Address,
    pub rewards_per_second_per_token: u64,
    pub start_time: u64,
    pub end_time: u64,
    /// Outstanding (not yet withdrawn) principal
    pub total_deposited: u64,
    pub deposits: Vec<Deposit>,
    pub excess_beneficiary: Address,
    /// Per-mille tax taken from gross rewards at withdrawal
    pub tax_per_capita: u64,
    pub global_tax_accrued: u64,
    pub pool_tax_accrued: u64,
    /// Cumulative gross rewards earned across all settled deposits
    pub rewards_accrued: u64,
    pub max_rewards_funded: u64,
    pub excess_withdrawn: bool,
}

impl RewardPool {
    pub fn status(&self, now: u64) -> PoolStatus {
        if self.excess_withdrawn {
            PoolStatus::ExcessSettled
        } else if now >= self.end_time {
            PoolStatus::Matured
        } else {
            PoolStatus::Active
        }
    }

    pub fn deposit(&mut self, owner: &str, amount: u64, now: u64) -> u64 {
        let id = self.deposits.len() as u64 + 1;
        self.deposits.push(Deposit {
            id,
            owner: owner.to_string(),
            amount,
            deposit_time: now,
            withdrawn: false,
        });
        self.total_deposited += amount;
        id
    }

    pub fn deposit_record(&self, deposit_id: u64) -> Option<&Deposit> {
        if deposit_id == 0 {
            return None;
        }
        self.deposits.get(deposit_id as usize - 1)
    }

    pub fn has_outstanding_deposits(&self) -> bool {
        self.deposits.iter().any(|d| !d.withdrawn)
    }

    /// Gross reward for a principal over an accrual window clamped to the
    /// pool's lifetime, capped by the remaining funded budget.
    fn gross_reward(&self, amount: u64, deposit_time: u64, now: u64) -> u64 {
        let from = deposit_time.max(self.start_time);
        let to = now.min(self.end_time);
        let elapsed = to.saturating_sub(from);

        let gross = self.rewards_per_second_per_token as u128
            * amount as u128
            * elapsed as u128;
        let remaining = (self.max_rewards_funded - self.rewards_accrued) as u128;
        gross.min(remaining) as u64
    }

    /// Settle one deposit: compute payout and tax, accrue the tax shares,
    /// and mark the record consumed. `global_tax_per_mille` carves the
    /// registry's share out of the withheld tax.
    pub fn settle_deposit(
        &mut self,
        deposit_id: u64,
        caller: &str,
        global_tax_per_mille: u64,
        now: u64,
    ) -> Result<Settlement> {
        let pool_id = self.id;
        let deposit = match self.deposit_record(deposit_id) {
            Some(d) => d.clone(),
            None => {
                return Err(PoolError::UnknownDeposit {
                    pool: pool_id,
                    deposit: deposit_id,
                })
            }
        };
        if deposit.owner != caller {
            return Err(PoolError::NotDepositOwner {
                deposit: deposit_id,
                caller: caller.to_string(),
            });
        }
        if deposit.withdrawn {
            return Err(PoolError::AlreadyWithdrawn(deposit_id));
        }

        let gross = self.gross_reward(deposit.amount, deposit.deposit_time, now);
        let tax = (gross as u128 * self.tax_per_capita as u128 / PER_MILLE as u128) as u64;
        let global_cut = (tax as u128 * global_tax_per_mille as u128 / PER_MILLE as u128) as u64;
        let pool_cut = tax - global_cut;

        self.rewards_accrued += gross;
        self.global_tax_accrued += global_cut;
        self.pool_tax_accrued += pool_cut;
        self.total_deposited -= deposit.amount;
        self.deposits[deposit_id as usize - 1].withdrawn = true;

        Ok(Settlement {
            payout: deposit.amount + (gross - tax),
            gross_reward: gross,
            tax,
        })
    }

    /// Pending tax shares as (pool share, global share)
    pub fn pending_taxes(&self) -> (u64, u64) {
        (self.pool_tax_accrued, self.global_tax_accrued)
    }

    /// Take the pending tax shares, zeroing both
    pub fn drain_taxes(&mut self) -> (u64, u64) {
        let drained = (self.pool_tax_accrued, self.global_tax_accrued);
        self.pool_tax_accrued = 0;
        self.global_tax_accrued = 0;
        drained
    }

    /// The unearned remainder of the funded reward budget
    pub fn excess_rewards(&self) -> u64 {
        self.max_rewards_funded - self.rewards_accrued
    }
}
