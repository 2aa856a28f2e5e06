//! Pool registry: creation, routing, and settlement transfers
//!
//! The registry owns every pool and serializes all mutations (single
//! writer by `&mut self`). Each pool's funds stay logically partitioned
//! even when pools share a token: payouts are computed purely from the
//! pool's own state, so no pool can draw on another's budget.

use crate::error::{PoolError, Result};
use crate::pool::{Deposit, RewardPool};
use crate::{PER_MILLE, SECONDS_PER_DAY};
use ledger::{Address, TokenLedger};
use serde::{Deserialize, Serialize};

/// Parameters for creating a pool
#[derive(Debug, Clone)]
pub struct PoolParams {
    pub rewards_per_second_per_token: u64,
    pub duration_days: u64,
    /// Principal ceiling the reward budget is funded against
    pub deposit_ceiling: u64,
    pub token: Address,
    pub excess_beneficiary: Address,
    /// Per-mille tax on gross rewards
    pub tax_per_capita: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoolRegistry {
    pools: Vec<RewardPool>,
    /// Account holding all pool funds on the external ledger
    custody: Address,
    global_tax_recipient: Address,
    /// Per-mille share of each pool's tax routed to the global recipient
    global_tax_per_mille: u64,
}

impl PoolRegistry {
    pub fn new(
        custody: &str,
        global_tax_recipient: &str,
        global_tax_per_mille: u64,
    ) -> Result<Self> {
        if global_tax_per_mille > PER_MILLE {
            return Err(PoolError::InvalidParameters(format!(
                "global tax {global_tax_per_mille} exceeds {PER_MILLE} per mille"
            )));
        }
        Ok(Self {
            pools: Vec::new(),
            custody: custody.to_string(),
            global_tax_recipient: global_tax_recipient.to_string(),
            global_tax_per_mille,
        })
    }

    pub fn num_pools(&self) -> u64 {
        self.pools.len() as u64
    }

    pub fn custody(&self) -> &str {
        &self.custody
    }

    /// Look up a pool; ids are sequential from 1, so 0 and anything past
    /// the current count are uninitialized.
    pub fn pool(&self, pool_id: u64) -> Result<&RewardPool> {
        if pool_id == 0 {
            return Err(PoolError::UninitializedPool(pool_id));
        }
        self.pools
            .get(pool_id as usize - 1)
            .ok_or(PoolError::UninitializedPool(pool_id))
    }

    fn pool_mut(&mut self, pool_id: u64) -> Result<&mut RewardPool> {
        if pool_id == 0 {
            return Err(PoolError::UninitializedPool(pool_id));
        }
        self.pools
            .get_mut(pool_id as usize - 1)
            .ok_or(PoolError::UninitializedPool(pool_id))
    }

    /// Create a pool, funding its full reward budget up front.
    ///
    /// The budget is `rate * duration_seconds * deposit_ceiling` and is
    /// transferred from `funder` into custody before the pool exists;
    /// payouts can never exceed it.
    pub fn create_pool(
        &mut self,
        params: PoolParams,
        funder: &str,
        ledger: &mut dyn TokenLedger,
        now: u64,
    ) -> Result<u64> {
        if params.rewards_per_second_per_token == 0 {
            return Err(PoolError::InvalidParameters(
                "reward rate must be positive".to_string(),
            ));
        }
        if params.duration_days == 0 {
            return Err(PoolError::InvalidParameters(
                "duration must be at least one day".to_string(),
            ));
        }
        if params.deposit_ceiling == 0 {
            return Err(PoolError::InvalidParameters(
                "deposit ceiling must be positive".to_string(),
            ));
        }
        if params.tax_per_capita > PER_MILLE {
            return Err(PoolError::InvalidParameters(format!(
                "tax {} exceeds {} per mille",
                params.tax_per_capita, PER_MILLE
            )));
        }

        let duration_seconds = params
            .duration_days
            .checked_mul(SECONDS_PER_DAY)
            .ok_or_else(|| PoolError::InvalidParameters("duration overflow".to_string()))?;
        let max_rewards_funded = params
            .rewards_per_second_per_token
            .checked_mul(duration_seconds)
            .and_then(|r| r.checked_mul(params.deposit_ceiling))
            .ok_or_else(|| PoolError::InvalidParameters("reward budget overflow".to_string()))?;

        let available = ledger.balance_of(funder);
        if available < max_rewards_funded {
            return Err(PoolError::InsufficientFunding {
                required: max_rewards_funded,
                available,
            });
        }

        let rate = params.rewards_per_second_per_token;
        let duration_days = params.duration_days;
        let id = self.pools.len() as u64 + 1;
        self.pools.push(RewardPool {
            id,
            token: params.token,
            rewards_per_second_per_token: rate,
            start_time: now,
            end_time: now + duration_seconds,
            total_deposited: 0,
            deposits: Vec::new(),
            excess_beneficiary: params.excess_beneficiary,
            tax_per_capita: params.tax_per_capita,
            global_tax_accrued: 0,
            pool_tax_accrued: 0,
            rewards_accrued: 0,
            max_rewards_funded,
            excess_withdrawn: false,
        });

        ledger.transfer(funder, &self.custody, max_rewards_funded)?;
        log::info!(
            "Created pool {id} funded with {max_rewards_funded} (rate {rate}, {duration_days} days)"
        );
        Ok(id)
    }

    /// Record a deposit, pulling the principal into custody
    pub fn deposit(
        &mut self,
        pool_id: u64,
        owner: &str,
        amount: u64,
        ledger: &mut dyn TokenLedger,
        now: u64,
    ) -> Result<u64> {
        let custody = self.custody.clone();
        let pool = self.pool_mut(pool_id)?;
        if amount == 0 {
            return Err(PoolError::InvalidParameters(
                "deposit amount must be positive".to_string(),
            ));
        }

        let available = ledger.balance_of(owner);
        if available < amount {
            return Err(PoolError::InsufficientFunding {
                required: amount,
                available,
            });
        }

        let deposit_id = pool.deposit(owner, amount, now);
        ledger.transfer(owner, &custody, amount)?;
        log::debug!("Pool {pool_id}: deposit {deposit_id} of {amount} by {owner}");
        Ok(deposit_id)
    }

    /// Withdraw a deposit in full, paying principal plus net reward
    pub fn withdraw(
        &mut self,
        pool_id: u64,
        deposit_id: u64,
        caller: &str,
        ledger: &mut dyn TokenLedger,
        now: u64,
    ) -> Result<u64> {
        let custody = self.custody.clone();
        let global_tax = self.global_tax_per_mille;
        let pool = self.pool_mut(pool_id)?;

        let settlement = pool.settle_deposit(deposit_id, caller, global_tax, now)?;
        ledger.transfer(&custody, caller, settlement.payout)?;
        log::debug!(
            "Pool {pool_id}: deposit {deposit_id} withdrawn, payout {} (gross {}, tax {})",
            settlement.payout,
            settlement.gross_reward,
            settlement.tax
        );
        Ok(settlement.payout)
    }

    /// Pay out accrued taxes: the pool share to the pool's beneficiary,
    /// the global share to the registry-wide recipient. Idempotent; a call
    /// with nothing pending succeeds and transfers zero.
    pub fn withdraw_taxes(&mut self, pool_id: u64, ledger: &mut dyn TokenLedger) -> Result<u64> {
        let custody = self.custody.clone();
        let recipient = self.global_tax_recipient.clone();
        let pool = self.pool_mut(pool_id)?;
        let beneficiary = pool.excess_beneficiary.clone();

        let (pool_cut, global_cut) = pool.drain_taxes();
        if pool_cut > 0 {
            ledger.transfer(&custody, &beneficiary, pool_cut)?;
        }
        if global_cut > 0 {
            ledger.transfer(&custody, &recipient, global_cut)?;
        }
        if pool_cut + global_cut > 0 {
            log::info!("Pool {pool_id}: taxes paid out ({pool_cut} pool, {global_cut} global)");
        }
        Ok(pool_cut + global_cut)
    }

    /// Release the unearned remainder of the funded budget to the pool's
    /// excess beneficiary. Requires maturity and a clear deposit book.
    /// Idempotent; repeat calls transfer zero.
    pub fn withdraw_excess_rewards(
        &mut self,
        pool_id: u64,
        ledger: &mut dyn TokenLedger,
        now: u64,
    ) -> Result<u64> {
        let custody = self.custody.clone();
        let pool = self.pool_mut(pool_id)?;

        if now < pool.end_time {
            return Err(PoolError::PoolNotMature {
                pool: pool_id,
                matures_at: pool.end_time,
            });
        }
        if pool.has_outstanding_deposits() {
            return Err(PoolError::DepositsOutstanding(pool_id));
        }
        if pool.excess_withdrawn {
            return Ok(0);
        }

        let excess = pool.excess_rewards();
        let beneficiary = pool.excess_beneficiary.clone();
        pool.excess_withdrawn = true;
        if excess > 0 {
            ledger.transfer(&custody, &beneficiary, excess)?;
        }
        log::info!("Pool {pool_id}: excess rewards {excess} released to {beneficiary}");
        Ok(excess)
    }

    /// Pending (pool share, global share) taxes for a pool
    pub fn pending_taxes(&self, pool_id: u64) -> Result<(u64, u64)> {
        Ok(self.pool(pool_id)?.pending_taxes())
    }

    pub fn deposit_record(&self, pool_id: u64, deposit_id: u64) -> Result<&Deposit> {
        let pool = self.pool(pool_id)?;
        pool.deposit_record(deposit_id)
            .ok_or(PoolError::UnknownDeposit {
                pool: pool_id,
                deposit: deposit_id,
            })
    }
}
