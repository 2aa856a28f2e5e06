//! Price gates
//!
//! A price gate quotes the current mint price (`get_price`, side-effect
//! free) and collects it on a successful mint (`charge`). Variants:
//!
//! - `Fixed`: static price, proceeds forwarded straight to the burn sink
//! - `FixedSplitPooled`: proceeds pool inside the gate; `distribute`
//!   splits the pooled balance between beneficiary and burn sink
//! - `SpeedBump`: price steps up after every `bump_threshold` mints
//! - `Amalu`: free, no proceeds
//!
//! Overpayment is not collected: exactly the quoted price moves.

use crate::error::{GateError, Result};
use ledger::{Address, LedgerError, TokenLedger};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum PriceGate {
    Fixed {
        price: u64,
        burn_sink: Address,
    },
    FixedSplitPooled {
        price: u64,
        /// Percent (0..=100) of the pooled balance owed to the beneficiary
        beneficiary_pct: u64,
        beneficiary: Address,
        burn_sink: Address,
        pooled_balance: u64,
    },
    SpeedBump {
        base_price: u64,
        bump_amount: u64,
        bump_threshold: u64,
        burn_sink: Address,
        mints: u64,
    },
    Amalu,
}

impl PriceGate {
    pub fn fixed(price: u64, burn_sink: &str) -> Self {
        PriceGate::Fixed {
            price,
            burn_sink: burn_sink.to_string(),
        }
    }

    pub fn fixed_split_pooled(
        price: u64,
        beneficiary_pct: u64,
        beneficiary: &str,
        burn_sink: &str,
    ) -> Self {
        PriceGate::FixedSplitPooled {
            price,
            beneficiary_pct,
            beneficiary: beneficiary.to_string(),
            burn_sink: burn_sink.to_string(),
            pooled_balance: 0,
        }
    }

    pub fn speed_bump(base_price: u64, bump_amount: u64, bump_threshold: u64, burn_sink: &str) -> Self {
        PriceGate::SpeedBump {
            base_price,
            bump_amount,
            bump_threshold,
            burn_sink: burn_sink.to_string(),
            mints: 0,
        }
    }

    /// Current price, reflecting escalation state. Never mutates.
    pub fn price(&self) -> u64 {
        match self {
            PriceGate::Fixed { price, .. } => *price,
            PriceGate::FixedSplitPooled { price, .. } => *price,
            PriceGate::SpeedBump {
                base_price,
                bump_amount,
                bump_threshold,
                mints,
                ..
            } => base_price + bump_amount * (mints / bump_threshold),
            PriceGate::Amalu => 0,
        }
    }

    pub fn pooled_balance(&self) -> u64 {
        match self {
            PriceGate::FixedSplitPooled { pooled_balance, .. } => *pooled_balance,
            _ => 0,
        }
    }
}

/// Append-only collection of price gates, indexed from 1
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceRegistry {
    gates: Vec<PriceGate>,
    /// Account holding pooled gate proceeds on the external ledger
    custody: Address,
}

impl PriceRegistry {
    pub fn new(custody: &str) -> Self {
        Self {
            gates: Vec::new(),
            custody: custody.to_string(),
        }
    }

    pub fn add_gate(&mut self, gate: PriceGate) -> Result<u64> {
        if let PriceGate::FixedSplitPooled { beneficiary_pct, .. } = &gate {
            if *beneficiary_pct > 100 {
                return Err(GateError::InvalidParameters(format!(
                    "beneficiary percent {beneficiary_pct} exceeds 100"
                )));
            }
        }
        if let PriceGate::SpeedBump { bump_threshold, .. } = &gate {
            if *bump_threshold == 0 {
                return Err(GateError::InvalidParameters(
                    "speed bump threshold must be positive".to_string(),
                ));
            }
        }
        self.gates.push(gate);
        let index = self.gates.len() as u64;
        log::debug!("Price gate {index} added");
        Ok(index)
    }

    pub fn num_gates(&self) -> u64 {
        self.gates.len() as u64
    }

    pub fn gate(&self, index: u64) -> Result<&PriceGate> {
        if index == 0 {
            return Err(GateError::UninitializedGate(index));
        }
        self.gates
            .get(index as usize - 1)
            .ok_or(GateError::UninitializedGate(index))
    }

    fn gate_mut(&mut self, index: u64) -> Result<&mut PriceGate> {
        if index == 0 {
            return Err(GateError::UninitializedGate(index));
        }
        self.gates
            .get_mut(index as usize - 1)
            .ok_or(GateError::UninitializedGate(index))
    }

    /// Side-effect-free price quote
    pub fn get_price(&self, index: u64) -> Result<u64> {
        Ok(self.gate(index)?.price())
    }

    /// Collect the current price from `payer` and advance gate state.
    /// Fails `InsufficientPayment` when the offered amount is below the
    /// quote; the payer keeps any amount above it. The payer's balance is
    /// validated before any gate state moves, so a failed charge leaves
    /// price and pooled figures untouched.
    pub fn charge(
        &mut self,
        index: u64,
        payer: &str,
        payment: u64,
        ledger: &mut dyn TokenLedger,
    ) -> Result<u64> {
        let custody = self.custody.clone();
        let gate = self.gate_mut(index)?;
        let price = gate.price();
        if payment < price {
            return Err(GateError::InsufficientPayment {
                required: price,
                provided: payment,
            });
        }
        let available = ledger.balance_of(payer);
        if available < price {
            return Err(GateError::Ledger(LedgerError::InsufficientBalance {
                requested: price,
                available,
            }));
        }

        match gate {
            PriceGate::Fixed { burn_sink, .. } => {
                let sink = burn_sink.clone();
                ledger.transfer(payer, &sink, price)?;
            }
            PriceGate::FixedSplitPooled { pooled_balance, .. } => {
                *pooled_balance += price;
                ledger.transfer(payer, &custody, price)?;
            }
            PriceGate::SpeedBump {
                burn_sink, mints, ..
            } => {
                *mints += 1;
                let sink = burn_sink.clone();
                ledger.transfer(payer, &sink, price)?;
            }
            PriceGate::Amalu => {}
        }
        Ok(price)
    }

    /// Split a pooled gate's balance: `beneficiary_pct`% to the
    /// beneficiary, remainder to the burn sink, balance reset to zero.
    /// A no-op returning zero on non-pooled variants.
    pub fn distribute(&mut self, index: u64, ledger: &mut dyn TokenLedger) -> Result<u64> {
        let custody = self.custody.clone();
        let gate = self.gate_mut(index)?;

        let PriceGate::FixedSplitPooled {
            beneficiary_pct,
            beneficiary,
            burn_sink,
            pooled_balance,
            ..
        } = gate
        else {
            return Ok(0);
        };

        let balance = *pooled_balance;
        if balance == 0 {
            return Ok(0);
        }
        let to_beneficiary = balance * *beneficiary_pct / 100;
        let to_burn = balance - to_beneficiary;
        let beneficiary = beneficiary.clone();
        let burn_sink = burn_sink.clone();
        *pooled_balance = 0;

        if to_beneficiary > 0 {
            ledger.transfer(&custody, &beneficiary, to_beneficiary)?;
        }
        if to_burn > 0 {
            ledger.transfer(&custody, &burn_sink, to_burn)?;
        }
        log::info!(
            "Price gate {index}: distributed {balance} ({to_beneficiary} beneficiary, {to_burn} burned)"
        );
        Ok(balance)
    }
}
