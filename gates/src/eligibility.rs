//! Eligibility gates
//!
//! `Merkle` gates require an inclusion proof of the caller's address
//! against the gate's root; `Amalu` gates are purely count-based. Both
//! enforce a per-address mint allowance and a gate-wide total. Checking
//! eligibility never mutates state; the minting caller consumes an
//! allowance slot only after a successful mint.

use crate::error::{GateError, Result};
use ledger::Address;
use merkle::{verify_proof, Hash32, Record, Value};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Field name under which addresses are hashed into eligibility leaves
pub const ADDRESS_FIELD: &str = "address";

/// Leaf record for an address.
///
/// A `0x`-prefixed 40-hex-digit string is encoded as a raw 20-byte
/// address; anything else is treated as text.
pub fn address_leaf(address: &str) -> Record {
    let value = address
        .strip_prefix("0x")
        .filter(|rest| rest.len() == 40)
        .and_then(|rest| hex::decode(rest).ok())
        .map(|bytes| {
            let mut addr = [0u8; 20];
            addr.copy_from_slice(&bytes);
            Value::Address(addr)
        })
        .unwrap_or_else(|| Value::Text(address.to_string()));
    Record::new().with(ADDRESS_FIELD, value)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum EligibilityGate {
    /// Proof-gated: address must appear under `root`
    Merkle {
        root: Hash32,
        max_per_address: u64,
        total_allowed: u64,
        consumed: u64,
        per_address: HashMap<Address, u64>,
    },
    /// Count-based: every address eligible until the total runs out
    Amalu {
        max_per_address: u64,
        total_allowed: u64,
        consumed: u64,
        per_address: HashMap<Address, u64>,
    },
}

impl EligibilityGate {
    pub fn merkle(root: Hash32, max_per_address: u64, total_allowed: u64) -> Self {
        EligibilityGate::Merkle {
            root,
            max_per_address,
            total_allowed,
            consumed: 0,
            per_address: HashMap::new(),
        }
    }

    pub fn amalu(max_per_address: u64, total_allowed: u64) -> Self {
        EligibilityGate::Amalu {
            max_per_address,
            total_allowed,
            consumed: 0,
            per_address: HashMap::new(),
        }
    }

    fn counters(&self) -> (u64, u64, u64, &HashMap<Address, u64>) {
        match self {
            EligibilityGate::Merkle {
                max_per_address,
                total_allowed,
                consumed,
                per_address,
                ..
            }
            | EligibilityGate::Amalu {
                max_per_address,
                total_allowed,
                consumed,
                per_address,
            } => (*max_per_address, *total_allowed, *consumed, per_address),
        }
    }

    pub fn consumed(&self) -> u64 {
        self.counters().2
    }

    pub fn total_allowed(&self) -> u64 {
        self.counters().1
    }

    /// Pure check: allowance slots remain and, for Merkle gates, the
    /// proof places the address under the root.
    pub fn is_eligible(&self, address: &str, proof: &[Hash32]) -> bool {
        let (max_per_address, total_allowed, consumed, per_address) = self.counters();
        if consumed >= total_allowed {
            return false;
        }
        if per_address.get(address).copied().unwrap_or(0) >= max_per_address {
            return false;
        }
        match self {
            EligibilityGate::Amalu { .. } => true,
            EligibilityGate::Merkle { root, .. } => {
                let record = address_leaf(address);
                let field_order = vec![ADDRESS_FIELD.to_string()];
                verify_proof(proof, *root, &record, &field_order)
            }
        }
    }

    fn consume(&mut self, address: &str) {
        match self {
            EligibilityGate::Merkle {
                consumed,
                per_address,
                ..
            }
            | EligibilityGate::Amalu {
                consumed,
                per_address,
                ..
            } => {
                *consumed += 1;
                *per_address
                    .entry(address.to_string())
                    .or_insert(0) += 1;
            }
        }
    }
}

/// Append-only collection of eligibility gates, indexed from 1
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EligibilityRegistry {
    gates: Vec<EligibilityGate>,
}

impl EligibilityRegistry {
    pub fn new() -> Self {
        Self { gates: Vec::new() }
    }

    pub fn add_gate(&mut self, gate: EligibilityGate) -> u64 {
        self.gates.push(gate);
        let index = self.gates.len() as u64;
        log::debug!("Eligibility gate {index} added");
        index
    }

    pub fn num_gates(&self) -> u64 {
        self.gates.len() as u64
    }

    pub fn gate(&self, index: u64) -> Result<&EligibilityGate> {
        if index == 0 {
            return Err(GateError::UninitializedGate(index));
        }
        self.gates
            .get(index as usize - 1)
            .ok_or(GateError::UninitializedGate(index))
    }

    pub fn is_eligible(&self, index: u64, address: &str, proof: &[Hash32]) -> Result<bool> {
        Ok(self.gate(index)?.is_eligible(address, proof))
    }

    /// Consume one allowance slot after a successful mint
    pub fn consume(&mut self, index: u64, address: &str, proof: &[Hash32]) -> Result<()> {
        if index == 0 {
            return Err(GateError::UninitializedGate(index));
        }
        let gate = self
            .gates
            .get_mut(index as usize - 1)
            .ok_or(GateError::UninitializedGate(index))?;
        if !gate.is_eligible(address, proof) {
            return Err(GateError::AddressNotEligible(address.to_string()));
        }
        gate.consume(address);
        Ok(())
    }
}
