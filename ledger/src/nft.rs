//! NFT collection collaborator
//!
//! Mirrors the surface the minting flow needs: mint with a metadata URI,
//! plus ownership and per-owner enumeration queries.

use crate::error::{LedgerError, Result};
use crate::Address;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub trait NftCollection {
    fn mint(&mut self, to: &str, token_id: u128, uri: &str) -> Result<()>;
    fn owner_of(&self, token_id: u128) -> Option<&Address>;
    fn tokens_of(&self, owner: &str) -> Vec<u128>;
    fn total_minted(&self) -> u64;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Identity {
    owner: Address,
    uri: String,
}

/// In-memory NFT collection with owner enumeration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MemoryCollection {
    name: String,
    symbol: String,
    tokens: HashMap<u128, Identity>,
    by_owner: HashMap<Address, Vec<u128>>,
}

impl MemoryCollection {
    pub fn new(name: &str, symbol: &str) -> Self {
        Self {
            name: name.to_string(),
            symbol: symbol.to_string(),
            tokens: HashMap::new(),
            by_owner: HashMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn token_uri(&self, token_id: u128) -> Option<&str> {
        self.tokens.get(&token_id).map(|t| t.uri.as_str())
    }

    pub fn balance_of(&self, owner: &str) -> usize {
        self.by_owner.get(owner).map(|t| t.len()).unwrap_or(0)
    }

    /// Move a token between owners, keeping enumeration consistent
    pub fn transfer_token(&mut self, from: &str, to: &str, token_id: u128) -> Result<()> {
        let identity = self
            .tokens
            .get_mut(&token_id)
            .ok_or(LedgerError::UnknownToken(token_id))?;
        if identity.owner != from {
            return Err(LedgerError::NotTokenOwner(from.to_string(), token_id));
        }
        identity.owner = to.to_string();

        if let Some(tokens) = self.by_owner.get_mut(from) {
            tokens.retain(|id| *id != token_id);
        }
        self.by_owner
            .entry(to.to_string())
            .or_default()
            .push(token_id);
        Ok(())
    }
}

impl NftCollection for MemoryCollection {
    fn mint(&mut self, to: &str, token_id: u128, uri: &str) -> Result<()> {
        if self.tokens.contains_key(&token_id) {
            return Err(LedgerError::TokenAlreadyExists(token_id));
        }
        self.tokens.insert(
            token_id,
            Identity {
                owner: to.to_string(),
                uri: uri.to_string(),
            },
        );
        self.by_owner
            .entry(to.to_string())
            .or_default()
            .push(token_id);
        Ok(())
    }

    fn owner_of(&self, token_id: u128) -> Option<&Address> {
        self.tokens.get(&token_id).map(|t| &t.owner)
    }

    fn tokens_of(&self, owner: &str) -> Vec<u128> {
        self.by_owner.get(owner).cloned().unwrap_or_default()
    }

    fn total_minted(&self) -> u64 {
        self.tokens.len() as u64
    }
}
