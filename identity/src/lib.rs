//! Merkle identity: proof-gated NFT minting
//!
//! Binds a metadata Merkle root to an NFT collection and a pair of gate
//! indices. A mint claim presents the caller's address proof and a
//! metadata proof for the `{tokenId, uri}` leaf being claimed; on success
//! the price gate is charged, the token minted, and the eligibility
//! gate's allowance consumed.

pub mod error;

pub use error::{IdentityError, Result};

use gates::{EligibilityRegistry, GateError, PriceRegistry};
use ledger::{LedgerError, NftCollection, TokenLedger};
use merkle::{verify_proof, Hash32, Record, Value};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Metadata leaf field names
pub const TOKEN_ID_FIELD: &str = "tokenId";
pub const URI_FIELD: &str = "uri";

/// Leaf record for a metadata claim
pub fn metadata_leaf(token_id: u128, uri: &str) -> Record {
    Record::new()
        .with(TOKEN_ID_FIELD, Value::Uint(token_id))
        .with(URI_FIELD, Value::Text(uri.to_string()))
}

/// Field order metadata trees are hashed under
pub fn metadata_field_order() -> Vec<String> {
    vec![TOKEN_ID_FIELD.to_string(), URI_FIELD.to_string()]
}

/// One metadata-root binding
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentityTree {
    pub metadata_root: Hash32,
    pub ipfs_hash: Hash32,
    /// Label of the bound NFT collection
    pub collection: String,
    pub price_gate: u64,
    pub eligibility_gate: u64,
    minted: HashSet<u128>,
}

impl IdentityTree {
    pub fn is_minted(&self, token_id: u128) -> bool {
        self.minted.contains(&token_id)
    }

    pub fn num_minted(&self) -> u64 {
        self.minted.len() as u64
    }
}

/// Composition root: tree bindings plus the two gate registries
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MerkleIdentity {
    trees: Vec<IdentityTree>,
    pub eligibility: EligibilityRegistry,
    pub prices: PriceRegistry,
}

impl MerkleIdentity {
    pub fn new(eligibility: EligibilityRegistry, prices: PriceRegistry) -> Self {
        Self {
            trees: Vec::new(),
            eligibility,
            prices,
        }
    }

    pub fn num_trees(&self) -> u64 {
        self.trees.len() as u64
    }

    pub fn tree(&self, index: u64) -> Result<&IdentityTree> {
        if index == 0 {
            return Err(IdentityError::UninitializedTree(index));
        }
        self.trees
            .get(index as usize - 1)
            .ok_or(IdentityError::UninitializedTree(index))
    }

    /// Append a binding; returns its 1-based index. The gate indices must
    /// already exist in the owned registries.
    pub fn add_merkle_tree(
        &mut self,
        metadata_root: Hash32,
        ipfs_hash: Hash32,
        collection: &str,
        price_gate: u64,
        eligibility_gate: u64,
    ) -> Result<u64> {
        self.prices.gate(price_gate)?;
        self.eligibility.gate(eligibility_gate)?;

        self.trees.push(IdentityTree {
            metadata_root,
            ipfs_hash,
            collection: collection.to_string(),
            price_gate,
            eligibility_gate,
            minted: HashSet::new(),
        });
        let index = self.trees.len() as u64;
        log::info!("Identity tree {index} bound to collection {collection}");
        Ok(index)
    }

    /// Current mint price for a tree
    pub fn get_price(&self, tree_index: u64) -> Result<u64> {
        let tree = self.tree(tree_index)?;
        Ok(self.prices.get_price(tree.price_gate)?)
    }

    /// Whether `address` may mint from a tree, given its address proof
    pub fn is_eligible(&self, tree_index: u64, address: &str, proof: &[Hash32]) -> Result<bool> {
        let tree = self.tree(tree_index)?;
        Ok(self
            .eligibility
            .is_eligible(tree.eligibility_gate, address, proof)?)
    }

    /// Claim one token. Validation order: duplicate token, eligibility,
    /// metadata proof, payment. A duplicate token id fails regardless of
    /// proof validity. All checks pass before any transfer or mint; the
    /// eligibility allowance is consumed last.
    #[allow(clippy::too_many_arguments)]
    pub fn withdraw(
        &mut self,
        tree_index: u64,
        token_id: u128,
        uri: &str,
        address_proof: &[Hash32],
        metadata_proof: &[Hash32],
        caller: &str,
        payment: u64,
        ledger: &mut dyn TokenLedger,
        nft: &mut dyn NftCollection,
    ) -> Result<()> {
        let tree = self.tree(tree_index)?;
        let price_gate = tree.price_gate;
        let eligibility_gate = tree.eligibility_gate;
        let metadata_root = tree.metadata_root;

        if self.trees[tree_index as usize - 1].is_minted(token_id)
            || nft.owner_of(token_id).is_some()
        {
            return Err(IdentityError::TokenAlreadyExists(token_id));
        }

        if !self
            .eligibility
            .is_eligible(eligibility_gate, caller, address_proof)?
        {
            return Err(IdentityError::AddressNotEligible(caller.to_string()));
        }

        let record = metadata_leaf(token_id, uri);
        if !verify_proof(metadata_proof, metadata_root, &record, &metadata_field_order()) {
            return Err(IdentityError::InvalidProof(token_id));
        }

        let price = self.prices.get_price(price_gate)?;
        if payment < price {
            return Err(IdentityError::Gate(GateError::InsufficientPayment {
                required: price,
                provided: payment,
            }));
        }
        let available = ledger.balance_of(caller);
        if available < price {
            return Err(IdentityError::Ledger(LedgerError::InsufficientBalance {
                requested: price,
                available,
            }));
        }

        self.prices.charge(price_gate, caller, payment, ledger)?;
        nft.mint(caller, token_id, uri)?;
        self.trees[tree_index as usize - 1].minted.insert(token_id);
        self.eligibility
            .consume(eligibility_gate, caller, address_proof)?;

        log::debug!("Tree {tree_index}: token {token_id} minted to {caller} for {price}");
        Ok(())
    }
}
