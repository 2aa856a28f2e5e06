use ledger::{MemoryCollection, MemoryLedger, NftCollection, TokenLedger};

#[test]
fn test_balances_across_many_transfers() {
    let mut ledger = MemoryLedger::new();
    for i in 0..10 {
        ledger.credit(&format!("acct{i}"), 1_000).unwrap();
    }

    for i in 0..10 {
        let from = format!("acct{i}");
        let to = format!("acct{}", (i + 3) % 10);
        ledger.transfer(&from, &to, 100 + i as u64).unwrap();
    }

    assert_eq!(ledger.total_supply(), 10_000);
}

#[test]
fn test_collection_enumeration_stays_consistent() {
    let accounts: Vec<String> = (0..10).map(|i| format!("acct{i}")).collect();
    let mut nft = MemoryCollection::new("EnEffTee", "NFT");

    // Spread 100 distinct token ids across the accounts
    for (i, token_id) in (0u128..100).enumerate() {
        let owner = &accounts[i % accounts.len()];
        nft.mint(owner, token_id * 97 + 5, "").unwrap();
    }
    assert_eq!(nft.total_minted(), 100);

    // Shuffle some tokens around and check both sides of each move
    for i in 0..10u128 {
        let token_id = i * 97 + 5;
        let sender = nft.owner_of(token_id).unwrap().clone();
        let recipient = accounts
            .iter()
            .find(|a| **a != sender)
            .unwrap()
            .clone();

        let mut sender_before = nft.tokens_of(&sender);
        let recipient_before = nft.tokens_of(&recipient);
        nft.transfer_token(&sender, &recipient, token_id).unwrap();
        let sender_after = nft.tokens_of(&sender);
        let mut recipient_after = nft.tokens_of(&recipient);

        sender_before.retain(|id| *id != token_id);
        assert_eq!(sorted(sender_before), sorted(sender_after));

        recipient_after.retain(|id| *id != token_id);
        assert_eq!(sorted(recipient_before), sorted(recipient_after));
        assert_eq!(nft.owner_of(token_id).unwrap(), &recipient);
    }
    assert_eq!(nft.total_minted(), 100);
}

fn sorted(mut v: Vec<u128>) -> Vec<u128> {
    v.sort_unstable();
    v
}
