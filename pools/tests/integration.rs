use ledger::{MemoryLedger, TokenLedger};
use pools::{PoolError, PoolParams, PoolRegistry};

fn params(rate: u64, days: u64, ceiling: u64, tax: u64, beneficiary: &str) -> PoolParams {
    PoolParams {
        rewards_per_second_per_token: rate,
        duration_days: days,
        deposit_ceiling: ceiling,
        token: "token".to_string(),
        excess_beneficiary: beneficiary.to_string(),
        tax_per_capita: tax,
    }
}

#[test]
fn test_spec_worked_example() {
    // rate 1000, deposit 1_000_000, 1 day, 1% tax, withdraw after 1 second
    let mut registry = PoolRegistry::new("custody", "protocol", 0).unwrap();
    let mut ledger = MemoryLedger::new();
    ledger.credit("funder", u64::MAX / 2).unwrap();
    ledger.credit("alice", 1_000_000).unwrap();

    registry
        .create_pool(params(1000, 1, 1_000_000, 10, "bene"), "funder", &mut ledger, 0)
        .unwrap();
    let deposit_id = registry.deposit(1, "alice", 1_000_000, &mut ledger, 10).unwrap();
    let payout = registry.withdraw(1, deposit_id, "alice", &mut ledger, 11).unwrap();

    let gross: u64 = 1000 * 1_000_000;
    let tax = gross * 10 / 1000;
    assert_eq!(payout, 1_000_000 + gross - tax);
    assert_eq!(ledger.balance_of("alice"), 1_000_000 + gross - tax);
}

#[test]
fn test_no_tokens_created_or_destroyed() {
    // payouts + taxes + excess + outstanding principal == funded + deposited
    let mut registry = PoolRegistry::new("custody", "protocol", 300).unwrap();
    let mut ledger = MemoryLedger::new();
    ledger.credit("funder", u64::MAX / 2).unwrap();
    for who in ["alice", "bob", "carol"] {
        ledger.credit(who, 1_000_000).unwrap();
    }
    let supply_before = ledger.total_supply();

    registry
        .create_pool(params(7, 2, 5_000, 25, "bene"), "funder", &mut ledger, 1_000)
        .unwrap();
    let funded = registry.pool(1).unwrap().max_rewards_funded;
    let end_time = registry.pool(1).unwrap().end_time;

    let d1 = registry.deposit(1, "alice", 4_000, &mut ledger, 1_500).unwrap();
    let d2 = registry.deposit(1, "bob", 999, &mut ledger, 2_000).unwrap();
    let d3 = registry.deposit(1, "carol", 1, &mut ledger, 50_000).unwrap();
    let deposited = 4_000 + 999 + 1;

    let mut payouts = 0u64;
    payouts += registry.withdraw(1, d1, "alice", &mut ledger, 40_000).unwrap();
    payouts += registry.withdraw(1, d2, "bob", &mut ledger, end_time + 5).unwrap();
    payouts += registry.withdraw(1, d3, "carol", &mut ledger, end_time).unwrap();

    let taxes = registry.withdraw_taxes(1, &mut ledger).unwrap();
    let excess = registry
        .withdraw_excess_rewards(1, &mut ledger, end_time)
        .unwrap();

    assert_eq!(payouts + taxes + excess, funded + deposited);
    // Custody drained to zero and external supply untouched
    assert_eq!(ledger.balance_of("custody"), 0);
    assert_eq!(ledger.total_supply(), supply_before);
}

#[test]
fn test_pools_sharing_a_token_never_cross_settle() {
    let mut registry = PoolRegistry::new("custody", "protocol", 100).unwrap();
    let mut ledger = MemoryLedger::new();
    ledger.credit("funder", u64::MAX / 2).unwrap();
    ledger.credit("alice", 2_000_000).unwrap();
    ledger.credit("bob", 2_000_000).unwrap();

    let a = registry
        .create_pool(params(5, 1, 10_000, 50, "bene_a"), "funder", &mut ledger, 0)
        .unwrap();
    let b = registry
        .create_pool(params(11, 3, 20_000, 10, "bene_b"), "funder", &mut ledger, 0)
        .unwrap();

    let da = registry.deposit(a, "alice", 10_000, &mut ledger, 100).unwrap();
    let db = registry.deposit(b, "bob", 20_000, &mut ledger, 100).unwrap();

    let snapshot = |registry: &PoolRegistry, id: u64| {
        let p = registry.pool(id).unwrap();
        (
            p.rewards_accrued,
            p.pool_tax_accrued,
            p.global_tax_accrued,
            p.total_deposited,
            p.excess_withdrawn,
        )
    };
    let b_before = snapshot(&registry, b);

    // Settle everything in pool A; pool B's figures must not move
    registry.withdraw(a, da, "alice", &mut ledger, 5_000).unwrap();
    registry.withdraw_taxes(a, &mut ledger).unwrap();
    let a_end = registry.pool(a).unwrap().end_time;
    registry.withdraw_excess_rewards(a, &mut ledger, a_end).unwrap();

    assert_eq!(snapshot(&registry, b), b_before);

    // Pool B still settles its own full budget afterwards
    let b_end = registry.pool(b).unwrap().end_time;
    registry.withdraw(b, db, "bob", &mut ledger, b_end).unwrap();
    registry.withdraw_taxes(b, &mut ledger).unwrap();
    registry.withdraw_excess_rewards(b, &mut ledger, b_end).unwrap();
    assert_eq!(ledger.balance_of("custody"), 0);
}

#[test]
fn test_withdraw_rejects_wrong_owner_and_replay() {
    let mut registry = PoolRegistry::new("custody", "protocol", 0).unwrap();
    let mut ledger = MemoryLedger::new();
    ledger.credit("funder", u64::MAX / 2).unwrap();
    ledger.credit("alice", 1_000).unwrap();

    registry
        .create_pool(params(1, 1, 1_000, 0, "bene"), "funder", &mut ledger, 0)
        .unwrap();
    let d = registry.deposit(1, "alice", 1_000, &mut ledger, 10).unwrap();

    let err = registry.withdraw(1, d, "mallory", &mut ledger, 20).unwrap_err();
    assert!(matches!(err, PoolError::NotDepositOwner { .. }));

    registry.withdraw(1, d, "alice", &mut ledger, 20).unwrap();
    let err = registry.withdraw(1, d, "alice", &mut ledger, 30).unwrap_err();
    assert_eq!(err, PoolError::AlreadyWithdrawn(d));
}

#[test]
fn test_registry_state_survives_json_round_trip() {
    let mut registry = PoolRegistry::new("custody", "protocol", 500).unwrap();
    let mut ledger = MemoryLedger::new();
    ledger.credit("funder", u64::MAX / 2).unwrap();
    ledger.credit("alice", 10_000).unwrap();
    ledger.credit("bob", 10_000).unwrap();

    registry
        .create_pool(params(3, 1, 1_000, 100, "bene"), "funder", &mut ledger, 0)
        .unwrap();
    let d1 = registry.deposit(1, "alice", 1_000, &mut ledger, 10).unwrap();
    let d2 = registry.deposit(1, "bob", 500, &mut ledger, 20).unwrap();
    registry.withdraw(1, d1, "alice", &mut ledger, 100).unwrap();

    let json = serde_json::to_string(&registry).unwrap();
    let mut restored: PoolRegistry = serde_json::from_str(&json).unwrap();
    assert_eq!(restored.num_pools(), 1);
    assert_eq!(
        restored.pending_taxes(1).unwrap(),
        registry.pending_taxes(1).unwrap()
    );
    assert_eq!(
        restored.pool(1).unwrap().rewards_accrued,
        registry.pool(1).unwrap().rewards_accrued
    );

    // Settlement continues identically on the restored registry
    let end_time = restored.pool(1).unwrap().end_time;
    restored.withdraw(1, d2, "bob", &mut ledger, end_time).unwrap();
    restored.withdraw_taxes(1, &mut ledger).unwrap();
    restored
        .withdraw_excess_rewards(1, &mut ledger, end_time)
        .unwrap();
    assert_eq!(ledger.balance_of("custody"), 0);
}

#[test]
fn test_uninitialized_pool_for_every_operation() {
    let mut registry = PoolRegistry::new("custody", "protocol", 0).unwrap();
    let mut ledger = MemoryLedger::new();

    assert_eq!(
        registry.deposit(1, "alice", 10, &mut ledger, 0).unwrap_err(),
        PoolError::UninitializedPool(1)
    );
    assert_eq!(
        registry.withdraw(1, 1, "alice", &mut ledger, 0).unwrap_err(),
        PoolError::UninitializedPool(1)
    );
    assert_eq!(
        registry.withdraw_taxes(1, &mut ledger).unwrap_err(),
        PoolError::UninitializedPool(1)
    );
    assert_eq!(
        registry
            .withdraw_excess_rewards(1, &mut ledger, 0)
            .unwrap_err(),
        PoolError::UninitializedPool(1)
    );
    assert_eq!(
        registry.pool(0).unwrap_err(),
        PoolError::UninitializedPool(0)
    );
}
