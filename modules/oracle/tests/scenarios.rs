//! End-to-end scenario coverage, spec.md §8.

use std::collections::BTreeMap;

use cosmwasm_std::testing::MockStorage;
use paw_oracle::error::ContractError;
use paw_oracle::keeper::{self, StakingKeeper};
use paw_oracle::state::{PARAMS, SLASH_RECORDS};
use paw_types::{Amount, Ratio};

/// A trivial in-memory staking collaborator for tests: bonded power
/// equals registered stake, and `slash` just records calls.
#[derive(Default)]
struct MockStaking {
    stakes: BTreeMap<String, Amount>,
    slashes: Vec<(String, u64)>,
}

impl StakingKeeper for MockStaking {
    fn bonded_power(&self, validator: &str) -> Result<Amount, ContractError> {
        Ok(self.stakes.get(validator).copied().unwrap_or_else(Amount::zero))
    }

    fn slash(&mut self, validator: &str, _slash_fraction: Ratio, infraction_height: u64, _power: Amount) -> Result<(), ContractError> {
        self.slashes.push((validator.to_string(), infraction_height));
        Ok(())
    }
}

fn register(store: &mut MockStorage, staking: &mut MockStaking, validator: &str, region: &str, stake: u128) {
    keeper::register_oracle(store, region.to_string(), validator.to_string(), Amount::from(stake)).unwrap();
    staking.stakes.insert(validator.to_string(), Amount::from(stake));
}

/// S4 — five equal-stake validators submit {100,101,102,103,5000};
/// outlier 5000 is rejected, median 102 is aggregated, and the submitter
/// of 5000 is slashed.
#[test]
fn s4_oracle_aggregation_and_slashing() {
    let mut store = MockStorage::new();
    let mut staking = MockStaking::default();
    // Five distinct regions keeps diversity admission out of the way of
    // this test, which is only exercising aggregation/slashing.
    for (i, region) in ["us", "eu", "ap", "sa", "af"].iter().enumerate() {
        register(&mut store, &mut staking, &format!("v{}", i + 1), region, 1_000);
    }

    for (validator, price) in [("v1", 100u64), ("v2", 101), ("v3", 102), ("v4", 103), ("v5", 5000)] {
        keeper::submit_price(
            &mut store,
            1_000,
            10,
            validator.to_string(),
            "BTC/USD".to_string(),
            Ratio::from_ratio(price, 1u64),
        )
        .unwrap();
    }

    let resp = keeper::run_aggregation(&mut store, &mut staking, 1_000, 10).unwrap();
    let aggregated = resp
        .events
        .iter()
        .find(|e| e.ty == "price_aggregated")
        .unwrap()
        .attributes
        .iter()
        .find(|a| a.key == "aggregated_price")
        .unwrap()
        .value
        .clone();
    assert_eq!(aggregated, "102");

    assert_eq!(staking.slashes, vec![("v5".to_string(), 10)]);
    assert!(SLASH_RECORDS.has(&store, ("BTC/USD", 10, "v5")));

    // Never slashed twice for the same round.
    let resp2 = keeper::run_aggregation(&mut store, &mut staking, 1_000, 10).unwrap();
    assert!(resp2.events.iter().all(|e| e.ty != "validator_slashed"));
    assert_eq!(staking.slashes.len(), 1);
}

/// S6 — a nonce sent at t=0 is pruned once t exceeds the 7-day TTL, and
/// the deletion is all-or-nothing (state + timestamp index).
#[test]
fn s6_nonce_ttl_pruning() {
    let mut store = MockStorage::new();
    let params = paw_oracle::types::OracleParams::default();
    PARAMS.save(&mut store, &params).unwrap();

    keeper::touch_nonce_send(&mut store, 0, "c1".to_string(), "counterparty".to_string()).unwrap();
    assert!(paw_oracle::state::NONCE_STATES.has(&store, ("c1", "counterparty")));

    let pruned = keeper::prune_expired_nonces(&mut store, 604_800, params.nonce_ttl_seconds, 100);
    assert_eq!(pruned, 0, "exactly at the TTL boundary nothing is prunable yet");

    let pruned = keeper::prune_expired_nonces(&mut store, 604_801 + 1, params.nonce_ttl_seconds, 100);
    assert_eq!(pruned, 1);
    assert!(!paw_oracle::state::NONCE_STATES.has(&store, ("c1", "counterparty")));
    assert!(!paw_oracle::state::NONCE_TS_INDEX.has(&store, (0, "c1", "counterparty")));
}

/// Diversity: registering a fourth validator into a region that would
/// push it over the 40% concentration cap is rejected when enforcement
/// is on.
#[test]
fn diversity_registration_rejected_over_cap() {
    let mut store = MockStorage::new();
    let mut staking = MockStaking::default();
    register(&mut store, &mut staking, "v1", "us", 100);
    register(&mut store, &mut staking, "v2", "eu", 100);

    let err = keeper::register_oracle(&mut store, "us".to_string(), "v3".to_string(), Amount::from(1_000u64)).unwrap_err();
    assert!(matches!(err, ContractError::RegionalCapExceeded { .. }));
}

/// Invariant 9: the aggregated price always lies within
/// `[minSubmitted, maxSubmitted]` after outlier rejection.
#[test]
fn invariant_aggregated_price_within_submitted_range() {
    let mut store = MockStorage::new();
    let mut staking = MockStaking::default();
    for (i, region) in ["us", "eu", "ap"].iter().enumerate() {
        register(&mut store, &mut staking, &format!("v{}", i + 1), region, 500);
    }
    for (validator, price) in [("v1", 90u64), ("v2", 95), ("v3", 110)] {
        keeper::submit_price(&mut store, 100, 1, validator.to_string(), "ETH/USD".to_string(), Ratio::from_ratio(price, 1u64)).unwrap();
    }
    let resp = keeper::run_aggregation(&mut store, &mut staking, 100, 1).unwrap();
    let aggregated: u64 = resp
        .events
        .iter()
        .find(|e| e.ty == "price_aggregated")
        .unwrap()
        .attributes
        .iter()
        .find(|a| a.key == "aggregated_price")
        .unwrap()
        .value
        .parse()
        .unwrap();
    assert!((90..=110).contains(&aggregated));
}
