//! Cross-module wiring tests, spec.md §8: these drive `Keepers` the way
//! a node binary would — `begin_block`, a batch of messages, then
//! `end_block` — rather than calling module keepers directly, to prove
//! the three modules actually compose through one dispatcher.

use cosmwasm_std::testing::MockStorage;
use paw_app::collaborators::{AcceptAllVerifier, InMemoryBank, InMemoryStaking};
use paw_app::msg::ExecuteMsg;
use paw_app::Keepers;
use paw_compute::types::Specs;
use paw_dex::msg::ExecuteMsg as DexMsg;
use paw_oracle::msg::ExecuteMsg as OracleMsg;
use paw_types::{Amount, Ratio};

fn keepers() -> Keepers<InMemoryBank, InMemoryStaking, AcceptAllVerifier> {
    Keepers::new(InMemoryBank::default(), InMemoryStaking::default(), AcceptAllVerifier)
}

/// A pool is created and swapped against purely through the dispatcher,
/// with begin/end-block hooks run around it exactly as a node would.
#[test]
fn dex_round_trip_through_dispatcher() {
    let mut store = MockStorage::new();
    let mut keepers = keepers();

    keepers.begin_block(&mut store, 1).unwrap();
    keepers
        .handle(
            &mut store,
            1_000,
            1,
            ExecuteMsg::Dex(DexMsg::CreatePool {
                creator: "lp1".to_string(),
                token_a: "uusdt".to_string(),
                amount_a: Amount::from(1_000_000u64),
                token_b: "upaw".to_string(),
                amount_b: Amount::from(1_000_000u64),
            }),
        )
        .unwrap();

    let resp = keepers
        .handle(
            &mut store,
            1_000,
            1,
            ExecuteMsg::Dex(DexMsg::Swap {
                pool_id: 1,
                trader: "trader1".to_string(),
                token_in: "upaw".to_string(),
                amount_in: Amount::from(1_000u64),
                token_out: "uusdt".to_string(),
                min_out: Amount::zero(),
                deadline: 2_000,
            }),
        )
        .unwrap();
    assert!(resp.events.iter().any(|e| e.ty == "swap_executed"));

    keepers.end_block(&mut store, 1_000, 1).unwrap();
}

/// Registering validators and submitting prices through the dispatcher,
/// then letting end-block run the aggregation pass.
#[test]
fn oracle_aggregates_through_dispatcher() {
    let mut store = MockStorage::new();
    let mut keepers = keepers();

    for (validator, region) in [("v1", "us"), ("v2", "eu"), ("v3", "ap"), ("v4", "sa")] {
        keepers.staking.set_stake(validator, Amount::from(1_000u64));
        keepers
            .handle(
                &mut store,
                100,
                1,
                ExecuteMsg::Oracle(OracleMsg::RegisterOracle {
                    validator: validator.to_string(),
                    region: region.to_string(),
                    stake: Amount::from(1_000u64),
                }),
            )
            .unwrap();
    }

    for (validator, price) in [("v1", 100u64), ("v2", 101), ("v3", 102), ("v4", 103)] {
        keepers
            .handle(
                &mut store,
                100,
                1,
                ExecuteMsg::Oracle(OracleMsg::SubmitPrice {
                    validator: validator.to_string(),
                    asset: "BTC/USD".to_string(),
                    price: Ratio::from_ratio(price, 1u64),
                    timestamp: 100,
                }),
            )
            .unwrap();
    }

    let resp = keepers.end_block(&mut store, 100, 1).unwrap();
    assert!(resp.events.iter().any(|e| e.ty == "price_aggregated"));
}

/// A compute request with no eligible provider times out and is
/// refunded purely through `begin_block`, driven by the dispatcher.
#[test]
fn compute_request_times_out_through_dispatcher() {
    let mut store = MockStorage::new();
    let mut keepers = keepers();
    keepers.bank.fund("alice", Amount::from(500u64));

    keepers
        .handle(
            &mut store,
            10,
            10,
            ExecuteMsg::Compute(paw_compute::msg::ExecuteMsg::RequestCompute {
                requester: "alice".to_string(),
                specs: Specs { cpu_cores: 2, memory_mb: 2_048, gpu_count: 0 },
                image: "img:latest".to_string(),
                command: "run".to_string(),
                max_payment: Amount::from(500u64),
                timeout_blocks: 5,
            }),
        )
        .unwrap();
    assert_eq!(keepers.bank.balance("alice"), Amount::zero());

    keepers.begin_block(&mut store, 15).unwrap();
    assert_eq!(keepers.bank.balance("alice"), Amount::from(500u64));
}
