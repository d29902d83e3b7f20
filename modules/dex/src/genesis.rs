//! Genesis import/export, spec.md §6. Export and import are bit-exact
//! round-trips for every persisted field except the circuit-breaker pause
//! state, which is conditional on `upgrade_preserve_circuit_breaker_state`.
//! The trade cache is a derived view and is never exported; it
//! reinitializes lazily the first time a pool is touched after import.

use cosmwasm_schema::cw_serde;
use cosmwasm_std::Storage;
use std::collections::BTreeMap;

use crate::error::ContractError;
use crate::state::{CIRCUIT_BREAKERS, PARAMS, POOLS, POOL_BY_PAIR, POSITIONS, SWAP_COMMITS};
use crate::types::{CircuitBreakerConfig, DexParams, LiquidityPosition, Pool, SwapCommit};

#[cw_serde]
#[derive(Default)]
pub struct GenesisState {
    pub params: DexParams,
    pub pools: Vec<Pool>,
    pub positions: Vec<LiquidityPosition>,
    pub swap_commits: Vec<SwapCommit>,
    pub circuit_breakers: Vec<CircuitBreakerConfig>,
}

pub fn export(store: &dyn Storage) -> Result<GenesisState, ContractError> {
    let params = PARAMS.may_load(store)?.unwrap_or_default();
    let pools: Vec<Pool> = POOLS
        .range(store, None, None, cosmwasm_std::Order::Ascending)
        .filter_map(|r| r.ok())
        .map(|(_, pool)| pool)
        .collect();
    let positions: Vec<LiquidityPosition> = POSITIONS
        .range(store, None, None, cosmwasm_std::Order::Ascending)
        .filter_map(|r| r.ok())
        .map(|(_, pos)| pos)
        .collect();
    let swap_commits: Vec<SwapCommit> = SWAP_COMMITS
        .range(store, None, None, cosmwasm_std::Order::Ascending)
        .filter_map(|r| r.ok())
        .map(|(_, commit)| commit)
        .collect();
    let circuit_breakers: Vec<CircuitBreakerConfig> = CIRCUIT_BREAKERS
        .range(store, None, None, cosmwasm_std::Order::Ascending)
        .filter_map(|r| r.ok())
        .map(|(_, cb)| {
            if params.upgrade_preserve_circuit_breaker_state {
                cb
            } else {
                CircuitBreakerConfig::for_pool(cb.pool_id, cb.max_price_deviation, cb.max_volume_per_window)
            }
        })
        .collect();

    Ok(GenesisState {
        params,
        pools,
        positions,
        swap_commits,
        circuit_breakers,
    })
}

pub fn import(store: &mut dyn Storage, genesis: GenesisState) -> Result<(), ContractError> {
    validate(&genesis)?;

    PARAMS.save(store, &genesis.params)?;

    let mut share_sums: BTreeMap<u64, paw_types::Amount> = BTreeMap::new();
    for position in &genesis.positions {
        let entry = share_sums.entry(position.pool_id).or_insert_with(paw_types::Amount::zero);
        *entry = entry.checked_add(position.shares).map_err(|_| ContractError::InvariantViolation {
            context: "genesis position shares overflow".to_string(),
        })?;
        POSITIONS.save(store, (position.pool_id, position.owner.as_str()), position)?;
    }

    for pool in &genesis.pools {
        let summed = share_sums.get(&pool.id).copied().unwrap_or_else(paw_types::Amount::zero);
        if summed != pool.total_shares {
            return Err(ContractError::InvariantViolation {
                context: format!("pool {} LP share sum mismatch on genesis import", pool.id),
            });
        }
        let k = pool
            .reserve_a
            .checked_mul(pool.reserve_b)
            .map_err(paw_errors::CommonError::from)?;
        if k < pool.k_floor {
            return Err(ContractError::InvariantViolation {
                context: format!("pool {} constant-product below its recorded floor", pool.id),
            });
        }
        POOLS.save(store, pool.id, pool)?;
        POOL_BY_PAIR.save(store, (pool.token_a.as_str(), pool.token_b.as_str()), &pool.id)?;
    }

    for commit in &genesis.swap_commits {
        SWAP_COMMITS.save(store, commit.hash.as_str(), commit)?;
    }

    for cb in &genesis.circuit_breakers {
        CIRCUIT_BREAKERS.save(store, cb.pool_id, cb)?;
    }

    Ok(())
}

fn validate(genesis: &GenesisState) -> Result<(), ContractError> {
    let known_pools: std::collections::BTreeSet<u64> = genesis.pools.iter().map(|p| p.id).collect();
    for position in &genesis.positions {
        if !known_pools.contains(&position.pool_id) {
            return Err(ContractError::PoolNotFound(position.pool_id));
        }
    }
    for cb in &genesis.circuit_breakers {
        if !known_pools.contains(&cb.pool_id) {
            return Err(ContractError::PoolNotFound(cb.pool_id));
        }
    }
    Ok(())
}
