//! End-block hook: price aggregation (spec.md §4.2) and nonce TTL pruning
//! (spec.md §4.2/§8 invariant 8), in that order so a newly aggregated
//! price is available before this block's state is finalized.

use cosmwasm_std::{Response, Storage};

use crate::error::ContractError;
use crate::events;
use crate::keeper::{self, StakingKeeper};
use crate::state::{LAST_AGGREGATION_TIME, PARAMS};

/// Nonce entries pruned per block, capped to bound gas (spec.md §4.2:
/// "for up to 100 per block").
const MAX_NONCES_PRUNED_PER_BLOCK: u32 = 100;

pub fn end_block(store: &mut dyn Storage, staking: &mut dyn StakingKeeper, now: u64, height: u64) -> Result<Response, ContractError> {
    let params = PARAMS.may_load(store)?.unwrap_or_default();

    let mut response = Response::new();

    let last_run = LAST_AGGREGATION_TIME.may_load(store)?.unwrap_or(0);
    if now.saturating_sub(last_run) >= params.update_interval_seconds {
        response = response.add_events(keeper::run_aggregation(store, staking, now, height)?.events);
    }

    let pruned = keeper::prune_expired_nonces(store, now, params.nonce_ttl_seconds, MAX_NONCES_PRUNED_PER_BLOCK);
    if pruned > 0 {
        tracing::info!(pruned, height, "pruned expired IBC nonce entries");
        response = response.add_event(events::nonces_pruned(pruned));
    }

    Ok(response)
}
