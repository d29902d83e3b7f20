//! Begin-block dispatch, spec.md §4.3/§5: sweep timed-out requests and
//! refresh the provider reputation cache on its configured cadence.

use cosmwasm_std::{Response, Storage};

use crate::error::ContractError;
use crate::keeper::{self, BankKeeper};
use crate::state::PARAMS;

/// Upper bound on refunds processed in a single block, mirroring the
/// oracle module's bounded nonce-pruning sweep so a backlog of expired
/// escrows cannot stall block production.
const MAX_TIMEOUTS_SWEPT_PER_BLOCK: u32 = 50;

pub fn begin_block(store: &mut dyn Storage, bank: &mut dyn BankKeeper, height: u64) -> Result<Response, ContractError> {
    let params = PARAMS.may_load(store)?.unwrap_or_default();
    let mut response = keeper::sweep_timeouts(store, bank, height, MAX_TIMEOUTS_SWEPT_PER_BLOCK)?;

    if params.reputation_decay_interval_blocks > 0 && height % params.reputation_decay_interval_blocks == 0 {
        response = response.add_events(keeper::decay_reputation(store, height)?.events);
    }

    if params.provider_cache_refresh_interval_blocks > 0 && height % params.provider_cache_refresh_interval_blocks == 0 {
        response = response.add_events(keeper::refresh_provider_cache(store, height)?.events);
    }

    Ok(response)
}
