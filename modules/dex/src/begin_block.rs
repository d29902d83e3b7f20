//! Begin-block hook, spec.md §4.1 guard 6: sweeps commit-reveal
//! commitments that outlived `commit_timeout_blocks` without a reveal.

use cosmwasm_std::{Response, Storage};

use crate::error::ContractError;
use crate::keeper;
use crate::state::PARAMS;

/// Bounded per block to cap gas, the same discipline as the compute
/// module's timeout sweep and the oracle's nonce pruner.
const MAX_COMMITS_SWEPT_PER_BLOCK: u32 = 50;

pub fn begin_block(store: &mut dyn Storage, height: u64) -> Result<Response, ContractError> {
    let params = PARAMS.may_load(store)?.unwrap_or_default();
    if !params.enable_commit_reveal {
        return Ok(Response::new());
    }
    let swept = keeper::sweep_expired_commits(store, height, params.commit_timeout_blocks, MAX_COMMITS_SWEPT_PER_BLOCK)?;
    if swept > 0 {
        tracing::debug!(swept, height, "swept expired swap commitments");
    }
    Ok(Response::new().add_attribute("expired_commits_swept", swept.to_string()))
}
