//! End-block hook. The DEX has no authoritative end-block work of its
//! own (unlike the oracle's aggregation pass or the compute module's
//! cache refresh) — kept as an explicit no-op so the three modules
//! present a uniform per-block interface to the app crate.

use cosmwasm_std::{Response, Storage};

use crate::error::ContractError;

pub fn end_block(_store: &mut dyn Storage, _height: u64) -> Result<Response, ContractError> {
    Ok(Response::new())
}
