//! Begin-block hook, spec.md §4.2.3: every `diversity_check_interval_blocks`,
//! emit diversity metrics and warnings for every region, independent of
//! any particular registration or submission.

use std::collections::BTreeMap;

use cosmwasm_std::{Response, Storage};

use crate::diversity;
use crate::error::ContractError;
use crate::events;
use crate::state::{PARAMS, VALIDATOR_REGISTRATIONS};

pub fn begin_block(store: &mut dyn Storage, height: u64) -> Result<Response, ContractError> {
    let params = PARAMS.may_load(store)?.unwrap_or_default();
    if params.diversity_check_interval_blocks == 0 || height % params.diversity_check_interval_blocks != 0 {
        return Ok(Response::new());
    }

    let mut stakes_by_region: BTreeMap<String, paw_types::Amount> = BTreeMap::new();
    for item in VALIDATOR_REGISTRATIONS.range(store, None, None, cosmwasm_std::Order::Ascending) {
        let (_, reg) = item?;
        if !reg.active {
            continue;
        }
        let entry = stakes_by_region.entry(reg.region).or_insert_with(paw_types::Amount::zero);
        *entry = entry
            .checked_add(reg.stake)
            .map_err(|_| ContractError::InvariantViolation {
                context: "regional stake sum overflow in periodic diversity check".to_string(),
            })?;
    }

    let mut response = Response::new();
    for region in stakes_by_region.keys() {
        let share = diversity::regional_share(&stakes_by_region, region)?;
        if share > params.max_regional_concentration {
            tracing::warn!(region, share = %share, "region exceeds max regional concentration");
            response = response.add_event(events::geographic_diversity_warning(region, &share.to_string()));
        }
    }
    let score = diversity::diversity_score(&stakes_by_region)?;
    if score < params.diversity_warning_threshold {
        tracing::warn!(score = %score, height, "overall geographic diversity score below warning threshold");
        response = response.add_event(events::geographic_diversity_warning("__overall__", &score.to_string()));
    }

    Ok(response)
}
