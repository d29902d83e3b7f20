//! Operation implementations, spec.md §4.2. Follows the same shape as
//! `paw_dex::keeper`: plain functions over `&mut dyn Storage` plus the
//! block-level facts (`now`/`height`) a real handler would read off `Env`.

use std::collections::BTreeMap;

use cosmwasm_std::{Response, Storage};
use paw_types::validation::validate_asset_name;
use paw_types::{Amount, Ratio};

use crate::diversity;
use crate::error::ContractError;
use crate::events;
use crate::state::{
    LAST_AGGREGATION_TIME, NONCE_STATES, NONCE_TS_INDEX, PARAMS, PRICE_FEEDS, REGION_INDEX,
    SLASH_RECORDS, VALIDATOR_PRICES, VALIDATOR_REGISTRATIONS,
};
use crate::types::{NonceState, OracleParams, SlashRecord, ValidatorPrice, ValidatorRegistration};

/// The narrow interface this module uses to reach the staking
/// collaborator (spec.md §1: "provided by a standard BFT SDK substrate
/// and treated here as an external collaborator"). `bonded_power` reads
/// the validator's consensus-level bonded stake; `slash` applies the
/// penalty spec.md §4.2 describes as `staking.Slash(consAddr,
/// slashFraction, infractionHeight, power)`.
pub trait StakingKeeper {
    fn bonded_power(&self, validator: &str) -> Result<Amount, ContractError>;
    fn slash(
        &mut self,
        validator: &str,
        slash_fraction: Ratio,
        infraction_height: u64,
        power: Amount,
    ) -> Result<(), ContractError>;
}

fn stakes_by_region(store: &dyn Storage, exclude_validator: Option<&str>) -> Result<BTreeMap<String, Amount>, ContractError> {
    let mut out = BTreeMap::new();
    for item in VALIDATOR_REGISTRATIONS.range(store, None, None, cosmwasm_std::Order::Ascending) {
        let (validator, reg) = item?;
        if !reg.active {
            continue;
        }
        if exclude_validator == Some(validator.as_str()) {
            continue;
        }
        let entry = out.entry(reg.region.clone()).or_insert_with(Amount::zero);
        *entry = entry
            .checked_add(reg.stake)
            .map_err(|_| ContractError::InvariantViolation {
                context: "regional stake sum overflow".to_string(),
            })?;
    }
    Ok(out)
}

/// Runs the simulate-then-admit check of spec.md §4.2.3 shared by
/// registration, first submission, and region updates. Returns `Ok(())`
/// when admitted (possibly after emitting a warning event into
/// `response`), or the appropriate diversity error when rejected.
fn check_diversity_admission(
    store: &dyn Storage,
    params: &OracleParams,
    region: &str,
    stake: Amount,
    exclude_validator: Option<&str>,
) -> Result<Option<cosmwasm_std::Event>, ContractError> {
    let current = stakes_by_region(store, exclude_validator)?;
    let (score, share) = diversity::simulate_addition(&current, region, stake)?;

    let cap_exceeded = share > params.max_regional_concentration;
    let below_warning = score < params.diversity_warning_threshold;

    if !cap_exceeded && !below_warning {
        return Ok(None);
    }

    if params.enforce_runtime_diversity {
        if cap_exceeded {
            return Err(ContractError::RegionalCapExceeded {
                region: region.to_string(),
            });
        }
        return Err(ContractError::GeographicConcentration {
            region: region.to_string(),
        });
    }

    tracing::warn!(region, score = %score, share = %share, "geographic diversity warning (not enforced)");
    Ok(Some(events::geographic_diversity_warning(region, &score.to_string())))
}

pub fn register_oracle(
    store: &mut dyn Storage,
    region: String,
    validator: String,
    stake: Amount,
) -> Result<Response, ContractError> {
    let params = PARAMS.may_load(store)?.unwrap_or_default();
    let warning = check_diversity_admission(store, &params, &region, stake, None)?;

    VALIDATOR_REGISTRATIONS.save(
        store,
        validator.as_str(),
        &ValidatorRegistration {
            validator: validator.clone(),
            region: region.clone(),
            stake,
            active: true,
            has_submitted: false,
        },
    )?;
    REGION_INDEX.save(store, (region.as_str(), validator.as_str()), &())?;

    let mut response = Response::new().add_event(events::validator_registered(&validator, &region));
    if let Some(event) = warning {
        response = response.add_event(event);
    }
    Ok(response)
}

pub fn update_validator_region(
    store: &mut dyn Storage,
    validator: String,
    new_region: String,
) -> Result<Response, ContractError> {
    let params = PARAMS.may_load(store)?.unwrap_or_default();
    let mut reg = VALIDATOR_REGISTRATIONS
        .may_load(store, validator.as_str())?
        .ok_or_else(|| ContractError::ValidatorNotFound(validator.clone()))?;

    let old_region = reg.region.clone();
    let warning = check_diversity_admission(store, &params, &new_region, reg.stake, Some(&validator))?;

    REGION_INDEX.remove(store, (old_region.as_str(), validator.as_str()));
    reg.region = new_region.clone();
    VALIDATOR_REGISTRATIONS.save(store, validator.as_str(), &reg)?;
    REGION_INDEX.save(store, (new_region.as_str(), validator.as_str()), &())?;

    let mut response = Response::new().add_event(events::validator_region_updated(&validator, &new_region));
    if let Some(event) = warning {
        response = response.add_event(event);
    }
    Ok(response)
}

pub fn submit_price(
    store: &mut dyn Storage,
    now: u64,
    height: u64,
    validator: String,
    asset: String,
    price: Ratio,
) -> Result<Response, ContractError> {
    validate_asset_name(&asset)?;
    let mut reg = VALIDATOR_REGISTRATIONS
        .may_load(store, validator.as_str())?
        .ok_or_else(|| ContractError::ValidatorNotFound(validator.clone()))?;
    if !reg.active {
        return Err(ContractError::ValidatorInactive(validator));
    }

    let mut response = Response::new().add_event(events::price_submitted(&asset, &validator, &price.to_string()));

    if !reg.has_submitted {
        let params = PARAMS.may_load(store)?.unwrap_or_default();
        if let Some(event) = check_diversity_admission(store, &params, &reg.region, reg.stake, None)? {
            response = response.add_event(event);
        }
        reg.has_submitted = true;
        VALIDATOR_REGISTRATIONS.save(store, validator.as_str(), &reg)?;
    }

    VALIDATOR_PRICES.save(
        store,
        (asset.as_str(), validator.as_str()),
        &ValidatorPrice {
            asset,
            validator,
            price,
            timestamp: now,
            height,
        },
    )?;

    Ok(response)
}

/// Distinct assets with at least one stored submission, derived (not
/// persisted) by scanning `VALIDATOR_PRICES`'s key range.
fn known_assets(store: &dyn Storage) -> Result<Vec<String>, ContractError> {
    let mut assets = Vec::new();
    let mut last: Option<String> = None;
    for item in VALIDATOR_PRICES.keys(store, None, None, cosmwasm_std::Order::Ascending) {
        let (asset, _validator) = item?;
        if last.as_deref() != Some(asset.as_str()) {
            assets.push(asset.clone());
            last = Some(asset);
        }
    }
    Ok(assets)
}

/// End-block aggregation pass, spec.md §4.2: for every asset with enough
/// fresh submissions, aggregate, persist the new `PriceFeed`, and slash
/// every submitter who deviated too far from the result.
pub fn run_aggregation(
    store: &mut dyn Storage,
    staking: &mut dyn StakingKeeper,
    now: u64,
    height: u64,
) -> Result<Response, ContractError> {
    let params = PARAMS.may_load(store)?.unwrap_or_default();
    let mut response = Response::new();

    for asset in known_assets(store)? {
        let mut submissions = Vec::new();
        for item in VALIDATOR_PRICES.prefix(asset.as_str()).range(store, None, None, cosmwasm_std::Order::Ascending) {
            let (validator, vp) = item?;
            if now.saturating_sub(vp.timestamp) > params.expiry_duration_seconds {
                continue;
            }
            let reg = match VALIDATOR_REGISTRATIONS.may_load(store, validator.as_str())? {
                Some(r) if r.active => r,
                _ => continue,
            };
            submissions.push((vp, reg.stake));
        }

        if (submissions.len() as u64) < params.min_validators {
            tracing::debug!(asset, fresh = submissions.len(), "not enough fresh submissions to aggregate");
            continue;
        }

        let inputs: Vec<crate::aggregation::Submission> = submissions
            .iter()
            .map(|(vp, stake)| crate::aggregation::Submission {
                validator: vp.validator.clone(),
                price: vp.price,
                weight: *stake,
            })
            .collect();
        let outcome = crate::aggregation::aggregate(&inputs, params.outlier_threshold_k)?;

        PRICE_FEEDS.save(
            store,
            asset.as_str(),
            &crate::types::PriceFeed {
                asset: asset.clone(),
                aggregated_price: outcome.aggregated_price,
                timestamp: now,
                source_count: outcome.accepted.len() as u64,
            },
        )?;
        response = response.add_event(events::price_aggregated(
            &asset,
            &outcome.aggregated_price.to_string(),
            outcome.accepted.len() as u64,
        ));

        for (vp, _stake) in &submissions {
            if !crate::slashing::deviates(params.deviation_threshold, vp.price, outcome.aggregated_price) {
                continue;
            }
            if SLASH_RECORDS.has(store, (asset.as_str(), height, vp.validator.as_str())) {
                continue;
            }
            let power = staking.bonded_power(&vp.validator)?;
            let amount = crate::slashing::slash_amount(power, params.slash_fraction)?;
            staking.slash(&vp.validator, params.slash_fraction, height, power)?;
            SLASH_RECORDS.save(
                store,
                (asset.as_str(), height, vp.validator.as_str()),
                &SlashRecord {
                    asset: asset.clone(),
                    validator: vp.validator.clone(),
                    round_timestamp: now,
                    slash_amount: amount,
                    height,
                },
            )?;
            response = response.add_event(events::validator_slashed(&vp.validator, &asset, &amount.to_string()));
        }
    }

    LAST_AGGREGATION_TIME.save(store, &now)?;
    Ok(response)
}

/// Nonce lifecycle writes, spec.md §4.2. Both the send and recv sides
/// call through here so the timestamp index always mirrors whichever
/// nonce was actually touched.
pub fn touch_nonce_send(store: &mut dyn Storage, now: u64, channel: String, counterparty: String) -> Result<Response, ContractError> {
    touch_nonce(store, now, channel, counterparty, true)
}

pub fn touch_nonce_recv(store: &mut dyn Storage, now: u64, channel: String, counterparty: String) -> Result<Response, ContractError> {
    touch_nonce(store, now, channel, counterparty, false)
}

fn touch_nonce(store: &mut dyn Storage, now: u64, channel: String, counterparty: String, is_send: bool) -> Result<Response, ContractError> {
    let key = (channel.as_str(), counterparty.as_str());
    let existing = NONCE_STATES.may_load(store, key)?;
    let mut state = existing.clone().unwrap_or(NonceState {
        channel: channel.clone(),
        counterparty: counterparty.clone(),
        send_nonce: 0,
        recv_nonce: 0,
        timestamp: now,
    });
    if let Some(old) = existing {
        NONCE_TS_INDEX.remove(store, (old.timestamp, channel.as_str(), counterparty.as_str()));
    }
    if is_send {
        state.send_nonce += 1;
    } else {
        state.recv_nonce += 1;
    }
    state.timestamp = now;
    NONCE_STATES.save(store, key, &state)?;
    NONCE_TS_INDEX.save(store, (now, channel.as_str(), counterparty.as_str()), &())?;
    Ok(Response::new())
}

/// End-block nonce pruning, spec.md §4.2/§8 invariant 8: deletes the
/// send-nonce, recv-nonce, and timestamp index entries atomically (all
/// three, or none) for every pair whose age exceeds the TTL. Bounded to
/// `max_prune` per block; failures are logged, never fatal.
pub fn prune_expired_nonces(store: &mut dyn Storage, now: u64, ttl_seconds: u64, max_prune: u32) -> u32 {
    let candidates: Vec<(u64, String, String)> = NONCE_TS_INDEX
        .keys(store, None, None, cosmwasm_std::Order::Ascending)
        .filter_map(|r| r.ok())
        .take_while(|(ts, _, _)| crate::nonce::is_prunable(now, *ts, ttl_seconds))
        .take(max_prune as usize)
        .collect();

    let mut pruned = 0;
    for (ts, channel, counterparty) in candidates {
        NONCE_STATES.remove(store, (channel.as_str(), counterparty.as_str()));
        NONCE_TS_INDEX.remove(store, (ts, channel.as_str(), counterparty.as_str()));
        pruned += 1;
    }
    pruned
}
