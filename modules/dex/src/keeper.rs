//! Operation implementations, spec.md §4.1. Each function takes a
//! `&mut dyn Storage` already scoped to the chain's shared state store,
//! the block-level facts a real handler would read off `Env`
//! (`now`/`height`), and the message payload; it returns the `Response`
//! the substrate attaches to the transaction result, the same contract
//! shape the teacher's `contract.rs` handlers return.

use cosmwasm_std::{Response, Storage};
use paw_types::validation::validate_denom;
use paw_types::{safe_math, Amount, Ratio};

use crate::circuit_breaker;
use crate::error::ContractError;
use crate::events;
use crate::mev;
use crate::state::{
    pool_scope, CIRCUIT_BREAKERS, LAST_SWAP_TIMESTAMP, POOLS, POOL_BY_PAIR, POOL_SEQ, POSITIONS,
    SWAP_COMMITS, TRADE_CACHE,
};
use crate::types::{CircuitBreakerConfig, DexParams, LiquidityPosition, Pool, PoolId, SwapCommit, Trade};

fn require_denoms(token_a: &str, token_b: &str) -> Result<(), ContractError> {
    validate_denom(token_a)?;
    validate_denom(token_b)?;
    if token_a == token_b {
        return Err(ContractError::InvalidAmount {});
    }
    Ok(())
}

pub fn create_pool(
    store: &mut dyn Storage,
    now: u64,
    creator: String,
    token_a: String,
    amount_a: Amount,
    token_b: String,
    amount_b: Amount,
) -> Result<Response, ContractError> {
    require_denoms(&token_a, &token_b)?;
    if amount_a.is_zero() || amount_b.is_zero() {
        return Err(ContractError::InvalidAmount {});
    }

    let (canon_a, canon_b) = Pool::canonical_pair(&token_a, &token_b);
    if POOL_BY_PAIR.has(store, (canon_a.as_str(), canon_b.as_str())) {
        return Err(ContractError::PoolAlreadyExists {});
    }
    let (reserve_a, reserve_b) = if canon_a == token_a {
        (amount_a, amount_b)
    } else {
        (amount_b, amount_a)
    };

    let total_shares = safe_math::safe_calculate_pool_shares(reserve_a, reserve_b)?;
    if total_shares.is_zero() {
        return Err(ContractError::InsufficientLiquidity {});
    }

    let params = crate::state::PARAMS.may_load(store)?.unwrap_or_default();
    let id = POOL_SEQ.may_load(store)?.unwrap_or(0) + 1;
    POOL_SEQ.save(store, &id)?;

    let k_floor = reserve_a.checked_mul(reserve_b).unwrap_or(Amount::MAX);
    let pool = Pool {
        id,
        token_a: canon_a.clone(),
        token_b: canon_b.clone(),
        reserve_a,
        reserve_b,
        total_shares,
        fee_numerator: params.swap_fee_numerator,
        fee_denominator: params.swap_fee_denominator,
        paused: false,
        created_at: now,
        k_floor,
    };
    POOLS.save(store, id, &pool)?;
    POOL_BY_PAIR.save(store, (canon_a.as_str(), canon_b.as_str()), &id)?;
    POSITIONS.save(
        store,
        (id, creator.as_str()),
        &LiquidityPosition {
            pool_id: id,
            owner: creator,
            shares: total_shares,
        },
    )?;
    CIRCUIT_BREAKERS.save(
        store,
        id,
        &CircuitBreakerConfig::for_pool(id, params.max_price_impact, Amount::MAX),
    )?;
    TRADE_CACHE.init(store, pool_scope(id).as_slice(), params.trade_cache_capacity)?;

    Ok(Response::new().add_event(events::pool_created(&pool)))
}

fn load_pool(store: &dyn Storage, pool_id: PoolId) -> Result<Pool, ContractError> {
    POOLS
        .may_load(store, pool_id)?
        .ok_or(ContractError::PoolNotFound(pool_id))
}

fn require_unpaused(store: &dyn Storage, pool: &Pool, now: u64) -> Result<(), ContractError> {
    if pool.paused {
        return Err(ContractError::ModulePaused {});
    }
    if let Some(cb) = CIRCUIT_BREAKERS.may_load(store, pool.id)? {
        if cb.is_paused(now) {
            return Err(ContractError::ModulePaused {});
        }
    }
    Ok(())
}

pub fn add_liquidity(
    store: &mut dyn Storage,
    now: u64,
    pool_id: PoolId,
    provider: String,
    amount_a: Amount,
    amount_b: Amount,
) -> Result<Response, ContractError> {
    let mut pool = load_pool(store, pool_id)?;
    require_unpaused(store, &pool, now)?;

    let shares = safe_math::safe_calculate_add_liquidity_shares(
        amount_a,
        amount_b,
        pool.reserve_a,
        pool.reserve_b,
        pool.total_shares,
    )?;
    if shares.is_zero() {
        return Err(ContractError::InsufficientLiquidity {});
    }

    pool.reserve_a = safe_math::safe_update_reserve(pool.reserve_a, amount_a, true)?;
    pool.reserve_b = safe_math::safe_update_reserve(pool.reserve_b, amount_b, true)?;
    pool.total_shares = pool
        .total_shares
        .checked_add(shares)
        .map_err(|_| ContractError::InvariantViolation {
            context: "total_shares overflow on AddLiquidity".to_string(),
        })?;
    pool.k_floor = safe_math::safe_validate_constant_product(pool.reserve_a, pool.reserve_b, pool.k_floor)?;
    POOLS.save(store, pool_id, &pool)?;

    let mut position = POSITIONS
        .may_load(store, (pool_id, provider.as_str()))?
        .unwrap_or(LiquidityPosition {
            pool_id,
            owner: provider.clone(),
            shares: Amount::zero(),
        });
    position.shares = position
        .shares
        .checked_add(shares)
        .map_err(|_| ContractError::InvariantViolation {
            context: "position shares overflow".to_string(),
        })?;
    POSITIONS.save(store, (pool_id, provider.as_str()), &position)?;

    Ok(Response::new().add_event(events::liquidity_added(
        pool_id,
        &provider,
        &shares.to_string(),
        &amount_a.to_string(),
        &amount_b.to_string(),
    )))
}

pub fn remove_liquidity(
    store: &mut dyn Storage,
    now: u64,
    pool_id: PoolId,
    owner: String,
    shares: Amount,
) -> Result<Response, ContractError> {
    let mut pool = load_pool(store, pool_id)?;
    if pool.paused {
        return Err(ContractError::ModulePaused {});
    }
    // Remove-liquidity stays open even under circuit-breaker pause so LPs
    // can exit, per spec.md §4.1: only an explicit module pause blocks it.
    let _ = now;

    let mut position = POSITIONS
        .may_load(store, (pool_id, owner.as_str()))?
        .ok_or(ContractError::InsufficientLiquidity {})?;
    if shares > position.shares {
        return Err(ContractError::InsufficientLiquidity {});
    }

    let (amount_a, amount_b) =
        safe_math::safe_calculate_remove_liquidity_amounts(shares, pool.total_shares, pool.reserve_a, pool.reserve_b)?;

    pool.reserve_a = safe_math::safe_update_reserve(pool.reserve_a, amount_a, false)?;
    pool.reserve_b = safe_math::safe_update_reserve(pool.reserve_b, amount_b, false)?;
    pool.total_shares = pool
        .total_shares
        .checked_sub(shares)
        .map_err(|_| ContractError::InvariantViolation {
            context: "total_shares underflow on RemoveLiquidity".to_string(),
        })?;
    POOLS.save(store, pool_id, &pool)?;

    position.shares = position.shares.checked_sub(shares).map_err(|_| ContractError::InvariantViolation {
        context: "position shares underflow".to_string(),
    })?;
    if position.shares.is_zero() {
        POSITIONS.remove(store, (pool_id, owner.as_str()));
    } else {
        POSITIONS.save(store, (pool_id, owner.as_str()), &position)?;
    }

    Ok(Response::new().add_event(events::liquidity_removed(
        pool_id,
        &owner,
        &shares.to_string(),
        &amount_a.to_string(),
        &amount_b.to_string(),
    )))
}

#[allow(clippy::too_many_arguments)]
pub fn swap(
    store: &mut dyn Storage,
    params: &DexParams,
    now: u64,
    height: u64,
    pool_id: PoolId,
    trader: String,
    token_in: String,
    amount_in: Amount,
    token_out: String,
    min_out: Amount,
    deadline: u64,
) -> Result<Response, ContractError> {
    if deadline == 0 {
        return Err(ContractError::DeadlineMissing {});
    }
    if now > deadline {
        return Err(ContractError::DeadlineExceeded {});
    }

    let mut pool = load_pool(store, pool_id)?;
    require_unpaused(store, &pool, now)?;

    let (reserve_in, reserve_out, in_is_a) = pool
        .reserves_for(&token_in)
        .ok_or(ContractError::InvalidAmount {})?;
    if token_out != if in_is_a { pool.token_b.clone() } else { pool.token_a.clone() } {
        return Err(ContractError::InvalidAmount {});
    }

    let last_ts = LAST_SWAP_TIMESTAMP.may_load(store, (pool_id, trader.as_str()))?;
    if !mev::check_timestamp_ordering(last_ts, now, params.max_reordering_window_seconds) {
        return Err(ContractError::NonceOutOfOrder {});
    }

    // Cache entries older than the TTL are dropped before either MEV
    // check runs: a ring slot is only overwritten once the buffer fills,
    // so a quiet pool could otherwise keep stale trades eligible for
    // pattern-matching well past spec.md §4.1's "TTL <=1000 blocks".
    let recent_trades: Vec<Trade> = TRADE_CACHE
        .entries(store, pool_scope(pool_id).as_slice())?
        .into_iter()
        .filter(|t| height.saturating_sub(t.height) <= params.trade_cache_ttl_blocks)
        .collect();
    if let Some(confidence) = mev::detect_sandwich(
        &recent_trades,
        &trader,
        &token_in,
        amount_in,
        now,
        params.sandwich_detection_window_seconds,
        params.sandwich_min_ratio,
    ) {
        if confidence >= params.sandwich_confidence_threshold {
            return Err(ContractError::SandwichAttackDetected {});
        }
    }
    // Guard 4 is monitoring-only: it is recorded as an event but never
    // blocks the swap.
    let front_running_event = mev::detect_front_running(&recent_trades, &token_in, amount_in, height, params.sandwich_min_ratio)
        .then(|| events::front_running_detected(pool_id, &token_in, height));

    let k_before = pool
        .reserve_a
        .checked_mul(pool.reserve_b)
        .map_err(paw_errors::CommonError::from)?;

    let amount_out = safe_math::safe_calculate_swap_output(
        reserve_in,
        reserve_out,
        amount_in,
        pool.fee_numerator,
        pool.fee_denominator,
    )?;
    if amount_out < min_out {
        return Err(ContractError::SlippageTooHigh {});
    }
    if amount_out >= reserve_out {
        return Err(ContractError::InsufficientLiquidity {});
    }

    let price_impact = Ratio::from_ratio(amount_in, reserve_in.checked_add(amount_in).unwrap_or(Amount::MAX));
    if price_impact > params.max_price_impact {
        return Err(ContractError::PriceImpactExceeded {});
    }

    let (new_in, new_out) = (
        safe_math::safe_update_reserve(reserve_in, amount_in, true)?,
        safe_math::safe_update_reserve(reserve_out, amount_out, false)?,
    );
    if in_is_a {
        pool.reserve_a = new_in;
        pool.reserve_b = new_out;
    } else {
        pool.reserve_b = new_in;
        pool.reserve_a = new_out;
    }
    pool.k_floor = safe_math::safe_validate_constant_product(pool.reserve_a, pool.reserve_b, k_before)?;
    POOLS.save(store, pool_id, &pool)?;

    LAST_SWAP_TIMESTAMP.save(store, (pool_id, trader.as_str()), &now)?;
    let trade = Trade {
        trader: trader.clone(),
        amount_in,
        amount_out,
        token_in: token_in.clone(),
        timestamp: now,
        height,
    };
    TRADE_CACHE.push(store, pool_scope(pool_id).as_slice(), trade.clone())?;

    let mut response = Response::new().add_event(events::swap_executed(pool_id, &trade));
    if let Some(event) = front_running_event {
        response = response.add_event(event);
    }

    let new_price = Ratio::from_ratio(pool.reserve_b, pool.reserve_a.max(Amount::from(1u64)));
    if let Some(mut cb) = CIRCUIT_BREAKERS.may_load(store, pool_id)? {
        let deviated = circuit_breaker::price_deviation_exceeded(&cb, new_price);
        circuit_breaker::record_volume(&mut cb, now, amount_in);
        let volume_exceeded = circuit_breaker::volume_exceeded(&cb);
        if cb.reference_price.is_zero() {
            cb.reference_price = new_price;
        }
        if (deviated || volume_exceeded) && !cb.is_paused(now) {
            let reason = if deviated { "price deviation" } else { "volume" };
            circuit_breaker::trigger(&mut cb, now, cb.volume_window_seconds, reason, None);
            response = response.add_event(events::circuit_breaker_triggered(pool_id, reason, cb.paused_until));
        }
        CIRCUIT_BREAKERS.save(store, pool_id, &cb)?;
    }

    Ok(response)
}

fn commit_hash(pool_id: PoolId, trader: &str, token_in: &str, amount_in: Amount, token_out: &str, min_out: Amount, deadline: u64, nonce: &str) -> String {
    use sha2::{Digest, Sha256};
    let mut hasher = Sha256::new();
    hasher.update(trader.as_bytes());
    hasher.update(pool_id.to_be_bytes());
    hasher.update(token_in.as_bytes());
    hasher.update(amount_in.to_string().as_bytes());
    hasher.update(token_out.as_bytes());
    hasher.update(min_out.to_string().as_bytes());
    hasher.update(deadline.to_be_bytes());
    hasher.update(nonce.as_bytes());
    hex::encode(hasher.finalize())
}

pub fn commit_swap(
    store: &mut dyn Storage,
    params: &DexParams,
    height: u64,
    pool_id: PoolId,
    trader: String,
    hash: String,
) -> Result<Response, ContractError> {
    if !params.enable_commit_reveal {
        return Err(ContractError::CommitRevealDisabled {});
    }
    SWAP_COMMITS.save(
        store,
        hash.as_str(),
        &SwapCommit {
            hash: hash.clone(),
            trader: trader.clone(),
            commit_height: height,
        },
    )?;
    Ok(Response::new().add_event(events::commit_swap(pool_id, &trader, &hash)))
}

#[allow(clippy::too_many_arguments)]
pub fn reveal_swap(
    store: &mut dyn Storage,
    params: &DexParams,
    now: u64,
    height: u64,
    pool_id: PoolId,
    trader: String,
    token_in: String,
    amount_in: Amount,
    token_out: String,
    min_out: Amount,
    deadline: u64,
    nonce: String,
) -> Result<Response, ContractError> {
    if !params.enable_commit_reveal {
        return Err(ContractError::CommitRevealDisabled {});
    }
    let hash = commit_hash(pool_id, &trader, &token_in, amount_in, &token_out, min_out, deadline, &nonce);
    let commit = SWAP_COMMITS
        .may_load(store, hash.as_str())?
        .ok_or(ContractError::InvalidCommitHash {})?;
    if commit.trader != trader {
        return Err(ContractError::InvalidCommitHash {});
    }

    let elapsed = height.saturating_sub(commit.commit_height);
    if elapsed < params.commit_reveal_delay_blocks {
        return Err(ContractError::RevealTooEarly {});
    }
    if elapsed >= params.commit_timeout_blocks {
        return Err(ContractError::CommitmentExpired {});
    }

    SWAP_COMMITS.remove(store, hash.as_str());
    swap(store, params, now, height, pool_id, trader, token_in, amount_in, token_out, min_out, deadline)
}

pub fn pause_module(store: &mut dyn Storage, now: u64, pool_id: PoolId, authority: String, reason: String) -> Result<Response, ContractError> {
    let mut cb = CIRCUIT_BREAKERS
        .may_load(store, pool_id)?
        .unwrap_or(CircuitBreakerConfig::for_pool(pool_id, Ratio::percent(5), Amount::MAX));
    circuit_breaker::trigger(&mut cb, now, cb.volume_window_seconds, &reason, Some(authority));
    CIRCUIT_BREAKERS.save(store, pool_id, &cb)?;
    Ok(Response::new().add_event(events::circuit_breaker_triggered(pool_id, &reason, cb.paused_until)))
}

pub fn unpause_module(store: &mut dyn Storage, now: u64, pool_id: PoolId, _authority: String) -> Result<Response, ContractError> {
    let mut cb = CIRCUIT_BREAKERS
        .may_load(store, pool_id)?
        .ok_or(ContractError::PoolNotFound(pool_id))?;
    circuit_breaker::reset(&mut cb, now);
    CIRCUIT_BREAKERS.save(store, pool_id, &cb)?;
    Ok(Response::new().add_event(events::circuit_breaker_reset(pool_id)))
}

/// Commit-reveal expiry sweep, begin-block (spec.md §4.1 guard 6). Bounded
/// per call to cap gas; returns the number of commitments removed.
pub fn sweep_expired_commits(store: &mut dyn Storage, height: u64, commit_timeout_blocks: u64, max_sweep: u32) -> Result<u32, ContractError> {
    let expired: Vec<String> = SWAP_COMMITS
        .range(store, None, None, cosmwasm_std::Order::Ascending)
        .filter_map(|item| item.ok())
        .filter(|(_, commit)| height.saturating_sub(commit.commit_height) >= commit_timeout_blocks)
        .take(max_sweep as usize)
        .map(|(hash, _)| hash)
        .collect();
    let count = expired.len() as u32;
    for hash in expired {
        SWAP_COMMITS.remove(store, hash.as_str());
    }
    Ok(count)
}
