use cosmwasm_std::Event;

use crate::types::{Pool, PoolId, Trade};

pub fn pool_created(pool: &Pool) -> Event {
    Event::new("pool_created")
        .add_attribute("pool_id", pool.id.to_string())
        .add_attribute("token_a", &pool.token_a)
        .add_attribute("token_b", &pool.token_b)
        .add_attribute("reserve_a", pool.reserve_a.to_string())
        .add_attribute("reserve_b", pool.reserve_b.to_string())
        .add_attribute("total_shares", pool.total_shares.to_string())
}

pub fn liquidity_added(pool_id: PoolId, provider: &str, shares: &str, amount_a: &str, amount_b: &str) -> Event {
    Event::new("liquidity_added")
        .add_attribute("pool_id", pool_id.to_string())
        .add_attribute("provider", provider)
        .add_attribute("shares", shares)
        .add_attribute("amount_a", amount_a)
        .add_attribute("amount_b", amount_b)
}

pub fn liquidity_removed(pool_id: PoolId, owner: &str, shares: &str, amount_a: &str, amount_b: &str) -> Event {
    Event::new("liquidity_removed")
        .add_attribute("pool_id", pool_id.to_string())
        .add_attribute("owner", owner)
        .add_attribute("shares", shares)
        .add_attribute("amount_a", amount_a)
        .add_attribute("amount_b", amount_b)
}

pub fn swap_executed(pool_id: PoolId, trade: &Trade) -> Event {
    Event::new("swap_executed")
        .add_attribute("pool_id", pool_id.to_string())
        .add_attribute("trader", &trade.trader)
        .add_attribute("token_in", &trade.token_in)
        .add_attribute("amount_in", trade.amount_in.to_string())
        .add_attribute("amount_out", trade.amount_out.to_string())
        .add_attribute("height", trade.height.to_string())
}

pub fn front_running_detected(pool_id: PoolId, token_in: &str, height: u64) -> Event {
    Event::new("front_running_detected")
        .add_attribute("pool_id", pool_id.to_string())
        .add_attribute("token_in", token_in)
        .add_attribute("height", height.to_string())
}

pub fn mev_attack_blocked(pool_id: PoolId, trader: &str, reason: &str) -> Event {
    Event::new("mev_attack_blocked")
        .add_attribute("pool_id", pool_id.to_string())
        .add_attribute("trader", trader)
        .add_attribute("reason", reason)
}

pub fn sandwich_pattern(pool_id: PoolId, trader: &str, confidence: &str) -> Event {
    Event::new("sandwich_pattern")
        .add_attribute("pool_id", pool_id.to_string())
        .add_attribute("trader", trader)
        .add_attribute("confidence", confidence)
}

pub fn circuit_breaker_triggered(pool_id: PoolId, reason: &str, paused_until: u64) -> Event {
    Event::new("circuit_breaker_triggered")
        .add_attribute("pool_id", pool_id.to_string())
        .add_attribute("reason", reason)
        .add_attribute("paused_until", paused_until.to_string())
}

pub fn circuit_breaker_reset(pool_id: PoolId) -> Event {
    Event::new("circuit_breaker_reset").add_attribute("pool_id", pool_id.to_string())
}

pub fn commit_swap(pool_id: PoolId, trader: &str, hash: &str) -> Event {
    Event::new("swap_committed")
        .add_attribute("pool_id", pool_id.to_string())
        .add_attribute("trader", trader)
        .add_attribute("hash", hash)
}
