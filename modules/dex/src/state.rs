use cw_storage_plus::{Item, Map};
use paw_circular_buffer::CircularBuffer;

use crate::types::{CircuitBreakerConfig, DexParams, LiquidityPosition, Pool, PoolId, SwapCommit, Trade};

pub const PARAMS: Item<DexParams> = Item::new("02/params");

pub const POOL_SEQ: Item<PoolId> = Item::new("02/pool_seq");
pub const POOLS: Map<PoolId, Pool> = Map::new("02/pool");
/// Canonical `(token_a, token_b) -> pool_id` lookup, enforcing "fails if
/// pool exists" on `CreatePool` without a linear scan (spec.md §4.1).
pub const POOL_BY_PAIR: Map<(&str, &str), PoolId> = Map::new("02/pool_by_pair");

pub const POSITIONS: Map<(PoolId, &str), LiquidityPosition> = Map::new("02/position");

pub const SWAP_COMMITS: Map<&str, SwapCommit> = Map::new("02/swap_commit");

pub const CIRCUIT_BREAKERS: Map<PoolId, CircuitBreakerConfig> = Map::new("02/circuit_breaker");

/// `(pool, trader) -> lastTimestamp`, MEV guard 5 (spec.md §4.1).
pub const LAST_SWAP_TIMESTAMP: Map<(PoolId, &str), u64> = Map::new("02/last_swap_ts");

/// Bounded recent-trade cache per pool, MEV guard 3 (spec.md §4.1).
pub const TRADE_CACHE: CircularBuffer<Trade> =
    CircularBuffer::new("02/trade_cache_meta", "02/trade_cache_slots");

pub fn pool_scope(pool_id: PoolId) -> [u8; 8] {
    pool_id.to_be_bytes()
}

#[cfg(test)]
mod tests {
    use paw_store::{namespaced, NAMESPACE_DEX};

    /// Every literal `Map`/`Item` prefix above must actually carry the DEX
    /// module's namespace byte, so a copy-pasted prefix from another module
    /// is caught here instead of silently colliding in storage.
    #[test]
    fn storage_prefixes_carry_the_dex_namespace() {
        for (sub_prefix, literal) in [
            ("params", "02/params"),
            ("pool_seq", "02/pool_seq"),
            ("pool", "02/pool"),
            ("pool_by_pair", "02/pool_by_pair"),
            ("position", "02/position"),
            ("swap_commit", "02/swap_commit"),
            ("circuit_breaker", "02/circuit_breaker"),
            ("last_swap_ts", "02/last_swap_ts"),
            ("trade_cache_meta", "02/trade_cache_meta"),
            ("trade_cache_slots", "02/trade_cache_slots"),
        ] {
            assert!(namespaced(NAMESPACE_DEX, sub_prefix).matches(literal));
        }
    }
}
