use cosmwasm_schema::cw_serde;
use paw_types::{Amount, Ratio};

pub type PoolId = u64;

/// A canonicalized (sorted) trading pair pool, per spec.md §3.
#[cw_serde]
pub struct Pool {
    pub id: PoolId,
    pub token_a: String,
    pub token_b: String,
    pub reserve_a: Amount,
    pub reserve_b: Amount,
    pub total_shares: Amount,
    pub fee_numerator: Amount,
    pub fee_denominator: Amount,
    pub paused: bool,
    pub created_at: u64,
    /// `k` immediately after the last structural change (mint/burn),
    /// the floor the constant-product invariant is checked against
    /// (spec.md §3/§9).
    pub k_floor: Amount,
}

impl Pool {
    pub fn canonical_pair(token_a: &str, token_b: &str) -> (String, String) {
        if token_a <= token_b {
            (token_a.to_string(), token_b.to_string())
        } else {
            (token_b.to_string(), token_a.to_string())
        }
    }

    /// Reserve/amount pair in the order the caller asked for `(in, out)`,
    /// given a token identity that must be one side of the pool.
    pub fn reserves_for(&self, token_in: &str) -> Option<(Amount, Amount, bool)> {
        if token_in == self.token_a {
            Some((self.reserve_a, self.reserve_b, true))
        } else if token_in == self.token_b {
            Some((self.reserve_b, self.reserve_a, false))
        } else {
            None
        }
    }
}

#[cw_serde]
pub struct LiquidityPosition {
    pub pool_id: PoolId,
    pub owner: String,
    pub shares: Amount,
}

#[cw_serde]
pub struct SwapCommit {
    pub hash: String,
    pub trader: String,
    pub commit_height: u64,
}

#[cw_serde]
#[derive(Copy, Default)]
pub enum CircuitBreakerState {
    #[default]
    Normal,
    Paused,
}

#[cw_serde]
pub struct CircuitBreakerConfig {
    pub pool_id: PoolId,
    pub max_price_deviation: Ratio,
    pub volume_window_seconds: u64,
    pub max_volume_per_window: Amount,
    pub state: CircuitBreakerState,
    /// Single authoritative unpause time so the time-based and explicit
    /// unpause paths can never race (spec.md §9 open question).
    pub paused_until: u64,
    pub triggered_by: Option<String>,
    pub trigger_reason: Option<String>,
    /// Rolling-window accounting the trigger conditions need but the
    /// persisted entity of spec.md §3 doesn't name explicitly: the swap
    /// price observed at the start of the current deviation window, and
    /// the volume accumulated since `window_started_at`.
    pub reference_price: Ratio,
    pub window_started_at: u64,
    pub window_volume: Amount,
}

impl CircuitBreakerConfig {
    pub fn for_pool(pool_id: PoolId, max_price_deviation: Ratio, max_volume_per_window: Amount) -> Self {
        Self {
            pool_id,
            max_price_deviation,
            volume_window_seconds: 3600,
            max_volume_per_window,
            state: CircuitBreakerState::Normal,
            paused_until: 0,
            triggered_by: None,
            trigger_reason: None,
            reference_price: Ratio::zero(),
            window_started_at: 0,
            window_volume: Amount::zero(),
        }
    }

    pub fn is_paused(&self, now: u64) -> bool {
        match self.state {
            CircuitBreakerState::Normal => false,
            CircuitBreakerState::Paused => now < self.paused_until,
        }
    }
}

/// A single past swap, retained in the per-pool recent-trade ring for MEV
/// detection (spec.md §4.1 MEV guard 3).
#[cw_serde]
pub struct Trade {
    pub trader: String,
    pub amount_in: Amount,
    pub amount_out: Amount,
    pub token_in: String,
    pub timestamp: u64,
    pub height: u64,
}

/// Governance-adjustable DEX parameters, spec.md §6.
#[cw_serde]
pub struct DexParams {
    pub swap_fee_numerator: Amount,
    pub swap_fee_denominator: Amount,
    pub max_price_impact: Ratio,
    pub sandwich_detection_window_seconds: u64,
    pub sandwich_min_ratio: Ratio,
    pub max_reordering_window_seconds: u64,
    pub enable_commit_reveal: bool,
    pub commit_reveal_delay_blocks: u64,
    pub commit_timeout_blocks: u64,
    /// A client-facing default, not an on-chain enforced ceiling: actual
    /// slippage protection is the caller-supplied `min_amount_out` checked
    /// in `keeper::swap` (`ContractError::SlippageTooHigh`). This value
    /// exists so wallets/front-ends have a governance-sourced default to
    /// prefill rather than hand-rolling their own.
    pub recommended_max_slippage: Ratio,
    pub upgrade_preserve_circuit_breaker_state: bool,
    pub sandwich_confidence_threshold: Ratio,
    pub trade_cache_capacity: u64,
    pub trade_cache_ttl_blocks: u64,
}

impl Default for DexParams {
    fn default() -> Self {
        Self {
            swap_fee_numerator: Amount::from(3u64),
            swap_fee_denominator: Amount::from(1000u64),
            max_price_impact: Ratio::percent(5),
            sandwich_detection_window_seconds: 60,
            sandwich_min_ratio: Ratio::from_ratio(2u64, 1u64),
            max_reordering_window_seconds: 30,
            enable_commit_reveal: false,
            commit_reveal_delay_blocks: 1,
            commit_timeout_blocks: 50,
            recommended_max_slippage: Ratio::percent(1),
            upgrade_preserve_circuit_breaker_state: true,
            sandwich_confidence_threshold: Ratio::permille(700),
            trade_cache_capacity: 100,
            trade_cache_ttl_blocks: 1000,
        }
    }
}
