use cosmwasm_schema::cw_serde;
use paw_types::{Amount, Ratio};

/// The aggregated view for an asset, spec.md §3.
#[cw_serde]
pub struct PriceFeed {
    pub asset: String,
    pub aggregated_price: Ratio,
    pub timestamp: u64,
    pub source_count: u64,
}

/// A single validator's raw submission for an asset, spec.md §3.
#[cw_serde]
pub struct ValidatorPrice {
    pub asset: String,
    pub validator: String,
    pub price: Ratio,
    pub timestamp: u64,
    pub height: u64,
}

#[cw_serde]
pub struct ValidatorRegistration {
    pub validator: String,
    pub region: String,
    pub stake: Amount,
    pub active: bool,
    /// Tracks whether this validator has ever submitted a price, so
    /// `SubmitPrice` can recognize "first submission from a new
    /// validator" in O(1) rather than scanning every asset (spec.md
    /// §4.2: that event triggers a runtime diversity check).
    pub has_submitted: bool,
}

#[cw_serde]
pub struct NonceState {
    pub channel: String,
    pub counterparty: String,
    pub send_nonce: u64,
    pub recv_nonce: u64,
    pub timestamp: u64,
}

#[cw_serde]
pub struct SlashRecord {
    pub asset: String,
    pub validator: String,
    pub round_timestamp: u64,
    pub slash_amount: Amount,
    pub height: u64,
}

/// Governance-adjustable oracle parameters, spec.md §6.
#[cw_serde]
pub struct OracleParams {
    pub min_validators: u64,
    pub update_interval_seconds: u64,
    pub expiry_duration_seconds: u64,
    /// The `k` in the k-sigma leave-one-out outlier test (spec.md §9 open
    /// question, resolved in favor of k-sigma; see `aggregation.rs`).
    pub outlier_threshold_k: Ratio,
    pub deviation_threshold: Ratio,
    pub slash_fraction: Ratio,
    pub nonce_ttl_seconds: u64,
    pub diversity_check_interval_blocks: u64,
    pub diversity_warning_threshold: Ratio,
    pub max_regional_concentration: Ratio,
    pub enforce_runtime_diversity: bool,
}

impl Default for OracleParams {
    fn default() -> Self {
        Self {
            min_validators: 4,
            update_interval_seconds: 0,
            expiry_duration_seconds: 300,
            outlier_threshold_k: Ratio::from_ratio(2u64, 1u64),
            deviation_threshold: Ratio::percent(5),
            slash_fraction: Ratio::percent(1),
            nonce_ttl_seconds: 604_800,
            diversity_check_interval_blocks: 100,
            diversity_warning_threshold: Ratio::percent(40),
            max_regional_concentration: Ratio::percent(40),
            enforce_runtime_diversity: true,
        }
    }
}
