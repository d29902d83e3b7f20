use cw_storage_plus::{Item, Map};

use crate::types::{NonceState, OracleParams, PriceFeed, SlashRecord, ValidatorPrice, ValidatorRegistration};

pub const PARAMS: Item<OracleParams> = Item::new("03/params");

pub const PRICE_FEEDS: Map<&str, PriceFeed> = Map::new("03/price_feed");

/// Ordered by `(asset, validator)`, spec.md §3.
pub const VALIDATOR_PRICES: Map<(&str, &str), ValidatorPrice> = Map::new("03/validator_price");

pub const VALIDATOR_REGISTRATIONS: Map<&str, ValidatorRegistration> = Map::new("03/validator");
/// Regional secondary index `(region, validator) -> ()`, rebuildable from
/// `VALIDATOR_REGISTRATIONS` (spec.md §9 "derived indexes vs authoritative
/// state"); kept persisted rather than derived on every read since
/// diversity scoring runs every block.
pub const REGION_INDEX: Map<(&str, &str), ()> = Map::new("03/region_index");

pub const NONCE_STATES: Map<(&str, &str), NonceState> = Map::new("03/nonce");
/// Secondary index `(timestamp, channel, counterparty) -> ()` so the
/// end-block pruner can scan oldest-first without iterating every nonce
/// (spec.md §4.2 "parallel timestampIndex for pruning").
pub const NONCE_TS_INDEX: Map<(u64, &str, &str), ()> = Map::new("03/nonce_ts_index");

pub const SLASH_RECORDS: Map<(&str, u64, &str), SlashRecord> = Map::new("03/slash_record");

/// Last height aggregation actually ran, so `update_interval_seconds`
/// (measured against block time passed in by the caller) can gate how
/// often end-block re-aggregates rather than doing it unconditionally
/// every block.
pub const LAST_AGGREGATION_TIME: Item<u64> = Item::new("03/last_aggregation_time");

#[cfg(test)]
mod tests {
    use paw_store::{namespaced, NAMESPACE_ORACLE};

    /// Every literal `Map`/`Item` prefix above must actually carry the
    /// oracle module's namespace byte, so a copy-pasted prefix from another
    /// module is caught here instead of silently colliding in storage.
    #[test]
    fn storage_prefixes_carry_the_oracle_namespace() {
        for (sub_prefix, literal) in [
            ("params", "03/params"),
            ("price_feed", "03/price_feed"),
            ("validator_price", "03/validator_price"),
            ("validator", "03/validator"),
            ("region_index", "03/region_index"),
            ("nonce", "03/nonce"),
            ("nonce_ts_index", "03/nonce_ts_index"),
            ("slash_record", "03/slash_record"),
            ("last_aggregation_time", "03/last_aggregation_time"),
        ] {
            assert!(namespaced(NAMESPACE_ORACLE, sub_prefix).matches(literal));
        }
    }
}
