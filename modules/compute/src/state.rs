use cw_storage_plus::{Item, Map};

use crate::types::{
    Appeal, AppealId, ComputeParams, Dispute, DisputeId, Escrow, Provider, ProviderCache, Request, RequestId, SlashId, SlashRecord,
};

pub const PARAMS: Item<ComputeParams> = Item::new("01/params");

pub const PROVIDERS: Map<&str, Provider> = Map::new("01/provider");
pub const PROVIDER_CACHE: Item<ProviderCache> = Item::new("01/provider_cache");

pub const REQUEST_SEQ: Item<RequestId> = Item::new("01/request_seq");
pub const REQUESTS: Map<RequestId, Request> = Map::new("01/request");

pub const ESCROWS: Map<RequestId, Escrow> = Map::new("01/escrow");
/// Forward index `timeout -> requestId`, spec.md §3/§4.3.
pub const TIMEOUT_INDEX: Map<(u64, RequestId), ()> = Map::new("01/timeout_index");
/// Reverse index `requestId -> timeout`, spec.md §3/§4.3 invariant 6.
pub const REQUEST_TIMEOUT: Map<RequestId, u64> = Map::new("01/request_timeout");

pub const DISPUTE_SEQ: Item<DisputeId> = Item::new("01/dispute_seq");
pub const DISPUTES: Map<DisputeId, Dispute> = Map::new("01/dispute");
pub const DISPUTE_BY_DISPUTANT: Map<(&str, DisputeId), ()> = Map::new("01/dispute_by_disputant");
pub const DISPUTE_BY_PROVIDER: Map<(&str, DisputeId), ()> = Map::new("01/dispute_by_provider");
pub const DISPUTE_BY_HEIGHT: Map<(u64, DisputeId), ()> = Map::new("01/dispute_by_height");

pub const APPEAL_SEQ: Item<AppealId> = Item::new("01/appeal_seq");
pub const APPEALS: Map<AppealId, Appeal> = Map::new("01/appeal");
pub const APPEAL_BY_APPELLANT: Map<(&str, AppealId), ()> = Map::new("01/appeal_by_appellant");
pub const APPEAL_BY_PROVIDER: Map<(&str, AppealId), ()> = Map::new("01/appeal_by_provider");
pub const APPEAL_BY_HEIGHT: Map<(u64, AppealId), ()> = Map::new("01/appeal_by_height");

pub const SLASH_SEQ: Item<SlashId> = Item::new("01/slash_seq");
pub const SLASH_RECORDS: Map<SlashId, SlashRecord> = Map::new("01/slash_record");
pub const SLASH_BY_PROVIDER: Map<(&str, SlashId), ()> = Map::new("01/slash_by_provider");
pub const SLASH_BY_HEIGHT: Map<(u64, SlashId), ()> = Map::new("01/slash_by_height");

#[cfg(test)]
mod tests {
    use paw_store::{namespaced, NAMESPACE_COMPUTE};

    /// Every literal `Map`/`Item` prefix above must actually carry the
    /// compute module's namespace byte, so a copy-pasted prefix from another
    /// module is caught here instead of silently colliding in storage.
    #[test]
    fn storage_prefixes_carry_the_compute_namespace() {
        for (sub_prefix, literal) in [
            ("params", "01/params"),
            ("provider", "01/provider"),
            ("provider_cache", "01/provider_cache"),
            ("request_seq", "01/request_seq"),
            ("request", "01/request"),
            ("escrow", "01/escrow"),
            ("timeout_index", "01/timeout_index"),
            ("request_timeout", "01/request_timeout"),
            ("dispute_seq", "01/dispute_seq"),
            ("dispute", "01/dispute"),
            ("dispute_by_disputant", "01/dispute_by_disputant"),
            ("dispute_by_provider", "01/dispute_by_provider"),
            ("dispute_by_height", "01/dispute_by_height"),
            ("appeal_seq", "01/appeal_seq"),
            ("appeal", "01/appeal"),
            ("appeal_by_appellant", "01/appeal_by_appellant"),
            ("appeal_by_provider", "01/appeal_by_provider"),
            ("appeal_by_height", "01/appeal_by_height"),
            ("slash_seq", "01/slash_seq"),
            ("slash_record", "01/slash_record"),
            ("slash_by_provider", "01/slash_by_provider"),
            ("slash_by_height", "01/slash_by_height"),
        ] {
            assert!(namespaced(NAMESPACE_COMPUTE, sub_prefix).matches(literal));
        }
    }
}
