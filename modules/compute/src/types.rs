use cosmwasm_schema::cw_serde;
use paw_types::Amount;

pub type RequestId = u64;
pub type DisputeId = u64;
pub type AppealId = u64;
pub type SlashId = u64;

/// Minimal hardware specification a provider advertises and a request
/// demands, spec.md §3/§4.3 ("whose specs >= requested specs").
#[cw_serde]
#[derive(Copy, Default, Eq)]
pub struct Specs {
    pub cpu_cores: u32,
    pub memory_mb: u64,
    pub gpu_count: u32,
}

impl Specs {
    /// Component-wise "at least as capable as" — not a total order (a
    /// provider with more CPU but less memory satisfies neither
    /// direction), so callers must use this predicate, not `Ord`.
    pub fn meets(&self, requested: &Specs) -> bool {
        self.cpu_cores >= requested.cpu_cores
            && self.memory_mb >= requested.memory_mb
            && self.gpu_count >= requested.gpu_count
    }
}

#[cw_serde]
pub struct Provider {
    pub address: String,
    pub endpoint: String,
    pub stake: Amount,
    pub reputation: i64,
    pub active: bool,
    pub last_seen_height: u64,
    pub specs: Specs,
}

#[cw_serde]
#[derive(Eq)]
pub enum RequestStatus {
    Pending,
    Assigned,
    Completed,
    Disputed,
    Failed,
}

#[cw_serde]
pub struct Request {
    pub id: RequestId,
    pub requester: String,
    pub specs: Specs,
    pub image: String,
    pub command: String,
    pub max_payment: Amount,
    pub assigned_provider: Option<String>,
    pub status: RequestStatus,
    /// Block-height deadline, swept in begin-block (spec.md §4.3/§5).
    pub timeout: u64,
    pub escrow_amount: Amount,
    /// Failed-verification count on `SubmitResult`; spec.md §4.3: "on
    /// failure increments a retry counter and may move to disputed."
    pub retry_count: u32,
}

#[cw_serde]
pub struct Escrow {
    pub request_id: RequestId,
    pub amount: Amount,
    pub locked_at: u64,
    pub timeout: u64,
}

#[cw_serde]
pub struct ProviderCacheEntry {
    pub provider: String,
    pub reputation: i64,
}

#[cw_serde]
#[derive(Default)]
pub struct ProviderCache {
    pub entries: Vec<ProviderCacheEntry>,
    pub last_refresh_height: u64,
    pub size: u32,
    pub enabled: bool,
}

#[cw_serde]
pub struct Dispute {
    pub id: DisputeId,
    pub request_id: RequestId,
    pub disputant: String,
    pub provider: Option<String>,
    pub reason: String,
    pub height: u64,
}

#[cw_serde]
pub struct Appeal {
    pub id: AppealId,
    pub dispute_id: DisputeId,
    pub appellant: String,
    pub provider: Option<String>,
    pub reason: String,
    pub height: u64,
}

#[cw_serde]
pub struct SlashRecord {
    pub id: SlashId,
    pub provider: String,
    pub request_id: RequestId,
    pub amount: Amount,
    pub reason: String,
    pub height: u64,
}

/// Governance-adjustable compute parameters, spec.md §6.
#[cw_serde]
pub struct ComputeParams {
    pub min_provider_stake: Amount,
    pub verification_timeout_blocks: u64,
    pub max_retries: u32,
    pub provider_cache_size: u32,
    pub provider_cache_refresh_interval_blocks: u64,
    pub use_provider_cache: bool,
    pub min_reputation: i64,
    /// Reputation pulls back toward zero by `reputation_decay_amount`
    /// every `reputation_decay_interval_blocks` (spec.md §3: "reputation
    /// is an integer score decayed over time"), so an idle provider's
    /// score from past activity fades rather than standing forever.
    pub reputation_decay_interval_blocks: u64,
    pub reputation_decay_amount: i64,
}

impl Default for ComputeParams {
    fn default() -> Self {
        Self {
            min_provider_stake: Amount::from(1_000_000u64),
            verification_timeout_blocks: 100,
            max_retries: 3,
            provider_cache_size: 10,
            provider_cache_refresh_interval_blocks: 100,
            use_provider_cache: true,
            min_reputation: 0,
            reputation_decay_interval_blocks: 1000,
            reputation_decay_amount: 1,
        }
    }
}
