//! End-to-end scenario coverage, spec.md §8.

use cosmwasm_std::testing::MockStorage;
use paw_compute::error::ContractError;
use paw_compute::keeper::{self, BankKeeper, ProofVerifier};
use paw_compute::state::{ESCROWS, REQUESTS, REQUEST_TIMEOUT, TIMEOUT_INDEX};
use paw_compute::types::{RequestStatus, Specs};
use paw_types::Amount;

/// An in-memory bank collaborator: tracks per-account balances and the
/// module's own balance so tests can assert funds actually moved, not
/// just that state transitions happened.
#[derive(Default)]
struct MockBank {
    balances: std::collections::BTreeMap<String, Amount>,
    module_balance: Amount,
}

impl MockBank {
    fn fund(&mut self, account: &str, amount: u128) {
        self.balances.insert(account.to_string(), Amount::from(amount));
    }

    fn balance(&self, account: &str) -> Amount {
        self.balances.get(account).copied().unwrap_or_else(Amount::zero)
    }
}

impl BankKeeper for MockBank {
    fn transfer_to_module(&mut self, from: &str, amount: Amount) -> Result<(), ContractError> {
        let bal = self.balance(from);
        if bal < amount {
            return Err(ContractError::BankTransferFailed(format!("{from} has insufficient funds")));
        }
        self.balances.insert(from.to_string(), bal - amount);
        self.module_balance += amount;
        Ok(())
    }

    fn transfer_from_module(&mut self, to: &str, amount: Amount) -> Result<(), ContractError> {
        if self.module_balance < amount {
            return Err(ContractError::BankTransferFailed("module balance underflow".to_string()));
        }
        self.module_balance -= amount;
        let bal = self.balance(to);
        self.balances.insert(to.to_string(), bal + amount);
        Ok(())
    }
}

struct AlwaysVerifies;
impl ProofVerifier for AlwaysVerifies {
    fn verify(&self, _request_id: u64, _proof_blob: &[u8]) -> bool {
        true
    }
}

struct NeverVerifies;
impl ProofVerifier for NeverVerifies {
    fn verify(&self, _request_id: u64, _proof_blob: &[u8]) -> bool {
        false
    }
}

fn specs() -> Specs {
    Specs { cpu_cores: 2, memory_mb: 4_096, gpu_count: 0 }
}

/// S5 — requester locks 1000 upaw for a compute request with
/// `timeout = currentHeight + 10`. Provider never submits. At
/// `currentHeight + 11`, begin-block sweep refunds the full amount,
/// marks the request failed, and deletes both escrow and timeout-index
/// entries atomically.
#[test]
fn s5_escrow_atomic_lock_and_timeout_refund() {
    let mut store = MockStorage::new();
    let mut bank = MockBank::default();
    bank.fund("alice", 1_000);

    keeper::request_compute(
        &mut store,
        &mut bank,
        100,
        50,
        "alice".to_string(),
        specs(),
        "image:latest".to_string(),
        "run".to_string(),
        Amount::from(1_000u64),
        10,
    )
    .unwrap();

    assert_eq!(bank.balance("alice"), Amount::zero());
    assert!(ESCROWS.has(&store, 1));
    assert!(TIMEOUT_INDEX.has(&store, (60, 1)));
    assert_eq!(REQUEST_TIMEOUT.load(&store, 1).unwrap(), 60);

    let resp = keeper::sweep_timeouts(&mut store, &mut bank, 60, 50).unwrap();
    assert!(resp.events.iter().any(|e| e.ty == "escrow_refunded"));
    assert!(resp.events.iter().any(|e| e.ty == "request_timed_out"));

    let request = REQUESTS.load(&store, 1).unwrap();
    assert_eq!(request.status, RequestStatus::Failed);
    assert_eq!(bank.balance("alice"), Amount::from(1_000u64));
    assert!(!ESCROWS.has(&store, 1));
    assert!(!TIMEOUT_INDEX.has(&store, (60, 1)));
    assert!(!REQUEST_TIMEOUT.has(&store, 1));
}

#[test]
fn assigned_provider_completes_and_releases_escrow() {
    let mut store = MockStorage::new();
    let mut bank = MockBank::default();
    bank.fund("alice", 500);

    keeper::register_provider(&mut store, 1, "providerA".to_string(), "https://p.example".to_string(), Amount::from(2_000_000u64), specs()).unwrap();

    keeper::request_compute(
        &mut store,
        &mut bank,
        10,
        10,
        "alice".to_string(),
        specs(),
        "image:latest".to_string(),
        "run".to_string(),
        Amount::from(500u64),
        100,
    )
    .unwrap();

    let request = REQUESTS.load(&store, 1).unwrap();
    assert_eq!(request.assigned_provider.as_deref(), Some("providerA"));
    assert_eq!(request.status, RequestStatus::Assigned);

    keeper::submit_result(&mut store, &mut bank, &AlwaysVerifies, 11, "providerA".to_string(), 1, vec![0xAB]).unwrap();

    let request = REQUESTS.load(&store, 1).unwrap();
    assert_eq!(request.status, RequestStatus::Completed);
    assert_eq!(bank.balance("providerA"), Amount::from(500u64));
    assert!(!ESCROWS.has(&store, 1));
}

/// Failed verifications accumulate retries and move to disputed once
/// `max_retries` is reached, without ever releasing or refunding the
/// escrow out from under a still-pending dispute.
#[test]
fn repeated_failed_verification_moves_to_disputed() {
    let mut store = MockStorage::new();
    let mut bank = MockBank::default();
    bank.fund("alice", 10);

    keeper::register_provider(&mut store, 1, "providerA".to_string(), "https://p.example".to_string(), Amount::from(2_000_000u64), specs()).unwrap();
    keeper::request_compute(&mut store, &mut bank, 1, 1, "alice".to_string(), specs(), "img".to_string(), "run".to_string(), Amount::from(10u64), 100).unwrap();

    for _ in 0..3 {
        keeper::submit_result(&mut store, &mut bank, &NeverVerifies, 2, "providerA".to_string(), 1, vec![]).unwrap();
    }

    let request = REQUESTS.load(&store, 1).unwrap();
    assert_eq!(request.status, RequestStatus::Disputed);
    assert_eq!(request.retry_count, 3);
    assert!(ESCROWS.has(&store, 1), "escrow stays locked while disputed");
}

/// Dispute and appeal filings are indexed by disputant/appellant,
/// provider, and height, matching spec.md invariant 6's ledger/index
/// consistency requirement.
#[test]
fn dispute_and_appeal_indexes_stay_consistent() {
    let mut store = MockStorage::new();
    let mut bank = MockBank::default();
    bank.fund("alice", 10);

    keeper::register_provider(&mut store, 1, "providerA".to_string(), "https://p.example".to_string(), Amount::from(2_000_000u64), specs()).unwrap();
    keeper::request_compute(&mut store, &mut bank, 1, 1, "alice".to_string(), specs(), "img".to_string(), "run".to_string(), Amount::from(10u64), 100).unwrap();

    keeper::file_dispute(&mut store, 5, "alice".to_string(), 1, "bad output".to_string()).unwrap();
    keeper::file_appeal(&mut store, 6, "providerA".to_string(), 1, "disagree".to_string()).unwrap();

    use paw_compute::state::{APPEAL_BY_APPELLANT, APPEAL_BY_PROVIDER, DISPUTE_BY_DISPUTANT, DISPUTE_BY_PROVIDER};
    assert!(DISPUTE_BY_DISPUTANT.has(&store, ("alice", 1)));
    assert!(DISPUTE_BY_PROVIDER.has(&store, ("providerA", 1)));
    assert!(APPEAL_BY_APPELLANT.has(&store, ("providerA", 1)));
    assert!(APPEAL_BY_PROVIDER.has(&store, ("providerA", 1)));
}

/// A dispute alleges bad behavior by the assigned provider, so filing one
/// against a request that never had one (no eligible provider yet, or
/// still pending) is rejected rather than producing a ledger entry with
/// no matching DISPUTE_BY_PROVIDER index entry.
#[test]
fn file_dispute_rejects_request_with_no_assigned_provider() {
    let mut store = MockStorage::new();
    let mut bank = MockBank::default();
    bank.fund("alice", 10);

    keeper::request_compute(&mut store, &mut bank, 1, 1, "alice".to_string(), specs(), "img".to_string(), "run".to_string(), Amount::from(10u64), 100).unwrap();
    let request = REQUESTS.load(&store, 1).unwrap();
    assert_eq!(request.assigned_provider, None, "no provider registered yet");

    let err = keeper::file_dispute(&mut store, 5, "alice".to_string(), 1, "bad output".to_string()).unwrap_err();
    assert_eq!(err, ContractError::InvalidRequestState(1));

    use paw_compute::state::DISPUTE_BY_DISPUTANT;
    assert!(!DISPUTE_BY_DISPUTANT.has(&store, ("alice", 1)));
}

/// Registering below the minimum stake is rejected outright.
#[test]
fn register_provider_rejects_insufficient_stake() {
    let mut store = MockStorage::new();
    let err = keeper::register_provider(&mut store, 1, "providerA".to_string(), "https://p.example".to_string(), Amount::from(1u64), specs()).unwrap_err();
    assert!(matches!(err, ContractError::InsufficientProviderStake { .. }));
}

/// spec.md §3: `verificationTimeout` bounds how long a requester may lock
/// funds for, so a request asking for more blocks than governance allows
/// is rejected before any escrow is touched.
#[test]
fn request_compute_rejects_timeout_beyond_governance_maximum() {
    let mut store = MockStorage::new();
    let mut bank = MockBank::default();
    bank.fund("alice", 10);

    let err = keeper::request_compute(
        &mut store, &mut bank, 1, 1, "alice".to_string(), specs(),
        "img".to_string(), "run".to_string(), Amount::from(10u64), 1_000,
    )
    .unwrap_err();

    assert_eq!(err, ContractError::TimeoutExceedsMaximum { requested: 1_000, maximum: 100 });
    assert_eq!(bank.balance("alice"), Amount::from(10u64), "no funds moved on rejection");
}

/// Invariant 6: every escrow has a matching timeout-index entry and
/// vice versa, both before and after a sweep removes it.
#[test]
fn invariant_escrow_and_timeout_index_correspond() {
    let mut store = MockStorage::new();
    let mut bank = MockBank::default();
    bank.fund("alice", 200);

    keeper::request_compute(&mut store, &mut bank, 1, 1, "alice".to_string(), specs(), "img".to_string(), "run".to_string(), Amount::from(200u64), 5).unwrap();
    assert_eq!(ESCROWS.has(&store, 1), TIMEOUT_INDEX.has(&store, (6, 1)));

    keeper::sweep_timeouts(&mut store, &mut bank, 6, 10).unwrap();
    assert_eq!(ESCROWS.has(&store, 1), TIMEOUT_INDEX.has(&store, (6, 1)));
}

/// spec.md §3: provider reputation is "decayed over time" — a positive
/// score drifts back toward zero, never past it, and an idle provider
/// with zero reputation is left untouched.
#[test]
fn reputation_decays_toward_zero_and_invalidates_cache() {
    use paw_compute::state::PROVIDERS;

    let mut store = MockStorage::new();
    keeper::register_provider(&mut store, 1, "providerA".to_string(), "https://p.example".to_string(), Amount::from(2_000_000u64), specs()).unwrap();
    keeper::register_provider(&mut store, 1, "providerB".to_string(), "https://q.example".to_string(), Amount::from(2_000_000u64), specs()).unwrap();

    PROVIDERS.update(&mut store, "providerA", |p| -> Result<_, ContractError> {
        let mut p = p.unwrap();
        p.reputation = 5;
        Ok(p)
    })
    .unwrap();
    keeper::refresh_provider_cache(&mut store, 1).unwrap();

    let response = keeper::decay_reputation(&mut store, 1_000).unwrap();
    assert_eq!(response.events[0].ty, "reputation_decayed");

    assert_eq!(PROVIDERS.load(&store, "providerA").unwrap().reputation, 4);
    assert_eq!(PROVIDERS.load(&store, "providerB").unwrap().reputation, 0);

    // Only providerA actually moved; the cache is still invalidated by
    // any movement so the next refresh reflects the new ordering.
    let cache = paw_compute::state::PROVIDER_CACHE.load(&store).unwrap();
    assert!(!cache.enabled);

    // Decaying again from zero never goes negative.
    for _ in 0..10 {
        keeper::decay_reputation(&mut store, 2_000).unwrap();
    }
    assert_eq!(PROVIDERS.load(&store, "providerA").unwrap().reputation, 0);
}
