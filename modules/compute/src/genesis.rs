//! Genesis import/export, spec.md §6. The provider reputation cache is
//! a derived view (spec.md §9) and is deliberately excluded here: it is
//! rebuilt by the first begin-block after genesis rather than snapshotted,
//! since a stale cache from a previous chain-halt would otherwise survive
//! the restart. The timeout forward/reverse index pair and the dispute,
//! appeal and slash secondary indexes are likewise derived and rebuilt
//! from the authoritative records on import.

use cosmwasm_schema::cw_serde;
use cosmwasm_std::Storage;

use crate::error::ContractError;
use crate::state::{
    APPEAL_BY_APPELLANT, APPEAL_BY_HEIGHT, APPEAL_BY_PROVIDER, APPEALS, DISPUTE_BY_DISPUTANT, DISPUTE_BY_HEIGHT,
    DISPUTE_BY_PROVIDER, DISPUTES, ESCROWS, PARAMS, PROVIDERS, REQUESTS, REQUEST_TIMEOUT, SLASH_BY_HEIGHT,
    SLASH_BY_PROVIDER, SLASH_RECORDS, TIMEOUT_INDEX,
};
use crate::types::{Appeal, ComputeParams, Dispute, Escrow, Provider, Request, SlashRecord};

#[cw_serde]
#[derive(Default)]
pub struct GenesisState {
    pub params: ComputeParams,
    pub providers: Vec<Provider>,
    pub requests: Vec<Request>,
    pub escrows: Vec<Escrow>,
    pub disputes: Vec<Dispute>,
    pub appeals: Vec<Appeal>,
    pub slash_records: Vec<SlashRecord>,
}

pub fn export(store: &dyn Storage) -> Result<GenesisState, ContractError> {
    let params = PARAMS.may_load(store)?.unwrap_or_default();
    let providers = PROVIDERS
        .range(store, None, None, cosmwasm_std::Order::Ascending)
        .filter_map(|r| r.ok())
        .map(|(_, v)| v)
        .collect();
    let requests = REQUESTS
        .range(store, None, None, cosmwasm_std::Order::Ascending)
        .filter_map(|r| r.ok())
        .map(|(_, v)| v)
        .collect();
    let escrows = ESCROWS
        .range(store, None, None, cosmwasm_std::Order::Ascending)
        .filter_map(|r| r.ok())
        .map(|(_, v)| v)
        .collect();
    let disputes = DISPUTES
        .range(store, None, None, cosmwasm_std::Order::Ascending)
        .filter_map(|r| r.ok())
        .map(|(_, v)| v)
        .collect();
    let appeals = APPEALS
        .range(store, None, None, cosmwasm_std::Order::Ascending)
        .filter_map(|r| r.ok())
        .map(|(_, v)| v)
        .collect();
    let slash_records = SLASH_RECORDS
        .range(store, None, None, cosmwasm_std::Order::Ascending)
        .filter_map(|r| r.ok())
        .map(|(_, v)| v)
        .collect();

    Ok(GenesisState {
        params,
        providers,
        requests,
        escrows,
        disputes,
        appeals,
        slash_records,
    })
}

pub fn import(store: &mut dyn Storage, genesis: GenesisState) -> Result<(), ContractError> {
    PARAMS.save(store, &genesis.params)?;

    for provider in &genesis.providers {
        PROVIDERS.save(store, provider.address.as_str(), provider)?;
    }
    for request in &genesis.requests {
        if let Some(provider) = &request.assigned_provider {
            if !PROVIDERS.has(store, provider.as_str()) {
                return Err(ContractError::ProviderNotFound(provider.clone()));
            }
        }
        REQUESTS.save(store, request.id, request)?;
    }
    for escrow in &genesis.escrows {
        if !REQUESTS.has(store, escrow.request_id) {
            return Err(ContractError::RequestNotFound(escrow.request_id));
        }
        ESCROWS.save(store, escrow.request_id, escrow)?;
        TIMEOUT_INDEX.save(store, (escrow.timeout, escrow.request_id), &())?;
        REQUEST_TIMEOUT.save(store, escrow.request_id, &escrow.timeout)?;
    }
    for dispute in &genesis.disputes {
        DISPUTES.save(store, dispute.id, dispute)?;
        DISPUTE_BY_DISPUTANT.save(store, (dispute.disputant.as_str(), dispute.id), &())?;
        if let Some(provider) = &dispute.provider {
            DISPUTE_BY_PROVIDER.save(store, (provider.as_str(), dispute.id), &())?;
        }
        DISPUTE_BY_HEIGHT.save(store, (dispute.height, dispute.id), &())?;
    }
    for appeal in &genesis.appeals {
        if !DISPUTES.has(store, appeal.dispute_id) {
            return Err(ContractError::DisputeNotFound(appeal.dispute_id));
        }
        APPEALS.save(store, appeal.id, appeal)?;
        APPEAL_BY_APPELLANT.save(store, (appeal.appellant.as_str(), appeal.id), &())?;
        if let Some(provider) = &appeal.provider {
            APPEAL_BY_PROVIDER.save(store, (provider.as_str(), appeal.id), &())?;
        }
        APPEAL_BY_HEIGHT.save(store, (appeal.height, appeal.id), &())?;
    }
    for record in &genesis.slash_records {
        SLASH_RECORDS.save(store, record.id, record)?;
        SLASH_BY_PROVIDER.save(store, (record.provider.as_str(), record.id), &())?;
        SLASH_BY_HEIGHT.save(store, (record.height, record.id), &())?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use cosmwasm_std::testing::MockStorage;
    use paw_types::Amount;

    use crate::types::{RequestStatus, Specs};

    fn sample_provider() -> Provider {
        Provider {
            address: "providerA".to_string(),
            endpoint: "https://provider.example".to_string(),
            stake: Amount::from(2_000_000u64),
            reputation: 5,
            active: true,
            last_seen_height: 10,
            specs: Specs { cpu_cores: 4, memory_mb: 8_192, gpu_count: 0 },
        }
    }

    #[test]
    fn round_trip_rebuilds_timeout_index() {
        let mut store = MockStorage::new();
        let genesis = GenesisState {
            params: ComputeParams::default(),
            providers: vec![sample_provider()],
            requests: vec![Request {
                id: 1,
                requester: "alice".to_string(),
                specs: Specs { cpu_cores: 2, memory_mb: 4_096, gpu_count: 0 },
                image: "img".to_string(),
                command: "run".to_string(),
                max_payment: Amount::from(1_000u64),
                assigned_provider: Some("providerA".to_string()),
                status: RequestStatus::Assigned,
                timeout: 200,
                escrow_amount: Amount::from(1_000u64),
                retry_count: 0,
            }],
            escrows: vec![Escrow { request_id: 1, amount: Amount::from(1_000u64), locked_at: 100, timeout: 200 }],
            disputes: vec![],
            appeals: vec![],
            slash_records: vec![],
        };
        import(&mut store, genesis.clone()).unwrap();
        assert!(TIMEOUT_INDEX.has(&store, (200, 1)));
        assert_eq!(REQUEST_TIMEOUT.load(&store, 1).unwrap(), 200);
        let exported = export(&store).unwrap();
        assert_eq!(exported.requests, genesis.requests);
    }

    #[test]
    fn rejects_escrow_for_unknown_request() {
        let mut store = MockStorage::new();
        let genesis = GenesisState {
            escrows: vec![Escrow { request_id: 99, amount: Amount::from(1u64), locked_at: 0, timeout: 10 }],
            ..Default::default()
        };
        assert!(import(&mut store, genesis).is_err());
    }
}
