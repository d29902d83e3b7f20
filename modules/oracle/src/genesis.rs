//! Genesis import/export, spec.md §6. The region index and nonce
//! timestamp index are derived secondary indexes (spec.md §9) and are
//! rebuilt from the authoritative records on import rather than exported
//! themselves.

use cosmwasm_schema::cw_serde;
use cosmwasm_std::Storage;

use crate::error::ContractError;
use crate::state::{
    NONCE_STATES, NONCE_TS_INDEX, PARAMS, PRICE_FEEDS, REGION_INDEX, SLASH_RECORDS,
    VALIDATOR_PRICES, VALIDATOR_REGISTRATIONS,
};
use crate::types::{NonceState, OracleParams, PriceFeed, SlashRecord, ValidatorPrice, ValidatorRegistration};

#[cw_serde]
#[derive(Default)]
pub struct GenesisState {
    pub params: OracleParams,
    pub price_feeds: Vec<PriceFeed>,
    pub validator_prices: Vec<ValidatorPrice>,
    pub validator_registrations: Vec<ValidatorRegistration>,
    pub nonce_states: Vec<NonceState>,
    pub slash_records: Vec<SlashRecord>,
}

pub fn export(store: &dyn Storage) -> Result<GenesisState, ContractError> {
    let params = PARAMS.may_load(store)?.unwrap_or_default();
    let price_feeds = PRICE_FEEDS
        .range(store, None, None, cosmwasm_std::Order::Ascending)
        .filter_map(|r| r.ok())
        .map(|(_, v)| v)
        .collect();
    let validator_prices = VALIDATOR_PRICES
        .range(store, None, None, cosmwasm_std::Order::Ascending)
        .filter_map(|r| r.ok())
        .map(|(_, v)| v)
        .collect();
    let validator_registrations = VALIDATOR_REGISTRATIONS
        .range(store, None, None, cosmwasm_std::Order::Ascending)
        .filter_map(|r| r.ok())
        .map(|(_, v)| v)
        .collect();
    let nonce_states = NONCE_STATES
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
        price_feeds,
        validator_prices,
        validator_registrations,
        nonce_states,
        slash_records,
    })
}

pub fn import(store: &mut dyn Storage, genesis: GenesisState) -> Result<(), ContractError> {
    PARAMS.save(store, &genesis.params)?;

    for reg in &genesis.validator_registrations {
        VALIDATOR_REGISTRATIONS.save(store, reg.validator.as_str(), reg)?;
        if reg.active {
            REGION_INDEX.save(store, (reg.region.as_str(), reg.validator.as_str()), &())?;
        }
    }
    for feed in &genesis.price_feeds {
        PRICE_FEEDS.save(store, feed.asset.as_str(), feed)?;
    }
    for vp in &genesis.validator_prices {
        if !VALIDATOR_REGISTRATIONS.has(store, vp.validator.as_str()) {
            return Err(ContractError::ValidatorNotFound(vp.validator.clone()));
        }
        VALIDATOR_PRICES.save(store, (vp.asset.as_str(), vp.validator.as_str()), vp)?;
    }
    for state in &genesis.nonce_states {
        NONCE_STATES.save(store, (state.channel.as_str(), state.counterparty.as_str()), state)?;
        NONCE_TS_INDEX.save(
            store,
            (state.timestamp, state.channel.as_str(), state.counterparty.as_str()),
            &(),
        )?;
    }
    for record in &genesis.slash_records {
        SLASH_RECORDS.save(store, (record.asset.as_str(), record.height, record.validator.as_str()), record)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use cosmwasm_std::testing::MockStorage;
    use paw_types::{Amount, Ratio};

    #[test]
    fn round_trip_rebuilds_region_index() {
        let mut store = MockStorage::new();
        let genesis = GenesisState {
            params: OracleParams::default(),
            price_feeds: vec![],
            validator_prices: vec![],
            validator_registrations: vec![ValidatorRegistration {
                validator: "val1".to_string(),
                region: "us".to_string(),
                stake: Amount::from(1_000u64),
                active: true,
                has_submitted: false,
            }],
            nonce_states: vec![],
            slash_records: vec![],
        };
        import(&mut store, genesis.clone()).unwrap();
        assert!(REGION_INDEX.has(&store, ("us", "val1")));
        let exported = export(&store).unwrap();
        assert_eq!(exported.validator_registrations, genesis.validator_registrations);
    }

    #[test]
    fn rejects_price_for_unknown_validator() {
        let mut store = MockStorage::new();
        let genesis = GenesisState {
            params: OracleParams::default(),
            validator_prices: vec![ValidatorPrice {
                asset: "BTC/USD".to_string(),
                validator: "ghost".to_string(),
                price: Ratio::one(),
                timestamp: 0,
                height: 0,
            }],
            ..Default::default()
        };
        assert!(import(&mut store, genesis).is_err());
    }
}
