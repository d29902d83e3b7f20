//! Whole-chain genesis import/export: the union of the three modules'
//! genesis states, spec.md §6. Invariant checks (LP-share sums, k-floor,
//! dispute/appeal index counts, escrow/timeout-index correspondence,
//! provider bonds) run inside each module's own `genesis::import`; this
//! layer only sequences the three imports.

use cosmwasm_schema::cw_serde;
use cosmwasm_std::Storage;

use crate::error::AppError;

#[cw_serde]
#[derive(Default)]
pub struct GenesisState {
    pub dex: paw_dex::genesis::GenesisState,
    pub oracle: paw_oracle::genesis::GenesisState,
    pub compute: paw_compute::genesis::GenesisState,
}

pub fn export(store: &dyn Storage) -> Result<GenesisState, AppError> {
    Ok(GenesisState {
        dex: paw_dex::genesis::export(store)?,
        oracle: paw_oracle::genesis::export(store)?,
        compute: paw_compute::genesis::export(store)?,
    })
}

pub fn import(store: &mut dyn Storage, genesis: GenesisState) -> Result<(), AppError> {
    paw_dex::genesis::import(store, genesis.dex)?;
    paw_oracle::genesis::import(store, genesis.oracle)?;
    paw_compute::genesis::import(store, genesis.compute)?;
    Ok(())
}
