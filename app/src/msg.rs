use cosmwasm_schema::cw_serde;

/// The combined transaction envelope: every message routes to exactly
/// one of the three modules, matching spec.md §6's per-module message
/// sets unchanged.
#[cw_serde]
pub enum ExecuteMsg {
    Dex(paw_dex::msg::ExecuteMsg),
    Oracle(paw_oracle::msg::ExecuteMsg),
    Compute(paw_compute::msg::ExecuteMsg),
}

/// Governance-proposal dispatch, spec.md §6/§9: each module's `Params`
/// is mutated only through a proposal that replaces the whole struct,
/// the same all-or-nothing shape the teacher's contracts use for their
/// own `Config` updates.
#[cw_serde]
pub enum GovMsg {
    UpdateDexParams { params: paw_dex::types::DexParams },
    UpdateOracleParams { params: paw_oracle::types::OracleParams },
    UpdateComputeParams { params: paw_compute::types::ComputeParams },
}
