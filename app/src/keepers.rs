//! The substrate-facing wiring of spec.md §0: one `Keepers` struct
//! holding the external collaborators, dispatching messages and block
//! hooks to the three co-resident modules. This is the seam a real BFT
//! node binary would embed; it never touches the store directly.

use cosmwasm_std::{Response, Storage};

use paw_compute::{BankKeeper, ProofVerifier};
use paw_oracle::StakingKeeper;

use crate::error::AppError;
use crate::msg::{ExecuteMsg, GovMsg};

pub struct Keepers<B, S, V>
where
    B: BankKeeper,
    S: StakingKeeper,
    V: ProofVerifier,
{
    pub bank: B,
    pub staking: S,
    pub verifier: V,
}

impl<B, S, V> Keepers<B, S, V>
where
    B: BankKeeper,
    S: StakingKeeper,
    V: ProofVerifier,
{
    pub fn new(bank: B, staking: S, verifier: V) -> Self {
        Self { bank, staking, verifier }
    }

    /// Runs every module's begin-block hook in a fixed order (spec.md §2:
    /// modules share one replicated state machine but have no ordering
    /// dependency on each other at this boundary).
    pub fn begin_block(&mut self, store: &mut dyn Storage, height: u64) -> Result<Response, AppError> {
        let mut response = Response::new();
        response = response.add_events(paw_dex::begin_block::begin_block(store, height)?.events);
        response = response.add_events(paw_oracle::begin_block::begin_block(store, height)?.events);
        response = response.add_events(paw_compute::begin_block::begin_block(store, &mut self.bank, height)?.events);
        Ok(response)
    }

    pub fn end_block(&mut self, store: &mut dyn Storage, now: u64, height: u64) -> Result<Response, AppError> {
        let mut response = Response::new();
        response = response.add_events(paw_dex::end_block::end_block(store, height)?.events);
        response = response.add_events(paw_oracle::end_block::end_block(store, &mut self.staking, now, height)?.events);
        response = response.add_events(paw_compute::end_block::end_block(store, height)?.events);
        Ok(response)
    }

    pub fn handle(&mut self, store: &mut dyn Storage, now: u64, height: u64, msg: ExecuteMsg) -> Result<Response, AppError> {
        match msg {
            ExecuteMsg::Dex(msg) => Ok(self.handle_dex(store, now, height, msg)?),
            ExecuteMsg::Oracle(msg) => Ok(self.handle_oracle(store, now, height, msg)?),
            ExecuteMsg::Compute(msg) => Ok(self.handle_compute(store, now, height, msg)?),
        }
    }

    fn handle_dex(&mut self, store: &mut dyn Storage, now: u64, height: u64, msg: paw_dex::msg::ExecuteMsg) -> Result<Response, paw_dex::ContractError> {
        use paw_dex::msg::ExecuteMsg::*;
        msg.validate_basic()?;
        let params = paw_dex::state::PARAMS.may_load(store)?.unwrap_or_default();
        match msg {
            CreatePool { creator, token_a, amount_a, token_b, amount_b } => {
                paw_dex::keeper::create_pool(store, now, creator, token_a, amount_a, token_b, amount_b)
            }
            AddLiquidity { pool_id, provider, amount_a, amount_b } => {
                paw_dex::keeper::add_liquidity(store, now, pool_id, provider, amount_a, amount_b)
            }
            RemoveLiquidity { pool_id, owner, shares } => paw_dex::keeper::remove_liquidity(store, now, pool_id, owner, shares),
            Swap { pool_id, trader, token_in, amount_in, token_out, min_out, deadline } => {
                paw_dex::keeper::swap(store, &params, now, height, pool_id, trader, token_in, amount_in, token_out, min_out, deadline)
            }
            CommitSwap { pool_id, trader, hash } => paw_dex::keeper::commit_swap(store, &params, height, pool_id, trader, hash),
            RevealSwap { pool_id, trader, token_in, amount_in, token_out, min_out, deadline, nonce } => paw_dex::keeper::reveal_swap(
                store, &params, now, height, pool_id, trader, token_in, amount_in, token_out, min_out, deadline, nonce,
            ),
            PauseModule { pool_id, authority, reason } => paw_dex::keeper::pause_module(store, now, pool_id, authority, reason),
            UnpauseModule { pool_id, authority } => paw_dex::keeper::unpause_module(store, now, pool_id, authority),
        }
    }

    fn handle_oracle(&mut self, store: &mut dyn Storage, now: u64, height: u64, msg: paw_oracle::msg::ExecuteMsg) -> Result<Response, paw_oracle::ContractError> {
        use paw_oracle::msg::ExecuteMsg::*;
        msg.validate_basic()?;
        match msg {
            // The message's own `timestamp` field is client-declared intent
            // (validated non-zero in `validate_basic`) and is not trusted
            // for the freshness window; the block's own time is what
            // `run_aggregation` later compares against.
            SubmitPrice { validator, asset, price, timestamp: _ } => paw_oracle::keeper::submit_price(store, now, height, validator, asset, price),
            RegisterOracle { validator, region, stake } => paw_oracle::keeper::register_oracle(store, region, validator, stake),
            UpdateValidatorRegion { validator, new_region } => paw_oracle::keeper::update_validator_region(store, validator, new_region),
        }
    }

    fn handle_compute(&mut self, store: &mut dyn Storage, now: u64, height: u64, msg: paw_compute::msg::ExecuteMsg) -> Result<Response, paw_compute::ContractError> {
        use paw_compute::msg::ExecuteMsg::*;
        msg.validate_basic()?;
        match msg {
            RegisterProvider { address, endpoint, stake, specs } => {
                paw_compute::keeper::register_provider(store, height, address, endpoint, stake, specs)
            }
            DeactivateProvider { address } => paw_compute::keeper::deactivate_provider(store, address),
            RequestCompute { requester, specs, image, command, max_payment, timeout_blocks } => paw_compute::keeper::request_compute(
                store, &mut self.bank, now, height, requester, specs, image, command, max_payment, timeout_blocks,
            ),
            SubmitResult { provider, request_id, result: _, proof_blob } => {
                paw_compute::keeper::submit_result(store, &mut self.bank, &self.verifier, height, provider, request_id, proof_blob)
            }
            Dispute { disputant, request_id, reason } => paw_compute::keeper::file_dispute(store, height, disputant, request_id, reason),
            Appeal { appellant, dispute_id, reason } => paw_compute::keeper::file_appeal(store, height, appellant, dispute_id, reason),
        }
    }

    /// Governance-proposal dispatch, spec.md §6/§9: replaces a module's
    /// whole `Params` struct. Proposal authorization/voting lives in the
    /// external substrate's governance module, out of scope per spec.md
    /// §1; this is only the apply step once a proposal has passed.
    pub fn handle_gov(&mut self, store: &mut dyn Storage, msg: GovMsg) -> Result<Response, AppError> {
        match msg {
            GovMsg::UpdateDexParams { params } => {
                paw_dex::state::PARAMS.save(store, &params).map_err(paw_dex::ContractError::from)?;
            }
            GovMsg::UpdateOracleParams { params } => {
                paw_oracle::state::PARAMS.save(store, &params).map_err(paw_oracle::ContractError::from)?;
            }
            GovMsg::UpdateComputeParams { params } => {
                paw_compute::state::PARAMS.save(store, &params).map_err(paw_compute::ContractError::from)?;
            }
        }
        Ok(Response::new().add_attribute("action", "update_params"))
    }
}
