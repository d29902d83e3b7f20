use cosmwasm_schema::cw_serde;
use paw_types::Amount;

use crate::error::ContractError;
use crate::types::PoolId;

/// The DEX message set of spec.md §6. Every signer address is carried by
/// the substrate's envelope (out of scope here, per spec.md §1); these
/// payloads are exactly the per-message fields.
#[cw_serde]
pub enum ExecuteMsg {
    CreatePool {
        creator: String,
        token_a: String,
        amount_a: Amount,
        token_b: String,
        amount_b: Amount,
    },
    AddLiquidity {
        pool_id: PoolId,
        provider: String,
        amount_a: Amount,
        amount_b: Amount,
    },
    RemoveLiquidity {
        pool_id: PoolId,
        owner: String,
        shares: Amount,
    },
    Swap {
        pool_id: PoolId,
        trader: String,
        token_in: String,
        amount_in: Amount,
        token_out: String,
        min_out: Amount,
        deadline: u64,
    },
    CommitSwap {
        pool_id: PoolId,
        trader: String,
        hash: String,
    },
    RevealSwap {
        pool_id: PoolId,
        trader: String,
        token_in: String,
        amount_in: Amount,
        token_out: String,
        min_out: Amount,
        deadline: u64,
        nonce: String,
    },
    PauseModule {
        pool_id: PoolId,
        authority: String,
        reason: String,
    },
    UnpauseModule {
        pool_id: PoolId,
        authority: String,
    },
}

impl ExecuteMsg {
    /// Structural/range/injection-safety pass executed before any state
    /// access, per spec.md §6. Stateful validation (pool existence,
    /// pause state, balances, ...) happens in the keeper.
    pub fn validate_basic(&self) -> Result<(), ContractError> {
        use paw_types::validation::{screen_injection, validate_denom};

        match self {
            ExecuteMsg::CreatePool {
                token_a,
                amount_a,
                token_b,
                amount_b,
                ..
            } => {
                validate_denom(token_a)?;
                validate_denom(token_b)?;
                if token_a == token_b {
                    return Err(ContractError::InvalidAmount {});
                }
                if amount_a.is_zero() || amount_b.is_zero() {
                    return Err(ContractError::InvalidAmount {});
                }
                Ok(())
            }
            ExecuteMsg::AddLiquidity {
                amount_a, amount_b, ..
            } => {
                if amount_a.is_zero() && amount_b.is_zero() {
                    return Err(ContractError::InvalidAmount {});
                }
                Ok(())
            }
            ExecuteMsg::RemoveLiquidity { shares, .. } => {
                if shares.is_zero() {
                    return Err(ContractError::InvalidAmount {});
                }
                Ok(())
            }
            ExecuteMsg::Swap {
                token_in,
                amount_in,
                token_out,
                deadline,
                ..
            } => {
                validate_denom(token_in)?;
                validate_denom(token_out)?;
                if token_in == token_out {
                    return Err(ContractError::InvalidAmount {});
                }
                if amount_in.is_zero() {
                    return Err(ContractError::InvalidAmount {});
                }
                if *deadline == 0 {
                    return Err(ContractError::DeadlineMissing {});
                }
                Ok(())
            }
            ExecuteMsg::CommitSwap { hash, .. } => {
                if hash.is_empty() || hash.len() > 128 {
                    return Err(ContractError::InvalidCommitHash {});
                }
                Ok(())
            }
            ExecuteMsg::RevealSwap {
                token_in,
                amount_in,
                token_out,
                deadline,
                ..
            } => {
                validate_denom(token_in)?;
                validate_denom(token_out)?;
                if amount_in.is_zero() {
                    return Err(ContractError::InvalidAmount {});
                }
                if *deadline == 0 {
                    return Err(ContractError::DeadlineMissing {});
                }
                Ok(())
            }
            ExecuteMsg::PauseModule { reason, .. } => {
                screen_injection("reason", reason)?;
                Ok(())
            }
            ExecuteMsg::UnpauseModule { .. } => Ok(()),
        }
    }
}
