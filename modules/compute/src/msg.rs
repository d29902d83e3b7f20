use cosmwasm_schema::cw_serde;
use paw_types::Amount;

use crate::error::ContractError;
use crate::types::{DisputeId, RequestId, Specs};

#[cw_serde]
pub enum ExecuteMsg {
    RegisterProvider {
        address: String,
        endpoint: String,
        stake: Amount,
        specs: Specs,
    },
    DeactivateProvider {
        address: String,
    },
    RequestCompute {
        requester: String,
        specs: Specs,
        image: String,
        command: String,
        max_payment: Amount,
        timeout_blocks: u64,
    },
    SubmitResult {
        provider: String,
        request_id: RequestId,
        result: String,
        proof_blob: Vec<u8>,
    },
    Dispute {
        disputant: String,
        request_id: RequestId,
        reason: String,
    },
    Appeal {
        appellant: String,
        dispute_id: DisputeId,
        reason: String,
    },
}

impl ExecuteMsg {
    /// Structural/range/injection-safety pass executed before any state
    /// access, per spec.md §6.
    pub fn validate_basic(&self) -> Result<(), ContractError> {
        use paw_types::validation::{screen_injection, validate_endpoint};

        match self {
            ExecuteMsg::RegisterProvider { endpoint, stake, .. } => {
                validate_endpoint(endpoint)?;
                if stake.is_zero() {
                    return Err(ContractError::InvalidAmount {});
                }
                Ok(())
            }
            ExecuteMsg::DeactivateProvider { .. } => Ok(()),
            ExecuteMsg::RequestCompute {
                image,
                command,
                max_payment,
                timeout_blocks,
                ..
            } => {
                screen_injection("image", image)?;
                screen_injection("command", command)?;
                if max_payment.is_zero() {
                    return Err(ContractError::InvalidAmount {});
                }
                if *timeout_blocks == 0 {
                    return Err(ContractError::InvalidAmount {});
                }
                Ok(())
            }
            ExecuteMsg::SubmitResult { result, .. } => {
                screen_injection("result", result)?;
                Ok(())
            }
            ExecuteMsg::Dispute { reason, .. } | ExecuteMsg::Appeal { reason, .. } => {
                screen_injection("reason", reason)?;
                Ok(())
            }
        }
    }
}
