use cosmwasm_std::StdError;
use thiserror::Error;

use paw_errors::CommonError;

#[derive(Error, Debug, PartialEq)]
pub enum ContractError {
    #[error("{0}")]
    Std(#[from] StdError),

    #[error("{0}")]
    Common(#[from] CommonError),

    #[error("provider {0} not found")]
    ProviderNotFound(String),

    #[error("provider stake {stake} is below the minimum of {minimum}")]
    InsufficientProviderStake { stake: String, minimum: String },

    #[error("request {0} not found")]
    RequestNotFound(u64),

    #[error("escrow for request {0} not found")]
    EscrowNotFound(u64),

    #[error("dispute {0} not found")]
    DisputeNotFound(u64),

    #[error("amount must be greater than zero")]
    InvalidAmount {},

    #[error("no active provider meets the requested specs")]
    NoEligibleProvider {},

    #[error("caller is not the provider assigned to this request")]
    NotAssignedProvider {},

    #[error("request {0} is not in a state that accepts this operation")]
    InvalidRequestState(u64),

    #[error("unauthorized")]
    Unauthorized {},

    #[error("{context}")]
    InvariantViolation { context: String },

    #[error("bank transfer failed: {0}")]
    BankTransferFailed(String),

    #[error("requested timeout of {requested} blocks exceeds the governance maximum of {maximum} blocks")]
    TimeoutExceedsMaximum { requested: u64, maximum: u64 },
}
